//! `SQLite` dialect: offset/limit pagination, `?N` placeholders.

use super::{ConfigQueryBuilder, Dialect, HistoryQueryBuilder, filters};
use crate::models::{ConfigRecord, HistoryRecord};
use crate::query::{PlaceholderStyle, PredicateAssembler, Query, QueryContext, RowWindow, SqlParam};

/// Query builder for the `SQLite` backend family.
///
/// Stateless; a single shared instance serves any number of concurrent
/// callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteQueryBuilder;

const STYLE: PlaceholderStyle = PlaceholderStyle::Numbered;
const DIALECT: Dialect = Dialect::Sqlite;

fn count(operation: &'static str, table: &str, asm: PredicateAssembler) -> Query {
    super::count_query(DIALECT, operation, table, asm)
}

fn page(
    operation: &'static str,
    columns: &str,
    table: &str,
    order_by: &str,
    asm: PredicateAssembler,
    window: &RowWindow,
) -> Query {
    super::offset_limit_page(DIALECT, operation, columns, table, order_by, asm, window)
}

impl ConfigQueryBuilder for SqliteQueryBuilder {
    fn dialect(&self) -> Dialect {
        DIALECT
    }

    fn exact_page_count(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let mut asm = PredicateAssembler::new(STYLE);
        filters::exact_filters(&mut asm, ctx);
        Ok(count("exact_page_count", ConfigRecord::TABLE, asm))
    }

    fn exact_page_fetch(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let window = RowWindow::from_context(ctx)?;
        let mut asm = PredicateAssembler::new(STYLE);
        filters::exact_filters(&mut asm, ctx);
        Ok(page(
            "exact_page_fetch",
            ConfigRecord::PAGE_COLUMNS,
            ConfigRecord::TABLE,
            "id",
            asm,
            &window,
        ))
    }

    fn search_page_count(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let mut asm = PredicateAssembler::new(STYLE);
        filters::search_filters(&mut asm, ctx);
        Ok(count("search_page_count", ConfigRecord::TABLE, asm))
    }

    fn search_page_fetch(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let window = RowWindow::from_context(ctx)?;
        let mut asm = PredicateAssembler::new(STYLE);
        filters::search_filters(&mut asm, ctx);
        Ok(page(
            "search_page_fetch",
            ConfigRecord::PAGE_COLUMNS,
            ConfigRecord::TABLE,
            "id",
            asm,
            &window,
        ))
    }

    fn configs_by_app_page(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let window = RowWindow::from_context(ctx)?;
        let mut asm = PredicateAssembler::new(STYLE);
        filters::by_app_filters(&mut asm, ctx)?;
        Ok(page(
            "configs_by_app_page",
            ConfigRecord::PAGE_COLUMNS,
            ConfigRecord::TABLE,
            "id",
            asm,
            &window,
        ))
    }

    fn namespace_list(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let window = RowWindow::from_context(ctx)?;
        Ok(super::build(
            DIALECT,
            "namespace_list",
            format!(
                "SELECT DISTINCT namespace_id FROM {} WHERE namespace_id IS NOT NULL \
                 ORDER BY namespace_id {}",
                ConfigRecord::TABLE,
                window.limit_offset()
            ),
            Vec::new(),
        ))
    }

    fn group_list(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let window = RowWindow::from_context(ctx)?;
        Ok(super::build(
            DIALECT,
            "group_list",
            format!(
                "SELECT DISTINCT group_id FROM {} WHERE namespace_id IS NULL \
                 ORDER BY group_id {}",
                ConfigRecord::TABLE,
                window.limit_offset()
            ),
            Vec::new(),
        ))
    }

    fn all_config_keys(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let window = RowWindow::from_context(ctx)?;
        let mut asm = PredicateAssembler::new(STYLE);
        filters::namespace_only(&mut asm, ctx);
        Ok(page(
            "all_config_keys",
            ConfigRecord::KEY_COLUMNS,
            ConfigRecord::TABLE,
            "id",
            asm,
            &window,
        ))
    }

    fn all_configs_page(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let window = RowWindow::from_context(ctx)?;
        let mut asm = PredicateAssembler::new(STYLE);
        filters::namespace_only(&mut asm, ctx);
        Ok(page(
            "all_configs_page",
            ConfigRecord::DUMP_COLUMNS,
            ConfigRecord::TABLE,
            "id",
            asm,
            &window,
        ))
    }

    fn configs_after_id(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let window = RowWindow::from_context(ctx)?;
        let mut asm = PredicateAssembler::new(STYLE);
        filters::cursor_filter(&mut asm, ctx)?;
        Ok(page(
            "configs_after_id",
            ConfigRecord::DUMP_COLUMNS,
            ConfigRecord::TABLE,
            "id",
            asm,
            &window,
        ))
    }

    fn changed_configs_page(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let window = RowWindow::from_context(ctx)?;
        let mut asm = PredicateAssembler::new(STYLE);
        filters::changed_filters(&mut asm, ctx)?;
        Ok(page(
            "changed_configs_page",
            ConfigRecord::DUMP_COLUMNS,
            ConfigRecord::TABLE,
            "id",
            asm,
            &window,
        ))
    }

    fn fingerprint_page(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let window = RowWindow::from_context(ctx)?;
        Ok(page(
            "fingerprint_page",
            ConfigRecord::FINGERPRINT_COLUMNS,
            ConfigRecord::TABLE,
            "id",
            PredicateAssembler::new(STYLE),
            &window,
        ))
    }
}

impl HistoryQueryBuilder for SqliteQueryBuilder {
    fn dialect(&self) -> Dialect {
        DIALECT
    }

    fn history_page_count(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let mut asm = PredicateAssembler::new(STYLE);
        filters::history_key_filters(&mut asm, ctx)?;
        Ok(count("history_page_count", HistoryRecord::TABLE, asm))
    }

    fn history_page_fetch(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let window = RowWindow::from_context(ctx)?;
        let mut asm = PredicateAssembler::new(STYLE);
        filters::history_key_filters(&mut asm, ctx)?;
        Ok(page(
            "history_page_fetch",
            HistoryRecord::PAGE_COLUMNS,
            HistoryRecord::TABLE,
            "nid DESC",
            asm,
            &window,
        ))
    }

    fn purge_history(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let cutoff = ctx.require_purge_cutoff()?;
        let limit = ctx.require_purge_limit()?;
        let sql = format!(
            "DELETE FROM {table} WHERE nid IN \
             (SELECT nid FROM {table} WHERE modified_at < ?1 ORDER BY modified_at LIMIT ?2)",
            table = HistoryRecord::TABLE
        );
        Ok(super::build(
            DIALECT,
            "purge_history",
            sql,
            vec![SqlParam::Timestamp(cutoff), SqlParam::from(limit)],
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_search_fetch_shape() {
        let ctx = QueryContext::new()
            .with_data_id("app-%")
            .with_namespace("tenant-a")
            .with_window(0, 10);
        let query = SqliteQueryBuilder.search_page_fetch(&ctx).unwrap();
        assert_eq!(
            query.sql(),
            "SELECT id, data_id, group_id, namespace_id, app_name, content, content_type, \
             encrypted_data_key FROM config_record WHERE namespace_id = ?1 AND \
             data_id LIKE ?2 ESCAPE '\\' ORDER BY id LIMIT 10 OFFSET 0"
        );
        assert_eq!(
            query.params(),
            &[SqlParam::from("tenant-a"), SqlParam::from("app-%")]
        );
    }

    #[test]
    fn test_count_and_fetch_share_predicates() {
        let ctx = QueryContext::new()
            .with_data_id("app-%")
            .with_content("timeout")
            .with_window(20, 10);
        let count = SqliteQueryBuilder.search_page_count(&ctx).unwrap();
        let fetch = SqliteQueryBuilder.search_page_fetch(&ctx).unwrap();
        let count_where = count.sql().split_once("WHERE").map(|(_, w)| w.to_string());
        assert!(count_where.is_some_and(|w| fetch.sql().contains(w.trim())));
        assert_eq!(count.params(), fetch.params());
    }

    #[test]
    fn test_default_namespace_binds_nothing() {
        let ctx = QueryContext::new().with_window(0, 5);
        let query = SqliteQueryBuilder.all_configs_page(&ctx).unwrap();
        assert!(query.sql().contains("WHERE namespace_id IS NULL"));
        assert!(query.params().is_empty());
    }

    #[test]
    fn test_configs_after_id_binds_cursor() {
        let ctx = QueryContext::new().with_last_seen_id(100).with_window(0, 50);
        let query = SqliteQueryBuilder.configs_after_id(&ctx).unwrap();
        assert!(query.sql().contains("WHERE id > ?1 ORDER BY id"));
        assert!(query.sql().ends_with("LIMIT 50 OFFSET 0"));
        assert_eq!(query.params(), &[SqlParam::Int(100)]);
    }

    #[test]
    fn test_history_fetch_orders_newest_first() {
        let ctx = QueryContext::new()
            .with_data_id("svc.yaml")
            .with_group("DEFAULT")
            .with_window(0, 20);
        let query = SqliteQueryBuilder.history_page_fetch(&ctx).unwrap();
        assert!(query.sql().contains("ORDER BY nid DESC"));
        assert!(query.sql().contains("namespace_id IS NULL"));
        assert_eq!(query.params().len(), 2);
    }

    #[test]
    fn test_purge_bounded_and_bound() {
        let cutoff = chrono::Utc::now();
        let ctx = QueryContext::new()
            .with_purge_cutoff(cutoff)
            .with_purge_limit(500);
        let query = SqliteQueryBuilder.purge_history(&ctx).unwrap();
        assert_eq!(
            query.sql(),
            "DELETE FROM config_history WHERE nid IN (SELECT nid FROM config_history \
             WHERE modified_at < ?1 ORDER BY modified_at LIMIT ?2)"
        );
        assert_eq!(
            query.params(),
            &[SqlParam::Timestamp(cutoff), SqlParam::Int(500)]
        );
    }

    #[test]
    fn test_by_app_requires_app_name() {
        let ctx = QueryContext::new().with_window(0, 10);
        assert!(matches!(
            SqliteQueryBuilder.configs_by_app_page(&ctx),
            Err(crate::Error::MissingParameter("app_name"))
        ));
    }
}
