//! Oracle dialect: numbered-row window pagination, `?` placeholders.
//!
//! Oracle has no native offset/limit, so every page is a three-layer window:
//! an inner ordered selection, a middle layer that captures `ROWNUM` *after*
//! the ordering has been applied, and an outer selection filtered to the
//! inclusive rank range. Capturing `ROWNUM` in the same level as the
//! `ORDER BY` would number rows before the sort and is not order-stable;
//! this builder never emits that form.

use super::{ConfigQueryBuilder, Dialect, HistoryQueryBuilder, filters};
use crate::models::{ConfigRecord, HistoryRecord};
use crate::query::{PlaceholderStyle, PredicateAssembler, Query, QueryContext, RowWindow, SqlParam};

/// Query builder for the Oracle backend family.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleQueryBuilder;

const STYLE: PlaceholderStyle = PlaceholderStyle::Question;
const DIALECT: Dialect = Dialect::Oracle;

fn count(operation: &'static str, table: &str, asm: PredicateAssembler) -> Query {
    super::count_query(DIALECT, operation, table, asm)
}

/// Wraps an ordered inner selection in the three-layer rank window.
fn windowed(
    operation: &'static str,
    columns: &str,
    inner: String,
    window: &RowWindow,
    params: Vec<SqlParam>,
) -> Query {
    let sql = format!(
        "SELECT {columns} FROM (SELECT a.*, ROWNUM rnum FROM ({inner}) a \
         WHERE ROWNUM <= {last}) WHERE rnum >= {first}",
        last = window.last_rank(),
        first = window.first_rank(),
    );
    super::build(DIALECT, operation, sql, params)
}

fn page(
    operation: &'static str,
    columns: &str,
    table: &str,
    order_by: &str,
    asm: PredicateAssembler,
    window: &RowWindow,
) -> Query {
    let (where_sql, params) = asm.into_parts();
    let inner = format!("SELECT {columns} FROM {table}{where_sql} ORDER BY {order_by}");
    windowed(operation, columns, inner, window, params)
}

impl ConfigQueryBuilder for OracleQueryBuilder {
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
        let inner = format!(
            "SELECT DISTINCT namespace_id FROM {} WHERE namespace_id IS NOT NULL \
             ORDER BY namespace_id",
            ConfigRecord::TABLE
        );
        Ok(windowed(
            "namespace_list",
            "namespace_id",
            inner,
            &window,
            Vec::new(),
        ))
    }

    fn group_list(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let window = RowWindow::from_context(ctx)?;
        let inner = format!(
            "SELECT DISTINCT group_id FROM {} WHERE namespace_id IS NULL ORDER BY group_id",
            ConfigRecord::TABLE
        );
        Ok(windowed("group_list", "group_id", inner, &window, Vec::new()))
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

impl HistoryQueryBuilder for OracleQueryBuilder {
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
            "DELETE FROM {table} WHERE nid IN (SELECT nid FROM \
             (SELECT nid FROM {table} WHERE modified_at < ? ORDER BY modified_at) \
             WHERE ROWNUM <= ?)",
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
    fn test_three_layer_window_shape() {
        let ctx = QueryContext::new().with_window(10, 10);
        let query = OracleQueryBuilder.fingerprint_page(&ctx).unwrap();
        // rows ranked 11..=20: outer bounds are inclusive
        assert!(query.sql().starts_with("SELECT id, data_id, group_id"));
        assert!(query.sql().contains("SELECT a.*, ROWNUM rnum FROM (SELECT"));
        assert!(query.sql().contains("ORDER BY id) a WHERE ROWNUM <= 20"));
        assert!(query.sql().ends_with("WHERE rnum >= 11"));
        assert!(query.params().is_empty());
    }

    #[test]
    fn test_ordering_inside_window() {
        let ctx = QueryContext::new()
            .with_data_id("svc.yaml")
            .with_group("DEFAULT")
            .with_namespace("tenant-a")
            .with_window(0, 20);
        let query = OracleQueryBuilder.history_page_fetch(&ctx).unwrap();
        // ORDER BY must sit in the innermost layer, before ROWNUM is taken
        let order_pos = query.sql().find("ORDER BY nid DESC");
        let rownum_pos = query.sql().find("ROWNUM rnum");
        assert!(order_pos.is_some() && rownum_pos.is_some());
        assert!(order_pos > rownum_pos, "ROWNUM capture wraps the ordered inner select");
        assert_eq!(query.params().len(), 3);
    }

    #[test]
    fn test_question_placeholders_unnumbered() {
        let ctx = QueryContext::new()
            .with_data_id("app-%")
            .with_namespace("")
            .with_window(0, 10);
        let query = OracleQueryBuilder.search_page_fetch(&ctx).unwrap();
        assert!(query.sql().contains("namespace_id = ?"));
        assert!(query.sql().contains("data_id LIKE ?"));
        assert!(!query.sql().contains("?1"));
        assert_eq!(query.params().len(), 2);
    }

    #[test]
    fn test_purge_keeps_rownum_bound() {
        let cutoff = chrono::Utc::now();
        let ctx = QueryContext::new()
            .with_purge_cutoff(cutoff)
            .with_purge_limit(1000);
        let query = OracleQueryBuilder.purge_history(&ctx).unwrap();
        assert_eq!(
            query.sql(),
            "DELETE FROM config_history WHERE nid IN (SELECT nid FROM \
             (SELECT nid FROM config_history WHERE modified_at < ? ORDER BY modified_at) \
             WHERE ROWNUM <= ?)"
        );
        assert_eq!(query.params().len(), 2);
    }

    #[test]
    fn test_namespace_list_excludes_default() {
        let ctx = QueryContext::new().with_window(0, 50);
        let query = OracleQueryBuilder.namespace_list(&ctx).unwrap();
        assert!(query.sql().contains("SELECT DISTINCT namespace_id"));
        assert!(query.sql().contains("namespace_id IS NOT NULL"));
        assert!(query.sql().contains("WHERE ROWNUM <= 50"));
        assert!(query.sql().ends_with("WHERE rnum >= 1"));
    }
}
