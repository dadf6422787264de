//! PostgreSQL dialect: offset/limit pagination, `$N` placeholders.
//!
//! Structurally the same emission as the `SQLite` family; only the
//! placeholder syntax differs.

use super::{ConfigQueryBuilder, Dialect, HistoryQueryBuilder, filters};
use crate::models::{ConfigRecord, HistoryRecord};
use crate::query::{PlaceholderStyle, PredicateAssembler, Query, QueryContext, RowWindow, SqlParam};

/// Query builder for the PostgreSQL backend family.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresQueryBuilder;

const STYLE: PlaceholderStyle = PlaceholderStyle::Dollar;
const DIALECT: Dialect = Dialect::Postgres;

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

impl ConfigQueryBuilder for PostgresQueryBuilder {
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

impl HistoryQueryBuilder for PostgresQueryBuilder {
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
             (SELECT nid FROM {table} WHERE modified_at < $1 ORDER BY modified_at LIMIT $2)",
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
