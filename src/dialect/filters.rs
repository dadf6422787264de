//! Per-operation predicate sets.
//!
//! Exactly one function per operation shape, invoked by every dialect and by
//! both sides of each count/fetch pair. Paired queries therefore carry
//! structurally identical predicates by construction.
//!
//! Emission order is canonical everywhere: namespace branch, data id, group,
//! application name, content, lower time bound, upper time bound, id cursor.

use crate::query::{PredicateAssembler, QueryContext, SqlParam};

/// Exact-match page filters: identifiers and application name by equality,
/// content by pattern.
pub(crate) fn exact_filters(asm: &mut PredicateAssembler, ctx: &QueryContext) {
    asm.push_namespace("namespace_id", &ctx.namespace_filter());
    asm.eq_if_present("data_id", ctx.data_id());
    asm.eq_if_present("group_id", ctx.group());
    asm.eq_if_present("app_name", ctx.app_name());
    asm.like_if_present("content", ctx.content());
}

/// Pattern-search filters: every supported column by wildcard match.
pub(crate) fn search_filters(asm: &mut PredicateAssembler, ctx: &QueryContext) {
    asm.push_namespace("namespace_id", &ctx.namespace_filter());
    asm.like_if_present("data_id", ctx.data_id());
    asm.like_if_present("group_id", ctx.group());
    asm.like_if_present("app_name", ctx.app_name());
    asm.like_if_present("content", ctx.content());
}

/// By-application filters: the application name is required.
pub(crate) fn by_app_filters(
    asm: &mut PredicateAssembler,
    ctx: &QueryContext,
) -> crate::Result<()> {
    asm.push_namespace("namespace_id", &ctx.namespace_filter());
    let app_name = ctx.require_app_name()?;
    asm.push_eq("app_name", app_name);
    Ok(())
}

/// Namespace branch alone, for dump-style listings.
pub(crate) fn namespace_only(asm: &mut PredicateAssembler, ctx: &QueryContext) {
    asm.push_namespace("namespace_id", &ctx.namespace_filter());
}

/// Changed-record filters: optional key/app filters and time range plus the
/// mandatory id cursor.
pub(crate) fn changed_filters(
    asm: &mut PredicateAssembler,
    ctx: &QueryContext,
) -> crate::Result<()> {
    asm.push_namespace("namespace_id", &ctx.namespace_filter());
    asm.like_if_present("data_id", ctx.data_id());
    asm.like_if_present("group_id", ctx.group());
    asm.eq_if_present("app_name", ctx.app_name());
    time_range(asm, ctx)?;
    cursor_filter(asm, ctx)
}

/// The id-cursor lower bound, required, bound as a parameter.
pub(crate) fn cursor_filter(
    asm: &mut PredicateAssembler,
    ctx: &QueryContext,
) -> crate::Result<()> {
    let last_seen = ctx.require_last_seen_id()?;
    asm.push_cmp("id", ">", last_seen);
    Ok(())
}

/// History-key filters: data id and group are required, namespace takes its
/// canonical branch.
pub(crate) fn history_key_filters(
    asm: &mut PredicateAssembler,
    ctx: &QueryContext,
) -> crate::Result<()> {
    asm.push_namespace("namespace_id", &ctx.namespace_filter());
    let data_id = ctx.require_data_id()?;
    asm.push_eq("data_id", data_id);
    let group = ctx.require_group()?;
    asm.push_eq("group_id", group);
    Ok(())
}

fn time_range(asm: &mut PredicateAssembler, ctx: &QueryContext) -> crate::Result<()> {
    if let (Some(after), Some(before)) = (ctx.modified_after(), ctx.modified_before())
        && after > before
    {
        return Err(crate::Error::InvalidRange(format!(
            "modified_after {after} is later than modified_before {before}"
        )));
    }
    if let Some(after) = ctx.modified_after() {
        asm.push_cmp("modified_at", ">=", SqlParam::Timestamp(after));
    }
    if let Some(before) = ctx.modified_before() {
        asm.push_cmp("modified_at", "<=", SqlParam::Timestamp(before));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::PlaceholderStyle;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_search_filters_partial_context() {
        // dataId pattern + explicit empty namespace; group absent
        let ctx = QueryContext::new().with_data_id("app-%").with_namespace("");
        let mut asm = PredicateAssembler::new(PlaceholderStyle::Numbered);
        search_filters(&mut asm, &ctx);
        let (clause, params) = asm.into_parts();
        assert_eq!(
            clause,
            " WHERE namespace_id = ?1 AND data_id LIKE ?2 ESCAPE '\\'"
        );
        assert_eq!(params, vec![SqlParam::from(""), SqlParam::from("app-%")]);
    }

    #[test]
    fn test_exact_vs_search_operators() {
        let ctx = QueryContext::new().with_data_id("svc").with_group("DEFAULT");
        let mut exact = PredicateAssembler::new(PlaceholderStyle::Question);
        exact_filters(&mut exact, &ctx);
        let (exact_clause, _) = exact.into_parts();
        assert!(exact_clause.contains("data_id = ?"));
        assert!(exact_clause.contains("group_id = ?"));

        let mut search = PredicateAssembler::new(PlaceholderStyle::Question);
        search_filters(&mut search, &ctx);
        let (search_clause, _) = search.into_parts();
        assert!(search_clause.contains("data_id LIKE ?"));
        assert!(search_clause.contains("group_id LIKE ?"));
    }

    #[test]
    fn test_changed_filters_require_cursor() {
        let ctx = QueryContext::new().with_app_name("billing");
        let mut asm = PredicateAssembler::new(PlaceholderStyle::Dollar);
        let result = changed_filters(&mut asm, &ctx);
        assert!(matches!(
            result,
            Err(crate::Error::MissingParameter("last_seen_id"))
        ));
    }

    #[test]
    fn test_changed_filters_full_order() {
        let after = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single();
        let before = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single();
        let (Some(after), Some(before)) = (after, before) else {
            return;
        };
        let ctx = QueryContext::new()
            .with_namespace("tenant-a")
            .with_data_id("app-%")
            .with_app_name("billing")
            .with_modified_after(after)
            .with_modified_before(before)
            .with_last_seen_id(100);
        let mut asm = PredicateAssembler::new(PlaceholderStyle::Dollar);
        assert!(changed_filters(&mut asm, &ctx).is_ok());
        let (clause, params) = asm.into_parts();
        assert_eq!(
            clause,
            " WHERE namespace_id = $1 AND data_id LIKE $2 ESCAPE '\\' AND app_name = $3 \
             AND modified_at >= $4 AND modified_at <= $5 AND id > $6"
        );
        assert_eq!(params.len(), 6);
        assert_eq!(params[5], SqlParam::Int(100));
    }

    #[test]
    fn test_inverted_time_range_rejected() {
        let after = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single();
        let before = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single();
        let (Some(after), Some(before)) = (after, before) else {
            return;
        };
        let ctx = QueryContext::new()
            .with_modified_after(after)
            .with_modified_before(before)
            .with_last_seen_id(0);
        let mut asm = PredicateAssembler::new(PlaceholderStyle::Dollar);
        assert!(matches!(
            changed_filters(&mut asm, &ctx),
            Err(crate::Error::InvalidRange(_))
        ));
    }

    #[test]
    fn test_history_key_filters_required() {
        let ctx = QueryContext::new().with_data_id("svc.yaml");
        let mut asm = PredicateAssembler::new(PlaceholderStyle::Question);
        assert!(matches!(
            history_key_filters(&mut asm, &ctx),
            Err(crate::Error::MissingParameter("group"))
        ));
    }
}
