//! CLI command implementations.
//!
//! The `confsql` binary is an inspection tool for the query layer: it builds
//! a [`QueryContext`] from flags, runs one operation against one dialect
//! builder, and prints the generated SQL and parameter list. Nothing is
//! executed against a database.
//!
//! # Example Usage
//!
//! ```bash
//! # Pattern search on sqlite, first page of 10
//! confsql render --dialect sqlite --op search-fetch --data-id 'app-%' --page-size 10
//!
//! # The same logical page on oracle, as JSON
//! confsql render --dialect oracle --op search-fetch --data-id 'app-%' --page-size 10 --json
//!
//! # Effective tuning settings
//! confsql settings --file confsql.toml
//! ```

#![allow(clippy::print_stdout)]

use crate::config::StoreSettings;
use crate::dialect::{
    ConfigQueryBuilder, Dialect, HistoryQueryBuilder, OracleQueryBuilder, PostgresQueryBuilder,
    SqliteQueryBuilder,
};
use crate::query::{Query, QueryContext};
use anyhow::{Context as _, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(name = "confsql", version, about = "Inspect dialect-portable query generation")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate one operation's query and print SQL plus parameters.
    Render(RenderArgs),
    /// Print the effective tuning settings.
    Settings(SettingsArgs),
}

#[derive(Debug, Args)]
struct SettingsArgs {
    /// Path to a TOML settings file; defaults plus env overrides otherwise.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Emit JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct RenderArgs {
    /// Target dialect: sqlite, postgres, oracle.
    #[arg(long, env = "CONFSQL_DIALECT")]
    dialect: String,
    /// Operation name, e.g. search-fetch, history-purge (see long help).
    #[arg(long)]
    op: String,
    /// Data identifier filter.
    #[arg(long)]
    data_id: Option<String>,
    /// Group identifier filter.
    #[arg(long)]
    group: Option<String>,
    /// Explicit namespace; omit for the default namespace.
    #[arg(long)]
    namespace: Option<String>,
    /// Application name filter.
    #[arg(long)]
    app_name: Option<String>,
    /// Content filter.
    #[arg(long)]
    content: Option<String>,
    /// Lower modification-time bound (RFC 3339).
    #[arg(long)]
    modified_after: Option<String>,
    /// Upper modification-time bound (RFC 3339).
    #[arg(long)]
    modified_before: Option<String>,
    /// Id cursor for incremental operations.
    #[arg(long)]
    last_seen_id: Option<i64>,
    /// History purge cutoff (RFC 3339).
    #[arg(long)]
    purge_cutoff: Option<String>,
    /// Maximum rows per purge; defaults to the settings batch limit.
    #[arg(long)]
    purge_limit: Option<u32>,
    /// Zero-based start row of the page window.
    #[arg(long, default_value_t = 0)]
    start_row: u64,
    /// Page size; defaults to the settings page size.
    #[arg(long)]
    page_size: Option<u64>,
    /// Path to a TOML settings file for the defaults above.
    #[arg(long)]
    settings_file: Option<PathBuf>,
    /// Emit JSON instead of text.
    #[arg(long)]
    json: bool,
}

/// Parses arguments and runs the selected command.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => render(&args),
        Command::Settings(args) => settings(&args),
    }
}

fn load_settings(file: Option<&PathBuf>) -> anyhow::Result<StoreSettings> {
    file.map_or_else(
        || Ok(StoreSettings::load_default()),
        |path| StoreSettings::load_from_file(path).context("loading settings"),
    )
}

fn settings(args: &SettingsArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.file.as_ref())?;
    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "default_page_size": settings.default_page_size,
                "dump_batch_size": settings.dump_batch_size,
                "history_purge_batch": settings.history_purge_batch,
                "max_content_bytes": settings.max_content_bytes,
                "namespace_quota": settings.namespace_quota,
                "group_quota": settings.group_quota,
            })
        );
    } else {
        println!("default_page_size   = {}", settings.default_page_size);
        println!("dump_batch_size     = {}", settings.dump_batch_size);
        println!("history_purge_batch = {}", settings.history_purge_batch);
        println!("max_content_bytes   = {}", settings.max_content_bytes);
        println!("namespace_quota     = {}", settings.namespace_quota);
        println!("group_quota         = {}", settings.group_quota);
    }
    Ok(())
}

fn parse_time(flag: &str, value: &str) -> anyhow::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .with_context(|| format!("--{flag} expects an RFC 3339 timestamp, got '{value}'"))
}

fn build_context(args: &RenderArgs, settings: &StoreSettings) -> anyhow::Result<QueryContext> {
    let mut ctx = QueryContext::new().with_window(
        args.start_row,
        args.page_size.unwrap_or(settings.default_page_size),
    );
    if let Some(v) = &args.data_id {
        ctx = ctx.with_data_id(v.clone());
    }
    if let Some(v) = &args.group {
        ctx = ctx.with_group(v.clone());
    }
    if let Some(v) = &args.namespace {
        ctx = ctx.with_namespace(v.clone());
    }
    if let Some(v) = &args.app_name {
        ctx = ctx.with_app_name(v.clone());
    }
    if let Some(v) = &args.content {
        ctx = ctx.with_content(v.clone());
    }
    if let Some(v) = &args.modified_after {
        ctx = ctx.with_modified_after(parse_time("modified-after", v)?);
    }
    if let Some(v) = &args.modified_before {
        ctx = ctx.with_modified_before(parse_time("modified-before", v)?);
    }
    if let Some(v) = args.last_seen_id {
        ctx = ctx.with_last_seen_id(v);
    }
    if let Some(v) = &args.purge_cutoff {
        ctx = ctx.with_purge_cutoff(parse_time("purge-cutoff", v)?);
        ctx = ctx.with_purge_limit(args.purge_limit.unwrap_or(settings.history_purge_batch));
    } else if let Some(v) = args.purge_limit {
        ctx = ctx.with_purge_limit(v);
    }
    Ok(ctx)
}

fn generate(dialect: Dialect, op: &str, ctx: &QueryContext) -> anyhow::Result<Query> {
    let (config, history): (&dyn ConfigQueryBuilder, &dyn HistoryQueryBuilder) = match dialect {
        Dialect::Sqlite => (&SqliteQueryBuilder, &SqliteQueryBuilder),
        Dialect::Postgres => (&PostgresQueryBuilder, &PostgresQueryBuilder),
        Dialect::Oracle => (&OracleQueryBuilder, &OracleQueryBuilder),
    };
    let query = match op {
        "exact-count" => config.exact_page_count(ctx)?,
        "exact-fetch" => config.exact_page_fetch(ctx)?,
        "search-count" => config.search_page_count(ctx)?,
        "search-fetch" => config.search_page_fetch(ctx)?,
        "by-app" => config.configs_by_app_page(ctx)?,
        "namespaces" => config.namespace_list(ctx)?,
        "groups" => config.group_list(ctx)?,
        "keys" => config.all_config_keys(ctx)?,
        "all" => config.all_configs_page(ctx)?,
        "after-id" => config.configs_after_id(ctx)?,
        "changed" => config.changed_configs_page(ctx)?,
        "fingerprints" => config.fingerprint_page(ctx)?,
        "history-count" => history.history_page_count(ctx)?,
        "history-fetch" => history.history_page_fetch(ctx)?,
        "history-purge" => history.purge_history(ctx)?,
        other => bail!(
            "unknown operation '{other}'; expected one of exact-count, exact-fetch, \
             search-count, search-fetch, by-app, namespaces, groups, keys, all, after-id, \
             changed, fingerprints, history-count, history-fetch, history-purge"
        ),
    };
    Ok(query)
}

fn render(args: &RenderArgs) -> anyhow::Result<()> {
    let dialect = Dialect::parse(&args.dialect)
        .with_context(|| format!("unknown dialect '{}'", args.dialect))?;
    let settings = load_settings(args.settings_file.as_ref())?;
    let ctx = build_context(args, &settings)?;
    let query = generate(dialect, &args.op, &ctx)?;

    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "dialect": dialect,
                "operation": args.op,
                "sql": query.sql(),
                "params": query.params(),
            })
        );
    } else {
        println!("{}", query.sql());
        for (i, param) in query.params().iter().enumerate() {
            println!("-- param {}: {param}", i + 1);
        }
    }
    Ok(())
}
