use crate::cli::AuditArgs;
use crate::config::ProjectConfig;
use crate::report;
use crate::write::write_atomic;
use colored::Colorize;
use typesync_check::{DbSchema, SourceWarning, TsSchema, audit_schemas};

pub fn run(args: AuditArgs) -> anyhow::Result<()> {
    let project = ProjectConfig::discover(args.config.clone())?;
    let paths = &project.file.paths;

    let migrations_dir = project.pick_path(args.migrations.as_ref(), &paths.migrations);
    let types_dir = project.pick_path(args.types.as_ref(), &paths.types);

    let sql = project.sql_source(migrations_dir).load()?;
    let ts = project.ts_source(types_dir).load()?;
    print_warnings(&sql.warnings);
    print_warnings(&ts.warnings);

    let db = DbSchema::from_sources(&sql.files);
    let types = TsSchema::from_sources(&ts.files);
    let outcome = audit_schemas(&db, &types, &project.compare_options());

    tracing::info!(
        config = ?project.config_path,
        tables = outcome.table_count,
        interfaces = outcome.interface_count,
        pairs = outcome.pairings.len(),
        discrepancies = outcome.discrepancies.len(),
        "audit finished"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.discrepancies)?);
    } else {
        print!(
            "{}",
            report::render_console(&outcome, project.file.compare.report_limit)
        );
    }

    if !args.no_report {
        let report_path = project.pick_path(args.report.as_ref(), &paths.report);
        let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S %:z").to_string();
        write_atomic(&report_path, &report::render_markdown(&outcome, &generated_at))?;
        if !args.json {
            println!("report written to {}", report_path.display());
        }
    }

    if !outcome.is_clean() {
        anyhow::bail!(
            "type audit failed: {} discrepancies",
            outcome.discrepancies.len()
        );
    }
    Ok(())
}

pub(crate) fn print_warnings(warnings: &[SourceWarning]) {
    for w in warnings {
        eprintln!("{} {}", "[WARN]".yellow(), w.message);
    }
}
