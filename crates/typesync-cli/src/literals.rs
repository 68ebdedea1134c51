use crate::audit::print_warnings;
use crate::cli::LiteralsArgs;
use crate::config::ProjectConfig;
use crate::report;
use typesync_check::{DbSchema, TsSchema, audit_literal_types};

pub fn run(args: LiteralsArgs) -> anyhow::Result<()> {
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
    let outcome = audit_literal_types(&db, &types, &ts.files, &project.literal_options());

    tracing::info!(
        enums = db.enums.len(),
        aliases = types.literal_aliases.len(),
        findings = outcome.findings.len(),
        "literal audit finished"
    );

    print!("{}", report::render_literals(&outcome));

    if !outcome.is_clean() {
        anyhow::bail!(
            "literal type audit failed: {} findings",
            outcome.findings.len()
        );
    }
    Ok(())
}
