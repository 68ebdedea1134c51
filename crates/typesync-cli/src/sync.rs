use crate::cli::SyncArgs;
use crate::config::ProjectConfig;
use crate::report;
use typesync_check::validate_type_sync;

pub fn run(args: SyncArgs) -> anyhow::Result<()> {
    let project = ProjectConfig::discover(args.config.clone())?;
    let paths = &project.file.paths;

    let types_dir = project.pick_path(args.types.as_ref(), &paths.types);
    let database_types = project.pick_path(args.database_types.as_ref(), &paths.database_types);

    let result = validate_type_sync(&project.sync_options(types_dir, database_types));

    tracing::info!(
        files = result.files.len(),
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "type sync validation finished"
    );

    print!("{}", report::render_sync(&result));

    if !result.passed() {
        anyhow::bail!("type sync check failed: {} errors", result.errors.len());
    }
    Ok(())
}
