use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Audit,
    Literals,
    Sync,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Audit(AuditArgs),
    Literals(LiteralsArgs),
    Sync(SyncArgs),
}

#[derive(Debug, Clone)]
pub struct AuditArgs {
    pub config: Option<PathBuf>,
    pub migrations: Option<PathBuf>,
    pub types: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub no_report: bool,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct LiteralsArgs {
    pub config: Option<PathBuf>,
    pub migrations: Option<PathBuf>,
    pub types: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct SyncArgs {
    pub config: Option<PathBuf>,
    pub types: Option<PathBuf>,
    pub database_types: Option<PathBuf>,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "audit" => parse_audit(it.map(|s| s.as_str())),
        "literals" => parse_literals(it.map(|s| s.as_str())),
        "sync" => parse_sync(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

/// Reads the value of `--flag <v>` or `--flag=<v>`. Returns `None` when
/// `token` is not `flag`.
fn flag_value<'a>(
    token: &'a str,
    flag: &str,
    it: &mut impl Iterator<Item = &'a str>,
) -> anyhow::Result<Option<&'a str>> {
    if token == flag {
        let Some(v) = it.next() else {
            anyhow::bail!("{flag} requires a value");
        };
        return Ok(Some(v));
    }
    match token.strip_prefix(flag).and_then(|rest| rest.strip_prefix('=')) {
        Some(v) if v.is_empty() => anyhow::bail!("{flag} requires a value"),
        Some(v) => Ok(Some(v)),
        None => Ok(None),
    }
}

fn parse_audit<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config: Option<PathBuf> = None;
    let mut migrations: Option<PathBuf> = None;
    let mut types: Option<PathBuf> = None;
    let mut report: Option<PathBuf> = None;
    let mut no_report = false;
    let mut json = false;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Audit)),
            "--no-report" => no_report = true,
            "--json" => json = true,
            _ => {
                if let Some(v) = flag_value(token, "--config", &mut it)? {
                    config = Some(PathBuf::from(v));
                } else if let Some(v) = flag_value(token, "--migrations", &mut it)? {
                    migrations = Some(PathBuf::from(v));
                } else if let Some(v) = flag_value(token, "--types", &mut it)? {
                    types = Some(PathBuf::from(v));
                } else if let Some(v) = flag_value(token, "--report", &mut it)? {
                    report = Some(PathBuf::from(v));
                } else {
                    anyhow::bail!("unknown argument: {token}");
                }
            }
        }
    }

    if no_report && report.is_some() {
        anyhow::bail!("--report and --no-report are mutually exclusive");
    }

    Ok(Command::Audit(AuditArgs {
        config,
        migrations,
        types,
        report,
        no_report,
        json,
    }))
}

fn parse_literals<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config: Option<PathBuf> = None;
    let mut migrations: Option<PathBuf> = None;
    let mut types: Option<PathBuf> = None;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Literals)),
            _ => {
                if let Some(v) = flag_value(token, "--config", &mut it)? {
                    config = Some(PathBuf::from(v));
                } else if let Some(v) = flag_value(token, "--migrations", &mut it)? {
                    migrations = Some(PathBuf::from(v));
                } else if let Some(v) = flag_value(token, "--types", &mut it)? {
                    types = Some(PathBuf::from(v));
                } else {
                    anyhow::bail!("unknown argument: {token}");
                }
            }
        }
    }

    Ok(Command::Literals(LiteralsArgs {
        config,
        migrations,
        types,
    }))
}

fn parse_sync<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config: Option<PathBuf> = None;
    let mut types: Option<PathBuf> = None;
    let mut database_types: Option<PathBuf> = None;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Sync)),
            _ => {
                if let Some(v) = flag_value(token, "--config", &mut it)? {
                    config = Some(PathBuf::from(v));
                } else if let Some(v) = flag_value(token, "--types", &mut it)? {
                    types = Some(PathBuf::from(v));
                } else if let Some(v) = flag_value(token, "--database-types", &mut it)? {
                    database_types = Some(PathBuf::from(v));
                } else {
                    anyhow::bail!("unknown argument: {token}");
                }
            }
        }
    }

    Ok(Command::Sync(SyncArgs {
        config,
        types,
        database_types,
    }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
typesync - audit TypeScript types against SQL migrations

USAGE:
  typesync <COMMAND> [OPTIONS]

COMMANDS:
  audit         Compare tables with interfaces (missing fields, types, nullability)
  literals      Find literal union types without a database enum
  sync          Validate hand-written types against the generated database types

Exit status is 0 when nothing is found and 1 otherwise.
Set TYPESYNC_LOG (e.g. debug) for diagnostic logs on stderr.

Run `typesync <command> --help` for more."
            );
        }
        HelpTopic::Audit => {
            println!(
                "\
USAGE:
  typesync audit [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: typesync.toml)
  --migrations <DIR>    SQL migrations directory (overrides config)
  --types <DIR>         Type definitions directory (overrides config)
  --report <FILE>       Markdown report path (overrides config)
  --no-report           Do not write the markdown report
  --json                Print discrepancies as JSON instead of the summary
  -h, --help            Print help"
            );
        }
        HelpTopic::Literals => {
            println!(
                "\
USAGE:
  typesync literals [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: typesync.toml)
  --migrations <DIR>    SQL migrations directory (overrides config)
  --types <DIR>         Type definitions directory (overrides config)
  -h, --help            Print help"
            );
        }
        HelpTopic::Sync => {
            println!(
                "\
USAGE:
  typesync sync [OPTIONS]

OPTIONS:
  --config <FILE>           Config file path (default: typesync.toml)
  --types <DIR>             Type definitions directory (overrides config)
  --database-types <FILE>   Generated database types file (overrides config)
  -h, --help                Print help"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_args_prints_root_help() {
        let cmd = parse_args(&args(&["typesync"])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Root)));
    }

    #[test]
    fn parse_audit_with_overrides() {
        let cmd = parse_args(&args(&[
            "typesync",
            "audit",
            "--migrations",
            "db/migrations",
            "--types=src/types",
            "--json",
            "--no-report",
        ]))
        .unwrap();
        let Command::Audit(a) = cmd else {
            panic!("expected audit");
        };

        assert_eq!(a.config, None);
        assert_eq!(a.migrations, Some(PathBuf::from("db/migrations")));
        assert_eq!(a.types, Some(PathBuf::from("src/types")));
        assert!(a.json);
        assert!(a.no_report);
    }

    #[test]
    fn parse_audit_rejects_conflicting_report_flags() {
        let err = parse_args(&args(&["typesync", "audit", "--report", "r.md", "--no-report"]))
            .unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn missing_value_is_an_error() {
        let err = parse_args(&args(&["typesync", "sync", "--database-types"])).unwrap_err();
        assert!(err.to_string().contains("--database-types requires a value"));
    }

    #[test]
    fn parse_sync_and_help() {
        let cmd = parse_args(&args(&[
            "typesync",
            "sync",
            "--database-types",
            "shared/database.types.ts",
        ]))
        .unwrap();
        let Command::Sync(s) = cmd else {
            panic!("expected sync");
        };
        assert_eq!(
            s.database_types,
            Some(PathBuf::from("shared/database.types.ts"))
        );

        let cmd = parse_args(&args(&["typesync", "literals", "--help"])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Literals)));
    }

    #[test]
    fn unknown_command_and_argument() {
        assert!(parse_args(&args(&["typesync", "lint"])).is_err());
        let err = parse_args(&args(&["typesync", "literals", "--verbose"])).unwrap_err();
        assert!(err.to_string().contains("unknown argument: --verbose"));
    }
}
