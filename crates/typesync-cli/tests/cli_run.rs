use pretty_assertions::assert_eq;
use std::path::Path;

fn run(args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["typesync".to_string()];
    argv.extend(args.iter().map(|s| s.to_string()));
    typesync_cli::run(argv)
}

fn s(p: &Path) -> &str {
    p.to_str().unwrap()
}

fn corpus(root: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let migrations = root.join("migrations");
    let types = root.join("types");
    std::fs::create_dir_all(&migrations).unwrap();
    std::fs::create_dir_all(&types).unwrap();
    (migrations, types)
}

#[test]
fn empty_directories_pass_and_write_report() {
    let dir = tempfile::tempdir().unwrap();
    let (migrations, types) = corpus(dir.path());
    let report = dir.path().join("out/report.md");

    run(&[
        "audit",
        "--migrations",
        s(&migrations),
        "--types",
        s(&types),
        "--report",
        s(&report),
    ])
    .unwrap();

    let md = std::fs::read_to_string(&report).unwrap();
    assert!(md.contains("- Tables analyzed: 0"));
    assert!(md.contains("- **Discrepancies found: 0**"));
}

#[test]
fn discrepancies_fail_the_run_but_still_write_the_report() {
    let dir = tempfile::tempdir().unwrap();
    let (migrations, types) = corpus(dir.path());
    std::fs::write(
        migrations.join("001_init.sql"),
        "CREATE TABLE usuarios (\n  nome VARCHAR NOT NULL,\n  ativo BOOLEAN\n);\n",
    )
    .unwrap();
    std::fs::write(
        types.join("usuario.ts"),
        "export interface Usuario {\n  nome: string;\n  ativo: boolean;\n}\n",
    )
    .unwrap();
    let report = dir.path().join("report.md");

    let err = run(&[
        "audit",
        "--migrations",
        s(&migrations),
        "--types",
        s(&types),
        "--report",
        s(&report),
    ])
    .unwrap_err();

    assert_eq!(err.to_string(), "type audit failed: 1 discrepancies");
    let md = std::fs::read_to_string(&report).unwrap();
    assert!(md.contains("### NULLABLE_MISMATCH (1 occurrences)"));
    assert!(md.contains("- **usuarios.ativo**"));
}

#[test]
fn missing_directory_is_a_hard_error() {
    let dir = tempfile::tempdir().unwrap();
    let (_, types) = corpus(dir.path());

    let err = run(&[
        "audit",
        "--migrations",
        s(&dir.path().join("absent")),
        "--types",
        s(&types),
        "--no-report",
    ])
    .unwrap_err();

    assert!(err.to_string().starts_with("directory not found"));
}

#[test]
fn config_file_paths_resolve_against_its_directory() {
    let dir = tempfile::tempdir().unwrap();
    let (migrations, types) = corpus(dir.path());
    std::fs::write(
        migrations.join("001_init.sql"),
        "CREATE TABLE contas (\n  saldo MONEY NOT NULL\n);\n",
    )
    .unwrap();
    std::fs::write(
        types.join("conta.ts"),
        "export interface Conta {\n  saldo: number;\n}\n",
    )
    .unwrap();
    let config = dir.path().join("typesync.toml");
    std::fs::write(
        &config,
        r#"version = "1"

[paths]
migrations = "migrations"
types = "types"
report = "reports/audit.md"

[compare.type_map]
MONEY = "number"
"#,
    )
    .unwrap();

    run(&["audit", "--config", s(&config)]).unwrap();
    assert!(dir.path().join("reports/audit.md").is_file());
}

#[test]
fn literals_flags_aliases_without_enum() {
    let dir = tempfile::tempdir().unwrap();
    let (migrations, types) = corpus(dir.path());
    std::fs::write(
        migrations.join("001_enums.sql"),
        "CREATE TYPE user_role AS ENUM ('admin', 'morador');\n",
    )
    .unwrap();
    std::fs::write(
        types.join("core.ts"),
        "export type UserRole = 'admin' | 'morador';\nexport type Prioridade = 'alta' | 'baixa';\n\nexport interface Chamado {\n  prioridade: Prioridade;\n}\n",
    )
    .unwrap();

    let err = run(&[
        "literals",
        "--migrations",
        s(&migrations),
        "--types",
        s(&types),
    ])
    .unwrap_err();
    assert_eq!(err.to_string(), "literal type audit failed: 1 findings");

    std::fs::write(
        migrations.join("002_prioridade.sql"),
        "CREATE TYPE prioridade AS ENUM ('alta', 'baixa');\n",
    )
    .unwrap();
    run(&[
        "literals",
        "--migrations",
        s(&migrations),
        "--types",
        s(&types),
    ])
    .unwrap();
}

#[test]
fn sync_requires_the_database_types_file() {
    let dir = tempfile::tempdir().unwrap();
    let (_, types) = corpus(dir.path());
    let db_types = dir.path().join("database.types.ts");

    let err = run(&[
        "sync",
        "--types",
        s(&types),
        "--database-types",
        s(&db_types),
    ])
    .unwrap_err();
    assert_eq!(err.to_string(), "type sync check failed: 1 errors");

    std::fs::write(&db_types, "export type Json = string;\n").unwrap();
    run(&[
        "sync",
        "--types",
        s(&types),
        "--database-types",
        s(&db_types),
    ])
    .unwrap();
}

#[test]
fn help_and_bad_arguments() {
    run(&[]).unwrap();
    run(&["audit", "--help"]).unwrap();
    assert!(run(&["audit", "--bogus"]).is_err());
}
