use pretty_assertions::assert_eq;
use std::path::Path;
use typesync_check::{
    CompareOptions, DbSchema, DiscrepancyKind, FileSource, TsSchema, audit_schemas,
};

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn load(migrations: &Path, types: &Path) -> (DbSchema, TsSchema) {
    let sql = FileSource::new(migrations, "sql").load().unwrap();
    let ts = FileSource::new(types, "ts").excluding("index.ts").load().unwrap();
    (DbSchema::from_sources(&sql.files), TsSchema::from_sources(&ts.files))
}

#[test]
fn empty_corpora_produce_nothing() {
    let root = tempfile::tempdir().unwrap();
    let migrations = root.path().join("migrations");
    let types = root.path().join("types");
    std::fs::create_dir(&migrations).unwrap();
    std::fs::create_dir(&types).unwrap();

    let (db, ts) = load(&migrations, &types);
    let outcome = audit_schemas(&db, &ts, &CompareOptions::default());

    assert_eq!(outcome.table_count, 0);
    assert_eq!(outcome.interface_count, 0);
    assert!(outcome.is_clean());
}

#[test]
fn later_migration_wins_and_barrel_file_is_ignored() {
    let root = tempfile::tempdir().unwrap();
    let migrations = root.path().join("migrations");
    let types = root.path().join("types");
    std::fs::create_dir(&migrations).unwrap();
    std::fs::create_dir(&types).unwrap();

    write(
        &migrations,
        "20240101000001_core.sql",
        "CREATE TABLE public.usuarios (\n  id UUID PRIMARY KEY,\n  nome VARCHAR(120) NOT NULL,\n  legado TEXT\n);\n",
    );
    write(
        &migrations,
        "20240101000002_usuarios_v2.sql",
        "CREATE TABLE usuarios (\n  id UUID NOT NULL,\n  nome VARCHAR(120) NOT NULL,\n  ativo BOOLEAN,\n  email VARCHAR\n);\n",
    );
    write(
        &types,
        "core.ts",
        "export interface Usuario {\n  id: string;\n  nome: string;\n  ativo: boolean;\n  email: number | null;\n}\n",
    );
    write(
        &types,
        "index.ts",
        "export interface Usuario {\n  id: number;\n}\n",
    );

    let (db, ts) = load(&migrations, &types);
    assert!(!db.find_table("usuarios").unwrap().has_column("legado"));
    assert_eq!(ts.find_interface("Usuario").unwrap().properties.len(), 4);

    let outcome = audit_schemas(&db, &ts, &CompareOptions::default());
    let got: Vec<_> = outcome
        .discrepancies
        .iter()
        .map(|d| (d.kind, d.location.as_str()))
        .collect();

    assert_eq!(
        got,
        vec![
            (DiscrepancyKind::NullabilityMismatch, "usuarios.ativo"),
            (DiscrepancyKind::TypeMismatch, "usuarios.email"),
        ]
    );
}

#[test]
fn extraction_twice_gives_identical_models() {
    let root = tempfile::tempdir().unwrap();
    write(
        root.path(),
        "a.sql",
        "CREATE TABLE t (c1 TEXT NOT NULL, c2 INTEGER);",
    );
    write(
        root.path(),
        "a.ts",
        "export interface T { c1: string; c2?: number; }",
    );

    let first = load(root.path(), root.path());
    let second = load(root.path(), root.path());
    assert_eq!(first, second);
}

#[test]
fn unreadable_file_is_a_warning_and_others_still_load() {
    let root = tempfile::tempdir().unwrap();
    write(
        root.path(),
        "001_init.sql",
        "CREATE TABLE contas (\n  saldo NUMERIC NOT NULL\n);\n",
    );
    std::fs::write(root.path().join("002_binary.sql"), [0xff, 0xfe, b'x']).unwrap();

    let loaded = FileSource::new(root.path(), "sql").load().unwrap();
    assert_eq!(loaded.files.len(), 1);
    assert_eq!(loaded.warnings.len(), 1);
    assert!(loaded.warnings[0].path.ends_with("002_binary.sql"));
    assert!(loaded.warnings[0].message.contains("002_binary.sql"));

    let db = DbSchema::from_sources(&loaded.files);
    assert!(db.find_table("contas").unwrap().has_column("saldo"));
}
