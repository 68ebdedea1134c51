//! Table and enum extraction from SQL migration text.
//!
//! This is a line-oriented heuristic scanner, not a SQL parser: blocks that do
//! not match the expected shape are skipped, never reported.

use crate::source::SourceFile;
use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Table-level constraint clauses that can appear where a column would.
const TABLE_CONSTRAINT_KEYWORDS: &[&str] = &["PRIMARY", "FOREIGN", "UNIQUE", "CHECK", "EXCLUDE"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDefinition {
    pub name: String,
    /// Base type token, e.g. `UUID`, `VARCHAR(255)`, `TIMESTAMPTZ`.
    pub declared_type: String,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: IndexMap<String, ColumnDefinition>,
}

impl TableSchema {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDefinition {
    pub name: String,
    pub labels: Vec<String>,
}

/// Everything extracted from a migration corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DbSchema {
    pub tables: IndexMap<String, TableSchema>,
    /// Keyed by lowercase enum name.
    pub enums: IndexMap<String, EnumDefinition>,
}

impl DbSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the schema from files already sorted by name.
    pub fn from_sources(files: &[SourceFile]) -> Self {
        let mut schema = Self::new();
        for f in files {
            let before = schema.tables.len();
            schema.extend_from_sql(&f.content);
            tracing::debug!(
                file = %f.path.display(),
                new_tables = schema.tables.len() - before,
                "scanned migration"
            );
        }
        schema
    }

    /// Merges one migration's definitions. A table or enum that already exists
    /// is replaced but keeps its original position.
    pub fn extend_from_sql(&mut self, sql: &str) {
        for table in extract_tables(sql) {
            self.tables.insert(table.name.clone(), table);
        }

        for def in extract_enums(sql) {
            self.enums.insert(def.name.clone(), def);
        }

        for (name, label) in extract_enum_additions(sql) {
            match self.enums.get_mut(&name) {
                Some(def) if !def.labels.contains(&label) => def.labels.push(label),
                Some(_) => {}
                None => tracing::trace!(%name, %label, "ALTER TYPE for unknown enum"),
            }
        }
    }

    pub fn find_table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    pub fn find_enum(&self, name: &str) -> Option<&EnumDefinition> {
        self.enums.get(&name.to_lowercase())
    }

    pub fn has_enum(&self, name: &str) -> bool {
        self.find_enum(name).is_some()
    }
}

fn create_table_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?is)CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:public\.)?(\w+)\s*\((.*?)\);",
        )
        .expect("invalid built-in CREATE TABLE regex")
    })
}

fn column_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(\w+)\s+([A-Z][A-Z0-9_().,\[\]]+)")
            .expect("invalid built-in column regex")
    })
}

fn create_enum_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)CREATE\s+TYPE\s+(?:public\.)?(\w+)\s+AS\s+ENUM\s*\((.*?)\)\s*;")
            .expect("invalid built-in CREATE TYPE regex")
    })
}

fn alter_enum_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?is)ALTER\s+TYPE\s+(?:public\.)?(\w+)\s+ADD\s+VALUE\s+(?:IF\s+NOT\s+EXISTS\s+)?'((?:[^']|'')*)'",
        )
        .expect("invalid built-in ALTER TYPE regex")
    })
}

fn quoted_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"'((?:[^']|'')*)'").expect("invalid built-in label regex"))
}

/// Extracts every `CREATE TABLE` block in `sql`, in text order.
///
/// Blocks without a single recognisable column are dropped.
pub fn extract_tables(sql: &str) -> Vec<TableSchema> {
    let mut out = Vec::new();

    for caps in create_table_re().captures_iter(sql) {
        let name = caps[1].to_string();
        let columns = extract_columns(&caps[2]);

        if columns.is_empty() {
            tracing::trace!(table = %name, "no columns recognised; skipping table");
            continue;
        }
        out.push(TableSchema { name, columns });
    }

    out
}

/// Parses the body of a `CREATE TABLE (...)` block.
pub fn extract_columns(body: &str) -> IndexMap<String, ColumnDefinition> {
    let mut columns = IndexMap::new();

    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("--") || line.to_uppercase().contains("CONSTRAINT") {
            continue;
        }

        for segment in split_top_level(line) {
            if let Some(col) = parse_column(segment) {
                columns.insert(col.name.clone(), col);
            }
        }
    }

    columns
}

/// Parses one column definition such as `email VARCHAR(255) NOT NULL`.
pub fn parse_column(segment: &str) -> Option<ColumnDefinition> {
    let segment = segment.trim();
    let caps = column_re().captures(segment)?;

    let name = caps[1].to_string();
    if TABLE_CONSTRAINT_KEYWORDS
        .iter()
        .any(|k| name.eq_ignore_ascii_case(k))
    {
        return None;
    }

    let raw_type = caps[2].trim().trim_end_matches(',');
    let declared_type = raw_type.split_whitespace().next()?.to_string();
    let nullable = !segment.to_uppercase().contains("NOT NULL");

    Some(ColumnDefinition {
        name,
        declared_type,
        nullable,
    })
}

/// Splits a line at commas outside parentheses and quotes, dropping any
/// trailing `--` comment.
fn split_top_level(line: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut start = 0usize;
    let bytes = line.as_bytes();
    let mut end = bytes.len();

    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' => in_quote = !in_quote,
            b'-' if !in_quote && bytes.get(i + 1) == Some(&b'-') => {
                end = i;
                break;
            }
            b'(' if !in_quote => depth += 1,
            b')' if !in_quote => depth = depth.saturating_sub(1),
            b',' if !in_quote && depth == 0 => {
                out.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    out.push(&line[start..end]);
    out.retain(|s| !s.trim().is_empty());
    out
}

/// Extracts `CREATE TYPE <name> AS ENUM (...)` definitions.
pub fn extract_enums(sql: &str) -> Vec<EnumDefinition> {
    create_enum_re()
        .captures_iter(sql)
        .map(|caps| EnumDefinition {
            // Unquoted identifiers fold to lowercase in Postgres.
            name: caps[1].to_lowercase(),
            labels: quoted_label_re()
                .captures_iter(&caps[2])
                .map(|l| l[1].replace("''", "'"))
                .collect(),
        })
        .collect()
}

fn extract_enum_additions(sql: &str) -> Vec<(String, String)> {
    alter_enum_re()
        .captures_iter(sql)
        .map(|caps| (caps[1].to_lowercase(), caps[2].replace("''", "'")))
        .collect()
}
