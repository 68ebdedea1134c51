//! String-literal union aliases checked against database enums.

use crate::source::SourceFile;
use crate::sql_schema::DbSchema;
use crate::ts_schema::{TsSchema, find_field_usages, find_inline_literal_fields};
use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralFindingKind {
    /// A property uses a literal alias that has no enum in the database.
    MissingEnum,
    /// Alias and enum exist but list different values.
    ValuesDiffer,
    /// A watched field is declared with an inline literal union.
    InlineLiteral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiteralFinding {
    pub kind: LiteralFindingKind,
    pub file: PathBuf,
    pub line: usize,
    pub field: Option<String>,
    pub type_name: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct LiteralAuditOptions {
    /// Alias name -> enum name. An empty value marks an alias known to have
    /// no enum. Aliases not listed map to their snake_case name.
    pub enum_names: BTreeMap<String, String>,
    /// Fields that must not be declared with an inline literal union.
    pub inline_fields: Vec<String>,
}

impl LiteralAuditOptions {
    /// Expected enum name for `alias`, `None` when it is declared enum-less.
    pub fn enum_name_for(&self, alias: &str) -> Option<String> {
        match self.enum_names.get(alias) {
            Some(name) if name.trim().is_empty() => None,
            Some(name) => Some(name.clone()),
            None => Some(alias.to_snake_case()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LiteralAuditOutcome {
    /// Aliases with no matching enum, in extraction order.
    pub aliases_without_enum: Vec<String>,
    pub findings: Vec<LiteralFinding>,
}

impl LiteralAuditOutcome {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

pub fn audit_literal_types(
    db: &DbSchema,
    ts: &TsSchema,
    files: &[SourceFile],
    opts: &LiteralAuditOptions,
) -> LiteralAuditOutcome {
    let mut out = LiteralAuditOutcome::default();

    for alias in ts.literal_aliases.values() {
        let enum_def = opts
            .enum_name_for(&alias.name)
            .and_then(|name| db.find_enum(&name));

        let Some(enum_def) = enum_def else {
            out.aliases_without_enum.push(alias.name.clone());
            continue;
        };

        let declared: BTreeSet<&str> = alias.values.iter().map(String::as_str).collect();
        let labels: BTreeSet<&str> = enum_def.labels.iter().map(String::as_str).collect();
        if declared != labels {
            let missing: Vec<_> = labels.difference(&declared).copied().collect();
            let extra: Vec<_> = declared.difference(&labels).copied().collect();
            out.findings.push(LiteralFinding {
                kind: LiteralFindingKind::ValuesDiffer,
                file: alias.file.clone(),
                line: alias.line,
                field: None,
                type_name: alias.name.clone(),
                message: format!(
                    "values differ from enum {} (missing: [{}], extra: [{}])",
                    enum_def.name,
                    missing.join(", "),
                    extra.join(", ")
                ),
            });
        }
    }

    for f in files {
        for type_name in &out.aliases_without_enum {
            for usage in find_field_usages(&f.path, &f.content, type_name) {
                out.findings.push(LiteralFinding {
                    kind: LiteralFindingKind::MissingEnum,
                    message: format!(
                        "{} uses literal type {type_name}, which has no database enum",
                        usage.field
                    ),
                    file: usage.file,
                    line: usage.line,
                    field: Some(usage.field),
                    type_name: usage.type_name,
                });
            }
        }

        for field in &opts.inline_fields {
            for usage in find_inline_literal_fields(&f.path, &f.content, field) {
                out.findings.push(LiteralFinding {
                    kind: LiteralFindingKind::InlineLiteral,
                    message: format!(
                        "{} is declared with a restricted literal type; use `string` unless a database enum exists",
                        usage.field
                    ),
                    file: usage.file,
                    line: usage.line,
                    field: Some(usage.field),
                    type_name: usage.type_name,
                });
            }
        }
    }

    out
}
