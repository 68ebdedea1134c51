use crate::reconcile::{Pairing, pair_tables};
use crate::sql_schema::{DbSchema, TableSchema};
use crate::ts_schema::{InterfaceSchema, TsSchema};
use crate::type_mapper::{ANY_CATEGORY, TypeMapper, has_null_union, normalize_ts_type};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Property names that are derived in application code and never stored.
pub const DEFAULT_COMPUTED_FIELDS: &[&str] = &["children", "total_orcado", "total_realizado"];

/// Variants are declared in code order, which is the report group order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    /// Property exists in the interface but not in the table.
    MissingInDatabase,
    /// Column exists in the database but not in the interface.
    MissingInTypeDefinition,
    NullabilityMismatch,
    TypeMismatch,
}

impl DiscrepancyKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::MissingInTypeDefinition => "MISSING_IN_TS",
            Self::MissingInDatabase => "MISSING_IN_DB",
            Self::TypeMismatch => "TYPE_MISMATCH",
            Self::NullabilityMismatch => "NULLABLE_MISMATCH",
        }
    }
}

impl std::fmt::Display for DiscrepancyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub kind: DiscrepancyKind,
    /// `table.column` or `Interface.property`.
    pub location: String,
    pub description: String,
}

/// Policies the comparator applies. Both are plain data so a project can
/// swap them without touching the algorithm.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    pub type_mapper: TypeMapper,
    pub computed_fields: BTreeSet<String>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            type_mapper: TypeMapper::default(),
            computed_fields: DEFAULT_COMPUTED_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Everything one comparison run produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditOutcome {
    pub table_count: usize,
    pub interface_count: usize,
    pub pairings: Vec<Pairing>,
    pub discrepancies: Vec<Discrepancy>,
}

impl AuditOutcome {
    pub fn is_clean(&self) -> bool {
        self.discrepancies.is_empty()
    }

    pub fn by_kind(&self) -> BTreeMap<DiscrepancyKind, Vec<&Discrepancy>> {
        group_by_kind(&self.discrepancies)
    }
}

/// Pairs tables with interfaces and compares every pair.
pub fn audit_schemas(db: &DbSchema, ts: &TsSchema, opts: &CompareOptions) -> AuditOutcome {
    let pairings = pair_tables(db, ts);
    let mut discrepancies = Vec::new();

    for p in &pairings {
        let (Some(table), Some(iface)) = (db.find_table(&p.table), ts.find_interface(&p.interface))
        else {
            continue;
        };
        discrepancies.extend(compare_pair(table, iface, opts));
    }

    AuditOutcome {
        table_count: db.tables.len(),
        interface_count: ts.interfaces.len(),
        pairings,
        discrepancies,
    }
}

/// Compares one table with the interface it was paired with.
///
/// Order: missing properties (column order), missing columns (property
/// order), then type and nullability checks per shared name in column order.
pub fn compare_pair(
    table: &TableSchema,
    iface: &InterfaceSchema,
    opts: &CompareOptions,
) -> Vec<Discrepancy> {
    let mut out = Vec::new();

    for col in table.columns.keys() {
        if !iface.has_property(col) {
            out.push(Discrepancy {
                kind: DiscrepancyKind::MissingInTypeDefinition,
                location: format!("{}.{col}", table.name),
                description: format!(
                    "column exists in the database but not in {}",
                    iface.name
                ),
            });
        }
    }

    for prop in iface.properties.keys() {
        if table.has_column(prop) || opts.computed_fields.contains(prop) {
            continue;
        }
        out.push(Discrepancy {
            kind: DiscrepancyKind::MissingInDatabase,
            location: format!("{}.{prop}", iface.name),
            description: format!(
                "property exists in the type definition but not in table {}",
                table.name
            ),
        });
    }

    for (name, col) in &table.columns {
        let Some(prop) = iface.property(name) else {
            continue;
        };

        let expected = opts.type_mapper.map(&col.declared_type);
        let actual = normalize_ts_type(&prop.declared_type);

        if !actual.contains(expected) && !actual.contains(ANY_CATEGORY) {
            out.push(Discrepancy {
                kind: DiscrepancyKind::TypeMismatch,
                location: format!("{}.{name}", table.name),
                description: format!(
                    "database type: {} -> expected: {expected}, actual: {actual}",
                    col.declared_type
                ),
            });
        }

        if col.nullable && !has_null_union(&prop.declared_type) && !prop.optional {
            out.push(Discrepancy {
                kind: DiscrepancyKind::NullabilityMismatch,
                location: format!("{}.{name}", table.name),
                description: format!(
                    "column is nullable in the database but {}.{name} is neither optional nor `| null`",
                    iface.name
                ),
            });
        }
    }

    out
}

/// Groups discrepancies by kind, keeping their relative order.
pub fn group_by_kind(items: &[Discrepancy]) -> BTreeMap<DiscrepancyKind, Vec<&Discrepancy>> {
    let mut groups: BTreeMap<DiscrepancyKind, Vec<&Discrepancy>> = BTreeMap::new();
    for d in items {
        groups.entry(d.kind).or_default().push(d);
    }
    groups
}
