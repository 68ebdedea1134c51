//! typesync-check
//!
//! Static checks of TypeScript type definitions against the schema declared in
//! SQL migration files. Nothing here talks to a database: both sides are read
//! from text with line/regex heuristics.
//!
//! # Features
//!
//! - **Schema extraction**: `CREATE TABLE` columns and `CREATE TYPE ... AS ENUM` labels
//! - **Type extraction**: exported interfaces, object type aliases and literal unions
//! - **Reconciliation**: pair tables with interfaces by name
//! - **Comparison**: missing fields, type and nullability mismatches
//! - **Literal audit**: literal unions without a database enum
//! - **Type sync**: generated database types file and import hygiene
//!
//! # Example
//!
//! ```
//! use typesync_check::{CompareOptions, DbSchema, DiscrepancyKind, TsSchema, audit_schemas};
//!
//! let mut db = DbSchema::new();
//! db.extend_from_sql("CREATE TABLE usuarios (\n  ativo BOOLEAN\n);");
//!
//! let mut ts = TsSchema::new();
//! for iface in typesync_check::extract_interfaces("export interface Usuario {\n  ativo: boolean;\n}") {
//!     ts.interfaces.insert(iface.name.clone(), iface);
//! }
//!
//! let outcome = audit_schemas(&db, &ts, &CompareOptions::default());
//! assert_eq!(outcome.discrepancies[0].kind, DiscrepancyKind::NullabilityMismatch);
//! ```

pub mod compare;
pub mod error;
pub mod literal_audit;
pub mod reconcile;
pub mod source;
pub mod sql_schema;
pub mod ts_schema;
pub mod type_mapper;
pub mod type_sync;

pub use compare::{
    AuditOutcome, CompareOptions, DEFAULT_COMPUTED_FIELDS, Discrepancy, DiscrepancyKind,
    audit_schemas, compare_pair, group_by_kind,
};
pub use error::{CheckError, CheckResult};
pub use literal_audit::{
    LiteralAuditOptions, LiteralAuditOutcome, LiteralFinding, LiteralFindingKind,
    audit_literal_types,
};
pub use reconcile::{Pairing, candidate_names, find_interface, pair_tables};
pub use source::{FileSource, LoadedSources, SourceFile, SourceWarning};
pub use sql_schema::{
    ColumnDefinition, DbSchema, EnumDefinition, TableSchema, extract_enums, extract_tables,
};
pub use ts_schema::{
    FieldUsage, InterfaceSchema, LiteralAlias, PropertyDefinition, TsSchema, extract_interfaces,
    extract_literal_aliases,
};
pub use type_mapper::{TypeMapper, normalize_sql_type, normalize_ts_type};
pub use type_sync::{FileSyncSummary, TypeSyncOptions, TypeSyncReport, validate_type_sync};
