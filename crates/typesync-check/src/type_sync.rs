//! Checks that hand-written type modules stay tied to the generated
//! database types file.

use crate::error::CheckError;
use crate::source::FileSource;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const DEFAULT_MIN_SIZE: u64 = 5000;

#[derive(Debug, Clone)]
pub struct TypeSyncOptions {
    pub types_dir: PathBuf,
    pub database_types_file: PathBuf,
    /// Extension of the hand-written type modules.
    pub suffix: String,
    /// Generated files smaller than this are suspected stale.
    pub min_size: u64,
    /// Substrings that count as importing the generated types.
    pub import_markers: Vec<String>,
    /// Interface name fragments suggesting a copy of a database row.
    pub row_keywords: Vec<String>,
}

impl TypeSyncOptions {
    pub fn new(types_dir: impl Into<PathBuf>, database_types_file: impl Into<PathBuf>) -> Self {
        Self {
            types_dir: types_dir.into(),
            database_types_file: database_types_file.into(),
            suffix: "ts".to_string(),
            min_size: DEFAULT_MIN_SIZE,
            import_markers: vec![
                "from '../database.types'".to_string(),
                "from \"../database.types\"".to_string(),
            ],
            row_keywords: ["Config", "Log", "Row", "Data", "Status"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub name: String,
    pub extends: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileSyncSummary {
    pub path: PathBuf,
    pub imports_database_types: bool,
    pub definitions: Vec<Definition>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TypeSyncReport {
    pub database_types_size: Option<u64>,
    pub files: Vec<FileSyncSummary>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl TypeSyncReport {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

fn definition_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"export (?:interface|type) (\w+)\s+(?:extends\s+(\w+)|=)")
            .expect("invalid built-in definition regex")
    })
}

fn bare_interface_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"export interface (\w+)\s*\{").expect("invalid built-in interface regex")
    })
}

pub fn extract_definitions(src: &str) -> Vec<Definition> {
    definition_re()
        .captures_iter(src)
        .map(|caps| Definition {
            name: caps[1].to_string(),
            extends: caps.get(2).map(|m| m.as_str().to_string()),
        })
        .collect()
}

/// Interfaces declared without `extends` whose name suggests they mirror a
/// database row.
pub fn unextended_row_interfaces(src: &str, keywords: &[String]) -> Vec<String> {
    bare_interface_re()
        .captures_iter(src)
        .map(|caps| caps[1].to_string())
        .filter(|name| keywords.iter().any(|k| name.contains(k.as_str())))
        .collect()
}

/// Never fails: problems become report errors or warnings.
pub fn validate_type_sync(opts: &TypeSyncOptions) -> TypeSyncReport {
    let mut report = TypeSyncReport::default();

    check_database_types_file(&opts.database_types_file, opts.min_size, &mut report);

    let source = FileSource::new(&opts.types_dir, opts.suffix.clone()).excluding_prefix("_");
    let loaded = match source.load() {
        Ok(loaded) => loaded,
        Err(CheckError::MissingDirectory(dir)) => {
            report
                .errors
                .push(format!("types directory not found: {}", dir.display()));
            return report;
        }
        Err(e) => {
            report.errors.push(e.to_string());
            return report;
        }
    };

    for w in loaded.warnings {
        report.warnings.push(w.message);
    }

    for f in loaded.files {
        let imports_database_types = opts
            .import_markers
            .iter()
            .any(|m| f.content.contains(m.as_str()));

        let warnings: Vec<String> = unextended_row_interfaces(&f.content, &opts.row_keywords)
            .into_iter()
            .map(|name| format!("{name}: interface may duplicate database fields"))
            .collect();
        report.warnings.extend(warnings.iter().cloned());

        report.files.push(FileSyncSummary {
            definitions: extract_definitions(&f.content),
            path: f.path,
            imports_database_types,
            warnings,
        });
    }

    report
}

fn check_database_types_file(path: &Path, min_size: u64, report: &mut TypeSyncReport) {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {
            let size = meta.len();
            report.database_types_size = Some(size);
            if size < min_size {
                report.warnings.push(format!(
                    "{} is very small ({size} bytes); check that it was regenerated",
                    path.display()
                ));
            }
        }
        Ok(_) | Err(_) => {
            report
                .errors
                .push(format!("database types file not found: {}", path.display()));
        }
    }
}
