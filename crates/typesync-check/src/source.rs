//! Corpus discovery: every file with a given suffix in one directory.

use crate::error::{CheckError, CheckResult};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A directory of input files selected by filename suffix.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub dir: PathBuf,
    /// Suffix without the leading dot, e.g. `sql` or `ts`.
    pub suffix: String,
    /// Exact file names to leave out (barrel files such as `index.ts`).
    pub exclude: Vec<String>,
    /// File name prefixes to leave out (e.g. `_` for private modules).
    pub exclude_prefixes: Vec<String>,
}

/// One successfully read input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

/// A file that was listed but could not be read. The run continues without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceWarning {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoadedSources {
    /// Files in ascending lexicographic path order.
    pub files: Vec<SourceFile>,
    pub warnings: Vec<SourceWarning>,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            suffix: suffix.into(),
            exclude: Vec::new(),
            exclude_prefixes: Vec::new(),
        }
    }

    pub fn excluding(mut self, file_name: impl Into<String>) -> Self {
        self.exclude.push(file_name.into());
        self
    }

    pub fn excluding_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.exclude_prefixes.push(prefix.into());
        self
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return true;
        };
        self.exclude.iter().any(|e| e == name)
            || self.exclude_prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }

    /// Lists matching files in sorted order.
    ///
    /// Entries the directory walk cannot stat are returned as warnings.
    pub fn list(&self) -> CheckResult<(Vec<PathBuf>, Vec<SourceWarning>)> {
        if !self.dir.is_dir() {
            return Err(CheckError::MissingDirectory(self.dir.clone()));
        }

        let suffix = self.suffix.trim_start_matches('.');
        if suffix.is_empty() {
            return Err(CheckError::Config(format!(
                "empty file suffix for {}",
                self.dir.display()
            )));
        }

        let dir = self.dir.to_str().ok_or_else(|| CheckError::Glob {
            pattern: self.dir.display().to_string(),
            message: "directory path is not valid UTF-8".to_string(),
        })?;
        let pattern = format!("{}/*.{suffix}", glob::Pattern::escape(dir));

        let entries = glob::glob(&pattern).map_err(|e| CheckError::Glob {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        let mut files: BTreeSet<PathBuf> = BTreeSet::new();
        let mut warnings = Vec::new();

        for entry in entries {
            match entry {
                Ok(path) => {
                    if path.is_file() && !self.is_excluded(&path) {
                        files.insert(path);
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %e.path().display(), error = %e.error(), "skipping unreadable entry");
                    warnings.push(SourceWarning {
                        path: e.path().to_path_buf(),
                        message: e.error().to_string(),
                    });
                }
            }
        }

        Ok((files.into_iter().collect(), warnings))
    }

    /// Reads every matching file. A failed read skips that file only.
    pub fn load(&self) -> CheckResult<LoadedSources> {
        let (paths, mut warnings) = self.list()?;
        let mut files = Vec::with_capacity(paths.len());

        for path in paths {
            match std::fs::read_to_string(&path) {
                Ok(content) => files.push(SourceFile { path, content }),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to read source file");
                    warnings.push(SourceWarning {
                        message: CheckError::io(&path, e).to_string(),
                        path,
                    });
                }
            }
        }

        tracing::debug!(
            dir = %self.dir.display(),
            suffix = %self.suffix,
            files = files.len(),
            "loaded sources"
        );

        Ok(LoadedSources { files, warnings })
    }
}
