use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use typesync_check::{
    CompareOptions, DEFAULT_COMPUTED_FIELDS, FileSource, LiteralAuditOptions, TypeMapper,
    TypeSyncOptions,
};

pub const DEFAULT_CONFIG_FILE: &str = "typesync.toml";

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub config_path: Option<PathBuf>,
    pub config_dir: PathBuf,
    pub file: ConfigFile,
}

impl ProjectConfig {
    /// An explicit path must exist. Without one, `typesync.toml` in the
    /// working directory is used when present, built-in defaults otherwise.
    pub fn discover(explicit: Option<PathBuf>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::load(path)
                } else {
                    tracing::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                    Ok(Self {
                        config_path: None,
                        config_dir: PathBuf::from("."),
                        file: ConfigFile::default(),
                    })
                }
            }
        }
    }

    pub fn load(config_path: PathBuf) -> anyhow::Result<Self> {
        let config_dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let raw = std::fs::read_to_string(&config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = ConfigFile::parse(&raw).map_err(|e| {
            anyhow::anyhow!(
                "invalid config file {}: {e:#}",
                config_path.display()
            )
        })?;

        tracing::debug!(path = %config_path.display(), "loaded config");

        Ok(Self {
            config_path: Some(config_path),
            config_dir,
            file,
        })
    }

    pub fn resolve_path(&self, p: impl AsRef<Path>) -> PathBuf {
        let p = p.as_ref();
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.config_dir.join(p)
        }
    }

    /// A command-line path wins over the configured one. Command-line paths
    /// are taken as given; configured ones resolve against the config file.
    pub fn pick_path(&self, flag: Option<&PathBuf>, configured: &str) -> PathBuf {
        match flag {
            Some(p) => p.clone(),
            None => self.resolve_path(configured),
        }
    }

    pub fn sql_source(&self, dir: PathBuf) -> FileSource {
        FileSource::new(dir, self.file.sources.sql_suffix.clone())
    }

    pub fn ts_source(&self, dir: PathBuf) -> FileSource {
        self.file
            .sources
            .exclude
            .iter()
            .fold(
                FileSource::new(dir, self.file.sources.ts_suffix.clone()),
                |src, name| src.excluding(name.clone()),
            )
    }

    pub fn compare_options(&self) -> CompareOptions {
        let compare = &self.file.compare;
        CompareOptions {
            type_mapper: TypeMapper::new(compare.type_map.clone()),
            computed_fields: compare.computed_fields.iter().cloned().collect(),
        }
    }

    pub fn literal_options(&self) -> LiteralAuditOptions {
        LiteralAuditOptions {
            enum_names: self.file.literals.enums.clone(),
            inline_fields: self.file.literals.inline_fields.clone(),
        }
    }

    pub fn sync_options(&self, types_dir: PathBuf, database_types: PathBuf) -> TypeSyncOptions {
        let sync = &self.file.sync;
        let mut opts = TypeSyncOptions::new(types_dir, database_types);
        opts.suffix = self.file.sources.ts_suffix.clone();
        if let Some(min_size) = sync.min_size {
            opts.min_size = min_size;
        }
        if !sync.import_markers.is_empty() {
            opts.import_markers = sync.import_markers.clone();
        }
        if !sync.keywords.is_empty() {
            opts.row_keywords = sync.keywords.clone();
        }
        opts
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub compare: CompareConfig,

    #[serde(default)]
    pub literals: LiteralsConfig,

    #[serde(default)]
    pub sync: SyncConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            paths: PathsConfig::default(),
            sources: SourcesConfig::default(),
            compare: CompareConfig::default(),
            literals: LiteralsConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub migrations: String,
    pub types: String,
    pub report: String,
    pub database_types: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            migrations: "supabase/migrations".to_string(),
            types: "packages/shared/src/types".to_string(),
            report: "type-audit-report.md".to_string(),
            database_types: "packages/shared/database.types.ts".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub sql_suffix: String,
    pub ts_suffix: String,
    /// Type-definition file names skipped by the audit (barrel files).
    pub exclude: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            sql_suffix: "sql".to_string(),
            ts_suffix: "ts".to_string(),
            exclude: vec!["index.ts".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    pub computed_fields: Vec<String>,
    /// SQL base type -> TypeScript category, merged over the built-in table.
    pub type_map: BTreeMap<String, String>,
    /// Items shown per group on the console.
    pub report_limit: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            computed_fields: DEFAULT_COMPUTED_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            type_map: BTreeMap::new(),
            report_limit: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LiteralsConfig {
    pub enums: BTreeMap<String, String>,
    pub inline_fields: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub min_size: Option<u64>,
    pub import_markers: Vec<String>,
    pub keywords: Vec<String>,
}

impl ConfigFile {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let mut file: ConfigFile = toml::from_str(raw)?;
        file.expand_env()?;
        file.validate()?;
        Ok(file)
    }

    fn expand_env(&mut self) -> anyhow::Result<()> {
        let paths = &mut self.paths;
        for p in [
            &mut paths.migrations,
            &mut paths.types,
            &mut paths.report,
            &mut paths.database_types,
        ] {
            *p = expand_env_vars(p)?;
        }

        for name in &mut self.sources.exclude {
            *name = expand_env_vars(name)?;
        }
        for marker in &mut self.sync.import_markers {
            *marker = expand_env_vars(marker)?;
        }

        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.version.trim() != "1" {
            anyhow::bail!("unsupported config version: {}", self.version);
        }

        let paths = &self.paths;
        for (key, value) in [
            ("paths.migrations", &paths.migrations),
            ("paths.types", &paths.types),
            ("paths.report", &paths.report),
            ("paths.database_types", &paths.database_types),
            ("sources.sql_suffix", &self.sources.sql_suffix),
            ("sources.ts_suffix", &self.sources.ts_suffix),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("{key} must not be empty");
            }
        }

        if self.compare.report_limit == 0 {
            anyhow::bail!("compare.report_limit must be at least 1");
        }

        for (sql, ts) in &self.compare.type_map {
            if sql.trim().is_empty() || ts.trim().is_empty() {
                anyhow::bail!("compare.type_map entries must not be empty ({sql:?} = {ts:?})");
            }
        }

        Ok(())
    }
}

fn expand_env_vars(input: &str) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                anyhow::bail!("unterminated env var reference: ${{{key}");
            }
            if key.is_empty() {
                anyhow::bail!("invalid env var reference: ${{}}");
            }

            let v = std::env::var(&key)
                .map_err(|_| anyhow::anyhow!("missing env var for config expansion: {key}"))?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}
