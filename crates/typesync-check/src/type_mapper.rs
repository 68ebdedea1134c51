use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Category for SQL types missing from the table.
pub const UNKNOWN_CATEGORY: &str = "unknown";
/// Category that accepts any declared TypeScript type.
pub const ANY_CATEGORY: &str = "any";

/// Maps SQL base types to the TypeScript keyword a property should carry.
#[derive(Debug, Clone)]
pub struct TypeMapper {
    /// Normalized SQL type -> TypeScript category keyword.
    table: BTreeMap<String, String>,
}

impl Default for TypeMapper {
    fn default() -> Self {
        Self::new(BTreeMap::new())
    }
}

impl TypeMapper {
    /// Built-in table merged with `custom` (custom wins).
    pub fn new(custom: BTreeMap<String, String>) -> Self {
        let mut table = builtin_table();
        for (k, v) in custom {
            table.insert(normalize_sql_type(&k), v);
        }
        Self { table }
    }

    /// Only the given entries, no built-ins.
    pub fn from_table(entries: BTreeMap<String, String>) -> Self {
        let table = entries
            .into_iter()
            .map(|(k, v)| (normalize_sql_type(&k), v))
            .collect();
        Self { table }
    }

    pub fn map(&self, sql_type: &str) -> &str {
        self.table
            .get(&normalize_sql_type(sql_type))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CATEGORY)
    }
}

fn builtin_table() -> BTreeMap<String, String> {
    [
        ("UUID", "string"),
        ("VARCHAR", "string"),
        ("TEXT", "string"),
        ("BOOLEAN", "boolean"),
        ("INTEGER", "number"),
        ("BIGINT", "number"),
        ("DECIMAL", "number"),
        ("NUMERIC", "number"),
        ("TIMESTAMPTZ", "string"),
        ("TIMESTAMP", "string"),
        ("DATE", "string"),
        ("TIME", "string"),
        ("JSONB", ANY_CATEGORY),
        ("JSON", ANY_CATEGORY),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Uppercase and cut at the first `(`: `varchar(255)` -> `VARCHAR`,
/// `NUMERIC(10` -> `NUMERIC`.
pub fn normalize_sql_type(sql_type: &str) -> String {
    let upper = sql_type.trim().to_uppercase();
    match upper.split_once('(') {
        Some((base, _)) => base.trim().to_string(),
        None => upper,
    }
}

/// Strips `null` / `undefined` union members (leading or trailing) and
/// rewrites `Array<T>` as `T[]`.
pub fn normalize_ts_type(ts_type: &str) -> String {
    static NULLISH: OnceLock<Regex> = OnceLock::new();
    static ARRAY: OnceLock<Regex> = OnceLock::new();

    let nullish = NULLISH.get_or_init(|| {
        Regex::new(r"\s*\|\s*(?:null|undefined)\b|^(?:null|undefined)\s*\|\s*")
            .expect("invalid built-in nullish regex")
    });
    let array =
        ARRAY.get_or_init(|| Regex::new(r"Array<(.+)>").expect("invalid built-in array regex"));

    let s = nullish.replace_all(ts_type.trim(), "");
    array.replace_all(&s, "${1}[]").into_owned()
}

/// Whether a declared type carries a `null` union member, in any position.
pub fn has_null_union(ts_type: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|\|)\s*null\b").expect("invalid built-in null union regex"))
        .is_match(ts_type)
}
