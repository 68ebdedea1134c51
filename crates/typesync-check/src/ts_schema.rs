//! Interface and literal-alias extraction from TypeScript sources.
//!
//! Bodies are matched up to the first closing brace, so a property whose type
//! contains a nested object literal truncates the interface at that point.

use crate::source::SourceFile;
use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDefinition {
    pub name: String,
    /// Raw type expression as written, e.g. `string | null`.
    pub declared_type: String,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceSchema {
    pub name: String,
    pub properties: IndexMap<String, PropertyDefinition>,
}

impl InterfaceSchema {
    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.get(name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }
}

/// `export type Name = 'a' | 'b';`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiteralAlias {
    pub name: String,
    pub values: Vec<String>,
    pub file: PathBuf,
    pub line: usize,
}

/// A property whose declared type names some alias, located by file and line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldUsage {
    pub file: PathBuf,
    pub line: usize,
    pub field: String,
    pub type_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TsSchema {
    pub interfaces: IndexMap<String, InterfaceSchema>,
    pub literal_aliases: IndexMap<String, LiteralAlias>,
}

impl TsSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sources(files: &[SourceFile]) -> Self {
        let mut schema = Self::new();
        for f in files {
            for iface in extract_interfaces(&f.content) {
                schema.interfaces.insert(iface.name.clone(), iface);
            }
            for alias in extract_literal_aliases(&f.path, &f.content) {
                schema.literal_aliases.insert(alias.name.clone(), alias);
            }
            tracing::debug!(file = %f.path.display(), "scanned type definitions");
        }
        schema
    }

    pub fn find_interface(&self, name: &str) -> Option<&InterfaceSchema> {
        self.interfaces.get(name)
    }
}

fn interface_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"export\s+(?:interface|type)\s+(\w+)\s*(?:=\s*)?\{([^}]+)\}")
            .expect("invalid built-in interface regex")
    })
}

fn property_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\w+)(\?)?:\s*([^;]+)").expect("invalid built-in property regex")
    })
}

fn type_alias_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Ends at `;` or at a line end not followed by a `|` continuation.
        Regex::new(r"export\s+type\s+(\w+)\s*=\s*((?:[^;{}\n]|\n[ \t]*\|)+)")
            .expect("invalid built-in type alias regex")
    })
}

/// Extracts exported interfaces and object type aliases, in text order.
///
/// Declarations without a single recognisable property are dropped.
pub fn extract_interfaces(src: &str) -> Vec<InterfaceSchema> {
    let mut out = Vec::new();

    for caps in interface_re().captures_iter(src) {
        let name = caps[1].to_string();
        let properties = extract_properties(&caps[2]);

        if properties.is_empty() {
            tracing::trace!(interface = %name, "no properties recognised; skipping");
            continue;
        }
        out.push(InterfaceSchema { name, properties });
    }

    out
}

pub fn extract_properties(body: &str) -> IndexMap<String, PropertyDefinition> {
    let mut properties = IndexMap::new();

    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        for member in split_members(line) {
            let member = member.trim();
            if member.starts_with("//") {
                break;
            }
            if let Some(caps) = property_re().captures(member) {
                let prop = PropertyDefinition {
                    name: caps[1].to_string(),
                    declared_type: caps[3].trim().trim_end_matches(';').to_string(),
                    optional: caps.get(2).is_some(),
                };
                properties.insert(prop.name.clone(), prop);
            }
        }
    }

    properties
}

/// Splits a body line at `;` outside brackets and quotes, so that
/// `a: string; b?: number;` yields two members.
fn split_members(line: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0usize;

    for (i, c) in line.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"' | '`') => quote = Some(c),
            (None, '(' | '<' | '[') => depth += 1,
            (None, ')' | '>' | ']') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                out.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    out.push(&line[start..]);
    out.retain(|m| !m.trim().is_empty());
    out
}

/// Extracts aliases whose right-hand side is a union of string literals only.
pub fn extract_literal_aliases(file: &std::path::Path, src: &str) -> Vec<LiteralAlias> {
    let mut out = Vec::new();

    for caps in type_alias_re().captures_iter(src) {
        let Some(values) = parse_literal_union(&caps[2]) else {
            continue;
        };
        let start = caps.get(0).map(|m| m.start()).unwrap_or_default();
        out.push(LiteralAlias {
            name: caps[1].to_string(),
            values,
            file: file.to_path_buf(),
            line: line_number(src, start),
        });
    }

    out
}

/// `'a' | "b" | 'c'` -> `["a", "b", "c"]`; `None` if any member is not a
/// string literal.
pub fn parse_literal_union(expr: &str) -> Option<Vec<String>> {
    let mut values = Vec::new();
    for part in expr.split('|') {
        let part = part.trim();
        if part.is_empty() {
            // Leading `|` in multi-line unions.
            continue;
        }
        let unquoted = part
            .strip_prefix('\'')
            .and_then(|p| p.strip_suffix('\''))
            .or_else(|| part.strip_prefix('"').and_then(|p| p.strip_suffix('"')))?;
        if unquoted.contains(['\'', '"', '\n']) {
            return None;
        }
        values.push(unquoted.to_string());
    }
    if values.is_empty() { None } else { Some(values) }
}

/// Finds every `field: TypeName` / `field?: TypeName` usage in `src`.
pub fn find_field_usages(file: &std::path::Path, src: &str, type_name: &str) -> Vec<FieldUsage> {
    let pattern = format!(r"(\w+)\s*\??\s*:\s*{}\b", regex::escape(type_name));
    let Ok(re) = Regex::new(&pattern) else {
        return Vec::new();
    };

    re.captures_iter(src)
        .map(|caps| {
            let start = caps.get(0).map(|m| m.start()).unwrap_or_default();
            FieldUsage {
                file: file.to_path_buf(),
                line: line_number(src, start),
                field: caps[1].to_string(),
                type_name: type_name.to_string(),
            }
        })
        .collect()
}

/// Finds `field: 'literal' | ...` declarations for one field name.
pub fn find_inline_literal_fields(file: &std::path::Path, src: &str, field: &str) -> Vec<FieldUsage> {
    let pattern = format!(
        r#"\b({})\??\s*:\s*['"](\w+)['"]\s*\|"#,
        regex::escape(field)
    );
    let Ok(re) = Regex::new(&pattern) else {
        return Vec::new();
    };

    re.captures_iter(src)
        .map(|caps| {
            let start = caps.get(0).map(|m| m.start()).unwrap_or_default();
            FieldUsage {
                file: file.to_path_buf(),
                line: line_number(src, start),
                field: caps[1].to_string(),
                type_name: "inline literal union".to_string(),
            }
        })
        .collect()
}

/// 1-based line of a byte offset.
fn line_number(src: &str, offset: usize) -> usize {
    src[..offset].matches('\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    #[test]
    fn interface_with_optional_property() {
        let ifaces = extract_interfaces("export interface I { a: string; b?: number; }");
        assert_eq!(ifaces.len(), 1);

        let i = &ifaces[0];
        assert_eq!(i.name, "I");
        assert_eq!(i.properties.len(), 2);
        assert!(!i.properties["a"].optional);
        assert_eq!(i.properties["a"].declared_type, "string");
        assert!(i.properties["b"].optional);
        assert_eq!(i.properties["b"].declared_type, "number");
    }

    #[test]
    fn multi_line_interface_and_object_type() {
        let src = r#"
export interface Usuario {
  id: string;
  // comment line
  nome: string;
  email?: string | null;
  tags: Array<string>;
}

export type Resumo = {
  total: number
};
"#;
        let ifaces = extract_interfaces(src);
        let names: Vec<_> = ifaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Usuario", "Resumo"]);

        let u = &ifaces[0];
        let props: Vec<_> = u.properties.keys().cloned().collect();
        assert_eq!(props, vec!["id", "nome", "email", "tags"]);
        assert!(u.properties["email"].optional);
        assert_eq!(u.properties["email"].declared_type, "string | null");
        assert!(!u.properties["nome"].optional);

        assert_eq!(ifaces[1].properties["total"].declared_type, "number");
    }

    #[test]
    fn nested_braces_truncate_body() {
        let src = "export interface Outer {\n  a: string;\n  meta: { x: number };\n  b: string;\n}";
        let i = &extract_interfaces(src)[0];
        assert!(i.has_property("a"));
        assert!(!i.has_property("b"));
    }

    #[test]
    fn literal_aliases_only_for_pure_string_unions() {
        let src = r#"
export type Status = 'aberto' | 'fechado';
export type Mixed = 'a' | number;
export type Multi =
  | "x"
  | "y";
"#;
        let aliases = extract_literal_aliases(Path::new("t.ts"), src);
        let names: Vec<_> = aliases.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Status", "Multi"]);
        assert_eq!(aliases[0].values, vec!["aberto", "fechado"]);
        assert_eq!(aliases[0].line, 2);
        assert_eq!(aliases[1].values, vec!["x", "y"]);
    }

    #[test]
    fn literal_aliases_without_semicolons() {
        let src = "export type Status = 'a' | 'b'\nexport type Kind =\n  | 'c'\n  | 'd'\nexport type Y = 'e'\n";
        let aliases = extract_literal_aliases(Path::new("x.ts"), src);
        let got: Vec<_> = aliases
            .iter()
            .map(|a| (a.name.as_str(), a.values.clone(), a.line))
            .collect();
        assert_eq!(
            got,
            vec![
                ("Status", vec!["a".to_string(), "b".to_string()], 1),
                ("Kind", vec!["c".to_string(), "d".to_string()], 2),
                ("Y", vec!["e".to_string()], 5),
            ]
        );
    }

    #[test]
    fn literal_union_rejects_values_spanning_quotes() {
        assert_eq!(parse_literal_union("'a' | 'b'\nexport type Y = 'c'"), None);
        assert_eq!(parse_literal_union(r#"'it"s'"#), None);
    }

    #[test]
    fn field_usages_report_line_numbers() {
        let src = "interface A {\n  tipo: AssinaturaTipo;\n  outro?: AssinaturaTipo | null;\n  x: AssinaturaTipoExtra;\n}";
        let uses = find_field_usages(Path::new("a.ts"), src, "AssinaturaTipo");
        let got: Vec<_> = uses.iter().map(|u| (u.field.as_str(), u.line)).collect();
        assert_eq!(got, vec![("tipo", 2), ("outro", 3)]);
    }

    #[test]
    fn inline_literal_field() {
        let src = "export interface Conta {\n  tipo_conta: 'corrente' | 'poupanca';\n}";
        let hits = find_inline_literal_fields(Path::new("f.ts"), src, "tipo_conta");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line, 2);
    }
}
