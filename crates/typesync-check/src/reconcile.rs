//! Best-effort pairing of database tables with TypeScript interfaces.
//!
//! There is no scoring: for each candidate form of a table name, the first
//! interface (in extraction order) whose name contains the candidate, or is
//! contained by it, wins. Tables with overlapping names can therefore pair
//! with the wrong interface; callers see that as noise in the comparison.

use crate::sql_schema::DbSchema;
use crate::ts_schema::TsSchema;
use heck::ToUpperCamelCase;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pairing {
    pub table: String,
    pub interface: String,
}

/// Name forms tried for `table`, in priority order.
pub fn candidate_names(table: &str) -> [String; 4] {
    [
        table.to_string(),
        table.strip_suffix('s').unwrap_or(table).to_string(),
        title_case(table).replace('_', ""),
        table.to_upper_camel_case(),
    ]
}

/// Uppercases every letter that follows a non-letter and lowercases the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// First interface matching any candidate of `table`.
pub fn find_interface<'a, I>(table: &str, interfaces: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: Clone,
{
    let interfaces = interfaces.into_iter();

    for candidate in candidate_names(table) {
        let candidate = candidate.to_lowercase();
        for name in interfaces.clone() {
            let lower = name.to_lowercase();
            if lower.contains(&candidate) || candidate.contains(&lower) {
                return Some(name);
            }
        }
    }

    None
}

/// Pairs every table that finds an interface, in table order. Unpaired
/// tables are left out.
pub fn pair_tables(db: &DbSchema, ts: &TsSchema) -> Vec<Pairing> {
    let mut out = Vec::new();

    for table in db.tables.keys() {
        match find_interface(table, ts.interfaces.keys().map(String::as_str)) {
            Some(interface) => {
                tracing::debug!(%table, %interface, "paired table");
                out.push(Pairing {
                    table: table.clone(),
                    interface: interface.to_string(),
                });
            }
            None => tracing::debug!(%table, "no matching interface"),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_for_snake_case_table() {
        let c = candidate_names("usuarios_canais");
        assert_eq!(c[0], "usuarios_canais");
        assert_eq!(c[1], "usuarios_canai");
        assert_eq!(c[2], "UsuariosCanais");
        assert_eq!(c[3], "UsuariosCanais");
    }

    #[test]
    fn only_one_trailing_s_is_stripped() {
        assert_eq!(candidate_names("address")[1], "addres");
    }

    #[test]
    fn singular_interface_matches_plural_table() {
        let ifaces = ["Condominio", "Usuario"];
        assert_eq!(find_interface("usuarios", ifaces), Some("Usuario"));
    }

    #[test]
    fn interface_containing_candidate_matches() {
        let ifaces = ["UsuariosCanaisPreferencias"];
        assert_eq!(
            find_interface("usuarios_canais_preferencias", ifaces),
            Some("UsuariosCanaisPreferencias")
        );
    }

    #[test]
    fn no_match_is_none() {
        assert_eq!(find_interface("pagamentos", ["Usuario"]), None);
    }

    #[test]
    fn first_match_wins_even_when_a_better_one_exists() {
        // `Usuario` comes first and is a substring of `usuarios_canais`, so the
        // table pairs with it even though `UsuarioCanal` exists.
        let ifaces = ["Usuario", "UsuarioCanal"];
        assert_eq!(find_interface("usuarios_canais", ifaces), Some("Usuario"));
    }
}
