use colored::Colorize;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use std::fmt::Write as _;
use typesync_check::{AuditOutcome, LiteralAuditOutcome, LiteralFindingKind, TypeSyncReport};

pub fn summary_table(outcome: &AuditOutcome) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Tables").add_attribute(Attribute::Bold),
            Cell::new("Interfaces").add_attribute(Attribute::Bold),
            Cell::new("Pairs").add_attribute(Attribute::Bold),
            Cell::new("Discrepancies").add_attribute(Attribute::Bold),
        ]);

    let found = outcome.discrepancies.len();
    table.add_row(vec![
        Cell::new(outcome.table_count),
        Cell::new(outcome.interface_count),
        Cell::new(outcome.pairings.len()),
        Cell::new(found).fg(if found == 0 { Color::Green } else { Color::Red }),
    ]);
    table
}

/// Console rendering: groups in kind order, at most `limit` items each.
pub fn render_console(outcome: &AuditOutcome, limit: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "=== Type audit: TypeScript vs database schema ===".bold().cyan());
    let _ = writeln!(out, "  {} tables found", outcome.table_count);
    let _ = writeln!(out, "  {} interfaces found", outcome.interface_count);
    let _ = writeln!(out);

    if outcome.is_clean() {
        let _ = writeln!(out, "{}", "No discrepancies found.".green().bold());
    } else {
        let header = format!("{} discrepancies found:", outcome.discrepancies.len());
        let _ = writeln!(out, "{}", header.red().bold());
        let _ = writeln!(out);

        for (kind, items) in outcome.by_kind() {
            let title = format!("> {kind} ({} occurrences):", items.len());
            let _ = writeln!(out, "{}", title.yellow());
            for d in items.iter().take(limit) {
                let _ = writeln!(out, "  - {}", d.location);
                let _ = writeln!(out, "    {}", d.description);
            }
            if items.len() > limit {
                let _ = writeln!(out, "  ... and {} more", items.len() - limit);
            }
            let _ = writeln!(out);
        }
    }

    let _ = writeln!(out, "{}", summary_table(outcome));
    out
}

/// Full markdown report; unlike the console view nothing is truncated.
pub fn render_markdown(outcome: &AuditOutcome, generated_at: &str) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Type audit: TypeScript types vs database schema");
    let _ = writeln!(out);
    let _ = writeln!(out, "**Generated:** {generated_at}");
    let _ = writeln!(out);
    let _ = writeln!(out, "## Summary");
    let _ = writeln!(out);
    let _ = writeln!(out, "- Tables analyzed: {}", outcome.table_count);
    let _ = writeln!(out, "- TypeScript interfaces: {}", outcome.interface_count);
    let _ = writeln!(
        out,
        "- **Discrepancies found: {}**",
        outcome.discrepancies.len()
    );
    let _ = writeln!(out);

    if !outcome.is_clean() {
        let _ = writeln!(out, "## Discrepancies");
        let _ = writeln!(out);
        for (kind, items) in outcome.by_kind() {
            let _ = writeln!(out, "### {kind} ({} occurrences)", items.len());
            let _ = writeln!(out);
            for d in items {
                let _ = writeln!(out, "- **{}**", d.location);
                let _ = writeln!(out, "  - {}", d.description);
            }
            let _ = writeln!(out);
        }
    }

    out
}

pub fn render_literals(outcome: &LiteralAuditOutcome) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "=== Literal types vs database enums ===".bold().cyan());
    let _ = writeln!(out);

    if outcome.aliases_without_enum.is_empty() {
        let _ = writeln!(out, "{}", "Every literal type has a database enum.".green());
    } else {
        let title = format!(
            "Literal types without a database enum ({}):",
            outcome.aliases_without_enum.len()
        );
        let _ = writeln!(out, "{}", title.yellow());
        for name in &outcome.aliases_without_enum {
            let _ = writeln!(out, "  - {name}");
        }
    }
    let _ = writeln!(out);

    for kind in [
        LiteralFindingKind::MissingEnum,
        LiteralFindingKind::ValuesDiffer,
        LiteralFindingKind::InlineLiteral,
    ] {
        let findings: Vec<_> = outcome.findings.iter().filter(|f| f.kind == kind).collect();
        if findings.is_empty() {
            continue;
        }
        let title = match kind {
            LiteralFindingKind::MissingEnum => "Fields using a literal type without enum",
            LiteralFindingKind::ValuesDiffer => "Literal types that drifted from their enum",
            LiteralFindingKind::InlineLiteral => "Fields declared with an inline literal union",
        };
        let _ = writeln!(out, "{}", format!("{title} ({}):", findings.len()).red());
        for f in findings {
            let _ = writeln!(out, "  {}:{}: {}", f.file.display(), f.line, f.message);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(
        out,
        "Summary: {} types without enum, {} findings",
        outcome.aliases_without_enum.len(),
        outcome.findings.len()
    );
    out
}

pub fn render_sync(report: &TypeSyncReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "=== Type sync validation ===".bold().cyan());
    let _ = writeln!(out);

    if let Some(size) = report.database_types_size {
        let _ = writeln!(out, "database types file: {size} bytes");
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("File").add_attribute(Attribute::Bold),
            Cell::new("Imports database types").add_attribute(Attribute::Bold),
            Cell::new("Definitions").add_attribute(Attribute::Bold),
            Cell::new("Extending").add_attribute(Attribute::Bold),
        ]);
    for f in &report.files {
        let name = f
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| f.path.display().to_string());
        let extending = f.definitions.iter().filter(|d| d.extends.is_some()).count();
        table.add_row(vec![
            Cell::new(name),
            if f.imports_database_types {
                Cell::new("yes").fg(Color::Green)
            } else {
                Cell::new("no").fg(Color::Yellow)
            },
            Cell::new(f.definitions.len()),
            Cell::new(extending),
        ]);
    }
    if !report.files.is_empty() {
        let _ = writeln!(out, "{table}");
    }
    let _ = writeln!(out);

    for w in &report.warnings {
        let _ = writeln!(out, "{} {w}", "[WARN]".yellow());
    }
    for e in &report.errors {
        let _ = writeln!(out, "{} {e}", "[ERROR]".red());
    }

    if report.passed() {
        let _ = writeln!(
            out,
            "{}",
            format!("Validation passed with {} warnings.", report.warnings.len()).green()
        );
    } else {
        let _ = writeln!(
            out,
            "{}",
            format!("Validation failed with {} errors.", report.errors.len()).red()
        );
    }
    out
}
