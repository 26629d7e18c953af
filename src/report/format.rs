//! Terminal output for calculations, catalog listings and jobs.
//!
//! Formatting stays here so the resolver and calculator never build strings
//! for display.

use crate::catalog::Catalog;
use crate::domain::{CatalogConfig, Connection, CutRequest, CutResult, OffsetVariant};
use crate::jobs::{Job, JobBook};
use crate::math::{Inches, to_decimal_string};
use crate::report::render_result;

/// Decimal places shown for cut lengths.
pub const DECIMAL_PLACES: u32 = 5;

/// Compact decimal for offsets and measurements (`0.6875`, `12`).
pub fn format_inches(value: &Inches) -> String {
    let s = to_decimal_string(value, DECIMAL_PLACES);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn format_connection(conn: &Connection) -> String {
    let alt = match conn.variant {
        OffsetVariant::Secondary => " (alt)",
        OffsetVariant::Primary => "",
    };
    format!(
        "{}: Type={}, Size={}, Offset={}{alt}",
        conn.role.label(),
        conn.fitting_type,
        conn.size,
        format_inches(&conn.offset),
    )
}

/// Connections and measurements of a request, one per line.
pub fn format_request(request: &CutRequest) -> String {
    let mut lines: Vec<String> = request.connections().into_iter().map(format_connection).collect();

    match request {
        CutRequest::Standard { c2c, .. } => {
            lines.push(format!("Center-to-Center: {}", format_inches(c2c)));
        }
        CutRequest::LayIn {
            c2c_overall,
            c2c_lay_in,
            ..
        } => {
            lines.push(format!("Overall C2C: {}", format_inches(c2c_overall)));
            lines.push(format!("C2C A -> Lay-in: {}", format_inches(c2c_lay_in)));
        }
        CutRequest::Bushing { c2c, thickness, .. } => {
            lines.push(format!("Center-to-Center: {}", format_inches(c2c)));
            lines.push(format!("Bushing thickness: {}", format_inches(thickness)));
        }
    }

    lines.join("\n")
}

/// Result block: one line per cut with decimal and sixteenths.
pub fn format_result(result: &CutResult, shaved: bool) -> String {
    let mut out = String::new();
    for cut in render_result(result) {
        out.push_str(&format!(
            "{:<20} {:>10}\"   {}\"",
            format!("{}:", cut.label),
            cut.decimal,
            cut.fraction
        ));
        if shaved {
            out.push_str("   (shaved 1/16)");
        }
        if cut.negative {
            out.push_str("   <- negative, check measurements");
        }
        out.push('\n');
    }
    out
}

/// Full calculation report as printed by the CLI.
pub fn format_calculation(request: &CutRequest, result: &CutResult, shaved: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} ===\n", request.kind().display_name()));
    out.push_str(&format_request(request));
    out.push_str("\n\n--- RESULT ---\n");
    out.push_str(&format_result(result, shaved));
    out
}

/// Every configured type (plus catalog-only types) with its available sizes.
pub fn format_sizes(catalog: &Catalog, config: &CatalogConfig) -> String {
    let mut types: Vec<&str> = config.supported_types.iter().map(String::as_str).collect();
    for t in catalog.types() {
        if !types.contains(&t) {
            types.push(t);
        }
    }

    let mut out = String::new();
    for t in types {
        let sizes = catalog.sizes(t);
        let marker = if config.is_supported(t) { "" } else { " (not in supported list)" };
        if sizes.is_empty() {
            out.push_str(&format!("{t}{marker}: (no catalog rows)\n"));
        } else {
            out.push_str(&format!("{t}{marker}: {}\n", sizes.join(", ")));
        }
    }

    let dups = catalog.duplicates();
    if !dups.is_empty() {
        out.push_str("\nDuplicate rows (ignored, first row wins):\n");
        for d in dups {
            out.push_str(&format!("- {} size {}\n", d.fitting_type, d.size));
        }
    }
    out
}

/// One line per job.
pub fn format_job_list(book: &JobBook) -> String {
    if book.is_empty() {
        return "No jobs recorded.\n".to_string();
    }
    let mut out = String::new();
    out.push_str(&format!("{:<24} {:>7} {:<16}\n", "job", "entries", "created"));
    out.push_str(&format!("{:-<24} {:-<7} {:-<16}\n", "", "", ""));
    for job in book.jobs() {
        out.push_str(&format!(
            "{:<24} {:>7} {:<16}\n",
            truncate(&job.name, 24),
            job.entries.len(),
            job.created_at.format("%Y-%m-%d %H:%M"),
        ));
    }
    out
}

/// All entries of one job.
pub fn format_job(job: &Job) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Job: {} ===\n", job.name));
    for (idx, entry) in job.entries.iter().enumerate() {
        out.push_str(&format!(
            "\n#{} {} ({})\n",
            idx + 1,
            entry.kind.display_name(),
            entry.recorded_at.format("%Y-%m-%d %H:%M")
        ));
        out.push_str(&entry.summary);
        out.push('\n');
        for cut in &entry.cuts {
            out.push_str(&format!("  {}: {}\" | {}\"", cut.label, cut.decimal, cut.fraction));
            if entry.shaved {
                out.push_str(" (shaved)");
            }
            out.push('\n');
        }
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
