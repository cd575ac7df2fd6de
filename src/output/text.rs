//! Plain-text report, one block per target.

use crate::model::{ScanResult, ScanResultSet};
use std::fmt::Write;

const SEPARATOR_WIDTH: usize = 80;

pub fn render_text_report(results: &ScanResultSet) -> String {
    let mut out = String::new();
    for result in results {
        write_block(&mut out, result);
    }
    out
}

fn write_block(out: &mut String, result: &ScanResult) {
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{}", "=".repeat(SEPARATOR_WIDTH));
    let _ = writeln!(out, "URL: {}", result.url);
    let _ = writeln!(out, "Timestamp: {}", result.timestamp.to_rfc3339());
    let _ = writeln!(out, "Status Code: {}", result.status_code);
    let _ = writeln!(out, "Has CORS: {}", result.has_cors);

    if let Some(error) = &result.error {
        let _ = writeln!(out, "Error: {}", error);
    }

    if !result.cors_headers.is_empty() {
        let _ = writeln!(out, "CORS Headers Found:");
        for (name, value) in result.cors_header_values() {
            let _ = writeln!(out, "  - {}: {}", name, value);
        }
    }

    let _ = writeln!(out, "All Headers:");
    for (name, value) in &result.headers {
        let _ = writeln!(out, "  {}: {}", name, value);
    }
    out.push('\n');
}
