use crate::model::{ScanResultSet, ScanSummary};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct CorsRow {
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Status")]
    status: u16,
    #[tabled(rename = "Allow-Origin")]
    allow_origin: String,
    #[tabled(rename = "CORS Headers")]
    headers: String,
}

/// Prints a table of the targets that exposed CORS headers, if any did.
pub fn print_cors_table(results: &ScanResultSet) {
    let rows: Vec<CorsRow> = results
        .with_cors()
        .map(|r| CorsRow {
            url: truncate(&r.url, 60),
            status: r.status_code,
            allow_origin: r
                .headers
                .get("Access-Control-Allow-Origin")
                .map(|v| truncate(v, 40))
                .unwrap_or_else(|| "-".to_string()),
            headers: r
                .cors_headers
                .iter()
                .map(|h| h.trim_start_matches("Access-Control-"))
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();

    if rows.is_empty() {
        return;
    }

    println!();
    println!("Targets exposing CORS headers:");
    println!();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

pub fn print_summary(results: &ScanResultSet) {
    print!("{}", format_summary(&results.summary()));
}

pub fn format_summary(summary: &ScanSummary) -> String {
    let rate = if summary.total > 0 {
        format!("{:.2}%", summary.success_rate())
    } else {
        "0%".to_string()
    };

    format!(
        "\n=== CORS TEST SUMMARY ===\n\
         Total URLs tested: {}\n\
         Successful requests: {}\n\
         URLs with CORS headers: {}\n\
         Success rate: {}\n",
        summary.total, summary.successful, summary.with_cors, rate
    )
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_summary_half_successful() {
        let summary = ScanSummary {
            total: 2,
            successful: 1,
            with_cors: 1,
        };
        let text = format_summary(&summary);

        assert!(text.contains("Total URLs tested: 2\n"));
        assert!(text.contains("Successful requests: 1\n"));
        assert!(text.contains("URLs with CORS headers: 1\n"));
        assert!(text.contains("Success rate: 50.00%\n"));
    }

    #[test]
    fn test_format_summary_empty_scan() {
        let text = format_summary(&ScanSummary::default());
        assert!(text.contains("Total URLs tested: 0\n"));
        assert!(text.contains("Success rate: 0%\n"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("https://very.long.example/path", 12), "https://v...");
    }
}
