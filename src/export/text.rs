use std::fmt::Write;
use tabled::{settings::Style, Table, Tabled};

use crate::batch::{BatchOutcome, BatchSummary};

#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Age")]
    actual_age: String,
    #[tabled(rename = "Health Age")]
    health_age: String,
    #[tabled(rename = "Δ")]
    delta: String,
    #[tabled(rename = "Athletic")]
    athletic: String,
    #[tabled(rename = "Score")]
    athletic_score: String,
    #[tabled(rename = "Note")]
    note: String,
}

impl From<&BatchOutcome> for TableRow {
    fn from(outcome: &BatchOutcome) -> Self {
        let result = outcome.result.as_ref();

        let note = match (result, &outcome.error) {
            (_, Some(error)) => error.clone(),
            (Some(r), None) if r.debug.is_degraded() => "no lean-mass data".to_string(),
            _ => String::new(),
        };

        TableRow {
            id: outcome.id.clone().unwrap_or_else(|| "-".to_string()),
            actual_age: format!("{}", outcome.actual_age),
            health_age: result.map_or("-".to_string(), |r| r.health_age.to_string()),
            delta: outcome.delta().map_or("-".to_string(), |d| format!("{:+}", d)),
            athletic: result.map_or("-".to_string(), |r| {
                let flag = if r.is_athletic { "yes" } else { "no" };
                flag.to_string()
            }),
            athletic_score: result.map_or("-".to_string(), |r| format!("{:.2}", r.debug.athletic_score)),
            note,
        }
    }
}

/// Plain-text report: results table followed by a summary block
pub fn render(summary: &BatchSummary) -> String {
    let rows: Vec<TableRow> = summary.outcomes.iter().map(TableRow::from).collect();
    let mut out = Table::new(rows).with(Style::modern()).to_string();

    // writing to a String cannot fail
    let _ = writeln!(out);
    let _ = writeln!(out);
    let _ = writeln!(out, "HEALTH AGE SUMMARY");
    let _ = writeln!(out, "Records:   {}", summary.total);
    let _ = writeln!(out, "Succeeded: {}", summary.succeeded);
    let _ = writeln!(out, "Failed:    {}", summary.failed);
    let _ = writeln!(out, "Degraded:  {}", summary.degraded);
    let _ = writeln!(out, "Athletic:  {}", summary.athletic);
    match summary.mean_delta {
        Some(delta) => {
            let _ = writeln!(out, "Mean Δ:    {:+.1} years", delta);
        }
        None => {
            let _ = writeln!(out, "Mean Δ:    -");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::sample_summary;

    #[test]
    fn test_text_report() {
        let report = render(&sample_summary());

        assert!(report.contains("Health Age"));
        assert!(report.contains("u1"));
        assert!(report.contains("-1"));
        assert!(report.contains("Records:   2"));
        assert!(report.contains("Failed:    1"));
        assert!(report.contains("Mean Δ:    -1.0 years"));
    }
}
