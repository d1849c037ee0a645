use std::fmt::Write;

use crate::monte_carlo::AggregateReport;
use crate::sensitivity::TeamDelta;

/// Confidence level used for the ± column of sampled reports
pub const REPORT_CONFIDENCE: f64 = 0.95;

/// Plain-text table, one decimal per percentage.
pub fn render_table(report: &AggregateReport) -> String {
    let width = report
        .teams
        .iter()
        .map(|t| t.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut out = String::new();
    let _ = match report.trials {
        Some(trials) => writeln!(out, "Method: {} ({} runs)", report.method, trials),
        None => writeln!(out, "Method: {} (exact)", report.method),
    };
    let _ = writeln!(
        out,
        "{:<width$}  {:>14}  {:>8}  {:>12}",
        "Team", "Championship %", "Finals %", "Semifinals %"
    );

    for odds in &report.teams {
        let title = match report.margin_of_error(odds.championship_pct, REPORT_CONFIDENCE) {
            Some(moe) => format!("{:.1}% ±{:.1}", odds.championship_pct, moe),
            None => format!("{:.1}%", odds.championship_pct),
        };
        let _ = writeln!(
            out,
            "{:<width$}  {:>14}  {:>8}  {:>12}",
            odds.name,
            title,
            format!("{:.1}%", odds.finals_pct),
            format!("{:.1}%", odds.semifinals_pct),
        );
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn render_csv(report: &AggregateReport) -> String {
    let mut out = String::from("team,seed,championship_pct,finals_pct,semifinals_pct\n");
    for odds in &report.teams {
        let _ = writeln!(
            out,
            "{},{},{:.4},{:.4},{:.4}",
            csv_field(&odds.name),
            odds.seed,
            odds.championship_pct,
            odds.finals_pct,
            odds.semifinals_pct
        );
    }
    out
}

pub fn render_json(report: &AggregateReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Sensitivity table, largest swing first.
pub fn render_deltas(deltas: &[TeamDelta], points: f64) -> String {
    let mut sorted: Vec<&TeamDelta> = deltas.iter().collect();
    sorted.sort_by(|a, b| b.swing.total_cmp(&a.swing));

    let width = sorted.iter().map(|d| d.team.len()).max().unwrap_or(4).max(4);
    let mut out = String::new();
    let _ = writeln!(out, "Title odds sensitivity to a ±{points} point rating shift");
    let _ = writeln!(
        out,
        "{:<width$}  {:>8}  {:>8}  {:>8}  {:>7}",
        "Team", "Base", "Down", "Up", "Swing"
    );
    for d in sorted {
        let _ = writeln!(
            out,
            "{:<width$}  {:>7.1}%  {:>7.1}%  {:>7.1}%  {:>7.2}",
            d.team, d.championship_pct, d.championship_pct_down, d.championship_pct_up, d.swing
        );
    }
    out
}
