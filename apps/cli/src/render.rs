//! Plain-text rendering of engine results.

use case_core::{Container, RewardId};
use case_econ::format_value;
use case_sim::{EnsembleStats, PercentReturn, ProfitPoint, RealisticResult, Summary, UntilBestResult};

pub fn percent(p: PercentReturn) -> String {
    match p.as_finite() {
        Some(v) => format!("{v:.2}%"),
        None => "∞%".to_string(),
    }
}

pub fn totals(s: &Summary) -> String {
    format!(
        "Openings: {} | cost: {} | value: {} | result: {} ({:?}) | per opening: {} | return: {}",
        s.quantity,
        format_value(s.total_cost),
        format_value(s.total_value_gained),
        format_value(s.result),
        s.outcome,
        format_value(s.per_trial),
        percent(s.percent_return)
    )
}

pub fn realistic(r: &RealisticResult) -> String {
    let mut out = totals(&r.totals.summary());
    for (id, n) in &r.won_items {
        out.push_str(&format!("\n  {id}: {n}"));
    }
    out
}

pub fn until_best(r: &UntilBestResult) -> String {
    let head = if r.found {
        format!(
            "Found {} after {} openings",
            display_name(&r.target.name, &r.target.id),
            r.trials_used
        )
    } else {
        format!(
            "{} not found within {} openings",
            display_name(&r.target.name, &r.target.id),
            r.max_attempts
        )
    };
    format!("{head}\n{}", totals(&r.totals.summary()))
}

pub fn profit_series(points: &[ProfitPoint]) -> String {
    points
        .iter()
        .map(|p| {
            if p.is_percentage {
                format!("{:>8} {:>10.2}%", p.trial_count, p.value)
            } else {
                format!("{:>8} {:>11}", p.trial_count, format_value(p.value))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn ensemble(s: &EnsembleStats) -> String {
    format!(
        "Runs: {} x {} openings | mean: {} | sd: {} | p10/p50/p90: {}/{}/{} | min/max: {}/{} | profitable: {:.1}%",
        s.runs,
        s.quantity,
        format_value(s.mean_result),
        format_value(s.std_dev_result),
        format_value(s.percentile_10),
        format_value(s.percentile_50),
        format_value(s.percentile_90),
        format_value(s.min_result),
        format_value(s.max_result),
        s.profitable_fraction * 100.0
    )
}

pub fn container_line(c: &Container, odds: &[(&RewardId, f64)]) -> String {
    let mut out = format!(
        "{} [{} {}] {} rewards, total weight {}",
        display_name(&c.name, &c.id.0),
        format_value(c.price),
        c.currency,
        c.rewards.len(),
        c.total_weight()
    );
    for (id, p) in odds {
        out.push_str(&format!("\n  {id}: {:.3}%", p * 100.0));
    }
    out
}

fn display_name(name: &str, id: &impl std::fmt::Display) -> String {
    if name.is_empty() {
        id.to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_sentinel() {
        assert_eq!(percent(PercentReturn::Finite(-69.0)), "-69.00%");
        assert_eq!(percent(PercentReturn::Unbounded), "∞%");
    }

    #[test]
    fn container_line_reports_total_weight() {
        let c: Container = serde_json::from_str(
            r#"{"id": "starter", "name": "Starter", "price": 200, "currency": "time",
                "rewards": [{"id": "a", "value": 1, "weight": 40},
                            {"id": "b", "value": 1, "weight": 20}]}"#,
        )
        .unwrap();
        let a = RewardId("a".to_string());
        let line = container_line(&c, &[(&a, 0.5)]);
        let mut lines = line.lines();
        assert_eq!(
            lines.next(),
            Some("Starter [200 time] 2 rewards, total weight 60")
        );
        assert_eq!(lines.next(), Some("  a: 50.000%"));
    }

    #[test]
    fn series_marks_units() {
        let pts = [
            ProfitPoint {
                trial_count: 10,
                value: -12.5,
                is_percentage: true,
            },
            ProfitPoint {
                trial_count: 20,
                value: 1_500.0,
                is_percentage: false,
            },
        ];
        let text = profit_series(&pts);
        assert!(text.lines().next().unwrap().ends_with("-12.50%"));
        assert!(text.lines().nth(1).unwrap().ends_with("1.5K"));
    }
}
