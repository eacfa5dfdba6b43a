use chrono::{DateTime, Utc};

use crate::models::BacktestMetric;

/// Placeholder backtest results. Nothing here is computed from stored fixtures or
/// predictions; the rows are served verbatim so existing dashboards keep rendering.
pub fn placeholder_metrics(now: DateTime<Utc>) -> Vec<BacktestMetric> {
    let row = |league_id: i32, league_name: &str, market: &str, log_loss, brier_score, calibration_slope, sample_count| {
        BacktestMetric {
            league_id,
            league_name: league_name.to_string(),
            market: market.to_string(),
            log_loss,
            brier_score,
            calibration_slope,
            sample_count,
            last_updated: now,
        }
    };

    vec![
        row(1, "Premier League", "1X2", 0.612, 0.234, 0.95, 1250),
        row(1, "Premier League", "Over/Under 2.5", 0.687, 0.251, 1.08, 1250),
        row(2, "Bundesliga", "1X2", 0.598, 0.228, 0.92, 980),
    ]
}
