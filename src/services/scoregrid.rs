use statrs::distribution::{Discrete, Poisson};

use crate::models::{FeatureVector, ScoreCell, ScoreGrid};

pub const DEFAULT_MAX_GOALS: u8 = 4;
pub const MAX_GOALS_LIMIT: u8 = 10;

/// Goals per side summed over when computing the match-outcome probabilities.
const OUTCOME_GOALS: u8 = 10;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ScoreGridError {
    #[error("{side} scoring rate must be a positive number, got {rate}")]
    InvalidRate { side: &'static str, rate: f64 },
    #[error("maxGoals must be at most 10, got {0}")]
    TooManyGoals(u8),
}

fn distribution(side: &'static str, rate: f64) -> Result<Poisson, ScoreGridError> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(ScoreGridError::InvalidRate { side, rate });
    }
    Poisson::new(rate).map_err(|_| ScoreGridError::InvalidRate { side, rate })
}

fn pmf_row(dist: &Poisson, max_goals: u8) -> Vec<f64> {
    (0..=max_goals as u64).map(|goals| dist.pmf(goals)).collect()
}

/// Correct-score probabilities for a fixture under independent Poisson scoring,
/// `P(h, a) = Pois(h; λ_home) · Pois(a; λ_away)`.
pub fn score_grid(
    fixture_id: i32,
    features: &FeatureVector,
    max_goals: u8,
) -> Result<ScoreGrid, ScoreGridError> {
    if max_goals > MAX_GOALS_LIMIT {
        return Err(ScoreGridError::TooManyGoals(max_goals));
    }

    let (lambda_home, lambda_away) = features.scoring_rates();
    let home = pmf_row(&distribution("home", lambda_home)?, OUTCOME_GOALS);
    let away = pmf_row(&distribution("away", lambda_away)?, OUTCOME_GOALS);

    let mut cells = Vec::with_capacity((max_goals as usize + 1).pow(2));
    for h in 0..=max_goals {
        for a in 0..=max_goals {
            cells.push(ScoreCell {
                home: h,
                away: a,
                prob: home[h as usize] * away[a as usize],
            });
        }
    }

    let (mut home_win, mut draw, mut away_win) = (0.0, 0.0, 0.0);
    for (h, p_home) in home.iter().enumerate() {
        for (a, p_away) in away.iter().enumerate() {
            let p = p_home * p_away;
            match h.cmp(&a) {
                std::cmp::Ordering::Greater => home_win += p,
                std::cmp::Ordering::Equal => draw += p,
                std::cmp::Ordering::Less => away_win += p,
            }
        }
    }

    Ok(ScoreGrid {
        fixture_id,
        lambda_home,
        lambda_away,
        max_goals,
        cells,
        home_win,
        draw,
        away_win,
    })
}
