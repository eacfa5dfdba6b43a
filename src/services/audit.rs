use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::db::Store;
use crate::models::{Fixture, FixtureFilter, Prediction, Season, Team};

/// Allowed distance of a market's summed probabilities from 1.
pub const SUM_TOLERANCE: f64 = 0.005;

/// A data-integrity rule the schema does not enforce, found broken.
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    MarketSum {
        fixture_id: i32,
        model_version: String,
        market: String,
        total: f64,
    },
    TeamOutsideLeague {
        fixture_id: i32,
        team_id: i32,
        team_league: Option<i32>,
        fixture_league: i32,
    },
    OutsideSeason {
        fixture_id: i32,
        season_id: i32,
        date: DateTime<Utc>,
    },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::MarketSum { fixture_id, model_version, market, total } => write!(
                f,
                "fixture {}: {} {} probabilities sum to {:.4}",
                fixture_id, model_version, market, total
            ),
            Finding::TeamOutsideLeague { fixture_id, team_id, team_league, fixture_league } => write!(
                f,
                "fixture {}: team {} belongs to league {} but the fixture is in league {}",
                fixture_id,
                team_id,
                team_league.map_or("none".to_string(), |id| id.to_string()),
                fixture_league
            ),
            Finding::OutsideSeason { fixture_id, season_id, date } => write!(
                f,
                "fixture {}: dated {} outside season {}",
                fixture_id,
                date.format("%Y-%m-%d"),
                season_id
            ),
        }
    }
}

#[derive(Debug, Default)]
pub struct AuditReport {
    pub predictions_checked: usize,
    pub fixtures_checked: usize,
    pub findings: Vec<Finding>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

pub fn check_market_sums(predictions: &[Prediction], tolerance: f64) -> Vec<Finding> {
    let mut totals: BTreeMap<(i32, &str, &str), f64> = BTreeMap::new();
    for p in predictions {
        *totals
            .entry((p.fixture_id, p.model_version.as_str(), p.market.as_str()))
            .or_default() += p.prob;
    }

    totals
        .into_iter()
        .filter(|(_, total)| (total - 1.0).abs() > tolerance)
        .map(|((fixture_id, model_version, market), total)| Finding::MarketSum {
            fixture_id,
            model_version: model_version.to_string(),
            market: market.to_string(),
            total,
        })
        .collect()
}

pub fn check_fixtures(fixtures: &[Fixture], teams: &[Team], seasons: &[Season]) -> Vec<Finding> {
    let team_leagues: HashMap<i32, Option<i32>> = teams.iter().map(|t| (t.id, t.league_id)).collect();
    let seasons: HashMap<i32, &Season> = seasons.iter().map(|s| (s.id, s)).collect();

    let mut findings = Vec::new();
    for fixture in fixtures {
        for team_id in [fixture.home_id, fixture.away_id] {
            let team_league = team_leagues.get(&team_id).copied().flatten();
            if team_league != Some(fixture.league_id) {
                findings.push(Finding::TeamOutsideLeague {
                    fixture_id: fixture.id,
                    team_id,
                    team_league,
                    fixture_league: fixture.league_id,
                });
            }
        }

        let season = fixture.season_id.and_then(|id| seasons.get(&id));
        if let Some(season) = season {
            if !season.contains(fixture.date.date_naive()) {
                findings.push(Finding::OutsideSeason {
                    fixture_id: fixture.id,
                    season_id: season.id,
                    date: fixture.date,
                });
            }
        }
    }
    findings
}

/// Checks the advisory invariants across the whole database. Never modifies data.
pub async fn run_audit(store: &dyn Store) -> Result<AuditReport> {
    let predictions = store.all_predictions().await?;
    let fixtures = store.fixtures(&FixtureFilter::default()).await?;
    let teams = store.teams(None).await?;
    let seasons = store.seasons(None).await?;

    let mut findings = check_market_sums(&predictions, SUM_TOLERANCE);
    findings.extend(check_fixtures(&fixtures, &teams, &seasons));

    tracing::info!(
        "Audit checked {} predictions and {} fixtures, {} findings",
        predictions.len(),
        fixtures.len(),
        findings.len()
    );

    Ok(AuditReport {
        predictions_checked: predictions.len(),
        fixtures_checked: fixtures.len(),
        findings,
    })
}
