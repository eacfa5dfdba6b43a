use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::db::seed::{self, SeedSet};
use crate::db::Store;
use crate::models::*;

#[derive(Clone)]
struct FixtureRow {
    id: i32,
    league_id: i32,
    season_id: Option<i32>,
    date: chrono::NaiveDateTime,
    home_id: i32,
    away_id: i32,
    status: Option<String>,
    goals_home: Option<i32>,
    goals_away: Option<i32>,
}

#[derive(Clone, Default)]
struct Tables {
    leagues: Vec<League>,
    seasons: Vec<Season>,
    teams: Vec<Team>,
    fixtures: Vec<FixtureRow>,
    elo_snapshots: Vec<EloSnapshot>,
    features: BTreeMap<i32, Value>,
    predictions: Vec<Prediction>,
    calibration: Vec<Calibration>,
}

impl Tables {
    fn next_id(len: usize) -> i32 {
        len as i32 + 1
    }

    /// Inner join of a fixture with its teams and league; `None` when any side is missing.
    fn join(&self, row: &FixtureRow) -> Option<Fixture> {
        let team_name = |id: i32| self.teams.iter().find(|t| t.id == id).map(|t| t.name.clone());
        let league = self.leagues.iter().find(|l| l.id == row.league_id)?;

        Some(Fixture {
            id: row.id,
            league_id: row.league_id,
            season_id: row.season_id,
            date: row.date.and_utc(),
            home_id: row.home_id,
            away_id: row.away_id,
            status: row.status.clone(),
            goals_home: row.goals_home,
            goals_away: row.goals_away,
            home_team: team_name(row.home_id)?,
            away_team: team_name(row.away_id)?,
            league_name: league.name.clone(),
        })
    }
}

/// Process-local store with the same ordering and join semantics as [`PgStore`](crate::db::PgStore).
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl MemoryStore {
    pub async fn insert_features(&self, fixture_id: i32, data: Value) {
        self.tables.write().await.features.insert(fixture_id, data);
    }

    pub async fn insert_prediction(&self, prediction: Prediction) {
        self.tables.write().await.predictions.push(prediction);
    }

    pub async fn insert_elo_snapshot(&self, snapshot: EloSnapshot) {
        self.tables.write().await.elo_snapshots.push(snapshot);
    }

    pub async fn insert_calibration(&self, calibration: Calibration) {
        self.tables.write().await.calibration.push(calibration);
    }

    pub async fn move_fixture(&self, fixture_id: i32, home_id: i32, date: chrono::NaiveDateTime) {
        let mut tables = self.tables.write().await;
        if let Some(row) = tables.fixtures.iter_mut().find(|f| f.id == fixture_id) {
            row.home_id = home_id;
            row.date = date;
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<bool> {
        Ok(true)
    }

    async fn init_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn league_count(&self) -> Result<i64> {
        Ok(self.tables.read().await.leagues.len() as i64)
    }

    async fn insert_seed(&self, seed: &SeedSet) -> Result<()> {
        let mut tables = self.tables.write().await;
        // All-or-nothing, like the Postgres transaction.
        let mut staged = tables.clone();
        apply_seed(&mut staged, seed)?;
        *tables = staged;
        Ok(())
    }

    async fn leagues(&self) -> Result<Vec<League>> {
        let mut leagues = self.tables.read().await.leagues.clone();
        leagues.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(leagues)
    }

    async fn seasons(&self, league_id: Option<i32>) -> Result<Vec<Season>> {
        let tables = self.tables.read().await;
        let mut seasons: Vec<Season> = tables
            .seasons
            .iter()
            .filter(|s| league_id.map_or(true, |id| s.league_id == Some(id)))
            .cloned()
            .collect();
        seasons.sort_by_key(|s| (s.league_id.is_none(), s.league_id, s.year, s.id));
        Ok(seasons)
    }

    async fn teams(&self, league_id: Option<i32>) -> Result<Vec<Team>> {
        let tables = self.tables.read().await;
        let mut teams: Vec<Team> = tables
            .teams
            .iter()
            .filter(|t| league_id.map_or(true, |id| t.league_id == Some(id)))
            .cloned()
            .collect();
        teams.sort_by(|a, b| {
            (a.league_id.is_none(), a.league_id, &a.name, a.id)
                .cmp(&(b.league_id.is_none(), b.league_id, &b.name, b.id))
        });
        Ok(teams)
    }

    async fn fixtures(&self, filter: &FixtureFilter) -> Result<Vec<Fixture>> {
        let tables = self.tables.read().await;
        let mut fixtures: Vec<Fixture> = tables
            .fixtures
            .iter()
            .filter_map(|row| tables.join(row))
            .filter(|fixture| filter.matches(fixture))
            .collect();
        fixtures.sort_by_key(|f| (f.date, f.id));
        Ok(fixtures)
    }

    async fn fixture(&self, fixture_id: i32) -> Result<Option<Fixture>> {
        let tables = self.tables.read().await;
        Ok(tables
            .fixtures
            .iter()
            .find(|row| row.id == fixture_id)
            .and_then(|row| tables.join(row)))
    }

    async fn predictions(&self, fixture_id: i32) -> Result<Vec<Prediction>> {
        let tables = self.tables.read().await;
        let mut predictions: Vec<Prediction> = tables
            .predictions
            .iter()
            .filter(|p| p.fixture_id == fixture_id)
            .cloned()
            .collect();
        predictions.sort_by(|a, b| (&a.market, &a.selection).cmp(&(&b.market, &b.selection)));
        Ok(predictions)
    }

    async fn all_predictions(&self) -> Result<Vec<Prediction>> {
        let mut predictions = self.tables.read().await.predictions.clone();
        predictions.sort_by(|a, b| {
            (a.fixture_id, &a.model_version, &a.market, &a.selection)
                .cmp(&(b.fixture_id, &b.model_version, &b.market, &b.selection))
        });
        Ok(predictions)
    }

    async fn features(&self, fixture_id: i32) -> Result<Option<Value>> {
        Ok(self.tables.read().await.features.get(&fixture_id).cloned())
    }

    async fn elo_history(&self, team_id: i32) -> Result<Vec<EloSnapshot>> {
        let tables = self.tables.read().await;
        let mut history: Vec<EloSnapshot> = tables
            .elo_snapshots
            .iter()
            .filter(|s| s.team_id == team_id)
            .cloned()
            .collect();
        history.sort_by_key(|s| s.date);
        Ok(history)
    }

    async fn calibrations(&self, league_id: i32) -> Result<Vec<Calibration>> {
        let tables = self.tables.read().await;
        let mut calibrations: Vec<Calibration> = tables
            .calibration
            .iter()
            .filter(|c| c.league_id == league_id)
            .cloned()
            .collect();
        calibrations.sort_by(|a, b| (&a.market, &a.version).cmp(&(&b.market, &b.version)));
        Ok(calibrations)
    }
}

fn apply_seed(tables: &mut Tables, seed: &SeedSet) -> Result<()> {
    let mut league_ids = Vec::with_capacity(seed.leagues.len());
    for league in &seed.leagues {
        let id = Tables::next_id(tables.leagues.len());
        tables.leagues.push(League {
            id,
            name: league.name.to_string(),
            sport: league.sport.to_string(),
            country: league.country.to_string(),
        });
        league_ids.push(id);
    }

    let mut season_ids = Vec::with_capacity(seed.seasons.len());
    for season in &seed.seasons {
        let id = Tables::next_id(tables.seasons.len());
        tables.seasons.push(Season {
            id,
            league_id: Some(seed::resolve(&league_ids, season.league, "leagues")?),
            year: season.year,
            start_date: Some(season.start_date),
            end_date: Some(season.end_date),
        });
        season_ids.push(id);
    }

    let mut team_ids = Vec::with_capacity(seed.teams.len());
    for team in &seed.teams {
        let id = Tables::next_id(tables.teams.len());
        tables.teams.push(Team {
            id,
            league_id: Some(seed::resolve(&league_ids, team.league, "leagues")?),
            name: team.name.to_string(),
        });
        team_ids.push(id);
    }

    let mut fixture_ids = Vec::with_capacity(seed.fixtures.len());
    for fixture in &seed.fixtures {
        let id = Tables::next_id(tables.fixtures.len());
        tables.fixtures.push(FixtureRow {
            id,
            league_id: seed::resolve(&league_ids, fixture.league, "leagues")?,
            season_id: Some(seed::resolve(&season_ids, fixture.season, "seasons")?),
            date: fixture.date,
            home_id: seed::resolve(&team_ids, fixture.home, "teams")?,
            away_id: seed::resolve(&team_ids, fixture.away, "teams")?,
            status: Some(fixture.status.to_string()),
            goals_home: None,
            goals_away: None,
        });
        fixture_ids.push(id);
    }

    let created_at = Utc::now();
    for prediction in &seed.predictions {
        let fixture_id = seed::resolve(&fixture_ids, prediction.fixture, "fixtures")?;
        let duplicate = tables.predictions.iter().any(|p| {
            p.fixture_id == fixture_id
                && p.model_version == prediction.model_version
                && p.market == prediction.market
                && p.selection == prediction.selection
        });
        if duplicate {
            anyhow::bail!(
                "duplicate prediction key ({}, {}, {}, {})",
                fixture_id,
                prediction.model_version,
                prediction.market,
                prediction.selection
            );
        }
        tables.predictions.push(Prediction {
            fixture_id,
            model_version: prediction.model_version.to_string(),
            market: prediction.market.to_string(),
            selection: prediction.selection.to_string(),
            prob: prediction.prob,
            created_at: Some(created_at),
        });
    }

    Ok(())
}
