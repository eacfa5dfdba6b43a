use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct League {
    pub id: i32,
    pub name: String,
    pub sport: String, // "football" or "basketball"
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Season {
    pub id: i32,
    pub league_id: Option<i32>,
    pub year: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Season {
    /// True when `date` falls inside the season, treating a missing bound as open.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date.map_or(true, |start| date >= start)
            && self.end_date.map_or(true, |end| date <= end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub id: i32,
    pub league_id: Option<i32>,
    pub name: String,
}

/// A fixture joined with its teams and league, the shape every fixture endpoint serves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Fixture {
    pub id: i32,
    pub league_id: i32,
    pub season_id: Option<i32>,
    pub date: DateTime<Utc>,
    pub home_id: i32,
    pub away_id: i32,
    pub status: Option<String>, // "scheduled", "live", "finished"
    pub goals_home: Option<i32>,
    pub goals_away: Option<i32>,
    pub home_team: String,
    pub away_team: String,
    pub league_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureFilter {
    pub league_id: Option<i32>,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl FixtureFilter {
    pub fn matches(&self, fixture: &Fixture) -> bool {
        let date = fixture.date.naive_utc();
        self.league_id.map_or(true, |id| fixture.league_id == id)
            && self.from.map_or(true, |from| date >= from)
            && self.to.map_or(true, |to| date <= to)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct EloSnapshot {
    pub date: NaiveDate,
    pub league_id: i32,
    pub team_id: i32,
    pub elo: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Prediction {
    pub fixture_id: i32,
    pub model_version: String,
    pub market: String,     // "1X2", "Over/Under 2.5", "BTTS", "Spread"
    pub selection: String,  // "1", "X", "2", "Over", "Yes", ...
    pub prob: f64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Calibration {
    pub league_id: i32,
    pub market: String,
    pub version: String,
    pub mapping_blob: Value,
}

/// Typed view over a fixture's free-form feature blob.
///
/// Only the fields the backend consumes are named; unknown keys are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(default)]
    pub lambda_home: Option<f64>,
    #[serde(default)]
    pub lambda_away: Option<f64>,
    #[serde(default)]
    pub home_elo: Option<f64>,
    #[serde(default)]
    pub away_elo: Option<f64>,
    #[serde(default)]
    pub home_form: Option<f64>,
    #[serde(default)]
    pub away_form: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl FeatureVector {
    pub const DEFAULT_LAMBDA_HOME: f64 = 1.45;
    pub const DEFAULT_LAMBDA_AWAY: f64 = 1.12;

    /// Vector served for fixtures that have no stored feature row.
    pub fn fallback() -> Self {
        Self {
            lambda_home: Some(Self::DEFAULT_LAMBDA_HOME),
            lambda_away: Some(Self::DEFAULT_LAMBDA_AWAY),
            home_elo: Some(1500.0),
            away_elo: Some(1480.0),
            home_form: Some(2.1),
            away_form: Some(1.8),
            extra: serde_json::Map::new(),
        }
    }

    /// Reads the named fields out of a stored blob. Values of the wrong type
    /// are treated as absent rather than failing the whole blob.
    pub fn from_blob(blob: &Value) -> Self {
        let number = |key: &str| blob.get(key).and_then(Value::as_f64);
        let extra = blob
            .as_object()
            .map(|map| {
                map.iter()
                    .filter(|(key, _)| !Self::is_named(key))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            lambda_home: number("lambda_home"),
            lambda_away: number("lambda_away"),
            home_elo: number("home_elo"),
            away_elo: number("away_elo"),
            home_form: number("home_form"),
            away_form: number("away_form"),
            extra,
        }
    }

    pub fn scoring_rates(&self) -> (f64, f64) {
        (
            self.lambda_home.unwrap_or(Self::DEFAULT_LAMBDA_HOME),
            self.lambda_away.unwrap_or(Self::DEFAULT_LAMBDA_AWAY),
        )
    }

    fn is_named(key: &str) -> bool {
        matches!(
            key,
            "lambda_home" | "lambda_away" | "home_elo" | "away_elo" | "home_form" | "away_form"
        )
    }
}

/// Default feature JSON, with Elo ratings rendered as integers the way clients expect.
pub fn default_features() -> Value {
    serde_json::json!({
        "lambda_home": 1.45,
        "lambda_away": 1.12,
        "home_elo": 1500,
        "away_elo": 1480,
        "home_form": 2.1,
        "away_form": 1.8
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestMetric {
    pub league_id: i32,
    pub league_name: String,
    pub market: String,
    pub log_loss: f64,
    pub brier_score: f64,
    pub calibration_slope: f64,
    pub sample_count: u32,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCell {
    pub home: u8,
    pub away: u8,
    pub prob: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreGrid {
    pub fixture_id: i32,
    pub lambda_home: f64,
    pub lambda_away: f64,
    pub max_goals: u8,
    pub cells: Vec<ScoreCell>,
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

// API Response types
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn up(db: bool) -> Self {
        Self {
            ok: true,
            db: Some(db),
            error: None,
        }
    }

    pub fn down(message: String) -> Self {
        Self {
            ok: false,
            db: None,
            error: Some(message),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionAck {
    pub message: String,
}
