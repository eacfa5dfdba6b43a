pub mod memory;
pub mod seed;

pub use memory::MemoryStore;
pub use seed::{seed_data, SeedSet};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};
use std::time::Duration;

use crate::config::DbConfig;
use crate::models::*;

/// Read access to the fixture database plus the two writes startup needs.
///
/// Every method is one unit of work: implementations take whatever connection
/// or lock they need for the call and give it back before returning.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<bool>;
    async fn init_schema(&self) -> Result<()>;
    async fn league_count(&self) -> Result<i64>;
    async fn insert_seed(&self, seed: &SeedSet) -> Result<()>;

    async fn leagues(&self) -> Result<Vec<League>>;
    async fn seasons(&self, league_id: Option<i32>) -> Result<Vec<Season>>;
    async fn teams(&self, league_id: Option<i32>) -> Result<Vec<Team>>;
    async fn fixtures(&self, filter: &FixtureFilter) -> Result<Vec<Fixture>>;
    async fn fixture(&self, fixture_id: i32) -> Result<Option<Fixture>>;
    async fn predictions(&self, fixture_id: i32) -> Result<Vec<Prediction>>;
    async fn all_predictions(&self) -> Result<Vec<Prediction>>;
    async fn features(&self, fixture_id: i32) -> Result<Option<Value>>;
    async fn elo_history(&self, team_id: i32) -> Result<Vec<EloSnapshot>>;
    async fn calibrations(&self, league_id: i32) -> Result<Vec<Calibration>>;
}

/// Creates the schema if needed and seeds the sample data into an empty database.
pub async fn init_database(store: &dyn Store) -> Result<()> {
    store.init_schema().await.context("schema initialization failed")?;
    seed_data(store).await.context("sample data insertion failed")?;
    tracing::info!("Database initialized successfully");
    Ok(())
}

pub async fn create_pool(config: &DbConfig) -> Result<PgPool> {
    let options = config.connect_options()?;
    let pool = PgPoolOptions::new()
        .max_connections(config.pool_size.max(1))
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .with_context(|| format!("could not connect to Postgres at {}:{}", config.host, config.port))?;
    Ok(pool)
}

const SCHEMA: [&str; 8] = [
    r#"
    CREATE TABLE IF NOT EXISTS leagues (
        id SERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        sport VARCHAR(50) NOT NULL,
        country VARCHAR(100) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS seasons (
        id SERIAL PRIMARY KEY,
        league_id INTEGER REFERENCES leagues(id),
        year INTEGER NOT NULL,
        start_date DATE,
        end_date DATE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS teams (
        id SERIAL PRIMARY KEY,
        league_id INTEGER REFERENCES leagues(id),
        name VARCHAR(255) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS fixtures (
        id SERIAL PRIMARY KEY,
        league_id INTEGER REFERENCES leagues(id),
        season_id INTEGER REFERENCES seasons(id),
        date TIMESTAMP NOT NULL,
        home_id INTEGER REFERENCES teams(id),
        away_id INTEGER REFERENCES teams(id),
        status VARCHAR(50),
        goals_home INTEGER,
        goals_away INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS elo_snapshots (
        date DATE NOT NULL,
        league_id INTEGER REFERENCES leagues(id),
        team_id INTEGER REFERENCES teams(id),
        elo DECIMAL(10,2) NOT NULL,
        PRIMARY KEY (date, league_id, team_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS features (
        fixture_id INTEGER REFERENCES fixtures(id) PRIMARY KEY,
        data JSONB NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS predictions (
        fixture_id INTEGER REFERENCES fixtures(id),
        model_version VARCHAR(100) NOT NULL,
        market VARCHAR(50) NOT NULL,
        selection VARCHAR(50) NOT NULL,
        prob DECIMAL(5,4) NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (fixture_id, model_version, market, selection)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS calibration (
        league_id INTEGER REFERENCES leagues(id),
        market VARCHAR(50) NOT NULL,
        version VARCHAR(100) NOT NULL,
        mapping_blob JSONB NOT NULL,
        PRIMARY KEY (league_id, market, version)
    )
    "#,
];

pub const TABLES: [&str; 8] = [
    "leagues",
    "seasons",
    "teams",
    "fixtures",
    "elo_snapshots",
    "features",
    "predictions",
    "calibration",
];

// Columns are cast so DECIMAL comes back as float8 and TIMESTAMP as timestamptz (UTC).
const FIXTURE_SELECT: &str = r#"
    SELECT f.id, f.league_id, f.season_id, f.date AT TIME ZONE 'UTC' AS date,
           f.home_id, f.away_id, f.status, f.goals_home, f.goals_away,
           ht.name AS home_team,
           awt.name AS away_team,
           l.name AS league_name
    FROM fixtures f
    JOIN teams ht ON f.home_id = ht.id
    JOIN teams awt ON f.away_id = awt.id
    JOIN leagues l ON f.league_id = l.id
"#;

const PREDICTION_SELECT: &str = r#"
    SELECT fixture_id, model_version, market, selection, prob::float8 AS prob,
           created_at AT TIME ZONE 'UTC' AS created_at
    FROM predictions
"#;

/// Postgres-backed store on a bounded connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DbConfig) -> Result<Self> {
        Ok(Self::new(create_pool(config).await?))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        let ok: i32 = sqlx::query_scalar("SELECT 1 AS ok").fetch_one(&mut *conn).await?;
        Ok(ok == 1)
    }

    async fn init_schema(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        for statement in SCHEMA {
            sqlx::query(statement).execute(&mut *conn).await?;
        }
        tracing::info!("Schema ready ({} tables)", TABLES.len());
        Ok(())
    }

    async fn league_count(&self) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM leagues")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    async fn insert_seed(&self, seed: &SeedSet) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let mut league_ids = Vec::with_capacity(seed.leagues.len());
        for league in &seed.leagues {
            let id: i32 = sqlx::query_scalar(
                "INSERT INTO leagues (name, sport, country) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(league.name)
            .bind(league.sport)
            .bind(league.country)
            .fetch_one(&mut *tx)
            .await?;
            league_ids.push(id);
        }

        let mut season_ids = Vec::with_capacity(seed.seasons.len());
        for season in &seed.seasons {
            let id: i32 = sqlx::query_scalar(
                r#"INSERT INTO seasons (league_id, year, start_date, end_date)
                   VALUES ($1, $2, $3, $4) RETURNING id"#,
            )
            .bind(seed::resolve(&league_ids, season.league, "leagues")?)
            .bind(season.year)
            .bind(season.start_date)
            .bind(season.end_date)
            .fetch_one(&mut *tx)
            .await?;
            season_ids.push(id);
        }

        let mut team_ids = Vec::with_capacity(seed.teams.len());
        for team in &seed.teams {
            let id: i32 = sqlx::query_scalar(
                "INSERT INTO teams (league_id, name) VALUES ($1, $2) RETURNING id",
            )
            .bind(seed::resolve(&league_ids, team.league, "leagues")?)
            .bind(team.name)
            .fetch_one(&mut *tx)
            .await?;
            team_ids.push(id);
        }

        let mut fixture_ids = Vec::with_capacity(seed.fixtures.len());
        for fixture in &seed.fixtures {
            let id: i32 = sqlx::query_scalar(
                r#"INSERT INTO fixtures (league_id, season_id, date, home_id, away_id, status)
                   VALUES ($1, $2, $3, $4, $5, $6) RETURNING id"#,
            )
            .bind(seed::resolve(&league_ids, fixture.league, "leagues")?)
            .bind(seed::resolve(&season_ids, fixture.season, "seasons")?)
            .bind(fixture.date)
            .bind(seed::resolve(&team_ids, fixture.home, "teams")?)
            .bind(seed::resolve(&team_ids, fixture.away, "teams")?)
            .bind(fixture.status)
            .fetch_one(&mut *tx)
            .await?;
            fixture_ids.push(id);
        }

        for prediction in &seed.predictions {
            sqlx::query(
                r#"INSERT INTO predictions (fixture_id, model_version, market, selection, prob)
                   VALUES ($1, $2, $3, $4, CAST($5 AS DECIMAL(5,4)))"#,
            )
            .bind(seed::resolve(&fixture_ids, prediction.fixture, "fixtures")?)
            .bind(prediction.model_version)
            .bind(prediction.market)
            .bind(prediction.selection)
            .bind(prediction.prob)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn leagues(&self) -> Result<Vec<League>> {
        let mut conn = self.pool.acquire().await?;
        let leagues = sqlx::query_as::<_, League>(
            "SELECT id, name, sport, country FROM leagues ORDER BY name",
        )
        .fetch_all(&mut *conn)
        .await?;
        Ok(leagues)
    }

    async fn seasons(&self, league_id: Option<i32>) -> Result<Vec<Season>> {
        let mut conn = self.pool.acquire().await?;
        let seasons = sqlx::query_as::<_, Season>(
            r#"SELECT id, league_id, year, start_date, end_date FROM seasons
               WHERE ($1::int IS NULL OR league_id = $1)
               ORDER BY league_id, year, id"#,
        )
        .bind(league_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(seasons)
    }

    async fn teams(&self, league_id: Option<i32>) -> Result<Vec<Team>> {
        let mut conn = self.pool.acquire().await?;
        let teams = sqlx::query_as::<_, Team>(
            r#"SELECT id, league_id, name FROM teams
               WHERE ($1::int IS NULL OR league_id = $1)
               ORDER BY league_id, name, id"#,
        )
        .bind(league_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(teams)
    }

    async fn fixtures(&self, filter: &FixtureFilter) -> Result<Vec<Fixture>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(FIXTURE_SELECT);
        query.push(" WHERE 1=1");

        if let Some(league_id) = filter.league_id {
            query.push(" AND f.league_id = ").push_bind(league_id);
        }
        if let Some(from) = filter.from {
            query.push(" AND f.date >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            query.push(" AND f.date <= ").push_bind(to);
        }
        query.push(" ORDER BY f.date, f.id");

        let mut conn = self.pool.acquire().await?;
        let fixtures = query
            .build_query_as::<Fixture>()
            .fetch_all(&mut *conn)
            .await?;
        Ok(fixtures)
    }

    async fn fixture(&self, fixture_id: i32) -> Result<Option<Fixture>> {
        let mut conn = self.pool.acquire().await?;
        let fixture = sqlx::query_as::<_, Fixture>(&format!("{} WHERE f.id = $1", FIXTURE_SELECT))
            .bind(fixture_id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(fixture)
    }

    async fn predictions(&self, fixture_id: i32) -> Result<Vec<Prediction>> {
        let mut conn = self.pool.acquire().await?;
        let predictions = sqlx::query_as::<_, Prediction>(&format!(
            "{} WHERE fixture_id = $1 ORDER BY market, selection",
            PREDICTION_SELECT
        ))
        .bind(fixture_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(predictions)
    }

    async fn all_predictions(&self) -> Result<Vec<Prediction>> {
        let mut conn = self.pool.acquire().await?;
        let predictions = sqlx::query_as::<_, Prediction>(&format!(
            "{} ORDER BY fixture_id, model_version, market, selection",
            PREDICTION_SELECT
        ))
        .fetch_all(&mut *conn)
        .await?;
        Ok(predictions)
    }

    async fn features(&self, fixture_id: i32) -> Result<Option<Value>> {
        let mut conn = self.pool.acquire().await?;
        let data: Option<Value> =
            sqlx::query_scalar("SELECT data FROM features WHERE fixture_id = $1")
                .bind(fixture_id)
                .fetch_optional(&mut *conn)
                .await?;
        Ok(data)
    }

    async fn elo_history(&self, team_id: i32) -> Result<Vec<EloSnapshot>> {
        let mut conn = self.pool.acquire().await?;
        let history = sqlx::query_as::<_, EloSnapshot>(
            r#"SELECT date, league_id, team_id, elo::float8 AS elo
               FROM elo_snapshots WHERE team_id = $1 ORDER BY date ASC"#,
        )
        .bind(team_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(history)
    }

    async fn calibrations(&self, league_id: i32) -> Result<Vec<Calibration>> {
        let mut conn = self.pool.acquire().await?;
        let calibrations = sqlx::query_as::<_, Calibration>(
            r#"SELECT league_id, market, version, mapping_blob
               FROM calibration WHERE league_id = $1 ORDER BY market, version"#,
        )
        .bind(league_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(calibrations)
    }
}
