use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::db::Store;

pub struct SeedLeague {
    pub name: &'static str,
    pub sport: &'static str,
    pub country: &'static str,
}

/// Seasons, teams and fixtures point at their parents by position in the
/// enclosing [`SeedSet`] vectors; the store maps positions to assigned ids.
pub struct SeedSeason {
    pub league: usize,
    pub year: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub struct SeedTeam {
    pub league: usize,
    pub name: &'static str,
}

pub struct SeedFixture {
    pub league: usize,
    pub season: usize,
    pub date: NaiveDateTime,
    pub home: usize,
    pub away: usize,
    pub status: &'static str,
}

pub struct SeedPrediction {
    pub fixture: usize,
    pub model_version: &'static str,
    pub market: &'static str,
    pub selection: &'static str,
    pub prob: f64,
}

pub struct SeedSet {
    pub leagues: Vec<SeedLeague>,
    pub seasons: Vec<SeedSeason>,
    pub teams: Vec<SeedTeam>,
    pub fixtures: Vec<SeedFixture>,
    pub predictions: Vec<SeedPrediction>,
}

/// Looks up the id a store assigned to the `position`-th seeded row of `table`.
pub(crate) fn resolve(ids: &[i32], position: usize, table: &str) -> Result<i32> {
    ids.get(position)
        .copied()
        .with_context(|| format!("seed row references missing {} #{}", table, position))
}

pub async fn seed_data(store: &dyn Store) -> Result<()> {
    let count = store.league_count().await?;

    if count > 0 {
        tracing::info!("Database already seeded ({} leagues found), skipping.", count);
        return Ok(());
    }

    tracing::info!("Seeding database with sample leagues, fixtures and predictions...");
    let seed = sample(Utc::now());
    store.insert_seed(&seed).await?;

    tracing::info!(
        "Database seeded: {} leagues, {} teams, {} fixtures, {} predictions.",
        seed.leagues.len(),
        seed.teams.len(),
        seed.fixtures.len(),
        seed.predictions.len()
    );
    Ok(())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

/// The fixed sample dataset. Fixtures are dated one to three days after `now`.
pub fn sample(now: DateTime<Utc>) -> SeedSet {
    let leagues = vec![
        SeedLeague { name: "Premier League", sport: "football",   country: "England" },
        SeedLeague { name: "Bundesliga",     sport: "football",   country: "Germany" },
        SeedLeague { name: "La Liga",        sport: "football",   country: "Spain" },
        SeedLeague { name: "NBA",            sport: "basketball", country: "USA" },
    ];

    let seasons = vec![
        SeedSeason { league: 0, year: 2024, start_date: date(2024, 8, 17), end_date: date(2025, 5, 25) },
        SeedSeason { league: 1, year: 2024, start_date: date(2024, 8, 23), end_date: date(2025, 5, 17) },
        SeedSeason { league: 2, year: 2024, start_date: date(2024, 8, 18), end_date: date(2025, 5, 25) },
        SeedSeason { league: 3, year: 2024, start_date: date(2024, 10, 15), end_date: date(2025, 4, 14) },
    ];

    let team_names: [(usize, [&'static str; 4]); 4] = [
        (0, ["Manchester City", "Arsenal", "Liverpool", "Chelsea"]),
        (1, ["Bayern Munich", "Borussia Dortmund", "RB Leipzig", "Bayer Leverkusen"]),
        (2, ["Real Madrid", "Barcelona", "Atletico Madrid", "Sevilla"]),
        (3, ["Los Angeles Lakers", "Boston Celtics", "Golden State Warriors", "Miami Heat"]),
    ];
    let teams = team_names
        .iter()
        .flat_map(|(league, names)| names.iter().map(move |&name| SeedTeam { league: *league, name }))
        .collect();

    let in_days = |days: i64| (now + Duration::days(days)).naive_utc();

    // (league, season, days ahead, home team, away team)
    let fixture_rows: [(usize, usize, i64, usize, usize); 6] = [
        (0, 0, 1, 0, 1),
        (0, 0, 2, 2, 3),
        (1, 1, 2, 4, 5),
        (1, 1, 3, 6, 7),
        (2, 2, 3, 8, 9),
        (3, 3, 1, 12, 13),
    ];
    let fixtures = fixture_rows
        .iter()
        .map(|&(league, season, days, home, away)| SeedFixture {
            league,
            season,
            date: in_days(days),
            home,
            away,
            status: "scheduled",
        })
        .collect();

    // (fixture, market, selection, prob)
    let prediction_rows: [(usize, &'static str, &'static str, f64); 21] = [
        (0, "1X2", "1", 0.45), (0, "1X2", "X", 0.28), (0, "1X2", "2", 0.27),
        (0, "Over/Under 2.5", "Over", 0.62), (0, "Over/Under 2.5", "Under", 0.38),
        (0, "BTTS", "Yes", 0.58), (0, "BTTS", "No", 0.42),
        (1, "1X2", "1", 0.38), (1, "1X2", "X", 0.31), (1, "1X2", "2", 0.31),
        (2, "1X2", "1", 0.52), (2, "1X2", "X", 0.26), (2, "1X2", "2", 0.22),
        (3, "1X2", "1", 0.41), (3, "1X2", "X", 0.29), (3, "1X2", "2", 0.30),
        (4, "1X2", "1", 0.48), (4, "1X2", "X", 0.27), (4, "1X2", "2", 0.25),
        (5, "Spread", "Home +5.5", 0.51), (5, "Spread", "Away -5.5", 0.49),
    ];
    let predictions = prediction_rows
        .iter()
        .map(|&(fixture, market, selection, prob)| SeedPrediction {
            fixture,
            model_version: "v1.0",
            market,
            selection,
            prob,
        })
        .collect();

    SeedSet {
        leagues,
        seasons,
        teams,
        fixtures,
        predictions,
    }
}
