use anyhow::{Context, Result};

use crate::config::Config;
use crate::db::{init_database, PgStore, Store};
use crate::models::{FeatureVector, ScoreGrid};
use crate::services::{self, AuditReport};
use crate::utils::probability_to_odds;

pub async fn init_db(config: &Config) -> Result<()> {
    let store = PgStore::connect(&config.db).await?;

    println!("🗄️  Initializing database {}...", config.db.name);
    init_database(&store).await?;
    println!("✅ Schema ready, sample data in place");

    Ok(())
}

pub async fn audit(config: &Config) -> Result<()> {
    let store = PgStore::connect(&config.db).await?;
    print_audit(&store).await?;
    Ok(())
}

pub async fn scoregrid(config: &Config, fixture_id: i32, max_goals: u8) -> Result<()> {
    let store = PgStore::connect(&config.db).await?;

    if print_scoregrid(&store, fixture_id, max_goals).await?.is_none() {
        println!("❌ Fixture {} not found", fixture_id);
    }
    Ok(())
}

pub async fn print_audit(store: &dyn Store) -> Result<AuditReport> {
    println!("🔎 Auditing predictions and fixtures...");
    let report = services::run_audit(store).await?;

    println!(
        "   Checked {} predictions across {} fixtures",
        report.predictions_checked, report.fixtures_checked
    );

    if report.is_clean() {
        println!("✅ No problems found");
    } else {
        println!("⚠️  {} problem(s):", report.findings.len());
        for finding in &report.findings {
            println!("   • {}", finding);
        }
    }

    Ok(report)
}

/// Prints the correct-score table for a fixture. `None` when the fixture does not exist.
pub async fn print_scoregrid(
    store: &dyn Store,
    fixture_id: i32,
    max_goals: u8,
) -> Result<Option<ScoreGrid>> {
    let Some(fixture) = store.fixture(fixture_id).await? else {
        return Ok(None);
    };

    let features = store
        .features(fixture_id)
        .await?
        .filter(|blob| !blob.is_null())
        .map(|blob| FeatureVector::from_blob(&blob))
        .unwrap_or_else(FeatureVector::fallback);
    let grid = services::score_grid(fixture_id, &features, max_goals)
        .with_context(|| format!("cannot build score grid for fixture {}", fixture_id))?;

    println!(
        "⚽ {} vs {} ({}, {})",
        fixture.home_team,
        fixture.away_team,
        fixture.league_name,
        fixture.date.format("%Y-%m-%d %H:%M")
    );
    println!("   λ home {:.2} | λ away {:.2}\n", grid.lambda_home, grid.lambda_away);

    let header: String = (0..=grid.max_goals).map(|a| format!("{:>7}", a)).collect();
    println!("   H\\A{}", header);
    for row in grid.cells.chunks(grid.max_goals as usize + 1) {
        let line: String = row.iter().map(|cell| format!("{:>6.1}%", cell.prob * 100.0)).collect();
        println!("   {:>3}{}", row[0].home, line);
    }

    println!();
    for (label, prob) in [("Home", grid.home_win), ("Draw", grid.draw), ("Away", grid.away_win)] {
        println!(
            "   {}: {:.1}% (fair odds {:.2})",
            label,
            prob * 100.0,
            probability_to_odds(prob)
        );
    }

    Ok(Some(grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn test_print_scoregrid_for_seeded_fixture() {
        let store = MemoryStore::new();
        init_database(&store).await.unwrap();

        let grid = print_scoregrid(&store, 1, 3).await.unwrap().unwrap();
        assert_eq!(grid.cells.len(), 16);
        assert_eq!(grid.lambda_home, FeatureVector::DEFAULT_LAMBDA_HOME);

        assert!(print_scoregrid(&store, 404, 3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_print_scoregrid_surfaces_bad_rates() {
        let store = MemoryStore::new();
        init_database(&store).await.unwrap();
        store
            .insert_features(2, serde_json::json!({"lambda_away": 0}))
            .await;

        let err = print_scoregrid(&store, 2, 4).await.unwrap_err();
        assert!(err.to_string().contains("fixture 2"));
    }

    #[tokio::test]
    async fn test_print_scoregrid_null_blob_uses_fallback() {
        let store = MemoryStore::new();
        init_database(&store).await.unwrap();
        store.insert_features(3, serde_json::Value::Null).await;

        let grid = print_scoregrid(&store, 3, 2).await.unwrap().unwrap();
        assert_eq!(grid.lambda_away, FeatureVector::DEFAULT_LAMBDA_AWAY);
    }

    #[tokio::test]
    async fn test_print_audit_counts_rows() {
        let store = MemoryStore::new();
        init_database(&store).await.unwrap();

        let report = print_audit(&store).await.unwrap();
        assert_eq!(report.predictions_checked, 21);
        assert_eq!(report.fixtures_checked, 6);
    }
}
