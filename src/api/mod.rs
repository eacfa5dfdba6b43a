use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Store;
use crate::error::{ApiError, ApiResult};
use crate::models::*;
use crate::services::{self, ScoreGridError};
use crate::utils::parse_date_bound;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

pub async fn serve(port: u16, store: Arc<dyn Store>) -> anyhow::Result<()> {
    let app = create_router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("fixturedesk API server listening on port {}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/leagues", get(get_leagues_handler))
        .route("/api/leagues/{league_id}/teams", get(get_league_teams_handler))
        .route("/api/leagues/{league_id}/seasons", get(get_league_seasons_handler))
        .route("/api/fixtures", get(get_fixtures_handler))
        .route("/api/fixtures/{fixture_id}", get(get_fixture_handler))
        .route("/api/fixtures/{fixture_id}/scoregrid", get(get_scoregrid_handler))
        .route("/api/predictions/{fixture_id}", get(get_predictions_handler))
        .route("/api/features/{fixture_id}", get(get_features_handler))
        .route("/api/teams/{team_id}/elo", get(get_elo_history_handler))
        .route("/api/calibration/{league_id}", get(get_calibration_handler))
        .route("/api/backtest/metrics", get(get_backtest_metrics_handler))
        .route("/api/admin/retrain", post(|| admin_ack(AdminAction::Retrain)))
        .route("/api/admin/recalibrate", post(|| admin_ack(AdminAction::Recalibrate)))
        .route("/api/admin/sync", post(|| admin_ack(AdminAction::Sync)))
        .route("/api/admin/rebuild-features", post(|| admin_ack(AdminAction::RebuildFeatures)))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn parse_id(raw: &str, what: &str) -> ApiResult<i32> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {}: {:?}", what, raw)))
}

// Query strings treat an empty value the same as a missing one.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// GET /api/health - Database connectivity check
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    match state.store.ping().await {
        Ok(db) => (StatusCode::OK, Json(HealthStatus::up(db))),
        Err(e) => {
            tracing::error!("Health check failed: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(HealthStatus::down(e.to_string())))
        }
    }
}

// GET /api/leagues - All leagues ordered by name
async fn get_leagues_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<League>>> {
    Ok(Json(state.store.leagues().await?))
}

// GET /api/leagues/{league_id}/teams
async fn get_league_teams_handler(
    State(state): State<AppState>,
    Path(league_id): Path<String>,
) -> ApiResult<Json<Vec<Team>>> {
    let league_id = parse_id(&league_id, "league id")?;
    Ok(Json(state.store.teams(Some(league_id)).await?))
}

// GET /api/leagues/{league_id}/seasons
async fn get_league_seasons_handler(
    State(state): State<AppState>,
    Path(league_id): Path<String>,
) -> ApiResult<Json<Vec<Season>>> {
    let league_id = parse_id(&league_id, "league id")?;
    Ok(Json(state.store.seasons(Some(league_id)).await?))
}

// GET /api/fixtures?leagueId&from&to - Joined fixtures, earliest first
#[derive(Debug, Default, Deserialize)]
struct FixturesQuery {
    #[serde(rename = "leagueId")]
    league_id: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

impl FixturesQuery {
    fn into_filter(self) -> ApiResult<FixtureFilter> {
        let bound = |value: Option<String>, name: &str| -> ApiResult<_> {
            non_empty(value)
                .map(|v| {
                    parse_date_bound(&v)
                        .ok_or_else(|| ApiError::BadRequest(format!("Invalid {} date: {:?}", name, v)))
                })
                .transpose()
        };

        Ok(FixtureFilter {
            league_id: non_empty(self.league_id)
                .map(|v| parse_id(&v, "leagueId"))
                .transpose()?,
            from: bound(self.from, "from")?,
            to: bound(self.to, "to")?,
        })
    }
}

async fn get_fixtures_handler(
    State(state): State<AppState>,
    Query(params): Query<FixturesQuery>,
) -> ApiResult<Json<Vec<Fixture>>> {
    let filter = params.into_filter()?;
    Ok(Json(state.store.fixtures(&filter).await?))
}

// GET /api/fixtures/{fixture_id}
async fn get_fixture_handler(
    State(state): State<AppState>,
    Path(fixture_id): Path<String>,
) -> ApiResult<Json<Fixture>> {
    let fixture_id = parse_id(&fixture_id, "fixture id")?;
    state
        .store
        .fixture(fixture_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Fixture not found"))
}

// GET /api/fixtures/{fixture_id}/scoregrid?maxGoals - Poisson correct-score grid
#[derive(Debug, Default, Deserialize)]
struct ScoreGridQuery {
    #[serde(rename = "maxGoals")]
    max_goals: Option<String>,
}

async fn get_scoregrid_handler(
    State(state): State<AppState>,
    Path(fixture_id): Path<String>,
    Query(params): Query<ScoreGridQuery>,
) -> ApiResult<Json<ScoreGrid>> {
    let fixture_id = parse_id(&fixture_id, "fixture id")?;
    let max_goals = match non_empty(params.max_goals) {
        Some(raw) => raw
            .trim()
            .parse::<u8>()
            .map_err(|_| ApiError::BadRequest(format!("Invalid maxGoals: {:?}", raw)))?,
        None => services::DEFAULT_MAX_GOALS,
    };

    if state.store.fixture(fixture_id).await?.is_none() {
        return Err(ApiError::NotFound("Fixture not found"));
    }

    let features = state
        .store
        .features(fixture_id)
        .await?
        .filter(|blob| !blob.is_null())
        .map(|blob| FeatureVector::from_blob(&blob))
        .unwrap_or_else(FeatureVector::fallback);

    services::score_grid(fixture_id, &features, max_goals)
        .map(Json)
        .map_err(|e| match e {
            ScoreGridError::TooManyGoals(_) => ApiError::BadRequest(e.to_string()),
            ScoreGridError::InvalidRate { .. } => ApiError::Unprocessable(e.to_string()),
        })
}

// GET /api/predictions/{fixture_id} - Ordered by market, then selection
async fn get_predictions_handler(
    State(state): State<AppState>,
    Path(fixture_id): Path<String>,
) -> ApiResult<Json<Vec<Prediction>>> {
    let fixture_id = parse_id(&fixture_id, "fixture id")?;
    Ok(Json(state.store.predictions(fixture_id).await?))
}

// GET /api/features/{fixture_id} - Stored feature blob, or the default vector when absent or null
async fn get_features_handler(
    State(state): State<AppState>,
    Path(fixture_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let fixture_id = parse_id(&fixture_id, "fixture id")?;
    let features = state
        .store
        .features(fixture_id)
        .await?
        .filter(|blob| !blob.is_null())
        .unwrap_or_else(default_features);
    Ok(Json(features))
}

// GET /api/teams/{team_id}/elo - Elo snapshots, oldest first
async fn get_elo_history_handler(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> ApiResult<Json<Vec<EloSnapshot>>> {
    let team_id = parse_id(&team_id, "team id")?;
    Ok(Json(state.store.elo_history(team_id).await?))
}

// GET /api/calibration/{league_id}
async fn get_calibration_handler(
    State(state): State<AppState>,
    Path(league_id): Path<String>,
) -> ApiResult<Json<Vec<Calibration>>> {
    let league_id = parse_id(&league_id, "league id")?;
    Ok(Json(state.store.calibrations(league_id).await?))
}

// GET /api/backtest/metrics
async fn get_backtest_metrics_handler() -> Json<Vec<BacktestMetric>> {
    Json(services::placeholder_metrics(Utc::now()))
}

/// Operator actions exposed on the admin page. No job runner exists yet, so
/// each one only acknowledges the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Retrain,
    Recalibrate,
    Sync,
    RebuildFeatures,
}

impl AdminAction {
    pub fn message(self) -> &'static str {
        match self {
            AdminAction::Retrain => "Model retraining scheduled (placeholder)",
            AdminAction::Recalibrate => "Model recalibration scheduled (placeholder)",
            AdminAction::Sync => "Data synchronization scheduled (placeholder)",
            AdminAction::RebuildFeatures => "Feature rebuild scheduled (placeholder)",
        }
    }
}

// POST /api/admin/*
async fn admin_ack(action: AdminAction) -> Json<ActionAck> {
    tracing::info!("Admin action {:?} requested; nothing is executed", action);
    Json(ActionAck {
        message: action.message().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_database, MemoryStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    async fn seeded() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        init_database(store.as_ref()).await.unwrap();
        store
    }

    async fn call(store: Arc<MemoryStore>, method: Method, uri: &str) -> (StatusCode, Value) {
        let app = create_router(AppState::new(store));
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn get<T: DeserializeOwned>(store: Arc<MemoryStore>, uri: &str) -> (StatusCode, T) {
        let (status, body) = call(store, Method::GET, uri).await;
        (status, serde_json::from_value(body).unwrap())
    }

    #[tokio::test]
    async fn test_health_reports_db() {
        let (status, body) = call(seeded().await, Method::GET, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"ok": true, "db": true}));
    }

    #[tokio::test]
    async fn test_leagues_ordered_by_name() {
        let (status, leagues): (_, Vec<League>) = get(seeded().await, "/api/leagues").await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = leagues.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Bundesliga", "La Liga", "NBA", "Premier League"]);
    }

    #[tokio::test]
    async fn test_fixtures_ordered_by_date() {
        let (status, fixtures): (_, Vec<Fixture>) = get(seeded().await, "/api/fixtures").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fixtures.len(), 6);
        assert!(fixtures.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[tokio::test]
    async fn test_fixtures_filtered_by_league() {
        let (_, fixtures): (_, Vec<Fixture>) = get(seeded().await, "/api/fixtures?leagueId=1").await;
        assert_eq!(fixtures.len(), 2);
        assert!(fixtures.iter().all(|f| f.league_id == 1));
        assert!(fixtures.iter().all(|f| f.league_name == "Premier League"));
    }

    #[tokio::test]
    async fn test_fixtures_empty_filters_are_ignored() {
        let (_, fixtures): (_, Vec<Fixture>) =
            get(seeded().await, "/api/fixtures?leagueId=&from=&to=").await;
        assert_eq!(fixtures.len(), 6);
    }

    #[tokio::test]
    async fn test_fixtures_date_range_is_inclusive() {
        let store = seeded().await;
        let (_, all): (_, Vec<Fixture>) = get(store.clone(), "/api/fixtures").await;
        let first = all[0].date.to_rfc3339();

        let uri = format!("/api/fixtures?from={}&to={}", first, first).replace('+', "%2B");
        let (status, fixtures): (_, Vec<Fixture>) = get(store, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fixtures.len(), 2);
        assert!(fixtures.iter().all(|f| f.date == all[0].date));
    }

    #[tokio::test]
    async fn test_fixtures_reject_bad_filters() {
        let (status, body) = call(seeded().await, Method::GET, "/api/fixtures?leagueId=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("leagueId"));

        let (status, _) = call(seeded().await, Method::GET, "/api/fixtures?from=soon").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_fixture_by_id() {
        let (status, fixture): (_, Fixture) = get(seeded().await, "/api/fixtures/3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fixture.home_team, "Bayern Munich");
        assert_eq!(fixture.away_team, "Borussia Dortmund");
    }

    #[tokio::test]
    async fn test_missing_fixture_is_404() {
        let (status, body) = call(seeded().await, Method::GET, "/api/fixtures/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"error": "Fixture not found"}));
    }

    #[tokio::test]
    async fn test_predictions_for_fixture() {
        let (status, predictions): (_, Vec<Prediction>) =
            get(seeded().await, "/api/predictions/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(predictions.len(), 7);
        assert_eq!(predictions[0].market, "1X2");
        assert_eq!(predictions[0].selection, "1");
        assert!((predictions[0].prob - 0.45).abs() < 1e-9);

        let (_, none): (_, Vec<Prediction>) = get(seeded().await, "/api/predictions/42").await;
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_features_default_vector() {
        let (status, body) = call(seeded().await, Method::GET, "/api/features/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({
                "lambda_home": 1.45,
                "lambda_away": 1.12,
                "home_elo": 1500,
                "away_elo": 1480,
                "home_form": 2.1,
                "away_form": 1.8
            })
        );
    }

    #[tokio::test]
    async fn test_features_stored_blob_is_returned_verbatim() {
        let store = seeded().await;
        let blob = serde_json::json!({"lambda_home": 2.2, "custom": [1, 2]});
        store.insert_features(2, blob.clone()).await;

        let (_, body) = call(store, Method::GET, "/api/features/2").await;
        assert_eq!(body, blob);
    }

    #[tokio::test]
    async fn test_scoregrid_uses_stored_rates() {
        let store = seeded().await;
        store
            .insert_features(1, serde_json::json!({"lambda_home": 2.0, "lambda_away": 0.5}))
            .await;

        let (status, grid): (_, ScoreGrid) =
            get(store.clone(), "/api/fixtures/1/scoregrid?maxGoals=3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(grid.lambda_home, 2.0);
        assert_eq!(grid.lambda_away, 0.5);
        assert_eq!(grid.cells.len(), 16);
        assert!(grid.home_win > grid.away_win);

        let (status, _) = call(store.clone(), Method::GET, "/api/fixtures/999/scoregrid").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(store, Method::GET, "/api/fixtures/1/scoregrid?maxGoals=20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_scoregrid_rejects_bad_rates() {
        let store = seeded().await;
        store
            .insert_features(4, serde_json::json!({"lambda_home": -1.0}))
            .await;
        let (status, body) = call(store, Method::GET, "/api/fixtures/4/scoregrid").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("home"));
    }

    #[tokio::test]
    async fn test_backtest_metrics_static() {
        let (status, metrics): (_, Vec<BacktestMetric>) =
            get(seeded().await, "/api/backtest/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(metrics.len(), 3);
        assert_eq!(metrics[0].log_loss, 0.612);
    }

    #[tokio::test]
    async fn test_admin_actions_acknowledge() {
        let cases = [
            ("/api/admin/retrain", "Model retraining scheduled (placeholder)"),
            ("/api/admin/recalibrate", "Model recalibration scheduled (placeholder)"),
            ("/api/admin/sync", "Data synchronization scheduled (placeholder)"),
            ("/api/admin/rebuild-features", "Feature rebuild scheduled (placeholder)"),
        ];
        for (uri, message) in cases {
            let (status, body) = call(Arc::new(MemoryStore::new()), Method::POST, uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, serde_json::json!({ "message": message }));
        }

        let (status, _) = call(seeded().await, Method::GET, "/api/admin/retrain").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_league_teams_and_seasons() {
        let (_, teams): (_, Vec<Team>) = get(seeded().await, "/api/leagues/4/teams").await;
        let names: Vec<&str> = teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            ["Boston Celtics", "Golden State Warriors", "Los Angeles Lakers", "Miami Heat"]
        );

        let (_, seasons): (_, Vec<Season>) = get(seeded().await, "/api/leagues/4/seasons").await;
        assert_eq!(seasons.len(), 1);
        assert_eq!(seasons[0].year, 2024);
        assert_eq!(seasons[0].start_date.unwrap().to_string(), "2024-10-15");
    }

    #[tokio::test]
    async fn test_elo_history_and_calibration() {
        let store = seeded().await;
        for (day, elo) in [(3, 1512.5), (1, 1500.0)] {
            store
                .insert_elo_snapshot(EloSnapshot {
                    date: chrono::NaiveDate::from_ymd_opt(2024, 9, day).unwrap(),
                    league_id: 1,
                    team_id: 2,
                    elo,
                })
                .await;
        }
        store
            .insert_calibration(Calibration {
                league_id: 1,
                market: "1X2".to_string(),
                version: "iso-1".to_string(),
                mapping_blob: serde_json::json!({"x": [0.0, 1.0], "y": [0.0, 1.0]}),
            })
            .await;

        let (_, history): (_, Vec<EloSnapshot>) = get(store.clone(), "/api/teams/2/elo").await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].elo, 1500.0);
        assert_eq!(history[1].elo, 1512.5);

        let (_, calibrations): (_, Vec<Calibration>) = get(store, "/api/calibration/1").await;
        assert_eq!(calibrations.len(), 1);
        assert_eq!(calibrations[0].version, "iso-1");
    }

    struct FailingStore;

    #[async_trait::async_trait]
    impl Store for FailingStore {
        async fn ping(&self) -> anyhow::Result<bool> {
            anyhow::bail!("connection refused")
        }
        async fn init_schema(&self) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }
        async fn league_count(&self) -> anyhow::Result<i64> {
            anyhow::bail!("connection refused")
        }
        async fn insert_seed(&self, _seed: &crate::db::SeedSet) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }
        async fn leagues(&self) -> anyhow::Result<Vec<League>> {
            anyhow::bail!("relation \"leagues\" does not exist")
        }
        async fn seasons(&self, _league_id: Option<i32>) -> anyhow::Result<Vec<Season>> {
            anyhow::bail!("connection refused")
        }
        async fn teams(&self, _league_id: Option<i32>) -> anyhow::Result<Vec<Team>> {
            anyhow::bail!("connection refused")
        }
        async fn fixtures(&self, _filter: &FixtureFilter) -> anyhow::Result<Vec<Fixture>> {
            anyhow::bail!("connection refused")
        }
        async fn fixture(&self, _fixture_id: i32) -> anyhow::Result<Option<Fixture>> {
            anyhow::bail!("connection refused")
        }
        async fn predictions(&self, _fixture_id: i32) -> anyhow::Result<Vec<Prediction>> {
            anyhow::bail!("connection refused")
        }
        async fn all_predictions(&self) -> anyhow::Result<Vec<Prediction>> {
            anyhow::bail!("connection refused")
        }
        async fn features(&self, _fixture_id: i32) -> anyhow::Result<Option<Value>> {
            anyhow::bail!("connection refused")
        }
        async fn elo_history(&self, _team_id: i32) -> anyhow::Result<Vec<EloSnapshot>> {
            anyhow::bail!("connection refused")
        }
        async fn calibrations(&self, _league_id: i32) -> anyhow::Result<Vec<Calibration>> {
            anyhow::bail!("connection refused")
        }
    }

    async fn call_failing(uri: &str) -> (StatusCode, Value) {
        let app = create_router(AppState::new(Arc::new(FailingStore)));
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_store_errors_are_500_with_message() {
        let (status, body) = call_failing("/api/leagues").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"error": "relation \"leagues\" does not exist"}));

        let (status, body) = call_failing("/api/fixtures/1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"error": "connection refused"}));
    }

    #[tokio::test]
    async fn test_health_down_is_500() {
        let (status, body) = call_failing("/api/health").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"ok": false, "error": "connection refused"}));
    }

    #[tokio::test]
    async fn test_null_feature_blob_serves_defaults() {
        let store = seeded().await;
        store.insert_features(2, Value::Null).await;

        let (status, body) = call(store.clone(), Method::GET, "/api/features/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, default_features());

        let (status, grid): (_, ScoreGrid) = get(store, "/api/fixtures/2/scoregrid").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(grid.lambda_home, FeatureVector::DEFAULT_LAMBDA_HOME);
        assert_eq!(grid.lambda_away, FeatureVector::DEFAULT_LAMBDA_AWAY);
    }

    #[tokio::test]
    async fn test_bad_path_id_is_400() {
        let (status, body) = call(seeded().await, Method::GET, "/api/predictions/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("fixture id"));
    }
}
