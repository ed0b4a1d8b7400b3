use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crashwatch_core::advisor::Advisor;
use crashwatch_core::classifier::CrashClassifier;
use crashwatch_core::domain::panels::{trend_comment, PanelChoice};
use crashwatch_core::domain::snapshot::MarketSnapshot;
use crashwatch_core::llm::openai::OpenAiCompletionClient;
use crashwatch_core::market::yahoo::YahooChartClient;

const DASHBOARD_TITLE: &str = "Market Crash Detector & Investment Strategy Bot";
const HOW_IT_WORKS: &str = "This bot provides investment strategy recommendations based on \
current market data (VIX, S&P 500). Ask about the market and it will suggest strategies \
based on real-time data.";
const TIPS: [&str; 3] = [
    "The dashboard fetches and displays the latest VIX and S&P 500 data.",
    "Ask the bot for insights on specific market strategies or conditions.",
    "Use the panels endpoint to explore additional analysis features.",
];

const SNAPSHOT_BLOCKED_MESSAGE: &str = "Error fetching market data. Please try again later.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = crashwatch_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    // Explicit load-once lifecycle: artifact and clients are built here and
    // read-only for the rest of the process.
    let classifier = Arc::new(CrashClassifier::load(&settings.model_path)?);
    tracing::info!(path = %settings.model_path, "crash classifier loaded");

    let market = Arc::new(YahooChartClient::from_settings(&settings)?);
    let llm = Arc::new(OpenAiCompletionClient::from_settings(&settings)?);

    let state = AppState {
        advisor: Arc::new(Advisor::new(market, classifier, llm)),
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/narrative", get(get_snapshot_narrative))
        .route("/ask", post(post_ask))
        .route("/refresh", post(post_refresh))
        .route("/panels/:panel", get(get_panel))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    advisor: Arc<Advisor>,
}

#[derive(Debug, Serialize)]
struct AboutSection {
    title: &'static str,
    description: &'static str,
    tips: [&'static str; 3],
}

const ABOUT: AboutSection = AboutSection {
    title: DASHBOARD_TITLE,
    description: HOW_IT_WORKS,
    tips: TIPS,
};

#[derive(Debug, Serialize)]
struct DashboardResponse {
    render_id: Uuid,
    about: AboutSection,
    snapshot: MarketSnapshot,
    prediction: Option<String>,
    strategy: Option<String>,
    blocked: Option<&'static str>,
}

async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let assessment = state.advisor.assess().await;
    let blocked = (!assessment.snapshot.is_complete()).then_some(SNAPSHOT_BLOCKED_MESSAGE);

    Json(DashboardResponse {
        render_id: Uuid::new_v4(),
        about: ABOUT,
        prediction: assessment.prediction.map(|p| p.to_string()),
        strategy: assessment.strategy.map(|s| s.to_string()),
        snapshot: assessment.snapshot,
        blocked,
    })
}

#[derive(Debug, Serialize)]
struct NarrativeResponse {
    render_id: Uuid,
    narrative: String,
}

async fn get_snapshot_narrative(
    State(state): State<AppState>,
) -> Result<Json<NarrativeResponse>, StatusCode> {
    let snapshot = state.advisor.refresh().await;
    let Some(reading) = snapshot.reading() else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let narrative = state
        .advisor
        .narrate_snapshot(snapshot.generated_at, &reading)
        .await
        .map_err(|e| {
            sentry_anyhow::capture_anyhow(&e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(NarrativeResponse {
        render_id: Uuid::new_v4(),
        narrative,
    }))
}

#[derive(Debug, Deserialize)]
struct AskRequest {
    question: String,
}

#[derive(Debug, Serialize)]
struct AskResponse {
    render_id: Uuid,
    strategy: String,
    answer: String,
}

async fn post_ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, StatusCode> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let assessment = state.advisor.assess().await;
    let Some(strategy) = assessment.strategy else {
        // No complete snapshot, so there is no selected strategy to explain.
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let answer = state
        .advisor
        .explain_strategy(strategy, question)
        .await
        .map_err(|e| {
            sentry_anyhow::capture_anyhow(&e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(AskResponse {
        render_id: Uuid::new_v4(),
        strategy: strategy.to_string(),
        answer,
    }))
}

#[derive(Debug, Serialize)]
struct RefreshResponse {
    render_id: Uuid,
    message: String,
    snapshot: MarketSnapshot,
}

async fn post_refresh(State(state): State<AppState>) -> Json<RefreshResponse> {
    let snapshot = state.advisor.refresh().await;
    let message = format!(
        "Market data updated at {}",
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    Json(RefreshResponse {
        render_id: Uuid::new_v4(),
        message,
        snapshot,
    })
}

#[derive(Debug, Serialize)]
struct PanelResponse {
    title: &'static str,
    body: &'static str,
    live_comment: Option<&'static str>,
}

async fn get_panel(
    State(state): State<AppState>,
    Path(panel): Path<String>,
) -> Result<Json<PanelResponse>, StatusCode> {
    let choice = PanelChoice::from_slug(&panel).ok_or(StatusCode::NOT_FOUND)?;

    let live_comment = match choice {
        PanelChoice::RiskMitigation => None,
        PanelChoice::TrendInsights => {
            let snapshot = state.advisor.refresh().await;
            Some(trend_comment(&snapshot))
        }
    };

    Ok(Json(PanelResponse {
        title: choice.title(),
        body: choice.body(),
        live_comment,
    }))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &crashwatch_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
