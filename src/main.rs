use std::sync::Arc;

use anyhow::{Context, Result};
use qpaper_core::application::{
    dto::AuthenticatedUser, queries::papers::GetPaperQuery, services::ApplicationServices,
};
use qpaper_core::config::AppConfig;
use qpaper_core::domain::distribution::QuestionTotalSource;
use qpaper_core::domain::paper::Paper;
use qpaper_core::domain::user::{PAPERS, Role, UserId};
use qpaper_core::infrastructure::{
    images::DefaultImageResolver, render::JsonRenderTarget,
    repositories::InMemoryPaperRepository, security::StaticAuthenticator, time::SystemClock,
};
use serde_json::{Value, json};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PREVIEW_TOKEN: &str = "local-preview";

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err:#}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let path = std::env::args()
        .nth(1)
        .context("usage: qpaper_core <paper.json>")?;
    let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let paper = parse_paper(&raw, config.question_total_source())
        .with_context(|| format!("parsing {path}"))?;
    let paper_id = i64::from(paper.id);

    let repo = Arc::new(InMemoryPaperRepository::with_papers([paper]));
    let authenticator = StaticAuthenticator::new().with_token(
        PREVIEW_TOKEN,
        AuthenticatedUser::with_role(UserId::new(1)?, "preview", Role::Admin),
    );
    let engine = config
        .pagination_engine()
        .with_image_resolver(Arc::new(DefaultImageResolver));

    let services = ApplicationServices::new(
        repo,
        Arc::new(authenticator),
        Arc::new(JsonRenderTarget::pretty()),
        Arc::new(SystemClock),
        engine,
        *config.geometry(),
        config.workflow_policy(),
    );

    let actor = services
        .authenticate_and_authorize(PREVIEW_TOKEN, PAPERS, "read")
        .await?;
    let queries = &services.paper_queries;
    let configuration = queries
        .configuration_report(&actor, GetPaperQuery { id: paper_id })
        .await?;
    let assembly = queries
        .assembly_report(&actor, GetPaperQuery { id: paper_id })
        .await?;
    tracing::info!(
        paper_id,
        configuration_valid = configuration.is_valid,
        assembly_valid = assembly.is_valid,
        issues = assembly.issues.len(),
        "distribution checked"
    );

    let layout = queries
        .preview_layout(&actor, GetPaperQuery { id: paper_id })
        .await?;
    tracing::info!(
        paper_id,
        pages = layout.page_count,
        degraded = layout.degraded_blocks,
        fingerprint = %layout.fingerprint,
        "preview laid out"
    );

    let output = json!({
        "configuration": configuration,
        "assembly": assembly,
        "layout": layout,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Documents that omit `targets.question_total_source` get the configured one.
fn parse_paper(raw: &str, default_source: QuestionTotalSource) -> Result<Paper> {
    let mut document: Value = serde_json::from_str(raw)?;
    if let Some(targets) = document.get_mut("targets").and_then(Value::as_object_mut) {
        targets
            .entry("question_total_source")
            .or_insert(serde_json::to_value(default_source)?);
    }
    Ok(serde_json::from_value(document)?)
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info".to_string());

    // Logs go to stderr so stdout stays valid JSON.
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}
