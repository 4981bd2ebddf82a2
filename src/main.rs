use anyhow::Context;
use curriculum_advisor::api::{self, app_state::AppState};
use curriculum_advisor::config::config::AppConfig;
use curriculum_advisor::config::loader::{ConfigLoader, config_exists};
use curriculum_advisor::observability::{
    HealthCheckResult, ObservabilityState, create_observability_router, init_tracing,
};
use curriculum_advisor::services::{
    CourseCatalog, CurriculumParser, KnowledgeAreaRegistry, create_advisor_service,
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = if config_exists() {
        ConfigLoader::load().context("failed to load config.yaml")?
    } else {
        AppConfig::development()
    };
    let _guard = init_tracing(&config.logging);

    info!("Starting {} ({})...", config.app_name, config.environment);
    if !config_exists() {
        info!("No config.yaml found, using development defaults");
    }

    let programs = ConfigLoader::validate(&config)?;
    info!("Configuration loaded successfully: {} programs", programs.len());

    let registry = Arc::new(
        KnowledgeAreaRegistry::load(&config.knowledge_areas)
            .context("invalid knowledge_areas configuration")?,
    );
    info!(
        "Knowledge area registry initialized: {} areas",
        registry.len()
    );

    let catalog = Arc::new(CourseCatalog::new(
        Arc::clone(&registry),
        CurriculumParser::new(config.curriculum),
    ));

    let observability_state = Arc::new(ObservabilityState::new(
        env!("CARGO_PKG_VERSION").to_string(),
    ));

    for (program, info) in &programs {
        let source = config
            .programs
            .get(program.as_str())
            .and_then(|p| p.source.clone());
        let Some(path) = source else {
            warn!("No curriculum source configured for {}", program);
            continue;
        };

        let result = match tokio::fs::read_to_string(&path).await {
            Ok(text) => catalog
                .load(info, &text)
                .map(|warnings| {
                    format!(
                        "{} courses, {} warnings",
                        catalog.snapshot().courses(*program).len(),
                        warnings.len()
                    )
                })
                .map_err(|e| e.to_string()),
            Err(e) => Err(format!("{}: {}", path.display(), e)),
        };

        match &result {
            Ok(summary) => info!("Curriculum for {} loaded: {}", program, summary),
            Err(e) => warn!("Curriculum for {} not loaded: {}", program, e),
        }
        observability_state
            .set_health_check(HealthCheckResult {
                name: format!("curriculum:{}", program),
                healthy: result.is_ok(),
                message: result.unwrap_or_else(|e| e),
            })
            .await;
    }

    let advisor = create_advisor_service(registry, catalog, programs);
    info!("Advisor service initialized");

    let app_state = AppState::new(advisor);
    let api_router = api::initialize_api(app_state).await?;
    let router = create_observability_router(observability_state).merge(api_router);
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
