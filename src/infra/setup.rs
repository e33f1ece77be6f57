use crate::{
    adapters::{http::app_state::AppState, observation::LiveObservationSource},
    infra::{
        config::AppConfig, error::InfraError, http_client::try_build_client,
        postgres_persistence,
    },
    use_cases::{
        observation::{DomainRepo, ObservationUseCases, ServerRepo},
        provenance::{ProvenanceRepo, ProvenanceUseCases},
    },
};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let postgres_arc =
        Arc::new(postgres_persistence(&config.database_url, config.db_max_connections).await?);

    let http = try_build_client().map_err(InfraError::HttpClient)?;
    let source = Arc::new(LiveObservationSource::new(
        http,
        config.ssl_labs_url.clone(),
        config.whois_root_server.clone(),
        config.whois_timeout,
    ));

    let provenance_use_cases = Arc::new(ProvenanceUseCases::new(
        postgres_arc.clone() as Arc<dyn ProvenanceRepo>,
    ));

    let observation_use_cases = ObservationUseCases::new(
        postgres_arc.clone() as Arc<dyn DomainRepo>,
        postgres_arc.clone() as Arc<dyn ServerRepo>,
        source,
        provenance_use_cases.clone(),
        config.staleness_window,
    );

    Ok(AppState {
        config: Arc::new(config),
        observation_use_cases: Arc::new(observation_use_cases),
        provenance_use_cases,
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "domainscope=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false) // don't show target (module path)
        .with_level(true) // show log level
        .pretty(); // human-friendly, with colors

    // File (structured JSON logs), skipped when the file cannot be created
    let json_layer = File::create("app.log").ok().map(|file| {
        fmt::layer()
            .json()
            .with_writer(file)
            .with_current_span(true)
            .with_span_list(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
