use std::sync::Arc;

use crate::{
    infra::config::AppConfig,
    use_cases::{observation::ObservationUseCases, provenance::ProvenanceUseCases},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub observation_use_cases: Arc<ObservationUseCases>,
    pub provenance_use_cases: Arc<ProvenanceUseCases>,
}
