pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::database::repository::AssessmentRepository;
use crate::services::{
    assessment_service::AssessmentService,
    wizard_session_service::{SessionLimits, WizardSessionService},
};
use crate::utils::time::Clock;

#[derive(Clone)]
pub struct AppState {
    pub jwt_secret: Arc<str>,
    pub assessment_service: AssessmentService,
    pub wizard_sessions: WizardSessionService,
}

impl AppState {
    pub fn new(
        config: &Config,
        repository: Arc<dyn AssessmentRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let assessment_service = AssessmentService::new(repository, clock.clone());
        let wizard_sessions = WizardSessionService::new(SessionLimits::from_config(config), clock);

        Self {
            jwt_secret: Arc::from(config.jwt_secret.as_str()),
            assessment_service,
            wizard_sessions,
        }
    }
}
