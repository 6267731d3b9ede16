use std::sync::Arc;

use recovery::{ConfigError, EngineConfig, JobRegistry};

pub type SharedState = Arc<AppState>;

#[derive(Clone)]
pub struct AppState {
    pub registry: JobRegistry,
}

impl AppState {
    pub fn new(engine: EngineConfig) -> Result<Self, ConfigError> {
        Ok(Self { registry: JobRegistry::new(engine)? })
    }
}
