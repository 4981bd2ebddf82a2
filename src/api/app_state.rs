use crate::services::advisor::AdvisorService;
use std::sync::Arc;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Advisor service: programs, courses, knowledge areas and plans
    pub advisor: Arc<dyn AdvisorService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("advisor", &"Arc<dyn AdvisorService>")
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(advisor: Box<dyn AdvisorService>) -> Self {
        Self {
            advisor: Arc::from(advisor),
        }
    }
}
