use std::sync::Arc;

use quiz_core::model::QuestionBank;
use services::SessionController;

pub trait UiApp: Send + Sync {
    fn bank(&self) -> Arc<QuestionBank>;
    fn controller(&self) -> Arc<SessionController>;
}

#[derive(Clone)]
pub struct AppContext {
    bank: Arc<QuestionBank>,
    controller: Arc<SessionController>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            bank: app.bank(),
            controller: app.controller(),
        }
    }

    #[must_use]
    pub fn bank(&self) -> Arc<QuestionBank> {
        Arc::clone(&self.bank)
    }

    #[must_use]
    pub fn controller(&self) -> Arc<SessionController> {
        Arc::clone(&self.controller)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
