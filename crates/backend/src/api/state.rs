use std::sync::Arc;

use crate::dashboards::d402_shared_dashboard::ShareStore;
use crate::shared::format::LocaleFormat;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ShareStore>,
    pub locale: Arc<LocaleFormat>,
}

impl AppState {
    pub fn new(store: Arc<dyn ShareStore>, locale: LocaleFormat) -> Self {
        Self {
            store,
            locale: Arc::new(locale),
        }
    }
}
