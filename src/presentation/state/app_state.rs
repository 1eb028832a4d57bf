use std::sync::Arc;

use crate::application::ports::InferenceEngine;
use crate::application::services::{RelayService, SessionStore};
use crate::presentation::config::Settings;

pub struct AppState<E>
where
    E: InferenceEngine,
{
    pub relay_service: Arc<RelayService<E>>,
    pub session_store: Arc<SessionStore>,
    pub settings: Settings,
}

impl<E> AppState<E>
where
    E: InferenceEngine + 'static,
{
    /// Wires a fresh session store and relay around `engine`.
    pub fn new(engine: Arc<E>, settings: Settings) -> Self {
        let session_store = Arc::new(SessionStore::new());
        let relay_service = Arc::new(RelayService::new(
            engine,
            Arc::clone(&session_store),
            settings.relay.rate_limit_window(),
        ));

        Self {
            relay_service,
            session_store,
            settings,
        }
    }
}

impl<E> Clone for AppState<E>
where
    E: InferenceEngine,
{
    fn clone(&self) -> Self {
        Self {
            relay_service: Arc::clone(&self.relay_service),
            session_store: Arc::clone(&self.session_store),
            settings: self.settings.clone(),
        }
    }
}
