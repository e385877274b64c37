use castbase::analytics::engagement::{FeedError, InteractionFeed};
use castbase::analytics::InteractionEvent;
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local interaction store backing the recording and refresh endpoints.
#[derive(Default, Clone)]
pub(crate) struct InMemoryInteractionFeed {
    events: Arc<Mutex<Vec<InteractionEvent>>>,
}

impl InteractionFeed for InMemoryInteractionFeed {
    fn append(&self, events: Vec<InteractionEvent>) -> Result<usize, FeedError> {
        let mut guard = self
            .events
            .lock()
            .map_err(|_| FeedError::Unavailable("interaction feed mutex poisoned".into()))?;
        guard.extend(events);
        Ok(guard.len())
    }

    fn events(&self) -> Result<Vec<InteractionEvent>, FeedError> {
        let guard = self
            .events
            .lock()
            .map_err(|_| FeedError::Unavailable("interaction feed mutex poisoned".into()))?;
        Ok(guard.clone())
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    castbase::analytics::interactions::parse_timestamp(raw).ok_or_else(|| {
        format!("failed to parse '{raw}' as RFC 3339, YYYY-MM-DD HH:MM:SS, or YYYY-MM-DD")
    })
}
