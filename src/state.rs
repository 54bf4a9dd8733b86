//! Application state.
//!
//! Wires the backend client, query cache, job service, action orchestrator
//! and notification sinks from loaded [`Settings`].

use std::sync::Arc;

use crate::cache::QueryCache;
use crate::config::Settings;
use crate::error::AppResult;
use crate::external::{GraphqlClient, GraphqlJobApi, build_http_client};
use crate::repositories::{JobApi, JobRepository};
use crate::services::notifications::{BroadcastNotifier, LogNotifier};
use crate::services::{ActionOrchestrator, JobService, NotificationService};

/// Capacity of the in-process notification channel
const NOTIFICATION_CAPACITY: usize = 32;

/// Application state shared by every front end.
///
/// Cloning is cheap: services hold their collaborators behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub jobs: JobService,
    pub orchestrator: Arc<ActionOrchestrator>,
    /// Every action outcome is also published here
    pub notifier: BroadcastNotifier,
}

impl AppState {
    /// Creates the state against the configured GraphQL backend, with the
    /// log sink as the only extra notification sink.
    pub fn new(settings: Settings) -> AppResult<Self> {
        Self::with_notifications(
            settings,
            NotificationService::new().with_sink(Arc::new(LogNotifier::new())),
        )
    }

    /// Creates the state against the configured GraphQL backend.
    ///
    /// # Example
    /// ```ignore
    /// let settings = ConfigLoader::new()?.load()?;
    /// let state = AppState::with_notifications(settings, NotificationService::new())?;
    /// ```
    pub fn with_notifications(
        settings: Settings,
        notifications: NotificationService,
    ) -> AppResult<Self> {
        let http = build_http_client(&settings.backend)?;
        let client = GraphqlClient::new(http, settings.backend.endpoint.clone());
        let api: Arc<dyn JobApi> = Arc::new(GraphqlJobApi::new(client));

        tracing::debug!(endpoint = %settings.backend.endpoint, "backend client ready");

        Ok(Self::from_api(settings, api, notifications))
    }

    /// Creates the state over any backend implementation.
    pub fn from_api(
        settings: Settings,
        api: Arc<dyn JobApi>,
        notifications: NotificationService,
    ) -> Self {
        let cache = QueryCache::new(settings.cache.event_capacity, settings.cache.stale_after());
        let jobs = JobService::new(JobRepository::new(api), cache);

        let notifier = BroadcastNotifier::new(NOTIFICATION_CAPACITY);
        let notifications = notifications.with_sink(Arc::new(notifier.clone()));
        let orchestrator = Arc::new(ActionOrchestrator::new(jobs.clone(), notifications));

        Self {
            settings: Arc::new(settings),
            jobs,
            orchestrator,
            notifier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ActionKind, JobRef, RequestOutcome};
    use crate::services::notifications::Severity;
    use crate::testing::{FakeJobApi, job};

    #[tokio::test]
    async fn test_state_publishes_action_outcomes() {
        let api = Arc::new(FakeJobApi::new());
        api.insert_job(job("7", "report", "ACTIVE"));
        let state = AppState::from_api(Settings::default(), api.clone(), NotificationService::new());
        let mut notifications = state.notifier.subscribe();

        let outcome = state
            .orchestrator
            .request(ActionKind::RunNow, JobRef::new("7", "report"))
            .await
            .unwrap();

        let RequestOutcome::Completed(sent) = outcome else {
            panic!("run now should execute immediately");
        };
        let received = notifications.recv().await.unwrap();
        assert_eq!(received, sent);
        assert_eq!(received.severity, Severity::Success);
        assert_eq!(api.calls("run_job_now"), 1);
    }

    #[tokio::test]
    async fn test_state_shares_one_cache() {
        let api = Arc::new(FakeJobApi::new());
        api.insert_job(job("7", "report", "ACTIVE"));
        let state = AppState::from_api(Settings::default(), api.clone(), NotificationService::new());
        let cloned = state.clone();

        state.jobs.jobs().await.unwrap();
        cloned.jobs.jobs().await.unwrap();
        assert_eq!(api.calls("list_jobs"), 1);
    }

    #[test]
    fn test_state_builds_against_configured_backend() {
        let state = AppState::new(Settings::default()).unwrap();
        assert_eq!(
            state.settings.backend.endpoint,
            "http://localhost/scheduler-instance/graphql"
        );
    }
}
