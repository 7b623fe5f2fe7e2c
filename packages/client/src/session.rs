//! Client-side state for one analysis session.
//!
//! Header fetches and analysis runs can be in flight while the user picks
//! another dataset or starts another run. Each request is tagged with a
//! [`RequestTicket`]; a response is only committed while its ticket is
//! still current, so an older response can never overwrite newer state.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use lisa_map_analysis::{ConfigAction, reduce, validate};
use lisa_map_analysis_models::{AnalysisConfig, ValidationErrors};
use lisa_map_payload_models::FeatureCollection;

use crate::ClientError;

/// Hands out tickets and remembers which one is current.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    generation: Arc<AtomicU64>,
}

impl RequestTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request, making every earlier ticket stale.
    #[must_use]
    pub fn begin(&self) -> RequestTicket {
        let id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        RequestTicket {
            generation: Arc::clone(&self.generation),
            id,
        }
    }

    /// Makes every outstanding ticket stale.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// Identifies one in-flight request.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    generation: Arc<AtomicU64>,
    id: u64,
}

impl RequestTicket {
    /// Whether no newer request has started since this one.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.id
    }
}

/// A validated run ready to be sent.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub ticket: RequestTicket,
    pub dataset_id: String,
    pub config: AnalysisConfig,
}

/// Dataset selection, configuration, and latest result.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    dataset_id: Option<String>,
    config: AnalysisConfig,
    columns: Vec<String>,
    result: Option<FeatureCollection>,
    run_error: Option<String>,
    in_progress: bool,
    headers: RequestTracker,
    runs: RequestTracker,
}

impl AnalysisSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn dataset_id(&self) -> Option<&str> {
        self.dataset_id.as_deref()
    }

    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub const fn result(&self) -> Option<&FeatureCollection> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn run_error(&self) -> Option<&str> {
        self.run_error.as_deref()
    }

    #[must_use]
    pub const fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Current validation errors.
    #[must_use]
    pub fn errors(&self) -> ValidationErrors {
        validate(&self.config, self.dataset_id.as_deref(), &self.columns)
    }

    /// Applies a configuration edit.
    pub fn dispatch(&mut self, action: ConfigAction) {
        self.config = reduce(std::mem::take(&mut self.config), action);
    }

    /// Selects dataset `id`, resetting the configuration and result.
    ///
    /// Outstanding header fetches and runs become stale. Returns the
    /// ticket for this dataset's header fetch.
    pub fn select_dataset(&mut self, id: impl Into<String>) -> RequestTicket {
        let id = id.into();
        log::debug!("Selected dataset {id}");
        self.dataset_id = Some(id);
        self.config = AnalysisConfig::default();
        self.columns.clear();
        self.result = None;
        self.run_error = None;
        self.in_progress = false;
        self.runs.invalidate();
        self.headers.begin()
    }

    /// Commits a header fetch. Returns `false` when `ticket` is stale and
    /// the response was dropped.
    pub fn commit_headers(
        &mut self,
        ticket: &RequestTicket,
        columns: Result<Vec<String>, ClientError>,
    ) -> bool {
        if !ticket.is_current() {
            log::debug!("Discarding stale headers response");
            return false;
        }
        match columns {
            Ok(columns) => self.columns = columns,
            Err(e) => {
                log::warn!("Failed to load dataset columns: {e}");
                self.columns.clear();
            }
        }
        true
    }

    /// Starts a run if the configuration is valid.
    ///
    /// # Errors
    ///
    /// Returns the validation errors when the configuration cannot be
    /// submitted.
    pub fn begin_run(&mut self) -> Result<RunRequest, ValidationErrors> {
        let errors = self.errors();
        let Some(dataset_id) = self.dataset_id.clone().filter(|_| errors.is_empty()) else {
            return Err(errors);
        };

        self.in_progress = true;
        self.run_error = None;
        Ok(RunRequest {
            ticket: self.runs.begin(),
            dataset_id,
            config: self.config.clone(),
        })
    }

    /// Commits a run outcome. Returns `false` when `ticket` is stale and
    /// the outcome was dropped.
    pub fn finish_run(
        &mut self,
        ticket: &RequestTicket,
        outcome: Result<Option<FeatureCollection>, ClientError>,
    ) -> bool {
        if !ticket.is_current() {
            log::debug!("Discarding stale analysis response");
            return false;
        }
        self.in_progress = false;
        match outcome {
            Ok(result) => {
                self.result = result;
                self.run_error = None;
            }
            Err(e) => {
                log::error!("Analysis run failed: {e}");
                self.run_error = Some(e.to_string());
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lisa_map_analysis_models::ConfigField;

    fn ready_session() -> AnalysisSession {
        let mut session = AnalysisSession::new();
        let _ = session.select_dataset("1");
        session.dispatch(ConfigAction::SetText(ConfigField::Variable, "rate".to_string()));
        session.dispatch(ConfigAction::SetText(
            ConfigField::CountyCol,
            "county".to_string(),
        ));
        session
    }

    #[test]
    fn newer_ticket_makes_older_stale() {
        let tracker = RequestTracker::new();
        let first = tracker.begin();
        assert!(first.is_current());
        let second = tracker.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
        tracker.invalidate();
        assert!(!second.is_current());
    }

    #[test]
    fn stale_headers_are_discarded() {
        let mut session = AnalysisSession::new();
        let old = session.select_dataset("1");
        let current = session.select_dataset("2");

        assert!(!session.commit_headers(&old, Ok(vec!["old".to_string()])));
        assert!(session.columns().is_empty());
        assert!(session.commit_headers(&current, Ok(vec!["new".to_string()])));
        assert_eq!(session.columns(), ["new".to_string()]);
    }

    #[test]
    fn invalid_config_does_not_start_a_run() {
        let mut session = AnalysisSession::new();
        let errors = session.begin_run().unwrap_err();
        assert!(errors.contains(ConfigField::Dataset));
        assert!(!session.in_progress());
    }

    #[test]
    fn run_failure_sets_message_and_clears_progress() {
        let mut session = ready_session();
        let run = session.begin_run().unwrap();
        assert!(session.in_progress());
        assert_eq!(run.dataset_id, "1");

        let err = ClientError::Status {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(session.finish_run(&run.ticket, Err(err)));
        assert!(!session.in_progress());
        assert_eq!(session.run_error(), Some("boom"));
    }

    #[test]
    fn superseded_run_does_not_overwrite_result() {
        let mut session = ready_session();
        let first = session.begin_run().unwrap();
        let second = session.begin_run().unwrap();

        let newer = FeatureCollection::new(vec![serde_json::json!({"type": "Feature"})]);
        assert!(session.finish_run(&second.ticket, Ok(Some(newer.clone()))));
        assert!(!session.finish_run(&first.ticket, Ok(None)));
        assert_eq!(session.result(), Some(&newer));
    }

    #[test]
    fn selecting_a_dataset_invalidates_runs() {
        let mut session = ready_session();
        let run = session.begin_run().unwrap();
        let _ = session.select_dataset("2");
        assert!(!session.in_progress());
        assert!(!session.finish_run(&run.ticket, Ok(Some(FeatureCollection::default()))));
        assert!(session.result().is_none());
        assert_eq!(session.config(), &AnalysisConfig::default());
    }

    #[test]
    fn column_check_applies_once_headers_load() {
        let mut session = ready_session();
        let ticket = session.select_dataset("3");
        session.dispatch(ConfigAction::SetText(ConfigField::Variable, "rate".to_string()));
        session.dispatch(ConfigAction::SetText(
            ConfigField::CountyCol,
            "county".to_string(),
        ));
        assert!(session.errors().is_empty());
        session.commit_headers(&ticket, Ok(vec!["rate".to_string()]));
        assert!(session.errors().contains(ConfigField::CountyCol));
    }
}
