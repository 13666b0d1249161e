//! Headless academic-year selection control.
//!
//! The control owns the fetched options and its loading phase. It never owns
//! the selected value: that belongs to the parent, which passes it in through
//! [`ControlProps`] and receives proposals through the `on_change` callback.
//!
//! ```text
//! Idle --mount--> Loading --ok--> Populated { default applied or not }
//!                         \--err-> FetchFailed
//! ```
//!
//! A default is proposed at most once per mount, and only while the parent's
//! value is empty.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::client::{FetchError, LookupSource};
use crate::consts::PLACEHOLDER;
use crate::notify::{Notification, Notifier};
use crate::record::AcademicYearRecord;
use crate::resolver::resolve_with_reason;
use crate::token::TokenProvider;
use crate::{ParseError, Today, prelude::*};

/// Callback through which the control proposes a new value to its parent.
pub type OnChange = Arc<dyn Fn(&str) + Send + Sync>;

/// Source of the current date.
pub trait Clock: Send + Sync {
    /// # Errors
    /// Returns `ParseError` if the date cannot be represented.
    fn today(&self) -> Result<Today, ParseError>;
}

/// Local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Result<Today, ParseError> {
        Today::now()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Today);

impl Clock for FixedClock {
    fn today(&self) -> Result<Today, ParseError> {
        Ok(self.0)
    }
}

/// Collaborators injected into the control.
#[derive(Clone)]
pub struct ControlDeps {
    pub source: Arc<dyn LookupSource>,
    pub tokens: Arc<dyn TokenProvider>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
}

/// Values handed down by the parent on each render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlProps {
    /// Currently selected id, empty for none.
    pub value: String,
    /// Rendering hint only.
    pub required: bool,
    pub disabled: bool,
}

impl ControlProps {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }
}

/// Lifecycle phase of the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Phase {
    #[display(fmt = "idle")]
    Idle,
    #[display(fmt = "loading")]
    Loading,
    #[display(fmt = "populated")]
    Populated,
    #[display(fmt = "fetch-failed")]
    FetchFailed,
}

/// Why a user interaction was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InteractionError {
    #[error("academic years are still loading")]
    Loading,
    #[error("control is disabled")]
    Disabled,
}

/// One entry of the drop-down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Snapshot of everything needed to draw the control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    pub options: Vec<SelectOption>,
    pub selected: Option<String>,
    pub placeholder: &'static str,
    pub required: bool,
    pub disabled: bool,
    pub loading: bool,
}

#[derive(Debug)]
struct State {
    props: ControlProps,
    phase: Phase,
    records: Vec<AcademicYearRecord>,
    default_applied: bool,
    mounted: bool,
    // Bumped by every fetch and by mount/unmount. Only the fetch holding the
    // latest number may settle the phase.
    request: u64,
}

impl State {
    const fn is_latest(&self, request: u64) -> bool {
        self.mounted && self.request == request
    }
}

pub struct SelectionControl {
    deps: ControlDeps,
    on_change: OnChange,
    state: Mutex<State>,
}

impl std::fmt::Debug for SelectionControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionControl")
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl SelectionControl {
    pub fn new(deps: ControlDeps, props: ControlProps, on_change: OnChange) -> Self {
        Self {
            deps,
            on_change,
            state: Mutex::new(State {
                props,
                phase: Phase::Idle,
                records: Vec::new(),
                default_applied: false,
                mounted: false,
                request: 0,
            }),
        }
    }

    /// Starts a lifecycle and performs the initial fetch.
    pub async fn mount(&self) {
        {
            let mut state = self.state.lock();
            state.request += 1;
            state.default_applied = false;
            state.mounted = true;
        }
        tracing::debug!("academic year control mounted");
        self.refresh().await;
    }

    /// Ends the lifecycle. Fetches still in flight settle into nothing.
    pub fn unmount(&self) {
        {
            let mut state = self.state.lock();
            state.mounted = false;
            state.request += 1;
        }
        tracing::debug!("academic year control unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.state.lock().mounted
    }

    /// Replaces the parent-provided props. Does not fetch.
    pub fn set_props(&self, props: ControlProps) {
        self.state.lock().props = props;
    }

    /// Updates only the parent-provided value.
    pub fn set_value(&self, value: impl Into<String>) {
        self.state.lock().props.value = value.into();
    }

    /// Fetches the records again and, when appropriate, proposes a default.
    ///
    /// Failures are reported through the notifier and never returned. Does
    /// nothing while unmounted. When refreshes overlap, only the most recent
    /// one settles the control; earlier results are dropped.
    pub async fn refresh(&self) {
        let request = {
            let mut state = self.state.lock();
            if !state.mounted {
                return;
            }
            state.request += 1;
            state.phase = Phase::Loading;
            state.request
        };

        match self.fetch().await {
            Ok(records) => self.populate(request, records),
            Err(err) => self.fail(request, &err),
        }
    }

    async fn fetch(&self) -> Result<Vec<AcademicYearRecord>, FetchError> {
        let token = self.deps.tokens.bearer_token()?;
        self.deps.source.academic_years(&token).await
    }

    fn populate(&self, request: u64, records: Vec<AcademicYearRecord>) {
        let proposal = {
            let mut state = self.state.lock();
            if !state.is_latest(request) {
                tracing::debug!(request, "superseded fetch settled, ignoring");
                return;
            }
            state.records = records;
            state.phase = Phase::Populated;
            tracing::debug!(count = state.records.len(), "academic years loaded");

            let proposal = if state.props.value.is_empty() && !state.default_applied {
                self.pick_default(&state.records)
            } else {
                None
            };
            if proposal.is_some() {
                state.default_applied = true;
            }
            proposal
        };

        // Outside the lock: the parent may call back into the control.
        if let Some(id) = proposal {
            (self.on_change)(&id);
        }
    }

    fn pick_default(&self, records: &[AcademicYearRecord]) -> Option<String> {
        let today = match self.deps.clock.today() {
            Ok(today) => today,
            Err(err) => {
                tracing::error!(error = %err, "cannot read current date, no default applied");
                return None;
            }
        };

        let Some((record, reason)) = resolve_with_reason(records, today) else {
            tracing::debug!(%today, "no default academic year");
            return None;
        };
        tracing::info!(
            id = %record.id,
            label = %record.label,
            %reason,
            %today,
            "default academic year applied"
        );
        Some(record.id.clone())
    }

    fn fail(&self, request: u64, err: &FetchError) {
        {
            let mut state = self.state.lock();
            if !state.is_latest(request) {
                tracing::debug!(request, error = %err, "superseded fetch failed, ignoring");
                return;
            }
            state.records.clear();
            state.phase = Phase::FetchFailed;
        }
        tracing::error!(error = %err, "failed to load academic years");
        self.deps
            .notifier
            .notify(Notification::error(err.user_message()));
    }

    /// User picked an option. Proposed to the parent as-is.
    ///
    /// # Errors
    /// Returns `InteractionError` while loading or when disabled.
    pub fn select(&self, id: &str) -> Result<(), InteractionError> {
        {
            let state = self.state.lock();
            if state.phase == Phase::Loading {
                return Err(InteractionError::Loading);
            }
            if state.props.disabled {
                return Err(InteractionError::Disabled);
            }
        }
        (self.on_change)(id);
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.state.lock().phase
    }

    pub fn default_applied(&self) -> bool {
        self.state.lock().default_applied
    }

    pub fn records(&self) -> Vec<AcademicYearRecord> {
        self.state.lock().records.clone()
    }

    pub fn view(&self) -> ControlView {
        let state = self.state.lock();
        let loading = state.phase == Phase::Loading;
        ControlView {
            options: state
                .records
                .iter()
                .map(|r| SelectOption {
                    value: r.id.clone(),
                    label: r.label.clone(),
                })
                .collect(),
            selected: Some(state.props.value.clone()).filter(|v| !v.is_empty()),
            placeholder: PLACEHOLDER,
            required: state.props.required,
            disabled: state.props.disabled || loading,
            loading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{Level, MemoryNotifier};
    use crate::test_utils::{StubSource, record, today};
    use crate::token::SessionTokens;

    struct Harness {
        control: SelectionControl,
        proposed: Arc<Mutex<Vec<String>>>,
        notifier: Arc<MemoryNotifier>,
        source: Arc<StubSource>,
    }

    fn harness(source: StubSource, tokens: SessionTokens, value: &str) -> Harness {
        let source = Arc::new(source);
        let notifier = Arc::new(MemoryNotifier::new());
        let proposed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&proposed);

        let deps = ControlDeps {
            source: source.clone(),
            tokens: Arc::new(tokens),
            notifier: notifier.clone(),
            clock: Arc::new(FixedClock(today(2025, 5))),
        };
        let control = SelectionControl::new(
            deps,
            ControlProps::with_value(value),
            Arc::new(move |id: &str| sink.lock().push(id.to_owned())),
        );

        Harness {
            control,
            proposed,
            notifier,
            source,
        }
    }

    fn may_records() -> Vec<AcademicYearRecord> {
        vec![record("a", "2025-2026", 6), record("b", "2024-2025", 6)]
    }

    fn ready(value: &str) -> Harness {
        let source = StubSource::ok(may_records());
        harness(source, SessionTokens::with_token("t"), value)
    }

    #[tokio::test]
    async fn test_mount_proposes_default_once() {
        let h = ready("");
        assert_eq!(h.control.phase(), Phase::Idle);

        h.control.mount().await;

        assert_eq!(h.control.phase(), Phase::Populated);
        assert!(h.control.default_applied());
        assert_eq!(*h.proposed.lock(), ["b"]);
        assert_eq!(h.source.tokens_seen(), ["t"]);

        // Parent has not yet echoed the value back; a refresh must not propose again.
        h.control.refresh().await;
        assert_eq!(*h.proposed.lock(), ["b"]);
        assert_eq!(h.source.calls(), 2);
    }

    #[tokio::test]
    async fn test_existing_value_suppresses_default() {
        let h = ready("a");
        h.control.mount().await;

        assert_eq!(h.control.phase(), Phase::Populated);
        assert!(!h.control.default_applied());
        assert!(h.proposed.lock().is_empty());
        assert_eq!(h.control.view().selected.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_no_candidate_leaves_selection_empty() {
        let records = vec![record("old", "2020-2021", 6), record("odd", "Legacy", 1)];
        let source = StubSource::ok(records);
        let h = harness(source, SessionTokens::with_token("t"), "");
        h.control.mount().await;

        assert_eq!(h.control.phase(), Phase::Populated);
        assert!(!h.control.default_applied());
        assert!(h.proposed.lock().is_empty());
        assert_eq!(h.control.view().options.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_token_reports_and_skips_fetch() {
        let source = StubSource::ok(may_records());
        let h = harness(source, SessionTokens::new(), "");
        h.control.mount().await;

        assert_eq!(h.control.phase(), Phase::FetchFailed);
        assert_eq!(h.source.calls(), 0);
        assert!(h.proposed.lock().is_empty());

        let notes = h.notifier.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, Level::Error);
        assert_eq!(notes[0].message, crate::FETCH_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_server_message_shown_verbatim() {
        let source = StubSource::failing(|| FetchError::Rejected {
            message: Some("Session expired".to_owned()),
        });
        let h = harness(source, SessionTokens::with_token("t"), "");
        h.control.mount().await;

        assert_eq!(h.control.phase(), Phase::FetchFailed);
        assert_eq!(
            h.notifier.drain(),
            vec![Notification::error("Session expired")]
        );
        assert!(h.control.view().options.is_empty());
        assert!(!h.control.view().disabled);
    }

    #[tokio::test]
    async fn test_user_override_blocks_later_default() {
        let source = StubSource::failing(|| FetchError::Status {
            status: 503,
            message: None,
        });
        let h = harness(source, SessionTokens::with_token("t"), "");
        h.control.mount().await;
        assert_eq!(h.control.phase(), Phase::FetchFailed);

        h.control.select("x").unwrap();
        h.control.set_value("x");

        h.source.set_records(may_records());
        h.control.refresh().await;

        assert_eq!(h.control.phase(), Phase::Populated);
        assert_eq!(*h.proposed.lock(), ["x"]);
        assert!(!h.control.default_applied());
    }

    #[tokio::test]
    async fn test_remount_starts_fresh_lifecycle() {
        let h = ready("");
        h.control.mount().await;
        assert_eq!(*h.proposed.lock(), ["b"]);

        h.control.unmount();
        assert!(!h.control.is_mounted());
        h.control.mount().await;

        // Value is still empty on the parent side, so the new lifecycle proposes again.
        assert_eq!(*h.proposed.lock(), ["b", "b"]);
    }

    #[tokio::test]
    async fn test_select_is_forwarded_without_validation() {
        let h = ready("a");
        h.control.mount().await;

        h.control.select("not-listed").unwrap();
        assert_eq!(*h.proposed.lock(), ["not-listed"]);
        assert_eq!(h.control.phase(), Phase::Populated);
    }

    #[tokio::test]
    async fn test_select_refused_when_disabled() {
        let h = ready("a");
        h.control.mount().await;
        h.control.set_props(ControlProps {
            value: "a".to_owned(),
            required: true,
            disabled: true,
        });

        assert_eq!(h.control.select("b"), Err(InteractionError::Disabled));
        let view = h.control.view();
        assert!(view.disabled);
        assert!(view.required);
        assert!(!view.loading);
        assert!(h.proposed.lock().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_before_mount_does_nothing() {
        let h = ready("");
        h.control.refresh().await;

        assert_eq!(h.control.phase(), Phase::Idle);
        assert_eq!(h.source.calls(), 0);
    }

    #[tokio::test]
    async fn test_view_lists_options_in_server_order() {
        let h = ready("");
        h.control.mount().await;

        let view = h.control.view();
        let labels: Vec<&str> = view.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, ["2025-2026", "2024-2025"]);
        assert_eq!(view.placeholder, PLACEHOLDER);
        // The parent owns the value; nothing is selected until it echoes "b" back.
        assert_eq!(view.selected, None);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::FetchFailed.to_string(), "fetch-failed");
        assert_eq!(Phase::Loading.to_string(), "loading");
    }
}
