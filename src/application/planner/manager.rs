//! PlanStateManager - owns the editable plan and keeps it in sync with the
//! remote planner document.
//!
//! # Concurrency
//!
//! - Plan state sits behind a synchronous mutex that is never held across an
//!   `.await`, so every read sees a consistent plan.
//! - Network operations (load and save) are serialized by an async lock; at
//!   most one save is ever in flight.
//! - Autosave is a trailing debounce. At most one timer exists; every
//!   qualifying edit cancels it and starts a new one. A timer that fires
//!   while a network operation is running does not start a second save; it
//!   marks the plan as deferred and the debounce is re-armed once that
//!   operation resolves.
//! - An in-flight save is never cancelled. Whichever save resolves last
//!   defines the saved signature.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::view::{planned_blocks, AutosaveState, Derived, PlanView};
use crate::config::AutosaveConfig;
use crate::domain::foundation::{CourseCode, StateMachine, Timestamp};
use crate::domain::planner::{PlanSignature, PlannedSet, PlannerError, PlannerSnapshot, PlannerStatus};
use crate::domain::schedule::detect_conflicts;
use crate::ports::{PlannerStore, SessionContext};

/// Editable plan plus sync bookkeeping.
#[derive(Default)]
struct PlanState {
    status: PlannerStatus,
    snapshot: Option<PlannerSnapshot>,
    planned: PlannedSet,
    saved_signature: Option<PlanSignature>,
    last_error: Option<PlannerError>,
    last_saved_at: Option<Timestamp>,
    pending_save: Option<JoinHandle<()>>,
    debounce_generation: u64,
    deferred: bool,
}

impl PlanState {
    fn transition(&mut self, next: PlannerStatus) -> Result<(), PlannerError> {
        self.status = self
            .status
            .transition_to(next)
            .map_err(|e| PlannerError::InvalidState(e.to_string()))?;
        Ok(())
    }

    /// Edits need a loaded plan, and a refresh would overwrite them.
    fn ensure_editable(&self) -> Result<(), PlannerError> {
        if self.status == PlannerStatus::Loading {
            return Err(PlannerError::InvalidState("planner is loading".to_string()));
        }
        if self.snapshot.is_none() {
            return Err(PlannerError::NotLoaded);
        }
        Ok(())
    }

    fn cancel_debounce(&mut self) {
        if let Some(handle) = self.pending_save.take() {
            handle.abort();
            tracing::debug!("Cancelled pending autosave");
        }
    }

    fn has_unsaved_changes(&self) -> bool {
        match (&self.snapshot, &self.saved_signature) {
            (Some(_), Some(saved)) => *saved != self.planned.signature(),
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    fn conflict_count(&self) -> usize {
        self.snapshot
            .as_ref()
            .map(|snapshot| detect_conflicts(&planned_blocks(snapshot, &self.planned)).len())
            .unwrap_or(0)
    }
}

struct Shared {
    store: Arc<dyn PlannerStore>,
    session: Arc<dyn SessionContext>,
    autosave: AutosaveConfig,
    state: Mutex<PlanState>,
    io_lock: tokio::sync::Mutex<()>,
    status_tx: watch::Sender<PlannerStatus>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        let state = match self.state.get_mut() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.cancel_debounce();
    }
}

/// Owns the live plan, derives the schedule view, and persists changes.
///
/// Cloning is cheap; clones share the same state.
///
/// # Example
///
/// ```ignore
/// let manager = PlanStateManager::new(store, session);
/// manager.load().await?;
/// manager.toggle_planned("MC202", None)?;
/// let view = manager.view();
/// ```
#[derive(Clone)]
pub struct PlanStateManager {
    shared: Arc<Shared>,
}

impl PlanStateManager {
    /// Creates a manager with default autosave settings.
    pub fn new(store: Arc<dyn PlannerStore>, session: Arc<dyn SessionContext>) -> Self {
        Self::with_config(store, session, AutosaveConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn PlannerStore>,
        session: Arc<dyn SessionContext>,
        autosave: AutosaveConfig,
    ) -> Self {
        let (status_tx, _) = watch::channel(PlannerStatus::Idle);
        Self {
            shared: Arc::new(Shared {
                store,
                session,
                autosave,
                state: Mutex::new(PlanState::default()),
                io_lock: tokio::sync::Mutex::new(()),
                status_tx,
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, PlanState> {
        match self.shared.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn publish_status(&self, status: PlannerStatus) {
        self.shared.status_tx.send_replace(status);
    }

    // ───────────────────────────────────────────────────────────────
    // Network operations
    // ───────────────────────────────────────────────────────────────

    /// Fetches the planner document and resets the plan from it.
    ///
    /// The plan becomes the saved codes plus every enrolled course that is
    /// offered. A pending autosave is cancelled. On failure the previous
    /// plan, if any, is kept.
    ///
    /// # Errors
    ///
    /// - `NoSession` if there is no session token
    /// - `FetchFailed` if the store call fails or returns a non-object
    pub async fn load(&self) -> Result<(), PlannerError> {
        let _io = self.shared.io_lock.lock().await;

        {
            let mut state = self.lock_state();
            state.cancel_debounce();
            state.transition(PlannerStatus::Loading)?;
        }
        self.publish_status(PlannerStatus::Loading);

        let fetched = match self.shared.session.token() {
            None => Err(PlannerError::NoSession),
            Some(token) => self
                .shared
                .store
                .fetch(&token)
                .await
                .map_err(|e| PlannerError::fetch_failed(e.to_string()))
                .and_then(|doc| {
                    PlannerSnapshot::from_payload(doc)
                        .map_err(|e| PlannerError::fetch_failed(e.to_string()))
                }),
        };

        let (outcome, status) = {
            let mut state = self.lock_state();
            let outcome = match fetched {
                Ok(snapshot) => {
                    state.planned = snapshot.initial_plan();
                    state.saved_signature = Some(snapshot.saved_signature());
                    tracing::info!(
                        courses = snapshot.curriculum().len(),
                        planned = state.planned.len(),
                        "Planner loaded"
                    );
                    state.snapshot = Some(snapshot);
                    state.last_error = None;
                    state.deferred = false;
                    state.transition(PlannerStatus::Ready)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Planner load failed");
                    state.last_error = Some(err.clone());
                    state.transition(PlannerStatus::Error).and(Err(err))
                }
            };
            (outcome, state.status)
        };
        self.publish_status(status);
        outcome
    }

    /// Saves the live plan now, cancelling any pending autosave.
    ///
    /// Waits for an in-flight save to resolve first. Conflicts do not block
    /// an explicit save.
    ///
    /// # Errors
    ///
    /// - `NotLoaded` before the first successful load
    /// - `NoSession` if there is no session token
    /// - `SaveFailed` if the store call fails; the local plan is kept
    pub async fn save_planner(&self) -> Result<(), PlannerError> {
        self.lock_state().cancel_debounce();
        let _io = self.shared.io_lock.lock().await;
        self.save_locked().await
    }

    /// Empties the plan and saves it immediately.
    ///
    /// Bypasses both the debounce and the conflict gate. Any pending
    /// autosave is cancelled. An in-flight save or refresh is awaited first,
    /// so the cleared plan is what reaches the store.
    pub async fn clear_planner(&self) -> Result<(), PlannerError> {
        let _io = self.shared.io_lock.lock().await;
        {
            let mut state = self.lock_state();
            if state.snapshot.is_none() {
                return Err(PlannerError::NotLoaded);
            }
            state.planned.clear();
            state.cancel_debounce();
        }
        tracing::info!("Planner cleared");
        self.save_locked().await
    }

    /// Performs one save. The caller must hold `io_lock`.
    async fn save_locked(&self) -> Result<(), PlannerError> {
        let (payload, signature) = {
            let mut state = self.lock_state();
            let snapshot = state.snapshot.as_ref().ok_or(PlannerError::NotLoaded)?;
            let payload = snapshot.to_payload(&state.planned);
            let signature = state.planned.signature();
            state.cancel_debounce();
            state.transition(PlannerStatus::Saving)?;
            (payload, signature)
        };
        self.publish_status(PlannerStatus::Saving);

        let saved = match self.shared.session.token() {
            None => Err(PlannerError::NoSession),
            Some(token) => self
                .shared
                .store
                .save(&token, &payload)
                .await
                .map_err(|e| PlannerError::save_failed(e.to_string()))
                .and_then(|doc| {
                    PlannerSnapshot::from_payload(doc)
                        .map_err(|e| PlannerError::save_failed(e.to_string()))
                }),
        };

        let (outcome, status, rearm) = {
            let mut state = self.lock_state();
            let succeeded = saved.is_ok();
            let outcome = match saved {
                Ok(snapshot) => {
                    state.snapshot = Some(snapshot);
                    state.saved_signature = Some(signature);
                    state.last_saved_at = Some(Timestamp::now());
                    state.last_error = None;
                    tracing::info!(planned = state.planned.len(), "Planner saved");
                    state.transition(PlannerStatus::Ready)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Planner save failed");
                    state.last_error = Some(err.clone());
                    state.transition(PlannerStatus::Error).and(Err(err))
                }
            };
            // A failed save is not retried unless an edit arrived meanwhile.
            let rearm = succeeded || state.deferred;
            state.deferred = false;
            (outcome, state.status, rearm)
        };
        self.publish_status(status);

        if rearm {
            let mut state = self.lock_state();
            self.evaluate_autosave(&mut state);
        }
        outcome
    }

    // ───────────────────────────────────────────────────────────────
    // Local edits
    // ───────────────────────────────────────────────────────────────

    /// Plans or unplans `code`. Returns whether it is planned afterwards.
    ///
    /// Turning a course on with `section` also selects that section.
    ///
    /// # Errors
    ///
    /// - `NotLoaded` before the first successful load
    /// - `InvalidState` while a refresh is in flight
    /// - `Validation` if `code` is blank
    pub fn toggle_planned(&self, code: &str, section: Option<&str>) -> Result<bool, PlannerError> {
        let code = CourseCode::new(code)?;
        let mut state = self.lock_state();
        state.ensure_editable()?;
        let planned = state.planned.toggle(code.clone(), section);
        tracing::debug!(%code, planned, "Toggled course");
        self.after_edit(&mut state);
        Ok(planned)
    }

    /// Chooses `section` as the offer shown for `code`, planning it if needed.
    ///
    /// A section that is not in the curriculum is accepted; the grid then
    /// falls back to every offer of the course. Fails like `toggle_planned`.
    pub fn select_offer(&self, code: &str, section: &str) -> Result<(), PlannerError> {
        let code = CourseCode::new(code)?;
        let mut state = self.lock_state();
        state.ensure_editable()?;
        tracing::debug!(%code, section, "Selected offer");
        state.planned.select(code, section);
        self.after_edit(&mut state);
        Ok(())
    }

    fn after_edit(&self, state: &mut PlanState) {
        if state.status.is_busy() {
            state.cancel_debounce();
            state.deferred = true;
            tracing::debug!(status = %state.status, "Edit during network operation; autosave deferred");
            return;
        }
        self.evaluate_autosave(state);
    }

    // ───────────────────────────────────────────────────────────────
    // Autosave
    // ───────────────────────────────────────────────────────────────

    fn should_autosave(&self, state: &PlanState) -> bool {
        self.shared.autosave.enabled
            && !state.status.is_busy()
            && state.has_unsaved_changes()
            && state.conflict_count() == 0
    }

    /// Re-arms the debounce if the plan qualifies, otherwise cancels it.
    fn evaluate_autosave(&self, state: &mut PlanState) {
        state.cancel_debounce();
        if !self.should_autosave(state) {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime available; autosave not scheduled");
            return;
        };

        state.debounce_generation += 1;
        let generation = state.debounce_generation;
        let delay = self.shared.autosave.debounce();
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);

        state.pending_save = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = weak.upgrade() {
                PlanStateManager { shared }.run_autosave(generation).await;
            }
        }));
        tracing::debug!(delay_ms = delay.as_millis() as u64, "Autosave scheduled");
    }

    /// Body of a debounce timer that has elapsed.
    async fn run_autosave(&self, generation: u64) {
        let Ok(_io) = self.shared.io_lock.try_lock() else {
            let mut state = self.lock_state();
            if state.debounce_generation == generation {
                state.pending_save = None;
                state.deferred = true;
                tracing::debug!("Autosave fired during network operation; deferred");
            }
            return;
        };

        {
            let mut state = self.lock_state();
            if state.debounce_generation != generation {
                return;
            }
            // Detach: from here on this save can no longer be cancelled.
            state.pending_save = None;
            if !self.should_autosave(&state) {
                return;
            }
        }

        tracing::debug!("Autosave firing");
        if let Err(err) = self.save_locked().await {
            tracing::debug!(error = %err, "Autosave did not complete");
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Queries
    // ───────────────────────────────────────────────────────────────

    /// Derived view of the live plan. Never schedules anything.
    pub fn view(&self) -> PlanView {
        let state = self.lock_state();
        let derived = Derived::compute(state.snapshot.as_ref(), &state.planned);
        let has_unsaved_changes = state.has_unsaved_changes();
        let autosave = self.autosave_state(&state, has_unsaved_changes, derived.conflicts.len());
        PlanView {
            status: state.status,
            day_groups: derived.day_groups,
            blocks: derived.blocks,
            conflicts: derived.conflicts,
            signature: state.planned.signature(),
            has_unsaved_changes,
            autosave,
            last_error: state.last_error.as_ref().map(|e| e.to_string()),
        }
    }

    fn autosave_state(&self, state: &PlanState, dirty: bool, conflicts: usize) -> AutosaveState {
        if state.snapshot.is_none() {
            AutosaveState::NotLoaded
        } else if state.status == PlannerStatus::Saving {
            if dirty && state.deferred {
                AutosaveState::Deferred
            } else {
                AutosaveState::Saving
            }
        } else if !dirty {
            AutosaveState::UpToDate
        } else if !self.shared.autosave.enabled {
            AutosaveState::Disabled
        } else if conflicts > 0 {
            AutosaveState::BlockedByConflicts { conflicts }
        } else if state.pending_save.is_some() {
            AutosaveState::Scheduled
        } else if state.deferred {
            AutosaveState::Deferred
        } else if state.status == PlannerStatus::Error {
            AutosaveState::Failed
        } else {
            AutosaveState::Unsaved
        }
    }

    pub fn status(&self) -> PlannerStatus {
        self.lock_state().status
    }

    /// Receiver that observes every status change.
    pub fn subscribe(&self) -> watch::Receiver<PlannerStatus> {
        self.shared.status_tx.subscribe()
    }

    /// Most recent failure; cleared by the next successful load or save.
    pub fn last_error(&self) -> Option<PlannerError> {
        self.lock_state().last_error.clone()
    }

    pub fn last_saved_at(&self) -> Option<Timestamp> {
        self.lock_state().last_saved_at
    }

    /// Copy of the live plan.
    pub fn planned(&self) -> PlannedSet {
        self.lock_state().planned.clone()
    }

    /// Copy of the last document received from the store.
    pub fn snapshot(&self) -> Option<PlannerSnapshot> {
        self.lock_state().snapshot.clone()
    }

    /// True if the live plan differs from the last saved plan.
    pub fn has_unsaved_changes(&self) -> bool {
        self.lock_state().has_unsaved_changes()
    }

    /// True while a debounced save is waiting to fire.
    pub fn autosave_pending(&self) -> bool {
        self.lock_state().pending_save.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::session::StaticSession;
    use crate::adapters::store::InMemoryPlannerStore;
    use crate::ports::StoreError;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn document() -> Value {
        json!({
            "term": "2024s1",
            "curriculum": [
                { "code": "MC202", "offers": [
                    { "turma": "A", "events": [{ "day": 0, "start_hour": 8, "end_hour": 10 }] }
                ]},
                { "code": "MA111", "offers": [
                    { "turma": "A", "events": [{ "day": 0, "start_hour": 9, "end_hour": 11 }] }
                ]},
                { "code": "F 128", "offers": [
                    { "turma": "A", "events": [{ "day": 3, "start_hour": 14, "end_hour": 16 }] }
                ]}
            ],
            "planned_codes": []
        })
    }

    fn manager_with(store: &InMemoryPlannerStore) -> PlanStateManager {
        PlanStateManager::new(Arc::new(store.clone()), Arc::new(StaticSession::new("token")))
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn edits_before_load_are_rejected() {
        let store = InMemoryPlannerStore::new(document());
        let manager = manager_with(&store);

        assert_eq!(manager.toggle_planned("MC202", None), Err(PlannerError::NotLoaded));
        assert_eq!(manager.select_offer("MC202", "A"), Err(PlannerError::NotLoaded));
        assert_eq!(manager.save_planner().await, Err(PlannerError::NotLoaded));
        assert_eq!(manager.clear_planner().await, Err(PlannerError::NotLoaded));
        assert_eq!(manager.view().autosave, AutosaveState::NotLoaded);
    }

    #[tokio::test]
    async fn blank_code_is_a_validation_error() {
        let store = InMemoryPlannerStore::new(document());
        let manager = manager_with(&store);
        manager.load().await.unwrap();

        assert!(matches!(
            manager.toggle_planned("  ", None),
            Err(PlannerError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn load_without_session_sets_error() {
        let store = InMemoryPlannerStore::new(document());
        let manager = PlanStateManager::new(Arc::new(store.clone()), Arc::new(StaticSession::signed_out()));

        assert_eq!(manager.load().await, Err(PlannerError::NoSession));
        assert_eq!(manager.status(), PlannerStatus::Error);
        assert_eq!(manager.last_error(), Some(PlannerError::NoSession));
        assert_eq!(store.fetch_count(), 0);
    }

    #[tokio::test]
    async fn subscribers_see_status_changes() {
        let store = InMemoryPlannerStore::new(document());
        let manager = manager_with(&store);
        let mut rx = manager.subscribe();

        manager.load().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), PlannerStatus::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn edit_schedules_a_single_debounced_save() {
        let store = InMemoryPlannerStore::new(document());
        let manager = manager_with(&store);
        manager.load().await.unwrap();

        manager.toggle_planned("MC202", None).unwrap();
        assert!(manager.autosave_pending());
        assert_eq!(manager.view().autosave, AutosaveState::Scheduled);

        tokio::time::sleep(Duration::from_millis(799)).await;
        settle().await;
        assert_eq!(store.save_attempts(), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(store.save_attempts(), 1);
        assert!(!manager.has_unsaved_changes());
        assert_eq!(manager.view().autosave, AutosaveState::UpToDate);
    }

    #[tokio::test(start_paused = true)]
    async fn conflicting_plan_is_not_autosaved() {
        let store = InMemoryPlannerStore::new(document());
        let manager = manager_with(&store);
        manager.load().await.unwrap();

        manager.toggle_planned("MC202", None).unwrap();
        manager.toggle_planned("MA111", None).unwrap();
        assert!(!manager.autosave_pending());
        assert_eq!(
            manager.view().autosave,
            AutosaveState::BlockedByConflicts { conflicts: 1 }
        );

        tokio::time::sleep(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(store.save_attempts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_autosave_never_schedules() {
        let store = InMemoryPlannerStore::new(document());
        let manager = PlanStateManager::with_config(
            Arc::new(store.clone()),
            Arc::new(StaticSession::new("token")),
            AutosaveConfig {
                enabled: false,
                ..AutosaveConfig::default()
            },
        );
        manager.load().await.unwrap();
        manager.toggle_planned("MC202", None).unwrap();

        assert!(!manager.autosave_pending());
        assert_eq!(manager.view().autosave, AutosaveState::Disabled);
        tokio::time::sleep(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(store.save_attempts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_save_is_not_retried_automatically() {
        let store = InMemoryPlannerStore::new(document());
        let manager = manager_with(&store);
        manager.load().await.unwrap();
        store.fail_save(Some(StoreError::network("offline")));

        manager.toggle_planned("F 128", None).unwrap();
        tokio::time::sleep(Duration::from_millis(801)).await;
        settle().await;

        assert_eq!(store.save_attempts(), 1);
        assert_eq!(manager.status(), PlannerStatus::Error);
        assert_eq!(manager.view().autosave, AutosaveState::Failed);
        assert!(manager.planned().contains("F 128"));

        tokio::time::sleep(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(store.save_attempts(), 1);
    }

    #[tokio::test]
    async fn refresh_failure_keeps_previous_plan() {
        let store = InMemoryPlannerStore::new(document());
        let manager = manager_with(&store);
        manager.load().await.unwrap();
        manager.toggle_planned("MC202", None).unwrap();

        store.fail_fetch(Some(StoreError::Timeout { timeout_secs: 30 }));
        let err = manager.load().await.unwrap_err();

        assert!(matches!(err, PlannerError::FetchFailed(_)));
        assert!(manager.planned().contains("MC202"));
        assert!(manager.snapshot().is_some());
    }

    #[tokio::test]
    async fn dropping_the_manager_cancels_pending_autosave() {
        let store = InMemoryPlannerStore::new(document());
        let manager = manager_with(&store);
        manager.load().await.unwrap();
        manager.toggle_planned("MC202", None).unwrap();
        drop(manager);

        tokio::time::sleep(Duration::from_millis(900)).await;
        assert_eq!(store.save_attempts(), 0);
    }
}
