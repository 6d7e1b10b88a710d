//! Optimistic status transitions.
//!
//! A transition is applied to the store before the API hears about it and
//! settled when the request completes. Several transitions may be in flight
//! at once; each is applied on top of the list as left by the previous one.
//!
//! On failure the default [`RevertPolicy::SingleField`] puts back only the
//! status of the failed record. Transitions on the same record form a
//! chain: a failed transition that has since been superseded hands its
//! rollback target to its successor instead of touching the visible state.
//! [`RevertPolicy::WholeSnapshot`] restores the full list captured before
//! the transition, which can discard overlapping changes.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use validator::Validate;

use super::notify::{Confirm, Notifier, Toast};
use super::store::ApplicationStore;
use crate::client::ApplicationsApi;
use crate::dto::application_dto::{StatusChangePayload, UpdateApplicationPayload};
use crate::error::{ActionResult, Error, Result, GENERIC_FAILURE_MESSAGE};
use crate::models::application::{Application, ApplicationStatus, RecordStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevertPolicy {
    #[default]
    SingleField,
    WholeSnapshot,
}

impl fmt::Display for RevertPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevertPolicy::SingleField => f.write_str("single_field"),
            RevertPolicy::WholeSnapshot => f.write_str("whole_snapshot"),
        }
    }
}

impl FromStr for RevertPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single_field" => Ok(RevertPolicy::SingleField),
            "whole_snapshot" => Ok(RevertPolicy::WholeSnapshot),
            other => Err(Error::Validation(format!(
                "Unknown revert policy: {} (expected single_field or whole_snapshot)",
                other
            ))),
        }
    }
}

/// Reviewer edits made outside a status change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewUpdate {
    pub rating: Option<u8>,
    pub notes: Option<String>,
}

struct InFlight {
    seq: u64,
    from: RecordStatus,
    to: ApplicationStatus,
}

/// In-flight transitions per record, oldest first.
#[derive(Default)]
struct Ledger {
    next_seq: u64,
    chains: HashMap<String, Vec<InFlight>>,
}

impl Ledger {
    fn begin(&mut self, id: &str, from: RecordStatus, to: ApplicationStatus) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.chains
            .entry(id.to_string())
            .or_default()
            .push(InFlight { seq, from, to });
        seq
    }

    fn take(&mut self, id: &str, seq: u64) -> Option<(usize, InFlight, bool)> {
        let chain = self.chains.get_mut(id)?;
        let idx = chain.iter().position(|t| t.seq == seq)?;
        let entry = chain.remove(idx);
        let was_newest = idx == chain.len();
        if chain.is_empty() {
            self.chains.remove(id);
        }
        Some((idx, entry, was_newest))
    }

    fn confirm(&mut self, id: &str, seq: u64) {
        self.take(id, seq);
    }

    /// Removes a failed transition. Returns the status to restore when it
    /// was still the newest on its record; otherwise its rollback target
    /// moves to the transition that superseded it.
    fn fail(&mut self, id: &str, seq: u64) -> Option<(RecordStatus, ApplicationStatus)> {
        let (idx, entry, was_newest) = self.take(id, seq)?;
        if was_newest {
            return Some((entry.from, entry.to));
        }
        if let Some(next) = self.chains.get_mut(id).and_then(|c| c.get_mut(idx)) {
            next.from = entry.from;
        }
        None
    }

    fn pending(&self) -> usize {
        self.chains.values().map(Vec::len).sum()
    }
}

/// Handle on a persistence request that is still running.
#[derive(Debug)]
pub struct PendingTransition {
    pub application_id: String,
    pub to: ApplicationStatus,
    handle: JoinHandle<ActionResult>,
}

impl PendingTransition {
    pub async fn wait(self) -> ActionResult {
        match self.handle.await {
            Ok(result) => result,
            Err(err) => ActionResult::failed(format!("Status update task failed: {}", err)),
        }
    }
}

#[derive(Debug)]
pub enum Transition {
    /// Nothing to do: unknown record or already in the target stage.
    NoOp,
    Pending(PendingTransition),
    /// Refused before the store was touched.
    Failed(ActionResult),
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        matches!(self, Transition::NoOp)
    }

    pub async fn wait(self) -> ActionResult {
        match self {
            Transition::NoOp => ActionResult::ok(),
            Transition::Failed(result) => result,
            Transition::Pending(pending) => pending.wait().await,
        }
    }
}

#[derive(Clone)]
pub struct TransitionController {
    api: Arc<dyn ApplicationsApi>,
    store: ApplicationStore,
    notifier: Arc<dyn Notifier>,
    policy: RevertPolicy,
    position_id: Option<String>,
    ledger: Arc<Mutex<Ledger>>,
}

impl TransitionController {
    pub fn new(
        api: Arc<dyn ApplicationsApi>,
        store: ApplicationStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            store,
            notifier,
            policy: RevertPolicy::default(),
            position_id: None,
            ledger: Arc::new(Mutex::new(Ledger::default())),
        }
    }

    pub fn with_policy(mut self, policy: RevertPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn for_position(mut self, position_id: impl Into<String>) -> Self {
        self.position_id = Some(position_id.into());
        self
    }

    pub fn store(&self) -> &ApplicationStore {
        &self.store
    }

    pub fn policy(&self) -> RevertPolicy {
        self.policy
    }

    /// Number of status changes still waiting on the API.
    pub fn in_flight(&self) -> usize {
        self.ledger().pending()
    }

    fn ledger(&self) -> std::sync::MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-fetches the list for this controller's position.
    pub async fn refresh(&self) -> ActionResult {
        match self
            .store
            .load(self.api.as_ref(), self.position_id.as_deref())
            .await
        {
            Ok(_) => ActionResult::ok(),
            Err(err) => ActionResult::failed(err.user_message()),
        }
    }

    /// Moves `id` to `status`. Outside a Tokio runtime the change is refused
    /// and the store is left as it was.
    pub fn change_status(&self, id: &str, status: ApplicationStatus) -> Transition {
        self.begin(id, StatusChangePayload::to(status))
    }

    /// Like [`change_status`](Self::change_status) for a stage key coming
    /// from outside the type system. Unknown keys are rejected before any
    /// state changes.
    pub fn change_status_key(&self, id: &str, key: &str) -> Result<Transition> {
        let status = key.parse::<ApplicationStatus>()?;
        Ok(self.change_status(id, status))
    }

    /// Status change carrying reviewer fields (notes, rating, rejection
    /// reason). Only the status is applied optimistically; the reviewer
    /// fields are taken from the server's answer once it confirms.
    pub fn change_status_with(&self, id: &str, change: StatusChangePayload) -> Result<Transition> {
        if let Err(errors) = change.validate() {
            let err = Error::from(errors);
            self.notifier.notify(Toast::error(err.user_message()));
            return Err(err);
        }
        Ok(self.begin(id, change))
    }

    fn begin(&self, id: &str, change: StatusChangePayload) -> Transition {
        let Some(current) = self.store.get(id) else {
            debug!(application_id = id, "status change for unknown application ignored");
            return Transition::NoOp;
        };
        let to = change.status;
        if current.status.is(to) {
            debug!(application_id = id, status = %to, "already in target stage");
            return Transition::NoOp;
        }
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(err) => {
                error!(
                    application_id = id,
                    error = %err,
                    "status change outside a Tokio runtime"
                );
                let message = GENERIC_FAILURE_MESSAGE.to_string();
                self.notifier.notify(Toast::error(message.clone()));
                return Transition::Failed(ActionResult::failed(message));
            }
        };

        let snapshot = match self.policy {
            RevertPolicy::WholeSnapshot => Some(self.store.snapshot()),
            RevertPolicy::SingleField => None,
        };
        let seq = self.ledger().begin(id, current.status.clone(), to);
        self.store.update_record(id, |app| app.with_status(to));
        info!(
            application_id = id,
            from = %current.status,
            to = %to,
            seq,
            "optimistic status change applied"
        );

        let this = self.clone();
        let application_id = id.to_string();
        let handle = runtime.spawn(async move {
            let merge_review = change.has_review_fields();
            let result = this.api.update_status(&application_id, change).await;
            this.settle(&application_id, seq, snapshot, merge_review, result)
        });

        Transition::Pending(PendingTransition {
            application_id: id.to_string(),
            to,
            handle,
        })
    }

    fn settle(
        &self,
        id: &str,
        seq: u64,
        snapshot: Option<Vec<Arc<Application>>>,
        merge_review: bool,
        result: Result<Application>,
    ) -> ActionResult {
        match result {
            Ok(confirmed) => {
                self.ledger().confirm(id, seq);
                if merge_review {
                    self.store
                        .update_record(id, |app| app.with_review_from(&confirmed));
                }
                info!(application_id = id, seq, "status change confirmed");
                let label = match confirmed.status.stage() {
                    Some(stage) => stage.label(),
                    None => confirmed.status.as_str(),
                };
                self.notifier
                    .notify(Toast::success(format!("Moved to {}", label)));
                ActionResult::ok()
            }
            Err(err) => {
                let message = err.user_message();
                error!(application_id = id, seq, error = %err, "status change failed");
                let rollback = self.ledger().fail(id, seq);
                match (self.policy, snapshot) {
                    (RevertPolicy::WholeSnapshot, Some(snapshot)) => {
                        warn!(application_id = id, seq, "restoring list snapshot");
                        self.store.replace_shared(snapshot);
                    }
                    _ => self.revert_status(id, rollback),
                }
                self.notifier.notify(Toast::error(message.clone()));
                ActionResult::failed(message)
            }
        }
    }

    fn revert_status(&self, id: &str, rollback: Option<(RecordStatus, ApplicationStatus)>) {
        let Some((from, to)) = rollback else {
            debug!(application_id = id, "failed change was superseded, nothing to revert");
            return;
        };
        let reverted = self.store.modify(id, |app| {
            // A refresh may already have replaced the optimistic value.
            app.status.is(to).then(|| app.with_record_status(from.clone()))
        });
        if reverted {
            warn!(application_id = id, status = %from, "status reverted");
        }
    }

    /// Deletes `id` once `confirm` agrees. The record leaves the list only
    /// after the API confirms.
    pub async fn delete(&self, id: &str, confirm: &dyn Confirm) -> ActionResult {
        let prompt = match self.store.get(id) {
            Some(app) if !app.applicant.name.is_empty() => format!(
                "Delete the application from {}? This cannot be undone.",
                app.applicant.name
            ),
            _ => "Delete this application? This cannot be undone.".to_string(),
        };
        if !confirm.confirm(&prompt) {
            debug!(application_id = id, "delete cancelled");
            return ActionResult::cancelled();
        }

        match self.api.delete(id).await {
            Ok(()) => {
                self.store.remove(id);
                info!(application_id = id, "application deleted");
                self.notifier.notify(Toast::success("Application deleted"));
                ActionResult::ok()
            }
            Err(err) => {
                let message = err.user_message();
                error!(application_id = id, error = %err, "delete failed");
                self.notifier.notify(Toast::error(message.clone()));
                ActionResult::failed(message)
            }
        }
    }

    /// Saves rating and notes. Not optimistic: the record is replaced with
    /// the server's copy (status kept local) on success.
    pub async fn save_review(&self, id: &str, review: ReviewUpdate) -> ActionResult {
        let payload = UpdateApplicationPayload {
            rating: review.rating,
            notes: review.notes,
            ..Default::default()
        };
        if let Err(errors) = payload.validate() {
            let message = Error::from(errors).user_message();
            self.notifier.notify(Toast::error(message.clone()));
            return ActionResult::failed(message);
        }

        match self.api.update(id, payload).await {
            Ok(saved) => {
                self.store
                    .update_record(id, |app| app.with_review_from(&saved));
                self.notifier.notify(Toast::success("Review saved"));
                ActionResult::ok()
            }
            Err(err) => {
                let message = err.user_message();
                error!(application_id = id, error = %err, "saving review failed");
                self.notifier.notify(Toast::error(message.clone()));
                ActionResult::failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::notify::{ToastKind, ToastQueue};
    use crate::client::MockApplicationsApi;
    use crate::models::application::ApplicationStats;
    use async_trait::async_trait;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn app(id: &str, status: &str) -> Application {
        serde_json::from_value(json!({
            "id": id,
            "status": status,
            "applicant": { "name": format!("Applicant {}", id), "email": "a@example.com" }
        }))
        .unwrap()
    }

    fn controller(
        api: impl ApplicationsApi + 'static,
        records: Vec<Application>,
    ) -> (TransitionController, Arc<ToastQueue>) {
        let toasts = Arc::new(ToastQueue::new());
        let controller = TransitionController::new(
            Arc::new(api),
            ApplicationStore::with_records(records),
            toasts.clone(),
        );
        (controller, toasts)
    }

    fn status_of(controller: &TransitionController, id: &str) -> String {
        controller.store().get(id).unwrap().status.to_string()
    }

    #[tokio::test]
    async fn same_stage_is_a_noop() {
        let mut api = MockApplicationsApi::new();
        api.expect_update_status().times(0);
        let (controller, toasts) = controller(api, vec![app("1", "new")]);
        let revision = controller.store().revision();

        let transition = controller.change_status("1", ApplicationStatus::New);

        assert!(transition.is_noop());
        assert_eq!(controller.store().revision(), revision);
        assert!(toasts.toasts().is_empty());
    }

    #[test]
    fn change_without_runtime_is_refused_untouched() {
        let mut api = MockApplicationsApi::new();
        api.expect_update_status().times(0);
        let (controller, toasts) = controller(api, vec![app("1", "new")]);
        let revision = controller.store().revision();

        let transition = controller.change_status("1", ApplicationStatus::Interview);

        let Transition::Failed(result) = transition else {
            panic!("expected the change to be refused");
        };
        assert!(!result.success);
        assert_eq!(status_of(&controller, "1"), "new");
        assert_eq!(controller.store().revision(), revision);
        assert_eq!(controller.in_flight(), 0);
        assert_eq!(toasts.errors().len(), 1);
    }

    #[tokio::test]
    async fn unknown_stage_key_is_rejected_before_any_change() {
        let mut api = MockApplicationsApi::new();
        api.expect_update_status().times(0);
        let (controller, _) = controller(api, vec![app("1", "new")]);

        let result = controller.change_status_key("1", "archived");

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(status_of(&controller, "1"), "new");
    }

    #[tokio::test]
    async fn successful_change_stays_applied() {
        let mut api = MockApplicationsApi::new();
        api.expect_update_status()
            .withf(|id, payload| id == "1" && payload.status == ApplicationStatus::Interview)
            .times(1)
            .returning(|_, _| Ok(app("1", "interview")));
        let (controller, toasts) = controller(api, vec![app("1", "new"), app("2", "new")]);

        let transition = controller.change_status("1", ApplicationStatus::Interview);
        assert_eq!(status_of(&controller, "1"), "interview");

        let result = transition.wait().await;
        assert!(result.success);
        assert_eq!(status_of(&controller, "1"), "interview");
        assert_eq!(status_of(&controller, "2"), "new");
        assert_eq!(controller.in_flight(), 0);
        assert_eq!(toasts.toasts()[0].kind, ToastKind::Success);
    }

    #[tokio::test]
    async fn failed_change_reverts_and_reports_server_message() {
        let mut api = MockApplicationsApi::new();
        api.expect_update_status().times(1).returning(|_, _| {
            Err(Error::Api {
                status: 500,
                message: "db down".into(),
            })
        });
        let (controller, toasts) = controller(api, vec![app("1", "new")]);

        let transition = controller.change_status("1", ApplicationStatus::Interview);
        let result = transition.wait().await;

        assert_eq!(result, ActionResult::failed("db down"));
        assert_eq!(status_of(&controller, "1"), "new");
        assert_eq!(toasts.errors(), vec!["db down".to_string()]);
    }

    #[tokio::test]
    async fn review_fields_are_validated_and_merged_on_success() {
        let mut api = MockApplicationsApi::new();
        api.expect_update_status()
            .withf(|_, payload| payload.rejection_reason.as_deref() == Some("no visa"))
            .times(1)
            .returning(|_, payload| {
                let mut saved = app("1", "rejected");
                saved.rejection_reason = payload.rejection_reason;
                Ok(saved)
            });
        let (controller, toasts) = controller(api, vec![app("1", "interview")]);

        let bad = StatusChangePayload {
            rating: Some(9),
            ..StatusChangePayload::to(ApplicationStatus::Rejected)
        };
        assert!(controller.change_status_with("1", bad).is_err());
        assert_eq!(status_of(&controller, "1"), "interview");
        assert!(toasts.errors()[0].contains("Rating must be between 0 and 5"));

        let change = StatusChangePayload {
            rejection_reason: Some("no visa".into()),
            ..StatusChangePayload::to(ApplicationStatus::Rejected)
        };
        let result = controller.change_status_with("1", change).unwrap().wait().await;

        assert!(result.success);
        let record = controller.store().get("1").unwrap();
        assert!(record.status.is(ApplicationStatus::Rejected));
        assert_eq!(record.rejection_reason.as_deref(), Some("no visa"));
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let mut api = MockApplicationsApi::new();
        api.expect_delete()
            .withf(|id| id == "2")
            .times(1)
            .returning(|_| Ok(()));
        let (controller, _) = controller(api, vec![app("1", "new"), app("2", "new")]);

        let declined = controller.delete("2", &|_: &str| false).await;
        assert!(declined.is_cancelled());
        assert_eq!(controller.store().len(), 2);

        let confirmed = controller
            .delete("2", &|prompt: &str| prompt.contains("Applicant 2"))
            .await;
        assert!(confirmed.success);
        assert!(controller.store().get("2").is_none());
        assert!(controller.store().get("1").is_some());
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_record() {
        let mut api = MockApplicationsApi::new();
        api.expect_delete().returning(|_| {
            Err(Error::Api {
                status: 403,
                message: "not allowed".into(),
            })
        });
        let (controller, toasts) = controller(api, vec![app("1", "new")]);

        let result = controller.delete("1", &|_: &str| true).await;

        assert_eq!(result.error.as_deref(), Some("not allowed"));
        assert_eq!(controller.store().len(), 1);
        assert_eq!(toasts.errors(), vec!["not allowed".to_string()]);
    }

    #[tokio::test]
    async fn out_of_range_rating_never_reaches_the_api() {
        let mut api = MockApplicationsApi::new();
        api.expect_update().times(0);
        let (controller, toasts) = controller(api, vec![app("1", "new")]);

        let result = controller
            .save_review(
                "1",
                ReviewUpdate {
                    rating: Some(6),
                    notes: None,
                },
            )
            .await;

        assert!(!result.success);
        assert_eq!(toasts.errors().len(), 1);
    }

    #[tokio::test]
    async fn saved_review_keeps_local_status() {
        let mut api = MockApplicationsApi::new();
        api.expect_update()
            .withf(|_, payload| payload.rating == Some(4) && payload.status.is_none())
            .returning(|_, payload| {
                let mut saved = app("1", "new");
                saved.rating = payload.rating;
                saved.notes = payload.notes;
                Ok(saved)
            });
        let (controller, _) = controller(api, vec![app("1", "screening")]);

        let result = controller
            .save_review(
                "1",
                ReviewUpdate {
                    rating: Some(4),
                    notes: Some("strong portfolio".into()),
                },
            )
            .await;

        assert!(result.success);
        let record = controller.store().get("1").unwrap();
        assert_eq!(record.rating, Some(4));
        assert_eq!(record.notes.as_deref(), Some("strong portfolio"));
        assert!(record.status.is(ApplicationStatus::Screening));
    }

    /// Holds every status request open until the test settles it.
    #[derive(Default)]
    struct GatedApi {
        pending: Mutex<Vec<Option<oneshot::Sender<Result<Application>>>>>,
    }

    impl GatedApi {
        async fn wait_for(&self, count: usize) {
            for _ in 0..200 {
                if self.pending.lock().unwrap().len() >= count {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            panic!("expected {} pending status requests", count);
        }

        fn settle(&self, index: usize, result: Result<Application>) {
            let sender = self.pending.lock().unwrap()[index]
                .take()
                .expect("request already settled");
            let _ = sender.send(result);
        }

        fn fail(&self, index: usize) {
            self.settle(
                index,
                Err(Error::Api {
                    status: 500,
                    message: format!("request {} failed", index),
                }),
            );
        }
    }

    #[async_trait]
    impl ApplicationsApi for Arc<GatedApi> {
        async fn list(&self, _position_id: Option<String>) -> Result<Vec<Application>> {
            Ok(vec![])
        }

        async fn get(&self, id: &str) -> Result<Application> {
            Err(Error::NotFound(id.to_string()))
        }

        async fn update(&self, id: &str, _payload: UpdateApplicationPayload) -> Result<Application> {
            Err(Error::NotFound(id.to_string()))
        }

        async fn update_status(&self, _id: &str, _payload: StatusChangePayload) -> Result<Application> {
            let (tx, rx) = oneshot::channel();
            self.pending.lock().unwrap().push(Some(tx));
            rx.await
                .unwrap_or_else(|_| Err(Error::Internal("request dropped".into())))
        }

        async fn delete(&self, _id: &str) -> Result<()> {
            Ok(())
        }

        async fn stats(&self) -> Result<ApplicationStats> {
            Ok(ApplicationStats::default())
        }
    }

    #[tokio::test]
    async fn single_field_revert_leaves_other_records_alone() {
        let gate = Arc::new(GatedApi::default());
        let (controller, _) = controller(gate.clone(), vec![app("a", "new"), app("b", "new")]);

        let first = controller.change_status("a", ApplicationStatus::Interview);
        gate.wait_for(1).await;
        let second = controller.change_status("b", ApplicationStatus::Hired);
        gate.wait_for(2).await;

        gate.fail(0);
        assert!(!first.wait().await.success);
        assert_eq!(status_of(&controller, "a"), "new");
        assert_eq!(status_of(&controller, "b"), "hired");

        gate.settle(1, Ok(app("b", "hired")));
        assert!(second.wait().await.success);
        assert_eq!(status_of(&controller, "b"), "hired");
    }

    #[tokio::test]
    async fn whole_snapshot_revert_discards_overlapping_changes() {
        let gate = Arc::new(GatedApi::default());
        let (controller, _) = controller(gate.clone(), vec![app("a", "new"), app("b", "new")]);
        let controller = controller.with_policy(RevertPolicy::WholeSnapshot);

        let first = controller.change_status("a", ApplicationStatus::Interview);
        gate.wait_for(1).await;
        let _second = controller.change_status("b", ApplicationStatus::Hired);
        gate.wait_for(2).await;

        gate.fail(0);
        first.wait().await;

        assert_eq!(status_of(&controller, "a"), "new");
        assert_eq!(status_of(&controller, "b"), "new");
    }

    #[tokio::test]
    async fn superseded_failure_hands_rollback_to_successor() {
        let gate = Arc::new(GatedApi::default());
        let (controller, _) = controller(gate.clone(), vec![app("a", "new")]);

        let first = controller.change_status("a", ApplicationStatus::Screening);
        gate.wait_for(1).await;
        let second = controller.change_status("a", ApplicationStatus::Interview);
        gate.wait_for(2).await;
        assert_eq!(controller.in_flight(), 2);

        gate.fail(0);
        first.wait().await;
        assert_eq!(status_of(&controller, "a"), "interview");

        gate.fail(1);
        second.wait().await;
        assert_eq!(status_of(&controller, "a"), "new");
        assert_eq!(controller.in_flight(), 0);
    }

    #[tokio::test]
    async fn failure_after_refresh_does_not_override_server_state() {
        let gate = Arc::new(GatedApi::default());
        let (controller, _) = controller(gate.clone(), vec![app("a", "new")]);

        let transition = controller.change_status("a", ApplicationStatus::Offered);
        gate.wait_for(1).await;
        controller.store().replace(vec![app("a", "hired")]);

        gate.fail(0);
        transition.wait().await;
        assert_eq!(status_of(&controller, "a"), "hired");
    }

    #[test]
    fn revert_policy_parses_config_values() {
        assert_eq!(
            "whole_snapshot".parse::<RevertPolicy>().unwrap(),
            RevertPolicy::WholeSnapshot
        );
        assert_eq!(RevertPolicy::SingleField.to_string(), "single_field");
        assert!("latest".parse::<RevertPolicy>().is_err());
    }
}
