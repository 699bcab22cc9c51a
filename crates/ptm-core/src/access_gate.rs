//! Permission gate for the creator form
//!
//! The gate resolves exactly once per instance. Until it resolves the
//! component is loading; a denial notifies the user and closes the host.

use crate::error::WorkflowError;
use crate::host::{CloseGuard, ComponentContext, HostContainer};
use crate::types::{AccessDecision, ParentRecordId};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct GateState {
    decision: AccessDecision,
    loading: bool,
    checked: bool,
}

/// Tri-state permission gate
#[derive(Debug)]
pub struct AccessGate {
    state: Mutex<GateState>,
}

impl AccessGate {
    /// Create gate in the pending, loading state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState {
                decision: AccessDecision::Pending,
                loading: true,
                checked: false,
            }),
        }
    }

    /// Current decision
    #[inline]
    #[must_use]
    pub fn decision(&self) -> AccessDecision {
        self.state.lock().decision
    }

    /// Whether the check is still outstanding
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    /// Whether the form may be shown
    #[inline]
    #[must_use]
    pub fn is_granted(&self) -> bool {
        self.decision() == AccessDecision::Granted
    }

    /// Run the permission check for `record_id`
    ///
    /// Only the first call reaches the backend; later calls return the
    /// decision already reached (or `Pending` while the first is in flight).
    ///
    /// # Errors
    /// - `WorkflowError::AccessDenied` if the backend answers false
    /// - `WorkflowError::AccessCheckFailed` if the check itself fails
    ///
    /// Both are already reported and the container closed when returned.
    pub async fn check(
        &self,
        ctx: &ComponentContext,
        container: &Arc<dyn HostContainer>,
        record_id: &ParentRecordId,
    ) -> Result<AccessDecision, WorkflowError> {
        {
            let mut state = self.state.lock();
            if state.checked {
                return Ok(state.decision);
            }
            state.checked = true;
        }

        let outcome = match ctx.service.check_access(record_id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(WorkflowError::AccessDenied {
                record_id: record_id.to_string(),
            }),
            Err(e) => Err(WorkflowError::AccessCheckFailed(e)),
        };

        match outcome {
            Ok(()) => {
                self.resolve(AccessDecision::Granted);
                tracing::info!(product_id = %record_id, "team member management granted");
                Ok(AccessDecision::Granted)
            }
            Err(error) => {
                self.resolve(AccessDecision::Denied);
                let _close = CloseGuard::new(Arc::clone(container));
                ctx.report(&error);
                Err(error)
            }
        }
    }

    fn resolve(&self, decision: AccessDecision) {
        let mut state = self.state.lock();
        debug_assert_eq!(state.decision, AccessDecision::Pending);
        state.decision = decision;
        state.loading = false;
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CreatorConfig;
    use crate::error::BackendError;
    use crate::host::{MockHostContainer, MockNotifier, MockProductTeamService};
    use crate::types::ToastVariant;

    fn record() -> ParentRecordId {
        ParentRecordId::new("P1").unwrap()
    }

    fn context(service: MockProductTeamService, notifier: MockNotifier) -> ComponentContext {
        ComponentContext::new(Arc::new(service), Arc::new(notifier), CreatorConfig::default())
    }

    #[tokio::test]
    async fn granted_reveals_without_closing() {
        let mut service = MockProductTeamService::new();
        service
            .expect_check_access()
            .times(1)
            .returning(|_| Ok(true));
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();
        let mut container = MockHostContainer::new();
        container.expect_request_close().never();
        let container: Arc<dyn HostContainer> = Arc::new(container);

        let gate = AccessGate::new();
        assert!(gate.is_loading());

        let decision = gate
            .check(&context(service, notifier), &container, &record())
            .await
            .unwrap();

        assert_eq!(decision, AccessDecision::Granted);
        assert!(gate.is_granted());
        assert!(!gate.is_loading());
    }

    #[tokio::test]
    async fn denial_notifies_and_closes_once() {
        let expected = CreatorConfig::default().labels.management_not_allowed;
        let mut service = MockProductTeamService::new();
        service.expect_check_access().returning(|_| Ok(false));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(move |t| t.variant == ToastVariant::Error && t.message == expected)
            .times(1)
            .return_const(());
        let mut container = MockHostContainer::new();
        container.expect_request_close().times(1).return_const(());
        let container: Arc<dyn HostContainer> = Arc::new(container);

        let gate = AccessGate::new();
        let result = gate
            .check(&context(service, notifier), &container, &record())
            .await;

        assert!(matches!(result, Err(WorkflowError::AccessDenied { .. })));
        assert_eq!(gate.decision(), AccessDecision::Denied);
        assert!(!gate.is_loading());
    }

    #[tokio::test]
    async fn failed_check_uses_distinct_message() {
        let expected = CreatorConfig::default().labels.check_user_access_failed;
        let mut service = MockProductTeamService::new();
        service
            .expect_check_access()
            .returning(|_| Err(BackendError::Unavailable("offline".to_string())));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(move |t| t.message == expected)
            .times(1)
            .return_const(());
        let mut container = MockHostContainer::new();
        container.expect_request_close().times(1).return_const(());
        let container: Arc<dyn HostContainer> = Arc::new(container);

        let gate = AccessGate::new();
        let result = gate
            .check(&context(service, notifier), &container, &record())
            .await;

        assert!(matches!(result, Err(WorkflowError::AccessCheckFailed(_))));
        assert_eq!(gate.decision(), AccessDecision::Denied);
    }

    #[tokio::test]
    async fn decision_is_never_reevaluated() {
        let mut service = MockProductTeamService::new();
        service
            .expect_check_access()
            .times(1)
            .returning(|_| Ok(false));
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(1).return_const(());
        let mut container = MockHostContainer::new();
        container.expect_request_close().times(1).return_const(());
        let container: Arc<dyn HostContainer> = Arc::new(container);
        let ctx = context(service, notifier);

        let gate = AccessGate::new();
        assert!(gate.check(&ctx, &container, &record()).await.is_err());

        let again = gate.check(&ctx, &container, &record()).await.unwrap();
        assert_eq!(again, AccessDecision::Denied);
    }
}
