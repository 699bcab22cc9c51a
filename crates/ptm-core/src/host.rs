//! Collaborator seams and shared component context
//!
//! The backend, the notification surface, the hosting container and the
//! lookup widget are all external. Components reach them through the traits
//! here, bundled in a [`ComponentContext`].

use crate::config::{CreatorConfig, MessageKey};
use crate::error::{BackendError, WorkflowError};
use crate::types::{
    CreatePayload, MemberTypeOption, ObjectMetadata, ParentRecordId, PicklistValue,
    SearchRequest, SearchResult, SharingRow, Toast,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Backend access/query service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductTeamService: Send + Sync {
    /// Whether the current actor may manage team members of the product
    async fn check_access(&self, product_id: &ParentRecordId) -> Result<bool, BackendError>;

    /// Configured team member types
    async fn list_member_types(&self) -> Result<Vec<MemberTypeOption>, BackendError>;

    /// Object metadata for an association object
    async fn resolve_metadata(&self, object_api_name: &str) -> Result<ObjectMetadata, BackendError>;

    /// Picklist values of a field for a record type
    async fn list_picklist_values(
        &self,
        record_type_id: &str,
        field_api_name: &str,
    ) -> Result<Vec<PicklistValue>, BackendError>;

    /// Typeahead search for candidate members
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, BackendError>;

    /// Persist the association
    async fn create_association(&self, payload: &CreatePayload) -> Result<(), BackendError>;

    /// Current sharing rows of the product
    async fn list_sharing_rows(
        &self,
        product_id: &ParentRecordId,
    ) -> Result<Vec<SharingRow>, BackendError>;
}

/// User-visible notification surface
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Show a notification
    fn notify(&self, toast: Toast);
}

/// Container hosting the creator form
#[cfg_attr(test, mockall::automock)]
pub trait HostContainer: Send + Sync {
    /// Ask the host to close the container
    fn request_close(&self);
}

/// Typeahead search widget
#[cfg_attr(test, mockall::automock)]
pub trait LookupWidget: Send + Sync {
    /// Replace displayed results
    fn set_search_results(&self, results: Vec<SearchResult>);

    /// Drop the current selection
    fn clear_selection(&self);
}

/// Collaborators and configuration shared by a component's parts
#[derive(Clone)]
pub struct ComponentContext {
    pub service: Arc<dyn ProductTeamService>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<CreatorConfig>,
}

impl ComponentContext {
    /// Create context
    #[inline]
    #[must_use]
    pub fn new(
        service: Arc<dyn ProductTeamService>,
        notifier: Arc<dyn Notifier>,
        config: CreatorConfig,
    ) -> Self {
        Self {
            service,
            notifier,
            config: Arc::new(config),
        }
    }

    /// Log a failure, then notify the user with its message
    pub fn report(&self, error: &WorkflowError) {
        let labels = &self.config.labels;
        let key = error.message_key();
        let message = labels.message(key);
        tracing::error!(error = %error, key = key.as_str(), "{}", message);
        self.notifier
            .notify(Toast::error(labels.error_title.clone(), key, message));
    }

    /// Notify the user of a success
    pub fn notify_success(&self, key: MessageKey) {
        let labels = &self.config.labels;
        self.notifier
            .notify(Toast::success(labels.success_title.clone(), key, labels.message(key)));
    }
}

impl std::fmt::Debug for ComponentContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Requests closure of the hosting container when dropped
///
/// Covers every exit path of the scope holding it, including early returns
/// and unwinding.
#[must_use = "the close request fires when the guard is dropped"]
pub struct CloseGuard {
    container: Arc<dyn HostContainer>,
}

impl CloseGuard {
    /// Arm a guard for `container`
    #[inline]
    pub fn new(container: Arc<dyn HostContainer>) -> Self {
        Self { container }
    }
}

impl Drop for CloseGuard {
    fn drop(&mut self) {
        tracing::debug!("requesting container close");
        self.container.request_close();
    }
}

impl std::fmt::Debug for CloseGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloseGuard").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToastVariant;

    fn context_with(notifier: MockNotifier) -> ComponentContext {
        ComponentContext::new(
            Arc::new(MockProductTeamService::new()),
            Arc::new(notifier),
            CreatorConfig::default(),
        )
    }

    #[test]
    fn report_emits_error_toast_with_kind_message() {
        let expected = CreatorConfig::default().labels.search_team_member_failed;
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(move |t| {
                t.variant == ToastVariant::Error
                    && t.title == "Error"
                    && t.key == MessageKey::SearchProductTeamMemberFailed
                    && t.message == expected
            })
            .times(1)
            .return_const(());

        let ctx = context_with(notifier);
        ctx.report(&WorkflowError::SearchFailed(BackendError::Unavailable(
            "down".to_string(),
        )));
    }

    #[test]
    fn notify_success_uses_success_title() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|t| t.variant == ToastVariant::Success && t.title == "Success")
            .times(1)
            .return_const(());

        context_with(notifier).notify_success(MessageKey::ProductTeamMemberCreationSuccess);
    }

    #[test]
    fn close_guard_fires_once_on_drop() {
        let mut container = MockHostContainer::new();
        container.expect_request_close().times(1).return_const(());

        let guard = CloseGuard::new(Arc::new(container));
        drop(guard);
    }

    #[test]
    fn close_guard_fires_on_early_return() {
        fn run(container: Arc<dyn HostContainer>, bail: bool) -> Result<(), ()> {
            let _close = CloseGuard::new(container);
            if bail {
                return Err(());
            }
            Ok(())
        }

        let mut container = MockHostContainer::new();
        container.expect_request_close().times(2).return_const(());
        let container: Arc<dyn HostContainer> = Arc::new(container);

        assert!(run(Arc::clone(&container), true).is_err());
        assert!(run(container, false).is_ok());
    }
}
