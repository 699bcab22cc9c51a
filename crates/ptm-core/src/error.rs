//! Error types for the product team member workflow
//!
//! Provides error handling for:
//! - Backend collaborator failures
//! - User-facing workflow failures (one message per kind)
//! - Contract violations by the hosting surface
//! - Configuration loading

use crate::config::MessageKey;

/// Crate-level error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A user-facing workflow operation failed
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// The component was driven outside its contract
    #[error(transparent)]
    State(#[from] StateError),
}

impl Error {
    /// The workflow error, if this is one
    #[inline]
    #[must_use]
    pub fn as_workflow(&self) -> Option<&WorkflowError> {
        match self {
            Self::Workflow(e) => Some(e),
            Self::State(_) => None,
        }
    }
}

/// Failure reported by a backend collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Service could not be reached
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Service rejected the request
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Response could not be interpreted
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// User-facing workflow failures
///
/// Every kind maps to exactly one [`MessageKey`] and is logged before the
/// matching notification is emitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    /// Current actor may not manage team members of the record
    #[error("team member management not allowed for product {record_id}")]
    AccessDenied { record_id: String },

    /// Permission check itself failed
    #[error("could not verify access: {0}")]
    AccessCheckFailed(#[source] BackendError),

    /// Member type list could not be fetched
    #[error("fetching team member types failed: {0}")]
    FetchTypesFailed(#[source] BackendError),

    /// Access level picklist could not be fetched
    #[error("fetching access level values failed: {0}")]
    FetchAccessOptionsFailed(#[source] BackendError),

    /// Role picklist could not be fetched
    #[error("fetching role values failed: {0}")]
    FetchRoleOptionsFailed(#[source] BackendError),

    /// Typeahead search failed
    #[error("team member search failed: {0}")]
    SearchFailed(#[source] BackendError),

    /// Association could not be created
    #[error("team member creation failed: {0}")]
    CreateFailed(#[source] BackendError),

    /// Sharing rows could not be fetched
    #[error("fetching sharing rows failed: {0}")]
    ListSharingRowsFailed(#[source] BackendError),
}

impl WorkflowError {
    /// Message shown to the user for this kind
    #[must_use]
    pub fn message_key(&self) -> MessageKey {
        match self {
            Self::AccessDenied { .. } => MessageKey::ProductTeamMemberManagementFailed,
            Self::AccessCheckFailed(_) => MessageKey::ProductTeamMemberCheckUserAccessFailed,
            Self::FetchTypesFailed(_) => MessageKey::FetchProductTeamMemberFailed,
            Self::FetchAccessOptionsFailed(_) => MessageKey::FetchProductAccessValuesFailed,
            Self::FetchRoleOptionsFailed(_) => MessageKey::FetchProductRoleValuesFailed,
            Self::SearchFailed(_) => MessageKey::SearchProductTeamMemberFailed,
            Self::CreateFailed(_) => MessageKey::ProductTeamMemberCreationFailed,
            Self::ListSharingRowsFailed(_) => MessageKey::FetchProductTeamMemberRecordsFailed,
        }
    }

    /// Check if the failure closes the hosting container
    #[inline]
    #[must_use]
    pub fn terminates_workflow(&self) -> bool {
        matches!(self, Self::AccessDenied { .. } | Self::AccessCheckFailed(_))
    }

    /// Check if the user stays on the current step and may repeat the action
    #[inline]
    #[must_use]
    pub fn allows_manual_retry(&self) -> bool {
        !self.terminates_workflow()
    }

    /// Underlying backend failure, if any
    #[must_use]
    pub fn backend_error(&self) -> Option<&BackendError> {
        match self {
            Self::AccessDenied { .. } => None,
            Self::AccessCheckFailed(e)
            | Self::FetchTypesFailed(e)
            | Self::FetchAccessOptionsFailed(e)
            | Self::FetchRoleOptionsFailed(e)
            | Self::SearchFailed(e)
            | Self::CreateFailed(e)
            | Self::ListSharingRowsFailed(e) => Some(e),
        }
    }
}

/// Contract violations by the hosting surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Parent record id was empty
    #[error("parent record id must not be empty")]
    EmptyRecordId,

    /// Parent record id was already set for this instance
    #[error("component already initialized")]
    AlreadyInitialized,

    /// Form is not revealed (access pending or denied)
    #[error("access to the form has not been granted")]
    AccessNotGranted,

    /// Required selections are missing
    #[error("type, member and access level must be selected before submitting")]
    SubmitNotReady,

    /// Workflow already submitted and closed
    #[error("workflow already submitted")]
    AlreadySubmitted,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML could not be parsed into a configuration
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
