//! PTM Core - Product Team Member workflow
//!
//! The components a host embeds on a product record:
//! - A permission-gated creator form that attaches a team member to the
//!   product (type, member search, access level, role, submit)
//! - A read-only list of who already has access and why
//!
//! Backend, notifications, the hosting container and the search widget are
//! collaborators behind the traits in [`host`].
//!
//! # Example
//!
//! ```rust,ignore
//! use ptm_core::{CreatorConfig, ProductTeamMemberCreator};
//!
//! # async fn example(service: Arc<dyn ProductTeamService>, notifier: Arc<dyn Notifier>, container: Arc<dyn HostContainer>) -> Result<(), ptm_core::Error> {
//! let creator = ProductTeamMemberCreator::new(service, notifier, container, CreatorConfig::new());
//!
//! creator.initialize("P1").await?;
//! creator.load_reference_data().await;
//!
//! creator.select_member_type("T1")?;
//! creator.search("Ann", &[] as &[&str]).await?;
//! creator.select_members(&["M9"])?;
//! creator.select_access_level("Read")?;
//!
//! creator.submit().await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod access_gate;
pub mod config;
pub mod create;
pub mod creator;
pub mod error;
pub mod host;
pub mod reference_data;
pub mod search;
pub mod sharing;
pub mod types;
pub mod workflow;

// Re-exports for convenience
pub use access_gate::AccessGate;
pub use config::{CreatorConfig, Labels, MessageKey, SchemaConfig};
pub use create::CreateCommand;
pub use creator::ProductTeamMemberCreator;
pub use error::{BackendError, ConfigError, Error, StateError, WorkflowError};
pub use host::{CloseGuard, ComponentContext, HostContainer, LookupWidget, Notifier, ProductTeamService};
pub use reference_data::{ReferenceDataLoader, SourceState};
pub use search::{SearchBridge, SearchOutcome};
pub use sharing::ProductTeamMemberSharing;
pub use types::{
    AccessDecision, CreatePayload, MemberTypeOption, ObjectMetadata, ParentRecordId,
    PicklistOption, PicklistValue, SearchRequest, SearchResult, SharingColumn, SharingRow, Toast,
    ToastVariant,
};
pub use workflow::WorkflowState;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for embedding the components
    pub use crate::{
        AccessDecision, CreatorConfig, Error, HostContainer, LookupWidget, Notifier,
        ProductTeamMemberCreator, ProductTeamMemberSharing, ProductTeamService, Toast,
        WorkflowError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
