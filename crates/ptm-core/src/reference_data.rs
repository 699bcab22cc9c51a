//! Reference data for the selectors
//!
//! Three sources feed the form: member types, access levels and roles. Each
//! is stored the moment it resolves and fails on its own; readers see
//! whatever has arrived so far.

use crate::error::{BackendError, WorkflowError};
use crate::host::ComponentContext;
use crate::types::{MemberTypeOption, PicklistOption, PicklistValue};
use parking_lot::Mutex;

/// Load state of one source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SourceState<T> {
    /// Not resolved yet
    #[default]
    Pending,
    /// Resolved with data
    Loaded(T),
    /// Resolved with a reported failure
    Failed,
}

impl<T> SourceState<T> {
    /// Loaded data, if any
    #[inline]
    #[must_use]
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            Self::Pending | Self::Failed => None,
        }
    }

    /// Whether the source has resolved either way
    #[inline]
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Which picklist a fetch targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Picklist {
    AccessLevel,
    Role,
}

impl Picklist {
    fn failure(self, error: BackendError) -> WorkflowError {
        match self {
            Self::AccessLevel => WorkflowError::FetchAccessOptionsFailed(error),
            Self::Role => WorkflowError::FetchRoleOptionsFailed(error),
        }
    }
}

/// Independently-resolving reference data sources
#[derive(Debug, Default)]
pub struct ReferenceDataLoader {
    member_types: Mutex<SourceState<Vec<MemberTypeOption>>>,
    access_levels: Mutex<SourceState<Vec<PicklistOption>>>,
    roles: Mutex<SourceState<Vec<PicklistOption>>>,
}

impl ReferenceDataLoader {
    /// Create loader with every source pending
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load all three sources concurrently
    ///
    /// Returns every failure that was reported, in no particular order.
    pub async fn load(&self, ctx: &ComponentContext) -> Vec<WorkflowError> {
        let (types, picklists) =
            futures::join!(self.load_member_types(ctx), self.load_picklists(ctx));

        types.err().into_iter().chain(picklists).collect()
    }

    /// Load the member type list
    ///
    /// # Errors
    /// - `WorkflowError::FetchTypesFailed`, already reported
    pub async fn load_member_types(&self, ctx: &ComponentContext) -> Result<(), WorkflowError> {
        match ctx.service.list_member_types().await {
            Ok(types) => {
                tracing::debug!(count = types.len(), "team member types loaded");
                *self.member_types.lock() = SourceState::Loaded(types);
                Ok(())
            }
            Err(e) => {
                *self.member_types.lock() = SourceState::Failed;
                let error = WorkflowError::FetchTypesFailed(e);
                ctx.report(&error);
                Err(error)
            }
        }
    }

    /// Resolve object metadata, then load both picklists concurrently
    ///
    /// A metadata failure fails both picklists. Returns the reported failures.
    pub async fn load_picklists(&self, ctx: &ComponentContext) -> Vec<WorkflowError> {
        let schema = &ctx.config.schema;
        let metadata = match ctx.service.resolve_metadata(&schema.team_member_object).await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(object = %schema.team_member_object, error = %e, "object metadata unavailable");
                return [Picklist::AccessLevel, Picklist::Role]
                    .into_iter()
                    .map(|list| {
                        *self.slot(list).lock() = SourceState::Failed;
                        let error = list.failure(e.clone());
                        ctx.report(&error);
                        error
                    })
                    .collect();
            }
        };

        let record_type_id = metadata.default_record_type_id.as_str();
        let (access, role) = futures::join!(
            self.load_picklist(ctx, Picklist::AccessLevel, record_type_id, &schema.access_level_field),
            self.load_picklist(ctx, Picklist::Role, record_type_id, &schema.role_field),
        );

        [access, role].into_iter().filter_map(Result::err).collect()
    }

    async fn load_picklist(
        &self,
        ctx: &ComponentContext,
        list: Picklist,
        record_type_id: &str,
        field: &str,
    ) -> Result<(), WorkflowError> {
        match ctx.service.list_picklist_values(record_type_id, field).await {
            Ok(values) => {
                let options = normalize(values);
                tracing::debug!(field, count = options.len(), "picklist loaded");
                *self.slot(list).lock() = SourceState::Loaded(options);
                Ok(())
            }
            Err(e) => {
                *self.slot(list).lock() = SourceState::Failed;
                let error = list.failure(e);
                ctx.report(&error);
                Err(error)
            }
        }
    }

    fn slot(&self, list: Picklist) -> &Mutex<SourceState<Vec<PicklistOption>>> {
        match list {
            Picklist::AccessLevel => &self.access_levels,
            Picklist::Role => &self.roles,
        }
    }

    /// Member types loaded so far
    #[must_use]
    pub fn member_types(&self) -> Option<Vec<MemberTypeOption>> {
        self.member_types.lock().loaded().cloned()
    }

    /// Access level options loaded so far
    #[must_use]
    pub fn access_level_options(&self) -> Option<Vec<PicklistOption>> {
        self.access_levels.lock().loaded().cloned()
    }

    /// Role options loaded so far
    #[must_use]
    pub fn role_options(&self) -> Option<Vec<PicklistOption>> {
        self.roles.lock().loaded().cloned()
    }

    /// Member type with the given value, if loaded
    #[must_use]
    pub fn find_member_type(&self, value: &str) -> Option<MemberTypeOption> {
        self.member_types
            .lock()
            .loaded()
            .and_then(|types| types.iter().find(|t| t.value == value).cloned())
    }

    /// Load state of the member type source
    #[must_use]
    pub fn member_types_state(&self) -> SourceState<Vec<MemberTypeOption>> {
        self.member_types.lock().clone()
    }

    /// Load state of the access level source
    #[must_use]
    pub fn access_levels_state(&self) -> SourceState<Vec<PicklistOption>> {
        self.access_levels.lock().clone()
    }

    /// Load state of the role source
    #[must_use]
    pub fn roles_state(&self) -> SourceState<Vec<PicklistOption>> {
        self.roles.lock().clone()
    }
}

fn normalize(values: Vec<PicklistValue>) -> Vec<PicklistOption> {
    values.into_iter().map(PicklistOption::from).collect()
}
