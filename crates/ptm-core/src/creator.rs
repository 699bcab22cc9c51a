//! Product team member creator
//!
//! Composes the access gate, reference data, selection state, search relay
//! and create command into the component a host embeds on a product record.
//!
//! # Lifecycle
//! 1. Host calls [`ProductTeamMemberCreator::initialize`] with the product id
//! 2. Host drives [`ProductTeamMemberCreator::load_reference_data`] whenever it
//!    likes; options appear as each source resolves
//! 3. Once access is granted, selection handlers and search become usable
//! 4. [`ProductTeamMemberCreator::submit`] creates the association and closes
//!    the host, after which the instance is spent

use crate::access_gate::AccessGate;
use crate::config::CreatorConfig;
use crate::create::CreateCommand;
use crate::error::{Error, StateError, WorkflowError};
use crate::host::{ComponentContext, HostContainer, LookupWidget, Notifier, ProductTeamService};
use crate::reference_data::ReferenceDataLoader;
use crate::search::{SearchBridge, SearchOutcome};
use crate::types::{
    AccessDecision, MemberTypeOption, ParentRecordId, PicklistOption, SearchRequest,
};
use crate::workflow::WorkflowState;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Creator form component
pub struct ProductTeamMemberCreator {
    ctx: ComponentContext,
    container: Arc<dyn HostContainer>,
    lookup: Option<Arc<dyn LookupWidget>>,
    record_id: OnceLock<ParentRecordId>,
    gate: AccessGate,
    reference: ReferenceDataLoader,
    search: SearchBridge,
    state: Mutex<WorkflowState>,
    terminated: AtomicBool,
}

impl ProductTeamMemberCreator {
    /// Create component
    #[must_use]
    pub fn new(
        service: Arc<dyn ProductTeamService>,
        notifier: Arc<dyn Notifier>,
        container: Arc<dyn HostContainer>,
        config: CreatorConfig,
    ) -> Self {
        Self {
            ctx: ComponentContext::new(service, notifier, config),
            container,
            lookup: None,
            record_id: OnceLock::new(),
            gate: AccessGate::new(),
            reference: ReferenceDataLoader::new(),
            search: SearchBridge::new(),
            state: Mutex::new(WorkflowState::new()),
            terminated: AtomicBool::new(false),
        }
    }

    /// With search widget
    #[inline]
    #[must_use]
    pub fn with_lookup(mut self, lookup: Arc<dyn LookupWidget>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Set the product id and run the permission check
    ///
    /// # Errors
    /// - `StateError::EmptyRecordId` for an empty id; nothing is checked
    /// - `StateError::AlreadyInitialized` on a second call
    /// - `WorkflowError::AccessDenied` / `AccessCheckFailed`; the user was
    ///   notified and the host asked to close
    pub async fn initialize(&self, record_id: impl Into<String>) -> Result<AccessDecision, Error> {
        let record_id = ParentRecordId::new(record_id)?;
        self.record_id
            .set(record_id.clone())
            .map_err(|_| StateError::AlreadyInitialized)?;

        match self.gate.check(&self.ctx, &self.container, &record_id).await {
            Ok(decision) => Ok(decision),
            Err(e) => {
                self.terminated.store(true, Ordering::SeqCst);
                Err(e.into())
            }
        }
    }

    /// Load member types and both picklists
    ///
    /// Independent of the permission check; returns every reported failure.
    pub async fn load_reference_data(&self) -> Vec<WorkflowError> {
        self.reference.load(&self.ctx).await
    }

    /// Select a member type by value
    ///
    /// Clears the member and the widget's selection. Searches still in
    /// flight were scoped to the previous type and come back stale.
    ///
    /// # Errors
    /// - `StateError` if the form is not open
    pub fn select_member_type(&self, value: &str) -> Result<(), Error> {
        self.ensure_open()?;
        let resolved = self.reference.find_member_type(value);
        {
            let mut state = self.state.lock();
            state.select_type(value, resolved);
            self.search.invalidate();
        }
        if let Some(lookup) = &self.lookup {
            lookup.clear_selection();
        }
        Ok(())
    }

    /// Apply the search widget's selection
    ///
    /// # Errors
    /// - `StateError` if the form is not open
    pub fn select_members<S: AsRef<str>>(&self, selected_ids: &[S]) -> Result<(), Error> {
        self.ensure_open()?;
        self.state.lock().select_member(selected_ids);
        Ok(())
    }

    /// Select an access level
    ///
    /// # Errors
    /// - `StateError` if the form is not open
    pub fn select_access_level(&self, value: &str) -> Result<(), Error> {
        self.ensure_open()?;
        self.state.lock().select_access_level(value);
        Ok(())
    }

    /// Select a role
    ///
    /// # Errors
    /// - `StateError` if the form is not open
    pub fn select_role(&self, value: &str) -> Result<(), Error> {
        self.ensure_open()?;
        self.state.lock().select_role(value);
        Ok(())
    }

    /// Search for members of the selected type
    ///
    /// # Errors
    /// - `StateError` if the form is not open
    /// - `WorkflowError::SearchFailed`, already reported
    pub async fn search<S: AsRef<str>>(
        &self,
        search_term: &str,
        selected_ids: &[S],
    ) -> Result<SearchOutcome, Error> {
        self.ensure_open()?;
        // ticket and scope under one lock; type changes invalidate under it too
        let (ticket, request) = {
            let state = self.state.lock();
            let request = SearchRequest {
                search_term: search_term.to_string(),
                selected_ids: selected_ids.iter().map(|id| id.as_ref().to_string()).collect(),
                product_team_member_type_name: state.search_scope(),
            };
            (self.search.begin(), request)
        };

        Ok(self
            .search
            .relay(ticket, &self.ctx, self.lookup.as_deref(), request)
            .await?)
    }

    /// Create the association and close the host
    ///
    /// Runs at most once per instance. The host is asked to close whether
    /// or not creation succeeds, and searches still in flight are dropped.
    ///
    /// # Errors
    /// - `StateError::SubmitNotReady` if type, member or access level is
    ///   missing; nothing is sent and the form stays open
    /// - `StateError::AlreadySubmitted` on a repeated submit
    /// - `WorkflowError::CreateFailed`, already reported
    pub async fn submit(&self) -> Result<(), Error> {
        self.ensure_open()?;
        let record_id = self.record_id.get().ok_or(StateError::AccessNotGranted)?;
        let payload = self
            .state
            .lock()
            .payload(record_id)
            .ok_or(StateError::SubmitNotReady)?;

        if self.terminated.swap(true, Ordering::SeqCst) {
            return Err(StateError::AlreadySubmitted.into());
        }
        self.search.invalidate();

        CreateCommand::new(payload)
            .execute(&self.ctx, Arc::clone(&self.container))
            .await?;
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), StateError> {
        if !self.gate.is_granted() {
            tracing::warn!(decision = ?self.gate.decision(), "creator used without granted access");
            return Err(StateError::AccessNotGranted);
        }
        if self.terminated.load(Ordering::SeqCst) {
            tracing::warn!("creator used after submit");
            return Err(StateError::AlreadySubmitted);
        }
        Ok(())
    }

    /// Product id, once initialized
    #[inline]
    #[must_use]
    pub fn record_id(&self) -> Option<&ParentRecordId> {
        self.record_id.get()
    }

    /// Permission decision so far
    #[inline]
    #[must_use]
    pub fn access_decision(&self) -> AccessDecision {
        self.gate.decision()
    }

    /// Whether the spinner is showing
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.gate.is_loading()
    }

    /// Whether the form is revealed
    #[inline]
    #[must_use]
    pub fn is_form_visible(&self) -> bool {
        self.gate.is_granted() && !self.is_closed()
    }

    /// Whether the host has been asked to close
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    /// Whether submit is enabled
    #[must_use]
    pub fn is_submit_enabled(&self) -> bool {
        self.state.lock().is_submit_enabled()
    }

    /// Snapshot of the selection state
    #[must_use]
    pub fn state(&self) -> WorkflowState {
        self.state.lock().clone()
    }

    /// Member type options loaded so far
    #[must_use]
    pub fn member_type_options(&self) -> Option<Vec<MemberTypeOption>> {
        self.reference.member_types()
    }

    /// Access level options loaded so far
    #[must_use]
    pub fn access_level_options(&self) -> Option<Vec<PicklistOption>> {
        self.reference.access_level_options()
    }

    /// Role options loaded so far
    #[must_use]
    pub fn role_options(&self) -> Option<Vec<PicklistOption>> {
        self.reference.role_options()
    }

    /// Reference data sources
    #[inline]
    #[must_use]
    pub fn reference_data(&self) -> &ReferenceDataLoader {
        &self.reference
    }
}

impl std::fmt::Debug for ProductTeamMemberCreator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductTeamMemberCreator")
            .field("record_id", &self.record_id.get())
            .field("gate", &self.gate)
            .field("state", &*self.state.lock())
            .field("terminated", &self.terminated)
            .finish_non_exhaustive()
    }
}
