//! Selection state of the creator form
//!
//! Steps are not enforced as discrete states. They emerge from which fields
//! are present: type, then member, then access level and role. The submit
//! predicate is recomputed from the fields on every read.

use crate::types::{is_present, CreatePayload, MemberTypeOption, ParentRecordId};

/// Step-dependent form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowState {
    selected_type: Option<MemberTypeOption>,
    selected_type_value: Option<String>,
    member_id: Option<String>,
    access_level: Option<String>,
    role: Option<String>,
}

impl WorkflowState {
    /// Create empty state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a member type
    ///
    /// `resolved` is the loaded option matching `value`, if any. Any member
    /// chosen under the previous type is discarded.
    pub fn select_type(&mut self, value: impl Into<String>, resolved: Option<MemberTypeOption>) {
        let value = value.into();
        tracing::debug!(member_type = %value, resolved = resolved.is_some(), "member type selected");
        self.selected_type = resolved;
        self.selected_type_value = Some(value);
        self.member_id = None;
    }

    /// Apply a selection change from the search widget
    ///
    /// The first identifier wins; an empty selection clears the member.
    pub fn select_member<S: AsRef<str>>(&mut self, selected_ids: &[S]) {
        self.member_id = selected_ids
            .first()
            .map(|id| id.as_ref().to_string())
            .filter(|id| !id.is_empty());
    }

    /// Select an access level
    pub fn select_access_level(&mut self, value: impl Into<String>) {
        self.access_level = Some(value.into());
    }

    /// Select a role
    pub fn select_role(&mut self, value: impl Into<String>) {
        self.role = Some(value.into());
    }

    /// Whether submit is enabled
    ///
    /// Type, member and access level are required; role is not.
    #[must_use]
    pub fn is_submit_enabled(&self) -> bool {
        self.selected_type.is_some()
            && is_present(self.member_id.as_deref())
            && is_present(self.access_level.as_deref())
    }

    /// Scoping name for searches, `None` when no type is resolved
    #[inline]
    #[must_use]
    pub fn search_scope(&self) -> Option<String> {
        self.selected_type.as_ref().map(|t| t.value.clone())
    }

    /// Assemble the create payload, `None` while submit is disabled
    #[must_use]
    pub fn payload(&self, product_id: &ParentRecordId) -> Option<CreatePayload> {
        if !self.is_submit_enabled() {
            return None;
        }
        Some(CreatePayload {
            product_id: product_id.to_string(),
            member_id: self.member_id.clone()?,
            access_level: self.access_level.clone()?,
            product_team_member_lookup_field: self.selected_type.as_ref()?.member_type_lookup_field.clone(),
            product_team_member_role: self.role.clone().filter(|r| !r.is_empty()),
        })
    }

    #[inline]
    #[must_use]
    pub fn selected_type(&self) -> Option<&MemberTypeOption> {
        self.selected_type.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn selected_type_value(&self) -> Option<&str> {
        self.selected_type_value.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn member_id(&self) -> Option<&str> {
        self.member_id.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn access_level(&self) -> Option<&str> {
        self.access_level.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn distributor() -> MemberTypeOption {
        MemberTypeOption::new("T1", "Distributor", "Distributor__c")
    }

    fn ready_state() -> WorkflowState {
        let mut state = WorkflowState::new();
        state.select_type("T1", Some(distributor()));
        state.select_member(&["M9"]);
        state.select_access_level("Read");
        state
    }

    #[test]
    fn empty_state_cannot_submit() {
        assert!(!WorkflowState::new().is_submit_enabled());
    }

    #[test]
    fn role_is_not_required() {
        let state = ready_state();
        assert!(state.role().is_none());
        assert!(state.is_submit_enabled());
    }

    #[test]
    fn access_level_is_required() {
        let mut state = WorkflowState::new();
        state.select_type("T1", Some(distributor()));
        state.select_member(&["M9"]);
        state.select_role("Sales");
        assert!(!state.is_submit_enabled());

        state.select_access_level("");
        assert!(!state.is_submit_enabled());
    }

    #[test]
    fn type_change_resets_member() {
        let mut state = ready_state();
        state.select_type("T2", Some(MemberTypeOption::new("T2", "Retailer", "Retailer__c")));

        assert_eq!(state.member_id(), None);
        assert_eq!(state.access_level(), Some("Read"));
        assert!(!state.is_submit_enabled());
    }

    #[test]
    fn unknown_type_value_leaves_type_unresolved() {
        let mut state = ready_state();
        state.select_type("missing", None);

        assert_eq!(state.selected_type_value(), Some("missing"));
        assert!(state.selected_type().is_none());
        assert_eq!(state.search_scope(), None);
    }

    #[test]
    fn first_selected_member_wins() {
        let mut state = WorkflowState::new();
        state.select_member(&["M1", "M2"]);
        assert_eq!(state.member_id(), Some("M1"));

        state.select_member::<&str>(&[]);
        assert_eq!(state.member_id(), None);
    }

    #[test]
    fn payload_carries_lookup_field_and_role() {
        let mut state = ready_state();
        state.select_role("Sales");
        let product = ParentRecordId::new("P1").unwrap();

        let payload = state.payload(&product).unwrap();
        assert_eq!(
            payload,
            CreatePayload {
                product_id: "P1".to_string(),
                member_id: "M9".to_string(),
                access_level: "Read".to_string(),
                product_team_member_lookup_field: "Distributor__c".to_string(),
                product_team_member_role: Some("Sales".to_string()),
            }
        );
    }

    #[test]
    fn payload_requires_ready_state() {
        let product = ParentRecordId::new("P1").unwrap();
        assert!(WorkflowState::new().payload(&product).is_none());
    }
}
