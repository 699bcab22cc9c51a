use ptm_core::{MemberTypeOption, WorkflowState};
use proptest::prelude::*;

fn optional_text() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[A-Za-z0-9]{1,8}".prop_map(Some),
    ]
}

fn member_type() -> impl Strategy<Value = Option<MemberTypeOption>> {
    prop_oneof![
        Just(None),
        Just(Some(MemberTypeOption::new("T1", "Distributor", "Distributor__c"))),
        Just(Some(MemberTypeOption::new("T2", "Retailer", "Retailer__c"))),
    ]
}

fn build(
    member_type: Option<MemberTypeOption>,
    member: &Option<String>,
    access: &Option<String>,
    role: &Option<String>,
) -> WorkflowState {
    let mut state = WorkflowState::new();
    let value = member_type.as_ref().map_or_else(|| "unknown".to_string(), |t| t.value.clone());
    state.select_type(value, member_type);
    if let Some(member) = member {
        state.select_member(&[member.as_str()]);
    }
    if let Some(access) = access {
        state.select_access_level(access.as_str());
    }
    if let Some(role) = role {
        state.select_role(role.as_str());
    }
    state
}

proptest! {
    #[test]
    fn prop_submit_enabled_iff_type_member_and_access(
        member_type in member_type(),
        member in optional_text(),
        access in optional_text(),
        role in optional_text(),
    ) {
        let has_type = member_type.is_some();
        let state = build(member_type, &member, &access, &role);

        let expected = has_type
            && member.as_deref().is_some_and(|m| !m.is_empty())
            && access.as_deref().is_some_and(|a| !a.is_empty());

        prop_assert_eq!(state.is_submit_enabled(), expected);
    }

    #[test]
    fn prop_type_change_always_resets_member(
        before in member_type(),
        after in member_type(),
        member in optional_text(),
        access in optional_text(),
        role in optional_text(),
    ) {
        let mut state = build(before, &member, &access, &role);
        let value = after.as_ref().map_or_else(String::new, |t| t.value.clone());

        state.select_type(value, after);

        prop_assert_eq!(state.member_id(), None);
        prop_assert!(!state.is_submit_enabled());
        prop_assert_eq!(state.access_level(), access.as_deref());
        prop_assert_eq!(state.role(), role.as_deref());
    }
}
