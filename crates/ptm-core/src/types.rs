//! Core types for the product team member workflow
//!
//! Defines:
//! - Parent record identifiers
//! - Reference data options (member types, picklists)
//! - Search requests and candidate records
//! - The create payload and sharing rows
//! - Access decisions and notifications

use crate::config::MessageKey;
use crate::error::StateError;
use serde::{Deserialize, Serialize};

/// Opaque identifier of the parent product record
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParentRecordId(String);

impl ParentRecordId {
    /// Create identifier
    ///
    /// # Errors
    /// - `StateError::EmptyRecordId` for an empty or blank value
    pub fn new(value: impl Into<String>) -> Result<Self, StateError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(StateError::EmptyRecordId);
        }
        Ok(Self(value))
    }

    /// Borrow as string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ParentRecordId {
    type Error = StateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ParentRecordId> for String {
    fn from(id: ParentRecordId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ParentRecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configured team member type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberTypeOption {
    /// Type identifier, also the search scoping name
    pub value: String,
    /// Display label
    pub label: String,
    /// Lookup field on the association record for this type
    pub member_type_lookup_field: String,
}

impl MemberTypeOption {
    /// Create new member type
    #[inline]
    #[must_use]
    pub fn new(
        value: impl Into<String>,
        label: impl Into<String>,
        member_type_lookup_field: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            member_type_lookup_field: member_type_lookup_field.into(),
        }
    }
}

/// Uniform label/value option for access level and role selectors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PicklistOption {
    pub label: String,
    pub value: String,
}

impl PicklistOption {
    /// Create new option
    #[inline]
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Picklist entry as returned by the metadata store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PicklistValue {
    pub label: String,
    pub value: String,
    /// Store-specific extras, dropped on normalization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Value>,
    /// Controlling field indices, dropped on normalization
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub valid_for: Vec<u32>,
}

impl PicklistValue {
    /// Create entry without extras
    #[inline]
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            attributes: None,
            valid_for: Vec::new(),
        }
    }
}

impl From<PicklistValue> for PicklistOption {
    fn from(raw: PicklistValue) -> Self {
        Self {
            label: raw.label,
            value: raw.value,
        }
    }
}

/// Object metadata needed before picklists can be fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    pub default_record_type_id: String,
}

/// Typeahead search request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub search_term: String,
    /// Identifiers already selected, excluded from results
    pub selected_ids: Vec<String>,
    /// Scoping name of the active member type, `None` when no type is selected
    pub product_team_member_type_name: Option<String>,
}

/// Candidate record returned by search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    #[serde(rename = "sObjectType")]
    pub sobject_type: String,
    pub icon: String,
    pub title: String,
    pub subtitle: String,
}

impl SearchResult {
    /// Create candidate with empty icon and subtitle
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, sobject_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sobject_type: sobject_type.into(),
            icon: String::new(),
            title: title.into(),
            subtitle: String::new(),
        }
    }
}

/// Create-association payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayload {
    pub product_id: String,
    pub member_id: String,
    pub access_level: String,
    pub product_team_member_lookup_field: String,
    pub product_team_member_role: Option<String>,
}

/// Read-only sharing row, fully computed by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharingRow {
    pub name: String,
    pub role: String,
    pub access: String,
    pub reason: String,
}

/// Column of the sharing table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharingColumn {
    pub label: String,
    pub field_name: String,
    #[serde(rename = "type")]
    pub column_type: String,
}

/// Outcome of the permission check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessDecision {
    /// Check in flight
    #[default]
    Pending,
    /// Form revealed
    Granted,
    /// Notified and closed
    Denied,
}

impl AccessDecision {
    /// Check if the decision is final
    #[inline]
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Notification variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    Success,
    Error,
}

/// User-visible notification
///
/// `key` names the message independently of its configured text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub title: String,
    pub key: MessageKey,
    pub message: String,
    pub variant: ToastVariant,
}

impl Toast {
    /// Success notification
    #[inline]
    #[must_use]
    pub fn success(title: impl Into<String>, key: MessageKey, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            key,
            message: message.into(),
            variant: ToastVariant::Success,
        }
    }

    /// Error notification
    #[inline]
    #[must_use]
    pub fn error(title: impl Into<String>, key: MessageKey, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            key,
            message: message.into(),
            variant: ToastVariant::Error,
        }
    }
}

/// Treat `None` and empty strings alike
#[inline]
pub(crate) fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
