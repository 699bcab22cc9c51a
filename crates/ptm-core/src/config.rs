//! Component configuration
//!
//! User-facing text and schema names are configuration rather than code so
//! hosting surfaces can localize messages and point at renamed fields.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Identifies a user-facing notification message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKey {
    /// Current actor may not manage team members
    ProductTeamMemberManagementFailed,
    /// Permission check failed
    ProductTeamMemberCheckUserAccessFailed,
    /// Member type list fetch failed
    FetchProductTeamMemberFailed,
    /// Access level picklist fetch failed
    FetchProductAccessValuesFailed,
    /// Role picklist fetch failed
    FetchProductRoleValuesFailed,
    /// Typeahead search failed
    SearchProductTeamMemberFailed,
    /// Association created
    ProductTeamMemberCreationSuccess,
    /// Association creation failed
    ProductTeamMemberCreationFailed,
    /// Sharing rows fetch failed
    FetchProductTeamMemberRecordsFailed,
}

impl MessageKey {
    /// Stable label identifier, as used by hosting surfaces
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProductTeamMemberManagementFailed => "productTeamMemberManagementFailed",
            Self::ProductTeamMemberCheckUserAccessFailed => "productTeamMemberCheckUserAccessFailed",
            Self::FetchProductTeamMemberFailed => "fetchProductTeamMemberFailed",
            Self::FetchProductAccessValuesFailed => "fetchProductAccessValuesFailed",
            Self::FetchProductRoleValuesFailed => "fetchProductRoleValuesFailed",
            Self::SearchProductTeamMemberFailed => "searchProductTeamMemberFailed",
            Self::ProductTeamMemberCreationSuccess => "productTeamMemberCreationSuccess",
            Self::ProductTeamMemberCreationFailed => "productTeamMemberCreationFailed",
            Self::FetchProductTeamMemberRecordsFailed => "fetchProductTeamMemberRecordsFailed",
        }
    }
}

impl std::fmt::Display for MessageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level configuration shared by both components
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatorConfig {
    /// User-facing text
    pub labels: Labels,
    /// Schema names used for metadata and picklist lookups
    pub schema: SchemaConfig,
}

impl CreatorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML, falling back to defaults for missing keys
    ///
    /// # Errors
    /// - `ConfigError::Parse` if the document is not valid for this schema
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// With labels
    #[inline]
    #[must_use]
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// With schema names
    #[inline]
    #[must_use]
    pub fn with_schema(mut self, schema: SchemaConfig) -> Self {
        self.schema = schema;
        self
    }
}

/// Association object and field API names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Association object whose metadata yields the record type id
    pub team_member_object: String,
    /// Access level picklist field
    pub access_level_field: String,
    /// Role picklist field
    pub role_field: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            team_member_object: "ProductTeamMember__c".to_string(),
            access_level_field: "ProductTeamMember__c.ProductAccessLevel__c".to_string(),
            role_field: "ProductTeamMember__c.TeamMemberRole__c".to_string(),
        }
    }
}

/// User-facing text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub success_title: String,
    pub error_title: String,

    pub management_not_allowed: String,
    pub check_user_access_failed: String,
    pub fetch_team_member_types_failed: String,
    pub fetch_access_values_failed: String,
    pub fetch_role_values_failed: String,
    pub search_team_member_failed: String,
    pub creation_success: String,
    pub creation_failed: String,
    pub fetch_sharing_records_failed: String,

    pub member_column: String,
    pub role_column: String,
    pub access_column: String,
    pub reason_column: String,
}

impl Labels {
    /// Text for a notification message
    #[must_use]
    pub fn message(&self, key: MessageKey) -> &str {
        match key {
            MessageKey::ProductTeamMemberManagementFailed => &self.management_not_allowed,
            MessageKey::ProductTeamMemberCheckUserAccessFailed => &self.check_user_access_failed,
            MessageKey::FetchProductTeamMemberFailed => &self.fetch_team_member_types_failed,
            MessageKey::FetchProductAccessValuesFailed => &self.fetch_access_values_failed,
            MessageKey::FetchProductRoleValuesFailed => &self.fetch_role_values_failed,
            MessageKey::SearchProductTeamMemberFailed => &self.search_team_member_failed,
            MessageKey::ProductTeamMemberCreationSuccess => &self.creation_success,
            MessageKey::ProductTeamMemberCreationFailed => &self.creation_failed,
            MessageKey::FetchProductTeamMemberRecordsFailed => &self.fetch_sharing_records_failed,
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            success_title: "Success".to_string(),
            error_title: "Error".to_string(),
            management_not_allowed: "You are not allowed to add team members to this product."
                .to_string(),
            check_user_access_failed: "Could not verify your access to this product.".to_string(),
            fetch_team_member_types_failed: "Failed to load team member types.".to_string(),
            fetch_access_values_failed: "Failed to load product access levels.".to_string(),
            fetch_role_values_failed: "Failed to load team member roles.".to_string(),
            search_team_member_failed: "Team member search failed.".to_string(),
            creation_success: "Product team member was added.".to_string(),
            creation_failed: "Product team member could not be added.".to_string(),
            fetch_sharing_records_failed: "Failed to load product team member access.".to_string(),
            member_column: "Product Team Member".to_string(),
            role_column: "Role".to_string(),
            access_column: "Access".to_string(),
            reason_column: "Sharing Reason".to_string(),
        }
    }
}
