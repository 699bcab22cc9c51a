//! Read-only sharing list for a product
//!
//! Fetches every sharing row once when the product id arrives. No paging,
//! refresh or retry.

use crate::config::CreatorConfig;
use crate::error::{Error, StateError, WorkflowError};
use crate::host::{ComponentContext, Notifier, ProductTeamService};
use crate::types::{ParentRecordId, SharingColumn, SharingRow};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Sharing list component
#[derive(Debug)]
pub struct ProductTeamMemberSharing {
    ctx: ComponentContext,
    record_id: OnceLock<ParentRecordId>,
    rows: Mutex<Vec<SharingRow>>,
    loading: AtomicBool,
}

impl ProductTeamMemberSharing {
    /// Create component
    #[must_use]
    pub fn new(
        service: Arc<dyn ProductTeamService>,
        notifier: Arc<dyn Notifier>,
        config: CreatorConfig,
    ) -> Self {
        Self {
            ctx: ComponentContext::new(service, notifier, config),
            record_id: OnceLock::new(),
            rows: Mutex::new(Vec::new()),
            loading: AtomicBool::new(true),
        }
    }

    /// Set the product id and fetch its sharing rows
    ///
    /// # Errors
    /// - `StateError::EmptyRecordId` for an empty id; nothing is fetched
    /// - `StateError::AlreadyInitialized` on a second call
    /// - `WorkflowError::ListSharingRowsFailed`, already reported; the list
    ///   stays empty
    pub async fn initialize(&self, record_id: impl Into<String>) -> Result<usize, Error> {
        let record_id = ParentRecordId::new(record_id)?;
        self.record_id
            .set(record_id.clone())
            .map_err(|_| StateError::AlreadyInitialized)?;

        let fetched = self.ctx.service.list_sharing_rows(&record_id).await;
        self.loading.store(false, Ordering::SeqCst);

        match fetched {
            Ok(rows) => {
                tracing::debug!(product_id = %record_id, count = rows.len(), "sharing rows loaded");
                let count = rows.len();
                *self.rows.lock() = rows;
                Ok(count)
            }
            Err(e) => {
                let error = WorkflowError::ListSharingRowsFailed(e);
                self.ctx.report(&error);
                Err(error.into())
            }
        }
    }

    /// Product id exactly as passed to `initialize`
    #[inline]
    #[must_use]
    pub fn record_id(&self) -> Option<&ParentRecordId> {
        self.record_id.get()
    }

    /// Rows fetched so far
    #[must_use]
    pub fn rows(&self) -> Vec<SharingRow> {
        self.rows.lock().clone()
    }

    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Table columns: member, role, access, reason
    #[must_use]
    pub fn columns(&self) -> Vec<SharingColumn> {
        let labels = &self.ctx.config.labels;
        [
            (&labels.member_column, "name"),
            (&labels.role_column, "role"),
            (&labels.access_column, "access"),
            (&labels.reason_column, "reason"),
        ]
        .into_iter()
        .map(|(label, field)| SharingColumn {
            label: label.clone(),
            field_name: field.to_string(),
            column_type: "text".to_string(),
        })
        .collect()
    }
}
