//! Create-association command
//!
//! Runs the mutation once, notifies the outcome, and closes the hosting
//! container on every path.

use crate::config::MessageKey;
use crate::error::WorkflowError;
use crate::host::{CloseGuard, ComponentContext, HostContainer};
use crate::types::CreatePayload;
use std::sync::Arc;

/// One-shot create command
#[derive(Debug)]
pub struct CreateCommand {
    payload: CreatePayload,
}

impl CreateCommand {
    /// Prepare command for `payload`
    #[inline]
    #[must_use]
    pub fn new(payload: CreatePayload) -> Self {
        Self { payload }
    }

    /// Payload to be sent
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &CreatePayload {
        &self.payload
    }

    /// Execute the mutation, consuming the command
    ///
    /// The close request fires after the outcome notification.
    ///
    /// # Errors
    /// - `WorkflowError::CreateFailed`, already reported
    pub async fn execute(
        self,
        ctx: &ComponentContext,
        container: Arc<dyn HostContainer>,
    ) -> Result<(), WorkflowError> {
        let _close = CloseGuard::new(container);

        match ctx.service.create_association(&self.payload).await {
            Ok(()) => {
                tracing::info!(
                    product_id = %self.payload.product_id,
                    member_id = %self.payload.member_id,
                    access_level = %self.payload.access_level,
                    "product team member created"
                );
                ctx.notify_success(MessageKey::ProductTeamMemberCreationSuccess);
                Ok(())
            }
            Err(e) => {
                let error = WorkflowError::CreateFailed(e);
                ctx.report(&error);
                Err(error)
            }
        }
    }
}
