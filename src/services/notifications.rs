use uuid::Uuid;

use crate::common::Page;
use crate::error::{AppError, AppResult};
use crate::models::{NotificationInfo, NotificationListItem, NotificationStatus};
use crate::store::NotificationRepository;

/// Operator-facing reads and status changes of notifications.
#[derive(Clone)]
pub struct NotificationStore<S> {
    store: S,
    max_page_size: u64,
}

impl<S: NotificationRepository> NotificationStore<S> {
    pub fn new(store: S, max_page_size: u64) -> Self {
        Self {
            store,
            max_page_size,
        }
    }

    /// # Errors
    ///
    /// `NoContent` when no notification has this id.
    pub async fn update_status(&self, id: Uuid, status: NotificationStatus) -> AppResult<()> {
        let updated = self.store.update_status(id, status).await?;
        if updated == 0 {
            tracing::debug!(notification_id = %id, "No notification to update");
            return Err(AppError::NoContent(format!("notification {id}")));
        }
        tracing::debug!(notification_id = %id, status = %status, "Notification status updated");
        Ok(())
    }

    /// # Errors
    ///
    /// `NoContent` when the user has no notifications.
    pub async fn update_all_status_for_user(
        &self,
        user_id: Uuid,
        status: NotificationStatus,
    ) -> AppResult<u64> {
        let updated = self.store.update_status_for_user(user_id, status).await?;
        if updated == 0 {
            return Err(AppError::NoContent(format!("notifications for user {user_id}")));
        }
        tracing::debug!(user_id = %user_id, status = %status, updated, "Notification statuses updated");
        Ok(updated)
    }

    pub async fn get_info(&self, id: Uuid) -> AppResult<NotificationInfo> {
        self.store
            .notification_info(id)
            .await?
            .ok_or_else(|| AppError::NoContent(format!("notification {id}")))
    }

    /// Notifications of a user, newest first.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a non-positive `limit` or negative `offset`.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<NotificationStatus>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<NotificationListItem>> {
        let page = Page::new(limit, offset)?.capped(self.max_page_size);
        let items = self.store.list_for_user(user_id, status, page).await?;
        tracing::debug!(user_id = %user_id, count = items.len(), "Notifications listed");
        Ok(items)
    }
}
