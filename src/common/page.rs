use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Limit/offset window for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for a non-positive limit or negative offset.
    pub fn new(limit: i64, offset: i64) -> AppResult<Self> {
        let limit = u64::try_from(limit)
            .ok()
            .filter(|l| *l > 0)
            .ok_or_else(|| AppError::InvalidInput(format!("limit must be positive, got {limit}")))?;
        let offset = u64::try_from(offset).map_err(|_| {
            AppError::InvalidInput(format!("offset must not be negative, got {offset}"))
        })?;
        Ok(Self { limit, offset })
    }

    /// Clamp the limit to `max`.
    #[must_use]
    pub fn capped(self, max: u64) -> Self {
        Self {
            limit: self.limit.min(max),
            offset: self.offset,
        }
    }

    pub(crate) fn limit_i64(self) -> i64 {
        i64::try_from(self.limit).unwrap_or(i64::MAX)
    }

    pub(crate) fn offset_i64(self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }

    pub(crate) fn window<T: Clone>(self, rows: &[T]) -> Vec<T> {
        rows.iter()
            .skip(usize::try_from(self.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}
