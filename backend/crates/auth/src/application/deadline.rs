//! Per-request deadlines
//!
//! A timed-out store call is `StoreUnavailable`, never "no session".

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, timeout_at};

use crate::domain::repository::StoreError;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Instant);

impl Deadline {
    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    pub fn after(budget: Duration) -> Self {
        Self(Instant::now() + budget)
    }

    pub fn instant(&self) -> Instant {
        self.0
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.0
    }

    pub fn ensure_time_left(&self) -> AuthResult<()> {
        if self.is_expired() {
            return Err(AuthError::DeadlineExceeded);
        }
        Ok(())
    }

    pub async fn store_call<T, F>(&self, call: F) -> AuthResult<T>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match timeout_at(self.0, call).await {
            Ok(result) => result.map_err(AuthError::from),
            Err(_) => Err(AuthError::StoreUnavailable(
                "session store call timed out".to_string(),
            )),
        }
    }

    pub async fn directory_call<T, F>(&self, call: F) -> AuthResult<T>
    where
        F: Future<Output = AuthResult<T>>,
    {
        match timeout_at(self.0, call).await {
            Ok(result) => result,
            Err(_) => Err(AuthError::DirectoryUnavailable(
                "user directory call timed out".to_string(),
            )),
        }
    }
}
