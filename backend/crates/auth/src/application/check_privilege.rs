//! Privilege Checks
//!
//! Read-only role checks against the user directory.

use std::sync::Arc;

use crate::application::deadline::Deadline;
use crate::domain::repository::UserDirectory;
use crate::domain::value_object::{user_id::UserId, user_role::Role};
use crate::error::AuthResult;

pub struct CheckPrivilegeUseCase<D>
where
    D: UserDirectory,
{
    directory: Arc<D>,
}

impl<D> CheckPrivilegeUseCase<D>
where
    D: UserDirectory,
{
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    pub async fn is_privileged(
        &self,
        user_id: &UserId,
        required: Role,
        deadline: Deadline,
    ) -> AuthResult<bool> {
        deadline
            .directory_call(self.directory.has_role(user_id, required))
            .await
    }

    pub async fn is_admin(&self, user_id: &UserId, deadline: Deadline) -> AuthResult<bool> {
        self.is_privileged(user_id, Role::Admin, deadline).await
    }
}
