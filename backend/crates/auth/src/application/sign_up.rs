//! Sign Up Use Case
//!
//! Creates a new account in the user directory. Only customer and seller
//! accounts can be created this way.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::deadline::Deadline;
use crate::domain::repository::{NewUser, UserDirectory};
use crate::domain::value_object::{
    email::Email, user_id::UserId, user_name::UserName, user_role::Role,
};
use crate::error::{AuthError, AuthResult};

pub struct SignUpInput {
    pub email: String,
    pub user_name: String,
    pub password: String,
    /// Defaults to customer
    pub role: Option<Role>,
}

pub struct SignUpUseCase<D>
where
    D: UserDirectory,
{
    directory: Arc<D>,
}

impl<D> SignUpUseCase<D>
where
    D: UserDirectory,
{
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    pub async fn execute(&self, input: SignUpInput, deadline: Deadline) -> AuthResult<UserId> {
        let email = Email::new(input.email)?;
        let username = UserName::new(&input.user_name)?;
        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let role = input.role.unwrap_or_default();
        if !role.can_self_register() {
            return Err(AuthError::Validation(format!(
                "role '{role}' cannot be chosen at sign up"
            )));
        }

        let user_name = username.to_string();
        let user_id = deadline
            .directory_call(self.directory.register(NewUser {
                email,
                username,
                password,
                role,
            }))
            .await?;

        tracing::info!(user_id = %user_id, user_name = %user_name, role = %role, "User signed up");

        Ok(user_id)
    }
}
