//! Application Layer
//!
//! Use cases and application services.

pub mod check_privilege;
pub mod config;
pub mod deadline;
pub mod orchestrator;
pub mod refresh;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod token_issuer;

// Re-exports
pub use check_privilege::CheckPrivilegeUseCase;
pub use config::AuthConfig;
pub use deadline::Deadline;
pub use orchestrator::SessionOrchestrator;
pub use refresh::RefreshUseCase;
pub use sign_in::{IssuedSession, SignInInput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use token_issuer::{Rotation, TokenIssuer};
