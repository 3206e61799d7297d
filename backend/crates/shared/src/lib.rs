//! Shared Kernel
//!
//! Vocabulary shared by every crate in the workspace:
//! - the client-facing [`error::app_error::AppError`], classified by
//!   [`error::kind::ErrorKind`] and rendered as an RFC 7807 problem body
//! - typed identifiers ([`id::Id`])
//!
//! Nothing here knows about tokens or sessions.

pub mod error {
    pub mod app_error;
    pub mod kind;
    #[cfg(feature = "axum")]
    pub mod response;
}
pub mod id;
