//! Entity Module

pub mod claims;
pub mod identity;
pub mod token_profile;

pub use claims::{CLAIMS_VERSION, Claims};
pub use identity::Identity;
pub use token_profile::{TokenPair, TokenProfile, TokenProfiles, TokenSecret};
