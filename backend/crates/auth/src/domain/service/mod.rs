//! Domain Services

pub mod clock;
pub mod token_codec;

pub use clock::{Clock, ManualClock, SystemClock};
pub use token_codec::TokenError;
