//! Bearer token models held by the client cache.

pub mod secret;
pub mod token;

pub use secret::*;
pub use token::*;
