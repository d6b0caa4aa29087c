//! Authority secret keys and the verification keys derived from them.

mod public;
mod secret;

pub use public::*;
pub use secret::*;
