//! Coconut credentials: Pointcheval-Sanders signatures issued by each authority over the same
//! `h`, combined by Lagrange interpolation into a credential verifiable with the aggregate key.

mod aggregated;
mod credential;
mod error;

pub use credential::*;
pub use error::*;
