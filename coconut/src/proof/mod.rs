//! Showing proofs: prove possession of a credential over hidden attributes, bound to context
//! values, together with a uniqueness tag derived from the first hidden attribute.

mod error;
mod showing;
mod tag;

pub use error::*;
pub use showing::*;
pub use tag::*;
