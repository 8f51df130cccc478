//! Dynaform Validation
//!
//! Pure validator functions used by compiled rule chains. Every validator
//! returns `Ok(())` on success or the default user-facing message on failure;
//! callers may substitute their own message.

pub mod email;
pub mod numeric;
pub mod presence;
pub mod string;

// Re-export all validators
pub use email::*;
pub use numeric::*;
pub use presence::*;
pub use string::*;
