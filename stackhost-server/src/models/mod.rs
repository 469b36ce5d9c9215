//! Domain models with validation at construction
//!
//! All client input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod user;
pub mod validation;

pub use user::{parse_user_id, NewUser, PhoneChange, User, UserId, UserPayload};
pub use validation::ValidationError;
