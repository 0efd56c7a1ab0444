//! Contains constraint names and other custom types.

mod constraints;

pub use constraints::{AccountConstraints, ConstraintCategory, ConstraintViolation};
