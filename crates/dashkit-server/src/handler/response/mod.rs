//! Response bodies.

mod account;
mod error_response;
mod monitors;

pub use account::{Account, AccountPage, Subscription};
pub use error_response::ErrorResponse;
pub use monitors::{DatabaseStatus, HealthStatus};
