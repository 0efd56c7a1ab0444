//! Provisioning failures as HTTP errors.

use crate::handler::{Error, ErrorKind};
use crate::service::ProvisionError;

impl From<ProvisionError> for Error<'static> {
    fn from(error: ProvisionError) -> Self {
        match error {
            ProvisionError::NotAuthenticated => ErrorKind::Unauthorized
                .with_message("Authentication required")
                .with_resource("authentication"),
            ProvisionError::ProfileUnavailable(_) => ErrorKind::InternalServerError
                .with_message("User profile is unavailable")
                .with_resource("profile"),
            ProvisionError::MissingEmailAddress => ErrorKind::InternalServerError
                .with_message("User profile has no email address")
                .with_resource("profile"),
            ProvisionError::Store(pg_error) => pg_error.into(),
        }
    }
}
