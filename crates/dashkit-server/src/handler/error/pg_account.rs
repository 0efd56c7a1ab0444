//! Account constraint violations as HTTP errors.

use dashkit_postgres::types::AccountConstraints;

use crate::handler::{Error, ErrorKind};

impl From<AccountConstraints> for Error<'static> {
    fn from(c: AccountConstraints) -> Self {
        let error = match c {
            AccountConstraints::UserIdNotEmpty => {
                ErrorKind::BadRequest.with_message("User identifier cannot be empty")
            }
            AccountConstraints::UsernameNotEmpty => {
                ErrorKind::BadRequest.with_message("Username cannot be empty")
            }
            AccountConstraints::UpdatedAfterCreated => ErrorKind::InternalServerError.into_error(),
            AccountConstraints::UserIdUnique => ErrorKind::Conflict
                .with_message("An account for this user already exists"),
        };

        error.with_resource("account")
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_constraint_is_an_account_error() {
        for constraint in AccountConstraints::iter() {
            let error = Error::from(constraint);
            assert_eq!(error.resource(), Some("account"));
        }
    }

    #[test]
    fn unique_user_id_is_a_conflict() {
        let error = Error::from(AccountConstraints::UserIdUnique);
        assert_eq!(error.kind().status_code(), StatusCode::CONFLICT);
    }
}
