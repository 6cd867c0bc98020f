// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

use crate::password::PasswordIssue;

/// Rejected ledger mutations. Returned before any state change or store call.
#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(String),

    #[error("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("The savings category cannot be deleted")]
    ProtectedCategory,
}

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("Enter a password")]
    EmptyPassword,

    #[error("No user found, register first")]
    NoUser,

    #[error("A user is already registered")]
    AlreadyRegistered,

    #[error("Wrong password, try again")]
    WrongPassword,

    #[error("Passwords do not match")]
    Mismatch,

    #[error(transparent)]
    Policy(#[from] PasswordIssue),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_entity() {
        let err = LedgerError::NotFound {
            entity: "Category",
            id: 7,
        };
        assert_eq!(err.to_string(), "Category #7 not found");
    }

    #[test]
    fn policy_issue_is_transparent() {
        let err = AuthError::from(PasswordIssue::MissingDigit);
        assert_eq!(err.to_string(), PasswordIssue::MissingDigit.to_string());
    }

    #[test]
    fn errors_convert_into_anyhow() {
        let err: anyhow::Error = LedgerError::ProtectedCategory.into();
        assert!(err.downcast_ref::<LedgerError>().is_some());
    }
}
