// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

pub const MIN_LENGTH: usize = 6;
pub const MAX_LENGTH: usize = 20;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PasswordIssue {
    #[error("Password cannot be empty")]
    Empty,
    #[error("Password must be at least {} characters long", MIN_LENGTH)]
    TooShort,
    #[error("Password cannot be longer than {} characters", MAX_LENGTH)]
    TooLong,
    #[error("Password cannot contain whitespace")]
    Whitespace,
    #[error("Password must contain at least one letter")]
    MissingLetter,
    #[error("Password must contain at least one digit")]
    MissingDigit,
}

/// Checks a candidate password against the policy. Rules run in order and the
/// first failing one is reported.
pub fn validate(password: &str) -> Result<(), PasswordIssue> {
    if password.is_empty() {
        return Err(PasswordIssue::Empty);
    }
    let len = password.chars().count();
    if len < MIN_LENGTH {
        return Err(PasswordIssue::TooShort);
    }
    if len > MAX_LENGTH {
        return Err(PasswordIssue::TooLong);
    }
    if password.chars().any(char::is_whitespace) {
        return Err(PasswordIssue::Whitespace);
    }
    if !password.chars().any(char::is_alphabetic) {
        return Err(PasswordIssue::MissingLetter);
    }
    // decimal digits only; `is_numeric` also admits fractions and numerals
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordIssue::MissingDigit);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_each_rule_in_order() {
        assert_eq!(validate(""), Err(PasswordIssue::Empty));
        assert_eq!(validate("abc12"), Err(PasswordIssue::TooShort));
        assert_eq!(validate(&"a1".repeat(10)), Ok(()));
        assert_eq!(validate(&format!("{}1", "a".repeat(20))), Err(PasswordIssue::TooLong));
        assert_eq!(validate("abc 123"), Err(PasswordIssue::Whitespace));
        assert_eq!(validate("abc\t123"), Err(PasswordIssue::Whitespace));
        assert_eq!(validate("abcdefg"), Err(PasswordIssue::MissingDigit));
        assert_eq!(validate("1234567"), Err(PasswordIssue::MissingLetter));
        assert_eq!(validate("abcdef½"), Err(PasswordIssue::MissingDigit));
        assert_eq!(validate("abcde²x"), Err(PasswordIssue::MissingDigit));
        assert_eq!(validate("abcdeⅫ"), Err(PasswordIssue::MissingDigit));
    }

    #[test]
    fn accepts_letters_and_digits() {
        assert_eq!(validate("abc123"), Ok(()));
        assert_eq!(validate("пароль1"), Ok(()));
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        // six cyrillic letters are twelve bytes
        assert_eq!(validate("ааааа1"), Ok(()));
        assert_eq!(validate("ааа1"), Err(PasswordIssue::TooShort));
    }

    #[test]
    fn first_failure_wins() {
        // short and without digits: length is checked first
        assert_eq!(validate("a b"), Err(PasswordIssue::TooShort));
    }
}
