// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Minimum length of a user name, in characters.
pub const MIN_NAME_LENGTH: usize = 3;
/// Maximum length of a user name, in characters.
pub const MAX_NAME_LENGTH: usize = 50;

/// Validates a user display name.
///
/// # Arguments
///
/// * `name` - The name to validate (surrounding whitespace is ignored)
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the name is shorter than
/// `MIN_NAME_LENGTH` or longer than `MAX_NAME_LENGTH` characters.
pub fn validate_user_name(name: &str) -> Result<(), DomainError> {
    let length: usize = name.trim().chars().count();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&length) {
        return Err(DomainError::InvalidName(format!(
            "Name must be between {MIN_NAME_LENGTH} and {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validates an email address.
///
/// The address must contain exactly one `@` with a non-empty local part,
/// and a domain containing a dot with characters on both sides of it.
/// Whitespace is not allowed anywhere inside the address.
///
/// # Errors
///
/// Returns `DomainError::InvalidEmail` if the address is malformed.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let invalid = || DomainError::InvalidEmail(String::from("invalid email format"));

    let email: &str = email.trim();
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let has_inner_dot: bool = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());
    if !has_inner_dot {
        return Err(invalid());
    }

    Ok(())
}
