// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Maximum accepted title length.
const MAX_TITLE_LENGTH: usize = 200;

/// Minimum accepted proposal length, enforced again at the point of
/// bid placement.
const MIN_PROPOSAL_LENGTH: usize = 10;

/// Maximum accepted deadline offset, in hours (one year).
const MAX_DEADLINE_HOURS: i64 = 24 * 365;

/// Validates a task title.
///
/// # Arguments
///
/// * `title` - The title to validate
///
/// # Errors
///
/// Returns `DomainError::InvalidTitle` if the title is empty or longer
/// than 200 characters.
pub fn validate_title(title: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::InvalidTitle(String::from(
            "Title cannot be empty",
        )));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(DomainError::InvalidTitle(format!(
            "Title cannot exceed {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validates a task description.
///
/// # Errors
///
/// Returns `DomainError::InvalidDescription` if the description is empty.
pub fn validate_description(description: &str) -> Result<(), DomainError> {
    if description.trim().is_empty() {
        return Err(DomainError::InvalidDescription(String::from(
            "Description cannot be empty",
        )));
    }
    Ok(())
}

/// Validates a task price in minor currency units.
///
/// Prices are integer cents and must be strictly positive; zero and
/// negative prices are rejected at the posting boundary rather than
/// surfacing later as unpayable tasks.
///
/// # Errors
///
/// Returns `DomainError::InvalidPrice` if the price is not positive.
pub fn validate_price_cents(price_cents: i64) -> Result<(), DomainError> {
    if price_cents <= 0 {
        return Err(DomainError::InvalidPrice(format!(
            "Price must be a positive number of cents, got {price_cents}"
        )));
    }
    Ok(())
}

/// Validates a bid proposal.
///
/// # Errors
///
/// Returns `DomainError::InvalidProposal` if the proposal is shorter
/// than ten characters.
pub fn validate_proposal(proposal: &str) -> Result<(), DomainError> {
    if proposal.chars().count() < MIN_PROPOSAL_LENGTH {
        return Err(DomainError::InvalidProposal(format!(
            "Proposal must be at least {MIN_PROPOSAL_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validates a phone number string without constructing a `PhoneNumber`.
///
/// # Errors
///
/// Returns `DomainError::InvalidPhoneNumber` if the value contains fewer
/// than ten digits.
pub fn validate_phone_number(value: &str) -> Result<(), DomainError> {
    let digits: usize = value.chars().filter(char::is_ascii_digit).count();
    if digits < 10 {
        return Err(DomainError::InvalidPhoneNumber(String::from(
            "Phone number must contain at least 10 digits",
        )));
    }
    Ok(())
}

/// Validates a deadline offset in hours from posting time.
///
/// # Errors
///
/// Returns `DomainError::InvalidDeadline` if the offset is not positive
/// or exceeds one year.
pub fn validate_deadline_hours(hours: i64) -> Result<(), DomainError> {
    if hours <= 0 {
        return Err(DomainError::InvalidDeadline(format!(
            "Deadline offset must be positive, got {hours} hours"
        )));
    }
    if hours > MAX_DEADLINE_HOURS {
        return Err(DomainError::InvalidDeadline(format!(
            "Deadline offset cannot exceed {MAX_DEADLINE_HOURS} hours"
        )));
    }
    Ok(())
}
