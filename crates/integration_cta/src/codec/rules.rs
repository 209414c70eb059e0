//! Reusable argument rules
//!
//! Request types describe their parameter groups with [`Group`] and check
//! them with [`exactly_one_of`] or [`at_least_one_of`] instead of spelling
//! out the branching per operation.

use chrono::NaiveDate;

use crate::error::ValidationError;

/// Documented maximum number of IDs per list parameter of the Bus Tracker API
pub const MAX_LIST_ITEMS: usize = 10;

/// A named parameter (or set of parameters) and whether it was supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    /// Query parameter name used in error messages
    pub name: &'static str,
    /// Whether the caller supplied a non-empty value
    pub present: bool,
}

impl Group {
    /// A list parameter, present when non-empty
    #[must_use]
    pub fn list<S: AsRef<str>>(name: &'static str, items: &[S]) -> Self {
        Self {
            name,
            present: !items.is_empty(),
        }
    }

    /// An optional scalar, present when non-blank
    #[must_use]
    pub fn scalar(name: &'static str, value: Option<&str>) -> Self {
        Self {
            name,
            present: value.is_some_and(|v| !v.trim().is_empty()),
        }
    }
}

/// Which side of an exclusive pair was supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    First,
    Second,
}

/// Require exactly one of two groups
///
/// # Errors
///
/// `ConflictingGroups` if both are present, `MissingRequiredGroup` if neither is.
pub fn exactly_one_of(first: Group, second: Group) -> Result<Branch, ValidationError> {
    match (first.present, second.present) {
        (true, false) => Ok(Branch::First),
        (false, true) => Ok(Branch::Second),
        (true, true) => Err(ValidationError::ConflictingGroups {
            first: first.name,
            second: second.name,
        }),
        (false, false) => Err(ValidationError::MissingRequiredGroup {
            params: vec![first.name, second.name],
        }),
    }
}

/// Require at least one of the groups
///
/// # Errors
///
/// `MissingRequiredGroup` naming every group if none is present.
pub fn at_least_one_of(groups: &[Group]) -> Result<(), ValidationError> {
    if groups.iter().any(|g| g.present) {
        return Ok(());
    }
    Err(ValidationError::MissingRequiredGroup {
        params: groups.iter().map(|g| g.name).collect(),
    })
}

/// Require a non-blank value for a mandatory scalar
///
/// # Errors
///
/// `MissingRequiredGroup` naming `param` if the value is blank.
pub fn require_scalar(param: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingRequiredGroup {
            params: vec![param],
        });
    }
    Ok(())
}

/// Reject blank list items
///
/// # Errors
///
/// `WrongShape` pointing at the first blank item.
pub fn check_items<S: AsRef<str>>(param: &'static str, items: &[S]) -> Result<(), ValidationError> {
    match items.iter().position(|item| item.as_ref().trim().is_empty()) {
        Some(index) => Err(ValidationError::WrongShape {
            param,
            reason: format!("item {index} is blank"),
        }),
        None => Ok(()),
    }
}

/// Enforce a maximum list length
///
/// # Errors
///
/// `TooManyItems` if `items` is longer than `max`.
pub fn check_cardinality<S>(param: &'static str, items: &[S], max: usize) -> Result<(), ValidationError> {
    if items.len() > max {
        return Err(ValidationError::TooManyItems {
            param,
            count: items.len(),
            max,
        });
    }
    Ok(())
}

/// Require a calendar date written as `yyyyMMdd`
///
/// # Errors
///
/// `WrongShape` if the value is not eight digits forming a valid date.
pub fn check_date(param: &'static str, value: &str) -> Result<(), ValidationError> {
    let well_formed = value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit());
    if well_formed && NaiveDate::parse_from_str(value, "%Y%m%d").is_ok() {
        return Ok(());
    }
    Err(ValidationError::WrongShape {
        param,
        reason: format!("`{value}` is not a yyyyMMdd date"),
    })
}
