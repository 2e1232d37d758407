//! Record types for each Love Journey page
//!
//! Every page defines its record, its category table, the draft payload sent
//! to the backend and the form behind its add/edit dialog.

pub mod achievements;
pub mod calendar;
pub mod capsule;
pub mod checkin;
pub mod goal;
pub mod journal;
pub mod memory;
pub mod milestone;
pub mod vault;

use crate::dates::parse_iso;
use crate::validation::ValidationErrors;
use chrono::{DateTime, Utc};

/// Split a comma separated tag input, dropping blanks and duplicates
pub fn split_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Inverse of `split_tags` for seeding edit forms
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// `None` for blank input
pub(crate) fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Parse a required date field, recording an error when blank or invalid
pub(crate) fn required_date(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
) -> Option<DateTime<Utc>> {
    if value.trim().is_empty() {
        errors.add(field, format!("{} is required", field));
        return None;
    }
    let parsed = parse_iso(value);
    if parsed.is_none() {
        errors.add(field, format!("{} must be a valid date", field));
    }
    parsed
}

/// Parse an optional date field; blank is `None`, garbage is an error
pub(crate) fn optional_date(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
) -> Option<DateTime<Utc>> {
    if value.trim().is_empty() {
        return None;
    }
    let parsed = parse_iso(value);
    if parsed.is_none() {
        errors.add(field, format!("{} must be a valid date", field));
    }
    parsed
}

/// Parse an optional non-negative amount such as "1,250.50"
pub(crate) fn optional_amount(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
) -> Option<f64> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Some(amount),
        _ => {
            errors.add(field, format!("{} must be a non-negative number", field));
            None
        }
    }
}

/// Format a date for a date input field
pub(crate) fn date_input(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format a timestamp for a datetime input field
pub(crate) fn datetime_input(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%dT%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tags_trims_and_dedupes() {
        assert_eq!(split_tags(" beach, Summer ,,beach, SUMMER"), vec!["beach", "Summer"]);
        assert!(split_tags("  ").is_empty());
    }

    #[test]
    fn test_join_round_trips_through_split() {
        let tags = vec!["a".to_string(), "b c".to_string()];
        assert_eq!(split_tags(&join_tags(&tags)), tags);
    }

    #[test]
    fn test_amount_parsing() {
        let mut errors = ValidationErrors::new();
        assert_eq!(optional_amount(&mut errors, "amount", "1,250.50"), Some(1250.5));
        assert_eq!(optional_amount(&mut errors, "amount", ""), None);
        assert!(errors.is_empty());

        assert_eq!(optional_amount(&mut errors, "amount", "-3"), None);
        assert!(errors.has("amount"));
    }

    #[test]
    fn test_required_date_errors() {
        let mut errors = ValidationErrors::new();
        assert!(required_date(&mut errors, "date", "").is_none());
        assert!(required_date(&mut errors, "when", "soon").is_none());
        assert_eq!(errors.get("date"), Some("date is required"));
        assert_eq!(errors.get("when"), Some("when must be a valid date"));
    }
}
