//! Field-level validation helpers shared by every mutation path.

use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::CoreError;
use crate::models::room::RoomStatus;
use crate::types::Timestamp;

/// Reject empty or whitespace-only strings.
pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::Borrowed("must not be empty"));
        return Err(err);
    }
    Ok(())
}

/// Stays must end strictly after they start.
pub fn validate_interval(check_in: Timestamp, check_out: Timestamp) -> Result<(), CoreError> {
    if check_out <= check_in {
        return Err(CoreError::InvalidInterval);
    }
    Ok(())
}

/// Parse an operator-supplied room status.
///
/// `Occupied` is derived from bookings and can never be set directly.
pub fn parse_room_status(raw: &str) -> Result<RoomStatus, CoreError> {
    match raw.trim() {
        "Available" => Ok(RoomStatus::Available),
        "Maintenance" => Ok(RoomStatus::Maintenance),
        "Occupied" => Err(CoreError::Validation(
            "status 'Occupied' is derived from bookings and cannot be set".into(),
        )),
        other => Err(CoreError::Validation(format!(
            "Invalid room status '{other}'. Must be one of: Available, Maintenance"
        ))),
    }
}

/// Normalize optional free text: trimmed, with empty meaning "none".
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Flatten validator output into a single human-readable message.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = Vec::new();
    collect(errors, "", &mut parts);
    parts.sort();
    parts.join("; ")
}

fn collect(errors: &ValidationErrors, prefix: &str, parts: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for err in errs {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    parts.push(format!("{path}: {message}"));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, parts),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{path}[{index}]"), parts);
                }
            }
        }
    }
}
