use crate::error::{AgrocastError, Result};

pub const MAX_FIELD_ID_LEN: usize = 50;
pub const MIN_DAYS: i64 = 1;
pub const MAX_DAYS: i64 = 365;

/// Field ids are limited to ASCII letters, digits and underscores
pub fn validate_field_id(field_id: &str) -> Result<&str> {
    if field_id.is_empty() {
        return Err(AgrocastError::invalid_input(
            "field_id",
            "Field ID is required",
        ));
    }

    if field_id.chars().count() > MAX_FIELD_ID_LEN {
        return Err(AgrocastError::invalid_input(
            "field_id",
            format!("Field ID must be {} characters or less", MAX_FIELD_ID_LEN),
        ));
    }

    let pattern = regex_lite::Regex::new(r"^[a-zA-Z0-9_]+$")
        .map_err(|e| AgrocastError::InvalidData(format!("Bad field id pattern: {}", e)))?;
    if !pattern.is_match(field_id) {
        return Err(AgrocastError::invalid_input(
            "field_id",
            "Field ID can only contain letters, numbers, and underscores",
        ));
    }

    Ok(field_id)
}

pub fn validate_days(days: i64) -> Result<u32> {
    if days < MIN_DAYS {
        return Err(AgrocastError::invalid_input(
            "days",
            "Days must be at least 1",
        ));
    }
    if days > MAX_DAYS {
        return Err(AgrocastError::invalid_input(
            "days",
            "Days cannot exceed 365",
        ));
    }
    Ok(days as u32)
}
