use crate::render::color::Color;
use crate::utils::error::{InfographicError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(InfographicError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(InfographicError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 檔名不可包含路徑分隔符號
pub fn validate_file_stem(field_name: &str, stem: &str) -> Result<()> {
    validate_non_empty_string(field_name, stem)?;
    if stem.contains('/') || stem.contains('\\') || stem.contains('\0') {
        return Err(InfographicError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: stem.to_string(),
            reason: "File name must not contain path separators".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_weight(field_name: &str, weight: f64) -> Result<()> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(InfographicError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: weight.to_string(),
            reason: "Weight must be a finite number greater than zero".to_string(),
        });
    }
    Ok(())
}

pub fn validate_allowed_values(
    field_name: &str,
    values: &[String],
    allowed: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed.iter().copied().collect();

    for value in values {
        if !allowed_set.contains(value.as_str()) {
            return Err(InfographicError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.clone(),
                reason: format!("Unsupported value. Valid values: {}", allowed.join(", ")),
            });
        }
    }

    Ok(())
}

pub fn validate_color(field_name: &str, value: &str) -> Result<()> {
    Color::parse(value).map(|_| ()).ok_or_else(|| InfographicError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: "Expected #RGB, #RRGGBB, #RRGGBBAA, white, black or none".to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(InfographicError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(InfographicError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
