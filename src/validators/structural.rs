//! Single-assertion checks on plain values.

use crate::error::{Validation, ValidationError, ValidationKind};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static HOSTNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9.]+(:[0-9]+)?$").expect("hostname pattern"));

static TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(w|m|d|h|s)$").expect("time pattern"));

/// Fail if an optional value is absent.
pub fn validate_required<T: ?Sized>(input: Option<&T>, field: &str, field_group: &str) -> Validation {
    match input {
        Some(_) => Ok(()),
        None => Err(required(field, field_group)),
    }
}

/// Fail if a string is empty.
pub fn validate_required_string(input: &str, field: &str, field_group: &str) -> Validation {
    if input.is_empty() {
        return Err(required(field, field_group));
    }
    Ok(())
}

/// Fail unless at least one flag is set. The error is tagged with every field.
pub fn validate_at_least_one_of_bool(inputs: &[bool], fields: &[&str], field_group: &str) -> Validation {
    if inputs.iter().any(|enabled| *enabled) {
        return Ok(());
    }
    Err(ValidationError::new(
        ValidationKind::MissingValue,
        fields.iter().copied(),
        field_group,
        format!("At least one of {} must be enabled", fields.join(",")),
    ))
}

/// Fail unless at least one string is non-empty. The error is tagged with every field.
pub fn validate_at_least_one_of_string(
    inputs: &[&str],
    fields: &[&str],
    field_group: &str,
) -> Validation {
    if inputs.iter().any(|value| !value.is_empty()) {
        return Ok(());
    }
    Err(ValidationError::new(
        ValidationKind::MissingValue,
        fields.iter().copied(),
        field_group,
        format!("At least one of {} must be present", fields.join(",")),
    ))
}

/// Fail unless `input` equals one of `options`.
pub fn validate_is_one_of_string(
    input: &str,
    options: &[&str],
    field: &str,
    field_group: &str,
) -> Validation {
    if options.contains(&input) {
        return Ok(());
    }
    Err(ValidationError::for_field(
        ValidationKind::InvalidValue,
        field,
        field_group,
        format!("{} must be one of {}.", field, options.join(",")),
    ))
}

/// Fail unless `input` is an absolute URL with a scheme and a host.
pub fn validate_is_url(input: &str, field: &str, field_group: &str) -> Validation {
    let valid = url::Url::parse(input)
        .map(|url| !url.scheme().is_empty() && url.host_str().is_some_and(|host| !host.is_empty()))
        .unwrap_or(false);

    if !valid {
        return Err(ValidationError::for_field(
            ValidationKind::InvalidValue,
            field,
            field_group,
            format!("{} must be of type URL", field),
        ));
    }
    Ok(())
}

/// Fail unless the trimmed input looks like `host` or `host:port`.
pub fn validate_is_hostname(input: &str, field: &str, field_group: &str) -> Validation {
    if !HOSTNAME.is_match(input.trim_matches(' ')) {
        return Err(ValidationError::for_field(
            ValidationKind::InvalidValue,
            field,
            field_group,
            format!("{} must be of type Hostname", field),
        ));
    }
    Ok(())
}

/// Fail unless `input` is a duration such as `30s`, `15m`, `12h`, `7d` or `2w`.
pub fn validate_time_pattern(input: &str, field: &str, field_group: &str) -> Validation {
    if !TIME_PATTERN.is_match(input) {
        return Err(ValidationError::for_field(
            ValidationKind::InvalidValue,
            field,
            field_group,
            format!("{} must have the regex pattern {}", field, TIME_PATTERN.as_str()),
        ));
    }
    Ok(())
}

/// Fail if nothing exists at `path`.
pub fn validate_file_exists(path: impl AsRef<Path>, field: &str, field_group: &str) -> Validation {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ValidationError::for_field(
            ValidationKind::FileNotFound,
            field,
            field_group,
            format!("Cannot access the file {}", path.display()),
        ));
    }
    Ok(())
}

fn required(field: &str, field_group: &str) -> ValidationError {
    ValidationError::for_field(
        ValidationKind::MissingValue,
        field,
        field_group,
        format!("{} is required", field),
    )
}
