//! Shared validation helpers used by all domain validators.

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u64, min: u64, max: u64) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error unless `value` parses as an absolute URL.
pub(crate) fn validate_absolute_url(errors: &mut Vec<String>, name: &str, value: &str) {
    if let Err(e) = url::Url::parse(value) {
        errors.push(format!("{name} = {value:?} is not an absolute URL ({e})"));
    }
}
