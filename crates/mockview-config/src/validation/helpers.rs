//! Shared range-validation helpers.

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error if `value` is below `min`.
pub(crate) fn validate_min_u64(errors: &mut Vec<String>, name: &str, value: u64, min: u64) {
    if value < min {
        errors.push(format!("{name} = {value} is below the minimum of {min}"));
    }
}
