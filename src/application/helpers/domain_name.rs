use crate::app_error::{AppError, AppResult};

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Trim, lowercase and validate a user-supplied domain name.
///
/// Accepts `example.com`, `www.example.co.uk`; rejects schemes, paths, ports,
/// single labels and labels that start or end with a hyphen.
pub fn normalize_domain_name(input: &str) -> AppResult<String> {
    let normalized = input.trim().trim_end_matches('.').to_lowercase();

    if normalized.is_empty() || normalized.len() > MAX_DOMAIN_LEN {
        return Err(invalid(input));
    }

    let labels: Vec<&str> = normalized.split('.').collect();
    if labels.len() < 2 || !labels.iter().all(|label| is_valid_label(label)) {
        return Err(invalid(input));
    }

    Ok(normalized)
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn invalid(input: &str) -> AppError {
    AppError::InvalidInput(format!("{:?} is not a valid domain name", input.trim()))
}
