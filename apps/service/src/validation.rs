use anyhow::{Result, anyhow};
use url::Url;

/// Validation results with specific error messages
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self { is_valid: true, error: None }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self { is_valid: false, error: Some(msg.into()) }
    }

    pub fn to_result(&self) -> Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(anyhow!(self.error.clone().unwrap_or_else(|| "Validation failed".to_string())))
        }
    }
}

/// Validate the HTTP/HTTPS URL the prober targets
pub fn validate_http_endpoint(target: &str) -> ValidationResult {
    if target.trim().is_empty() {
        return ValidationResult::err("Target cannot be empty");
    }

    match Url::parse(target) {
        Ok(url) => {
            let scheme = url.scheme();
            if scheme != "http" && scheme != "https" {
                return ValidationResult::err(format!(
                    "Invalid scheme '{scheme}'. Must be http or https"
                ));
            }

            if url.host_str().is_none() {
                return ValidationResult::err("URL must have a valid host");
            }

            ValidationResult::ok()
        }
        Err(e) => {
            if !target.contains("://") {
                ValidationResult::err("URL must include scheme (http:// or https://)")
            } else {
                ValidationResult::err(format!("Invalid URL: {e}"))
            }
        }
    }
}

/// Validate probe interval
pub fn validate_interval(interval: u64) -> ValidationResult {
    if interval == 0 {
        return ValidationResult::err("Interval must be at least 1 second");
    }

    if interval > 86400 {
        return ValidationResult::err("Interval too long (max 24 hours)");
    }

    ValidationResult::ok()
}

/// Validate request timeout.
///
/// The timeout has to stay below the interval so that a probe always finishes
/// before the next tick.
pub fn validate_timeout(timeout: u64, interval: u64) -> ValidationResult {
    if timeout == 0 {
        return ValidationResult::err("Timeout must be at least 1 second");
    }

    if timeout >= interval {
        return ValidationResult::err("Timeout must be less than interval");
    }

    ValidationResult::ok()
}

/// Validate the history window served to clients
pub fn validate_history_days(days: u32) -> ValidationResult {
    if days == 0 {
        return ValidationResult::err("History window must be at least 1 day");
    }

    ValidationResult::ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_validation() {
        assert!(validate_http_endpoint("http://example.com").is_valid);
        assert!(validate_http_endpoint("https://example.com").is_valid);
        assert!(validate_http_endpoint("http://192.168.1.1").is_valid);
        assert!(validate_http_endpoint("http://example.com:8080/path").is_valid);

        assert!(!validate_http_endpoint("").is_valid);
        assert!(!validate_http_endpoint("example.com").is_valid);
        assert!(!validate_http_endpoint("ftp://example.com").is_valid);
    }

    #[test]
    fn test_missing_scheme_message() {
        let result = validate_http_endpoint("deploy.tz");
        assert_eq!(
            result.error.as_deref(),
            Some("URL must include scheme (http:// or https://)")
        );
        assert!(result.to_result().is_err());
    }

    #[test]
    fn test_interval_validation() {
        assert!(validate_interval(60).is_valid);
        assert!(validate_interval(86400).is_valid);
        assert!(!validate_interval(0).is_valid);
        assert!(!validate_interval(86401).is_valid);
    }

    #[test]
    fn test_timeout_validation() {
        assert!(validate_timeout(5, 10).is_valid);
        assert!(!validate_timeout(10, 10).is_valid);
        assert!(!validate_timeout(15, 10).is_valid);
        assert!(!validate_timeout(0, 10).is_valid);
    }

    #[test]
    fn test_history_days_validation() {
        assert!(validate_history_days(90).is_valid);
        assert!(!validate_history_days(0).is_valid);
    }
}
