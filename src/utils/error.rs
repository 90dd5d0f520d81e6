use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Unknown service type: {service_type}")]
    InvalidServiceType { service_type: String },

    #[error("Checkout not ready to submit: {reason}")]
    SubmitNotReady { reason: String },

    #[error("Submission rejected by server (status {status})")]
    SubmissionRejected { status: u16 },

    #[error("Submission request failed: {0}")]
    SubmissionError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration parsing error: {message}")]
    ConfigParseError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, CheckoutError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Pricing,
    Checkout,
    Submission,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CheckoutError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CheckoutError::InvalidServiceType { .. } => ErrorCategory::Pricing,
            CheckoutError::SubmitNotReady { .. } => ErrorCategory::Checkout,
            CheckoutError::SubmissionRejected { .. } | CheckoutError::SubmissionError(_) => {
                ErrorCategory::Submission
            }
            CheckoutError::ConfigParseError { .. }
            | CheckoutError::InvalidConfigValueError { .. }
            | CheckoutError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CheckoutError::IoError(_) | CheckoutError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CheckoutError::SubmitNotReady { .. } => ErrorSeverity::Low,
            CheckoutError::SubmissionRejected { .. } | CheckoutError::SubmissionError(_) => {
                ErrorSeverity::Medium
            }
            CheckoutError::InvalidServiceType { .. }
            | CheckoutError::ConfigParseError { .. }
            | CheckoutError::InvalidConfigValueError { .. }
            | CheckoutError::MissingConfigError { .. }
            | CheckoutError::SerializationError(_) => ErrorSeverity::High,
            CheckoutError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CheckoutError::InvalidServiceType { service_type } => format!(
                "Service type '{}' is not in the catalog. Check the catalog file for the available service keys",
                service_type
            ),
            CheckoutError::SubmitNotReady { .. } => {
                "Complete the remaining checkout steps and accept the terms before submitting"
                    .to_string()
            }
            CheckoutError::SubmissionRejected { .. } => {
                "The booking endpoint declined the request. Retry later or verify the endpoint configuration".to_string()
            }
            CheckoutError::SubmissionError(_) => {
                "Check network connectivity and the configured submission endpoint".to_string()
            }
            CheckoutError::IoError(_) => {
                "Check that the file path exists and is readable/writable".to_string()
            }
            CheckoutError::SerializationError(_) => {
                "The file content is not valid JSON for the expected shape".to_string()
            }
            CheckoutError::ConfigParseError { .. } => {
                "Make sure the catalog file is valid TOML".to_string()
            }
            CheckoutError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' entry in the catalog file", field)
            }
            CheckoutError::MissingConfigError { field } => {
                format!("Add the missing '{}' entry to the catalog file", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CheckoutError::InvalidServiceType { service_type } => {
                format!("'{}' is not a bookable service", service_type)
            }
            CheckoutError::SubmitNotReady { reason } => {
                format!("The booking cannot be submitted yet: {}", reason)
            }
            CheckoutError::SubmissionRejected { status } => {
                format!("The booking was not accepted (server answered {})", status)
            }
            CheckoutError::SubmissionError(_) => {
                "The booking could not be sent. Please try again".to_string()
            }
            CheckoutError::IoError(e) => format!("File access failed: {}", e),
            CheckoutError::SerializationError(_) => "A data file could not be read".to_string(),
            CheckoutError::ConfigParseError { message } => {
                format!("The catalog file could not be parsed: {}", message)
            }
            CheckoutError::InvalidConfigValueError { field, reason, .. } => {
                format!("Catalog entry '{}' is invalid: {}", field, reason)
            }
            CheckoutError::MissingConfigError { field } => {
                format!("The catalog file is missing '{}'", field)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_service_type_is_high_severity_pricing() {
        let err = CheckoutError::InvalidServiceType {
            service_type: "car-wash".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Pricing);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("car-wash"));
        assert!(err.recovery_suggestion().contains("catalog"));
    }

    #[test]
    fn test_submit_not_ready_is_low_severity() {
        let err = CheckoutError::SubmitNotReady {
            reason: "terms not accepted".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Checkout);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.user_friendly_message().contains("terms not accepted"));
    }

    #[test]
    fn test_submission_rejected_is_retryable() {
        let err = CheckoutError::SubmissionRejected { status: 503 };
        assert_eq!(err.category(), ErrorCategory::Submission);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_config_errors_are_configuration_category() {
        let err = CheckoutError::InvalidConfigValueError {
            field: "cart.tax_rate".to_string(),
            value: "-0.5".to_string(),
            reason: "must not be negative".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("cart.tax_rate"));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(ErrorSeverity::Low < ErrorSeverity::Medium);
        assert!(ErrorSeverity::Medium < ErrorSeverity::High);
        assert!(ErrorSeverity::High < ErrorSeverity::Critical);
    }
}
