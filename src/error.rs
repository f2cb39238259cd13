/*!
 * Error Handling for the key provisioning module
 *
 * Provides error types with numeric error codes, user-friendly messages,
 * technical details for diagnostics and suggested remediation.
 *
 * No variant ever carries a passphrase.
 */

use std::collections::HashMap;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Error type for all key provisioning operations
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Key generation failed: {operation} - {cause}")]
    KeyGenerationError {
        operation: String,
        cause: String,
        error_code: u32,
        context: HashMap<String, String>,
    },

    #[error("Key serialization failed: {operation} - {cause}")]
    SerializationError {
        operation: String,
        cause: String,
        error_code: u32,
    },

    #[error("Key decryption failed: {cause}")]
    DecryptionError { cause: String, error_code: u32 },

    #[error("IO error: {operation} on {path} - {cause}")]
    IoError {
        operation: String,
        path: String,
        kind: io::ErrorKind,
        cause: String,
        error_code: u32,
    },

    #[error("Invalid parameter: {parameter} - {expected} - got {actual}")]
    InvalidParameter {
        parameter: String,
        expected: String,
        actual: String,
        error_code: u32,
    },
}

/// Error code constants for different error categories
pub mod error_codes {
    // Key generation errors: 1000-1999
    pub const KEY_GENERATION_FAILED: u32 = 1001;
    pub const UNSUPPORTED_CURVE: u32 = 1002;
    pub const INVALID_KEY_SIZE: u32 = 1003;

    // Serialization errors: 2000-2999
    pub const PEM_ENCODING_FAILED: u32 = 2001;
    pub const PEM_ENCRYPTION_FAILED: u32 = 2002;
    pub const PEM_DECRYPTION_FAILED: u32 = 2003;
    pub const PEM_PARSE_FAILED: u32 = 2004;
    pub const PASSPHRASE_REQUIRED: u32 = 2005;

    // Filesystem errors: 3000-3999
    pub const EXISTENCE_CHECK_FAILED: u32 = 3001;
    pub const KEY_WRITE_FAILED: u32 = 3002;
    pub const KEY_DELETE_FAILED: u32 = 3003;
    pub const KEY_READ_FAILED: u32 = 3004;

    // Option bundle errors: 4000-4999
    pub const INVALID_OPTION: u32 = 4001;
    pub const MISSING_OPTION: u32 = 4002;
    pub const UNKNOWN_OPTION: u32 = 4003;
}

impl KeyError {
    /// Get the numeric error code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            KeyError::KeyGenerationError { error_code, .. } => *error_code,
            KeyError::SerializationError { error_code, .. } => *error_code,
            KeyError::DecryptionError { error_code, .. } => *error_code,
            KeyError::IoError { error_code, .. } => *error_code,
            KeyError::InvalidParameter { error_code, .. } => *error_code,
        }
    }

    /// Get the error category/type as a string
    pub fn error_type(&self) -> &'static str {
        match self {
            KeyError::KeyGenerationError { .. } => "KeyGenerationError",
            KeyError::SerializationError { .. } => "SerializationError",
            KeyError::DecryptionError { .. } => "DecryptionError",
            KeyError::IoError { .. } => "IoError",
            KeyError::InvalidParameter { .. } => "InvalidParameter",
        }
    }

    /// Returns the underlying filesystem error kind, if this is an IO error
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            KeyError::IoError { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Get a user-friendly error message
    pub fn user_friendly_message(&self) -> String {
        match self {
            KeyError::KeyGenerationError { operation, .. } => {
                format!(
                    "Key generation '{}' failed. The requested algorithm parameters were rejected.",
                    operation
                )
            }
            KeyError::SerializationError { operation, .. } => {
                format!(
                    "Key encoding '{}' failed. The key material could not be converted to PEM.",
                    operation
                )
            }
            KeyError::DecryptionError { .. } => {
                "The key file could not be decrypted. Check the passphrase.".to_string()
            }
            KeyError::IoError { operation, path, .. } => {
                format!(
                    "Filesystem operation '{}' on '{}' failed. Check file permissions and disk space.",
                    operation, path
                )
            }
            KeyError::InvalidParameter {
                parameter,
                expected,
                ..
            } => {
                format!(
                    "Invalid parameter '{}'. Expected '{}'.",
                    parameter, expected
                )
            }
        }
    }

    /// Get technical details for debugging
    pub fn technical_details(&self) -> HashMap<String, String> {
        let mut details = HashMap::new();

        details.insert("error_code".to_string(), self.error_code().to_string());
        details.insert("error_type".to_string(), self.error_type().to_string());
        details.insert("timestamp".to_string(), chrono::Utc::now().to_rfc3339());

        match self {
            KeyError::KeyGenerationError {
                operation,
                cause,
                context,
                ..
            } => {
                details.insert("operation".to_string(), operation.clone());
                details.insert("cause".to_string(), cause.clone());
                details.extend(context.clone());
            }
            KeyError::SerializationError {
                operation, cause, ..
            } => {
                details.insert("operation".to_string(), operation.clone());
                details.insert("cause".to_string(), cause.clone());
            }
            KeyError::DecryptionError { cause, .. } => {
                details.insert("cause".to_string(), cause.clone());
            }
            KeyError::IoError {
                operation,
                path,
                kind,
                cause,
                ..
            } => {
                details.insert("operation".to_string(), operation.clone());
                details.insert("path".to_string(), path.clone());
                details.insert("io_kind".to_string(), format!("{:?}", kind));
                details.insert("cause".to_string(), cause.clone());
            }
            KeyError::InvalidParameter {
                parameter,
                expected,
                actual,
                ..
            } => {
                details.insert("parameter".to_string(), parameter.clone());
                details.insert("expected".to_string(), expected.clone());
                details.insert("actual".to_string(), actual.clone());
            }
        }

        details
    }

    /// Get suggested remediation steps
    pub fn suggested_remediation(&self) -> Option<String> {
        match self {
            KeyError::KeyGenerationError { error_code, .. } => match *error_code {
                error_codes::UNSUPPORTED_CURVE => Some(
                    "Use a named curve such as secp384r1, prime256v1 or secp521r1.".to_string(),
                ),
                error_codes::INVALID_KEY_SIZE => Some(
                    "Use an RSA modulus size between 512 and 16384 bits (2048 or larger recommended)."
                        .to_string(),
                ),
                _ => Some("Check the OpenSSL installation and key parameters.".to_string()),
            },
            KeyError::DecryptionError { error_code, .. } => match *error_code {
                error_codes::PASSPHRASE_REQUIRED => {
                    Some("Supply the passphrase the key was encrypted with.".to_string())
                }
                _ => Some("Verify the passphrase matches the one used at creation.".to_string()),
            },
            KeyError::IoError { kind, .. } => match kind {
                io::ErrorKind::NotFound => Some(
                    "The path does not exist. Check the parent directory or call exists() first."
                        .to_string(),
                ),
                io::ErrorKind::PermissionDenied => {
                    Some("Run with an account that may access the key directory.".to_string())
                }
                _ => None,
            },
            KeyError::InvalidParameter { .. } => {
                Some("Recognized options are path, authentication, size, curve and password.".to_string())
            }
            _ => None,
        }
    }
}

/// Convenience constructors for common error types
impl KeyError {
    pub fn key_generation_error(operation: &str, cause: &str, error_code: u32) -> Self {
        KeyError::KeyGenerationError {
            operation: operation.to_string(),
            cause: cause.to_string(),
            error_code,
            context: HashMap::new(),
        }
    }

    /// Attach a context entry to a key generation error; other variants are returned unchanged
    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        if let KeyError::KeyGenerationError { context, .. } = &mut self {
            context.insert(key.to_string(), value.to_string());
        }
        self
    }

    pub fn serialization_error(operation: &str, cause: &str, error_code: u32) -> Self {
        KeyError::SerializationError {
            operation: operation.to_string(),
            cause: cause.to_string(),
            error_code,
        }
    }

    pub fn decryption_error(cause: &str, error_code: u32) -> Self {
        KeyError::DecryptionError {
            cause: cause.to_string(),
            error_code,
        }
    }

    pub fn io_error(operation: &str, path: &Path, err: &io::Error, error_code: u32) -> Self {
        KeyError::IoError {
            operation: operation.to_string(),
            path: path.display().to_string(),
            kind: err.kind(),
            cause: err.to_string(),
            error_code,
        }
    }

    pub fn invalid_parameter(parameter: &str, expected: &str, actual: &str) -> Self {
        KeyError::InvalidParameter {
            parameter: parameter.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            error_code: error_codes::INVALID_OPTION,
        }
    }
}

impl From<serde_json::Error> for KeyError {
    fn from(err: serde_json::Error) -> Self {
        KeyError::InvalidParameter {
            parameter: "option bundle".to_string(),
            expected: "a JSON object with path, authentication, size, curve, password".to_string(),
            actual: err.to_string(),
            error_code: error_codes::INVALID_OPTION,
        }
    }
}

/// Result type alias for key provisioning operations
pub type KeyResult<T> = Result<T, KeyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_generation() {
        let error = KeyError::key_generation_error(
            "ec_group",
            "unknown curve",
            error_codes::UNSUPPORTED_CURVE,
        );
        assert_eq!(error.error_code(), error_codes::UNSUPPORTED_CURVE);
        assert_eq!(error.error_type(), "KeyGenerationError");
    }

    #[test]
    fn test_io_error_keeps_kind() {
        let io = io::Error::new(io::ErrorKind::NotFound, "gone");
        let error = KeyError::io_error(
            "delete",
            Path::new("/nonexistent/foo.key"),
            &io,
            error_codes::KEY_DELETE_FAILED,
        );
        assert_eq!(error.io_kind(), Some(io::ErrorKind::NotFound));
        assert!(error.to_string().contains("/nonexistent/foo.key"));
        assert!(error.suggested_remediation().is_some());
    }

    #[test]
    fn test_technical_details() {
        let error = KeyError::key_generation_error(
            "rsa_generate",
            "modulus too small",
            error_codes::INVALID_KEY_SIZE,
        )
        .with_context("size", "8");
        let details = error.technical_details();
        assert!(details.contains_key("error_code"));
        assert!(details.contains_key("timestamp"));
        assert_eq!(details.get("size").map(String::as_str), Some("8"));
    }

    #[test]
    fn test_user_friendly_message() {
        let error = KeyError::invalid_parameter("authentication", "rsa or ec", "dsa");
        let message = error.user_friendly_message();
        assert!(message.contains("authentication"));
        assert_eq!(error.error_code(), error_codes::INVALID_OPTION);
    }

    #[test]
    fn test_context_ignored_on_other_variants() {
        let error = KeyError::decryption_error("bad decrypt", error_codes::PEM_DECRYPTION_FAILED)
            .with_context("size", "2048");
        assert!(!error.technical_details().contains_key("size"));
    }
}
