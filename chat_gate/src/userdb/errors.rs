use thiserror::Error;

#[derive(Clone, Error, Debug)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(UserError::NotFound.to_string(), "User not found");
        assert_eq!(
            UserError::Storage("connection reset".to_string()).to_string(),
            "Storage error: connection reset"
        );
        assert_eq!(
            UserError::InvalidData("email must not be empty".to_string()).to_string(),
            "Invalid data: email must not be empty"
        );
    }

    /// Errors propagate cleanly through the ? operator
    #[test]
    fn test_error_propagation() {
        fn validate_email(email: &str) -> Result<(), UserError> {
            if email.is_empty() {
                return Err(UserError::InvalidData("email must not be empty".to_string()));
            }
            Ok(())
        }

        fn process(email: &str) -> Result<String, UserError> {
            validate_email(email)?;
            Ok(format!("Processed {email}"))
        }

        assert!(process("new@example.com").is_ok());
        assert!(matches!(process(""), Err(UserError::InvalidData(_))));
    }
}
