use http::StatusCode;

use chat_gate::CoordinationError;

/// Helper trait for converting errors to a standard response error format
pub(crate) trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Client errors carry their own message; everything else is logged and
/// returned as a generic 500 so no internal state leaks.
impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            if e.is_client_error() {
                (StatusCode::BAD_REQUEST, e.to_string())
            } else {
                tracing::error!("Request failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expired_is_bad_request_with_message() {
        // Given an expired-session failure
        let result: Result<(), CoordinationError> = Err(CoordinationError::SessionExpired);

        // When converting to a response error
        let response_error = result.into_response_error();

        // Then the caller sees a 400 with the human-readable reason
        match response_error {
            Err((status, body)) => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(body, "Profile session expired or already used");
            }
            Ok(()) => panic!("Expected an error"),
        }
    }

    #[test]
    fn test_validation_error_is_bad_request() {
        let result: Result<(), CoordinationError> = Err(CoordinationError::Validation(
            "username must not be empty".to_string(),
        ));

        match result.into_response_error() {
            Err((status, body)) => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert!(body.contains("username must not be empty"));
            }
            Ok(()) => panic!("Expected an error"),
        }
    }

    #[test]
    fn test_server_errors_stay_generic() {
        // Given an internal failure
        let result: Result<(), CoordinationError> = Err(CoordinationError::Database(
            "connection pool exhausted on host db-7".to_string(),
        ));

        // When converting to a response error
        let response_error = result.into_response_error();

        // Then the caller sees a 500 with no internal detail
        match response_error {
            Err((status, body)) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "Internal server error");
            }
            Ok(()) => panic!("Expected an error"),
        }
    }

    #[test]
    fn test_success_case_passes_through() {
        let result: Result<String, CoordinationError> = Ok("Success".to_string());

        let response_error = result.into_response_error();

        assert_eq!(response_error.expect("should pass through"), "Success");
    }
}
