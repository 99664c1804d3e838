//! Reconnection policy.
//!
//! Pure functions, kept free of I/O so they are easy to test.

use crate::error::ClientError;

/// Whether the error rules out any further attempt
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::Unauthorized)
}

/// Whether another connection attempt should be made.
///
/// `current_attempt` counts failed attempts so far.
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }
    current_attempt < max_attempts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network_error() -> ClientError {
        ClientError::ConnectionError("network error".to_string())
    }

    #[test]
    fn test_unauthorized_exits_immediately() {
        // Test: a rejected token is final
        // given:
        let error = ClientError::Unauthorized;

        // when / then:
        assert!(should_exit_immediately(&error));
        assert!(!should_attempt_reconnect(&error, 0, 5));
    }

    #[test]
    fn test_connection_error_does_not_exit() {
        // Test: network problems are retried
        // given:
        let error = network_error();

        // when:
        let result = should_exit_immediately(&error);

        // then:
        assert!(!result);
    }

    #[test]
    fn test_reconnect_within_limit() {
        // Test: attempts below the limit are allowed
        // given:
        let error = network_error();

        // when / then:
        assert!(should_attempt_reconnect(&error, 0, 5));
        assert!(should_attempt_reconnect(&error, 4, 5));
    }

    #[test]
    fn test_reconnect_at_limit() {
        // Test: the limit itself stops reconnecting
        // given:
        let error = network_error();

        // when:
        let result = should_attempt_reconnect(&error, 5, 5);

        // then:
        assert!(!result);
    }
}
