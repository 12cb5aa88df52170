//! Inbound frame validation.

use linkup_core::error::AppError;

/// Validates a raw text frame before decoding.
pub fn validate_inbound(raw: &str, max_bytes: usize) -> Result<(), AppError> {
    if raw.len() > max_bytes {
        return Err(AppError::validation(format!(
            "Message exceeds maximum size of {max_bytes} bytes"
        )));
    }

    if raw.trim().is_empty() {
        return Err(AppError::validation("Empty message"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits() {
        assert!(validate_inbound(r#"{"event":"endCall"}"#, 64).is_ok());
        assert!(validate_inbound("   ", 64).is_err());
        assert!(validate_inbound(&"x".repeat(65), 64).is_err());
    }
}
