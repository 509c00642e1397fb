//! Error types for the vector-field core.
//!
//! Only session construction, configuration and viewport changes can fail.
//! Per-tick operations are total and never produce a `SimError`.

use thiserror::Error;

/// Errors produced while setting up or reconfiguring a simulation session.
#[derive(Debug, Error)]
pub enum SimError {
    /// Viewport width or height was zero, negative or not finite.
    #[error("invalid dimensions: width and height must be positive and finite")]
    InvalidDimensions,

    /// A configuration value was outside its legal range.
    #[error("invalid parameter '{name}' = {value}: {reason}")]
    InvalidParam {
        name: String,
        value: f64,
        reason: String,
    },

    /// A renderer failed to consume a frame.
    #[error("render failed: {0}")]
    Render(String),
}

impl SimError {
    /// Shorthand for building an [`SimError::InvalidParam`].
    pub fn invalid_param(name: &str, value: f64, reason: &str) -> Self {
        SimError::InvalidParam {
            name: name.to_owned(),
            value,
            reason: reason.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let msg = SimError::InvalidDimensions.to_string();
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn invalid_param_includes_name_value_and_reason() {
        let err = SimError::invalid_param("velocity_damping", 1.5, "must be in (0, 1)");
        let msg = format!("{err}");
        assert!(msg.contains("velocity_damping"), "missing name in: {msg}");
        assert!(msg.contains("1.5"), "missing value in: {msg}");
        assert!(msg.contains("(0, 1)"), "missing reason in: {msg}");
    }

    #[test]
    fn render_error_includes_message() {
        let msg = SimError::Render("pipe closed".into()).to_string();
        assert!(msg.contains("pipe closed"), "missing message in: {msg}");
    }

    #[test]
    fn sim_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SimError>();
    }

    #[test]
    fn sim_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<SimError>();
    }
}
