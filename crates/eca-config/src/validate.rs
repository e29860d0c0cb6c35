//! Configuration validation for eca

use crate::config::{EcaConfig, SignalDefaults};
use crate::{ConfigError, Result};
use eca_core::Preferences;
use std::fmt;

/// Result of configuration validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Errors that prevent the configuration from being used
    pub errors: Vec<ValidationError>,
    /// Non-blocking warnings about values that will be adjusted or ignored
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Creates a new empty validation result
    #[must_use]
    pub const fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Returns true if there are no validation errors
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if there are any warnings present
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Adds a validation error to the result
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Adds a validation warning to the result
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Merges another validation result into this one
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Convert into an error if any validation error was recorded
    pub fn into_result(self) -> Result<Vec<ValidationWarning>> {
        if self.is_valid() {
            Ok(self.warnings)
        } else {
            let joined = self
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            Err(ConfigError::Validation(joined))
        }
    }
}

/// Validation error details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The configuration field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
    /// Error classification code
    pub code: ErrorCode,
}

impl ValidationError {
    /// Creates a new validation error
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}: {}", self.code, self.field, self.message)
    }
}

/// Validation warning details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration field that triggered the warning
    pub field: String,
    /// Human-readable warning message
    pub message: String,
    /// Optional suggestion for resolving the warning
    pub suggestion: Option<String>,
}

impl ValidationWarning {
    /// Creates a new validation warning without a suggestion
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Creates a new validation warning with a suggestion for resolution
    pub fn with_suggestion(
        field: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: Some(suggestion.into()),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

/// Validation error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Value is NaN or infinite
    NotFinite,
}

/// Validate a complete configuration
pub fn validate(config: &EcaConfig) -> ValidationResult {
    let mut result = ValidationResult::new();
    result.merge(validate_preferences(&config.preferences));
    result.merge(validate_signals(&config.signals));
    result
}

/// Validate recommendation preferences
pub fn validate_preferences(prefs: &Preferences) -> ValidationResult {
    let mut result = ValidationResult::new();

    if prefs.force_extension_priority {
        result.add_warning(ValidationWarning::with_suggestion(
            "preferences.force_extension_priority",
            "has no effect; extension mappings always override sniffed content",
            "remove the setting",
        ));
    }

    result
}

/// Validate default signal values
pub fn validate_signals(signals: &SignalDefaults) -> ValidationResult {
    let mut result = ValidationResult::new();

    if !signals.attention.is_finite() {
        result.add_error(ValidationError::new(
            "signals.attention",
            format!("must be a finite number, got {}", signals.attention),
            ErrorCode::NotFinite,
        ));
    } else if !(0.0..=1.0).contains(&signals.attention) {
        result.add_warning(ValidationWarning::with_suggestion(
            "signals.attention",
            format!("{} is outside [0, 1] and will be clamped", signals.attention),
            "use a value between 0 and 1",
        ));
    }

    if !signals.last_used_hours.is_finite() {
        result.add_error(ValidationError::new(
            "signals.last_used_hours",
            format!("must be a finite number, got {}", signals.last_used_hours),
            ErrorCode::NotFinite,
        ));
    } else if signals.last_used_hours < 0.0 {
        result.add_warning(ValidationWarning::new(
            "signals.last_used_hours",
            format!("{} is negative and will be treated as 0", signals.last_used_hours),
        ));
    }

    result
}
