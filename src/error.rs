//! # Application Error Handling
//!
//! Error types for everything around the pure filter core: configuration,
//! file I/O, image decode/encode, pipeline failures and the tuning session.
//!
//! ## Architecture
//!
//! - **EnhanceError**: one variant per failure category, each carrying an
//!   [`ErrorContext`] with operation, context, recovery suggestion and severity
//! - **Traits**: [`Recoverable`], [`HasSeverity`] and [`HasRecoverySuggestion`]
//!   let callers decide whether to re-run with different parameters
//!
//! Pipeline failures are deterministic: re-running with the same input and
//! parameters fails the same way, so none of them is retryable as-is. Parameter
//! errors are recoverable by adjusting the parameters.
//!
//! ## Usage
//!
//! ```rust
//! use image_enhance::error::{EnhanceError, HasRecoverySuggestion};
//!
//! let error = EnhanceError::config("noise_level", "1.5", "must be within 0.0..=1.0")
//!     .with_recovery_suggestion("Pick a noise level between 0 and 1");
//! assert_eq!(error.category(), "config");
//! assert!(error.recovery_suggestion().is_some());
//! ```

use std::{error::Error as StdError, fmt, time::SystemTime};

use enhance_filters::PipelineError;

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Expected outcomes that callers normally discard (e.g. a superseded run)
    Info,
    /// Something went wrong but the caller can continue
    Warning,
    /// The requested operation failed
    Error,
    /// Nothing sensible can continue
    Fatal,
}

/// Metadata about when and where an error occurred
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub timestamp: SystemTime,
    /// The operation being performed when the error occurred
    pub operation: Option<String>,
    pub context: Option<String>,
    pub recovery_suggestion: Option<String>,
    pub severity: ErrorSeverity,
    pub recoverable: bool,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            timestamp: SystemTime::now(),
            operation: None,
            context: None,
            recovery_suggestion: None,
            severity: ErrorSeverity::Error,
            recoverable: false,
        }
    }
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.recovery_suggestion = Some(suggestion.into());
        self
    }

    pub fn recoverable(mut self) -> Self {
        self.recoverable = true;
        self
    }
}

/// Base error type for the enhancement application
#[derive(Debug)]
pub enum EnhanceError {
    /// Configuration file or flag validation errors
    Config {
        field: String,
        value: String,
        reason: String,
        context: ErrorContext,
    },
    /// File system errors
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
        context: ErrorContext,
    },
    /// Image decode/encode errors from the `image` crate
    Codec {
        operation: String,
        path: Option<String>,
        source: image::ImageError,
        context: ErrorContext,
    },
    /// A pipeline stage rejected the input or parameters
    Pipeline {
        source: PipelineError,
        context: ErrorContext,
    },
    /// A tuning run finished after a newer one was submitted
    Superseded {
        generation: u64,
        latest: u64,
        context: ErrorContext,
    },
    /// The background worker running the pipeline died
    Worker {
        reason: String,
        context: ErrorContext,
    },
}

impl EnhanceError {
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Fatal),
        }
    }

    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: None,
            source,
            context: ErrorContext::new(),
        }
    }

    pub fn codec(operation: impl Into<String>, source: image::ImageError) -> Self {
        Self::Codec {
            operation: operation.into(),
            path: None,
            source,
            context: ErrorContext::new(),
        }
    }

    /// Wrap a pipeline failure, attaching a suggestion for the caller.
    pub fn pipeline(source: PipelineError) -> Self {
        let context = match &source {
            PipelineError::InvalidParameter { name, .. } => ErrorContext::new()
                .recoverable()
                .with_recovery_suggestion(format!("Adjust `{name}` and run again")),
            PipelineError::DegenerateOutput { .. } => ErrorContext::new()
                .recoverable()
                .with_recovery_suggestion("Increase the scale factor"),
            PipelineError::Backend(_) => ErrorContext::new()
                .recoverable()
                .with_recovery_suggestion("Use the native resample backend"),
            PipelineError::InvalidDimensions { .. }
            | PipelineError::NonFiniteSample { .. }
            | PipelineError::OutOfBounds { .. } => {
                ErrorContext::new()
            }
        };
        Self::Pipeline { source, context }
    }

    pub fn superseded(generation: u64, latest: u64) -> Self {
        Self::Superseded {
            generation,
            latest,
            context: ErrorContext::new().with_severity(ErrorSeverity::Info),
        }
    }

    pub fn worker(reason: impl Into<String>) -> Self {
        Self::Worker {
            reason: reason.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Fatal),
        }
    }

    /// Attach the file path involved (I/O and codec errors only)
    pub fn with_path(mut self, p: impl Into<String>) -> Self {
        match &mut self {
            Self::Io { path, .. } | Self::Codec { path, .. } => *path = Some(p.into()),
            _ => {}
        }
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context_mut().context = Some(context.into());
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context_mut().recovery_suggestion = Some(suggestion.into());
        self
    }

    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.context_mut().severity = severity;
        self
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Config { context, .. }
            | Self::Io { context, .. }
            | Self::Codec { context, .. }
            | Self::Pipeline { context, .. }
            | Self::Superseded { context, .. }
            | Self::Worker { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Config { context, .. }
            | Self::Io { context, .. }
            | Self::Codec { context, .. }
            | Self::Pipeline { context, .. }
            | Self::Superseded { context, .. }
            | Self::Worker { context, .. } => context,
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Io { .. } => "io",
            Self::Codec { .. } => "codec",
            Self::Pipeline { .. } => "pipeline",
            Self::Superseded { .. } => "superseded",
            Self::Worker { .. } => "worker",
        }
    }

    /// The underlying pipeline failure, if this is one.
    pub fn pipeline_error(&self) -> Option<&PipelineError> {
        match self {
            Self::Pipeline { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for EnhanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnhanceError::Config {
                field,
                value,
                reason,
                ..
            } => write!(
                f,
                "Configuration error in '{}': {} (value: {})",
                field, reason, value
            ),
            EnhanceError::Io {
                operation,
                path,
                source,
                ..
            } => match path {
                Some(path) => write!(f, "I/O error during {} on '{}': {}", operation, path, source),
                None => write!(f, "I/O error during {}: {}", operation, source),
            },
            EnhanceError::Codec {
                operation,
                path,
                source,
                ..
            } => match path {
                Some(path) => write!(f, "Image {} failed for '{}': {}", operation, path, source),
                None => write!(f, "Image {} failed: {}", operation, source),
            },
            EnhanceError::Pipeline { source, .. } => write!(f, "Pipeline error: {}", source),
            EnhanceError::Superseded {
                generation, latest, ..
            } => write!(
                f,
                "Run {} was superseded by run {}",
                generation, latest
            ),
            EnhanceError::Worker { reason, .. } => write!(f, "Pipeline worker failed: {}", reason),
        }?;
        if let Some(context) = &self.context().context {
            write!(f, " ({})", context)?;
        }
        Ok(())
    }
}

impl StdError for EnhanceError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Codec { source, .. } => Some(source),
            Self::Pipeline { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias using our custom error type
pub type EnhanceResult<T> = Result<T, EnhanceError>;

/// Recovery strategies for handling errors
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryStrategy {
    /// Re-run with a changed parameter
    AdjustParameter { name: String },
    /// Use a different resample backend
    Fallback { description: String },
    /// Drop this result; a newer one is on its way
    Discard,
}

/// Trait for errors that can be recovered from
pub trait Recoverable {
    fn is_recoverable(&self) -> bool;

    fn recovery_strategies(&self) -> Vec<RecoveryStrategy>;
}

impl Recoverable for EnhanceError {
    fn is_recoverable(&self) -> bool {
        self.context().recoverable || matches!(self, Self::Superseded { .. })
    }

    fn recovery_strategies(&self) -> Vec<RecoveryStrategy> {
        match self {
            Self::Pipeline { source, .. } => match source {
                PipelineError::InvalidParameter { name, .. } => vec![RecoveryStrategy::AdjustParameter {
                    name: (*name).to_string(),
                }],
                PipelineError::DegenerateOutput { .. } => vec![RecoveryStrategy::AdjustParameter {
                    name: "scale_factor".to_string(),
                }],
                PipelineError::Backend(_) => vec![RecoveryStrategy::Fallback {
                    description: "Switch to the native Lanczos backend".to_string(),
                }],
                _ => vec![],
            },
            Self::Superseded { .. } => vec![RecoveryStrategy::Discard],
            _ => vec![],
        }
    }
}

/// Trait for errors with severity levels
pub trait HasSeverity {
    fn severity(&self) -> ErrorSeverity;
}

impl HasSeverity for EnhanceError {
    fn severity(&self) -> ErrorSeverity {
        self.context().severity
    }
}

/// Trait for errors that provide recovery suggestions
pub trait HasRecoverySuggestion {
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl HasRecoverySuggestion for EnhanceError {
    fn recovery_suggestion(&self) -> Option<&str> {
        self.context().recovery_suggestion.as_deref()
    }
}

/// Error classification utilities
pub mod classify {
    use super::*;

    /// Results the caller should silently drop
    pub fn is_stale(error: &EnhanceError) -> bool {
        matches!(error, EnhanceError::Superseded { .. })
    }

    /// Check if an error is fatal (cannot be recovered from)
    pub fn is_fatal(error: &EnhanceError) -> bool {
        matches!(error, EnhanceError::Config { .. }) || error.severity() == ErrorSeverity::Fatal
    }
}

impl From<std::io::Error> for EnhanceError {
    fn from(error: std::io::Error) -> Self {
        Self::io("unknown", error)
    }
}

impl From<image::ImageError> for EnhanceError {
    fn from(error: image::ImageError) -> Self {
        Self::codec("processing", error)
    }
}

impl From<PipelineError> for EnhanceError {
    fn from(error: PipelineError) -> Self {
        Self::pipeline(error)
    }
}

impl From<serde_json::Error> for EnhanceError {
    fn from(error: serde_json::Error) -> Self {
        Self::config("config_file", format!("line {}", error.line()), error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = EnhanceError::config("scale", "0", "must be greater than 0");
        assert_eq!(error.category(), "config");
        assert!(!error.is_recoverable());
        assert!(classify::is_fatal(&error));
    }

    #[test]
    fn test_parameter_error_is_recoverable() {
        let error: EnhanceError = PipelineError::InvalidParameter {
            name: "unsharp_radius",
            value: -1.0,
            reason: "must be finite and non-negative",
        }
        .into();

        assert_eq!(error.category(), "pipeline");
        assert!(error.is_recoverable());
        assert_eq!(
            error.recovery_strategies(),
            vec![RecoveryStrategy::AdjustParameter {
                name: "unsharp_radius".to_string()
            }]
        );
        assert_eq!(
            error.recovery_suggestion(),
            Some("Adjust `unsharp_radius` and run again")
        );
    }

    #[test]
    fn test_out_of_bounds_is_not_recoverable() {
        let error = EnhanceError::pipeline(PipelineError::OutOfBounds {
            x: 4,
            y: 0,
            channel: 0,
            width: 4,
            height: 4,
        });
        assert!(!error.is_recoverable());
        assert!(error.recovery_strategies().is_empty());
    }

    #[test]
    fn test_superseded_is_stale_info() {
        let error = EnhanceError::superseded(3, 5);
        assert!(classify::is_stale(&error));
        assert_eq!(error.severity(), ErrorSeverity::Info);
        assert_eq!(error.recovery_strategies(), vec![RecoveryStrategy::Discard]);
        assert_eq!(error.to_string(), "Run 3 was superseded by run 5");
    }

    #[test]
    fn test_error_with_context() {
        let error = EnhanceError::io(
            "read",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        )
        .with_path("in.png")
        .with_context("loading source image");

        assert_eq!(
            error.to_string(),
            "I/O error during read on 'in.png': missing (loading source image)"
        );
        assert!(error.source().is_some());
    }
}
