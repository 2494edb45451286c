use thiserror::Error;

#[derive(Error, Debug)]
pub enum CvError {
    #[error("Block {block} ('{heading}') is missing required field '{field}'")]
    MissingField {
        block: usize,
        heading: String,
        field: String,
    },

    #[error("Block {block} ('{heading}'): {field} '{value}' is not a '<Month> <Year>' date")]
    InvalidDateFormat {
        block: usize,
        heading: String,
        field: String,
        value: String,
    },

    #[error("Unterminated '%%' comment opened on line {line}")]
    UnterminatedComment { line: usize },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML error in {source_name}: {message}")]
    YamlError { source_name: String, message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Rendering error: {message}")]
    RenderError { message: String },
}

/// Coarse classification of a [`CvError`], mirroring the three fault classes
/// of the experience log plus everything that is not the log's fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingField,
    InvalidDateFormat,
    UnterminatedComment,
    Config,
    Io,
    Render,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Io,
    Rendering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CvError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CvError::MissingField { .. } => ErrorKind::MissingField,
            CvError::InvalidDateFormat { .. } => ErrorKind::InvalidDateFormat,
            CvError::UnterminatedComment { .. } => ErrorKind::UnterminatedComment,
            CvError::IoError(_) => ErrorKind::Io,
            CvError::ZipError(_) | CvError::SerializationError(_) | CvError::RenderError { .. } => {
                ErrorKind::Render
            }
            CvError::YamlError { .. }
            | CvError::ConfigValidationError { .. }
            | CvError::InvalidConfigValueError { .. }
            | CvError::MissingConfigError { .. } => ErrorKind::Config,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.kind() {
            ErrorKind::MissingField | ErrorKind::InvalidDateFormat | ErrorKind::UnterminatedComment => {
                ErrorCategory::Input
            }
            ErrorKind::Config => ErrorCategory::Configuration,
            ErrorKind::Io => ErrorCategory::Io,
            ErrorKind::Render => ErrorCategory::Rendering,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Medium,
            ErrorCategory::Rendering => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CvError::MissingField { heading, field, .. } => format!(
                "Add a '{}: ...' line under '### {}' in the experience file",
                field, heading
            ),
            CvError::InvalidDateFormat { .. } => {
                "Write dates as a full month name and a four digit year, e.g. 'March 2021'".to_string()
            }
            CvError::UnterminatedComment { line } => {
                format!("Close the '%%' comment that starts on line {}", line)
            }
            CvError::IoError(_) => "Check that the file exists and is readable/writable".to_string(),
            CvError::YamlError { source_name, .. } => {
                format!("Fix the YAML syntax in {}", source_name)
            }
            CvError::ConfigValidationError { field, .. }
            | CvError::InvalidConfigValueError { field, .. }
            | CvError::MissingConfigError { field } => {
                format!("Review the '{}' setting in the configuration", field)
            }
            CvError::ZipError(_) | CvError::SerializationError(_) | CvError::RenderError { .. } => {
                "Re-run with --verbose and report the log output".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("The experience file could not be parsed: {}", self),
            ErrorCategory::Configuration => format!("The configuration is invalid: {}", self),
            ErrorCategory::Io => format!("A file could not be read or written: {}", self),
            ErrorCategory::Rendering => format!("The resume could not be generated: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors_are_input_category() {
        let err = CvError::MissingField {
            block: 2,
            heading: "Acme Corp".to_string(),
            field: "title".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("'title'"));
        assert!(err.recovery_suggestion().contains("### Acme Corp"));
    }

    #[test]
    fn test_io_error_conversion() {
        let err: CvError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().starts_with("A file could not be read"));
    }
}
