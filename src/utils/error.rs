use thiserror::Error;

#[derive(Error, Debug)]
pub enum FxError {
    #[error("Invalid argument: {field} is required")]
    InvalidArgument { field: String },

    #[error("Malformed rate record{}: {}", line_suffix(.line), .reason)]
    Parse { line: Option<usize>, reason: String },

    #[error("No currency found for country '{country}'")]
    CountryNotFound { country: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Network,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|n| format!(" on line {}", n)).unwrap_or_default()
}

impl FxError {
    pub fn parse(reason: impl Into<String>) -> Self {
        FxError::Parse {
            line: None,
            reason: reason.into(),
        }
    }

    /// Attaches a source line number to a parse error. Other variants pass through.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            FxError::Parse { reason, .. } => FxError::Parse {
                line: Some(line),
                reason,
            },
            other => other,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            FxError::InvalidArgument { .. } | FxError::CountryNotFound { .. } => {
                ErrorCategory::Input
            }
            FxError::Parse { .. } => ErrorCategory::Data,
            FxError::Http(_) => ErrorCategory::Network,
            FxError::Io(_) => ErrorCategory::Storage,
            FxError::Config { .. } | FxError::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            FxError::CountryNotFound { .. } => ErrorSeverity::Low,
            FxError::Http(_) => ErrorSeverity::Medium,
            FxError::InvalidArgument { .. }
            | FxError::Parse { .. }
            | FxError::Io(_) => ErrorSeverity::High,
            FxError::Config { .. } | FxError::InvalidConfigValue { .. } => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FxError::InvalidArgument { field } => format!("A value for '{}' is required", field),
            FxError::Parse { .. } => {
                format!("The exchange-rate table could not be read: {}", self)
            }
            FxError::CountryNotFound { country } => format!("The country '{}' does not exist", country),
            FxError::Io(e) => format!("The file could not be written: {}", e),
            FxError::Http(_) => "The exchange-rate table could not be loaded, sorry :(".to_string(),
            FxError::Config { message } => format!("Configuration problem: {}", message),
            FxError::InvalidConfigValue { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check the spelling of the value you entered and try again",
            ErrorCategory::Data => {
                "Each row needs 6 comma-separated fields with a numeric rate in the 4th"
            }
            ErrorCategory::Network => "Check your connection or point --source-file at a local copy",
            ErrorCategory::Storage => "Check that the destination directory exists and is writable",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, FxError>;
