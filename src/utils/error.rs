use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfographicError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("External tool '{tool}' failed: {message}")]
    ExternalToolError { tool: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Rendering,
    Storage,
    ExternalTool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl InfographicError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::RenderError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::Input,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::RenderError { .. } | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorCategory::Rendering
            }
            Self::IoError(_) | Self::ZipError(_) => ErrorCategory::Storage,
            Self::ExternalToolError { .. } => ErrorCategory::ExternalTool,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 外部工具失敗時 .mmd 已寫出，視為警告
            Self::ExternalToolError { .. } => ErrorSeverity::Low,
            Self::IoError(_) | Self::ZipError(_) => ErrorSeverity::Medium,
            Self::InvalidInput { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::High,
            Self::RenderError { .. } | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => {
                "Check that every category has a positive weight and that the list is not empty"
            }
            ErrorCategory::Configuration => {
                "Fix the reported field in the TOML configuration and run again"
            }
            ErrorCategory::Rendering => {
                "Check canvas sizes and scale; very large canvases may fail to allocate"
            }
            ErrorCategory::Storage => {
                "Make sure the output directory is writable and has free space"
            }
            ErrorCategory::ExternalTool => {
                "Install the Mermaid CLI (npm install -g @mermaid-js/mermaid-cli) \
                 or unset flowchart.renderer"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidInput { message } => format!("Cannot partition categories: {}", message),
            Self::ConfigValidationError { field, message } => {
                format!("Configuration problem in `{}`: {}", field, message)
            }
            Self::InvalidConfigValueError { field, value, reason } => {
                format!("`{}` has an invalid value \"{}\": {}", field, value, reason)
            }
            Self::MissingConfigError { field } => {
                format!("Configuration is missing `{}`", field)
            }
            Self::ExternalToolError { tool, message } => {
                format!("Flowchart source was written, but `{}` failed: {}", tool, message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InfographicError>;
