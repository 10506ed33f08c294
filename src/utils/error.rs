use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProofError {
    #[error("Nothing to render: select a font and enter text, or insert a monogram")]
    EmptyInput,

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Object not found: {key}")]
    NotFound { key: String },

    #[error("Object already exists: {key}")]
    Conflict { key: String },

    #[error("Upload failed: {message}")]
    UploadFailed { status: Option<u16>, message: String },

    #[error("At most {max} fonts can be selected")]
    SelectionFull { max: usize },

    #[error("Font '{font}' has no style '{style}'")]
    UnknownStyle { font: String, style: String },

    #[error("Monogram needs exactly three initials")]
    IncompleteMonogram,

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Storage backend error: {message}")]
    Storage { message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Request,
    Storage,
    Network,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ProofError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyInput
            | Self::SelectionFull { .. }
            | Self::UnknownStyle { .. }
            | Self::IncompleteMonogram
            | Self::MissingField { .. } => ErrorCategory::Input,
            Self::BadRequest { .. } | Self::NotFound { .. } | Self::Conflict { .. } => {
                ErrorCategory::Request
            }
            Self::Storage { .. } => ErrorCategory::Storage,
            Self::UploadFailed { .. } | Self::Http(_) => ErrorCategory::Network,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Request | ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Storage => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Short machine-readable kind, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::BadRequest { .. } => "bad_request",
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::UploadFailed { .. } | Self::Http(_) => "upload_failed",
            Self::SelectionFull { .. } => "selection_full",
            Self::UnknownStyle { .. } => "unknown_style",
            Self::IncompleteMonogram => "incomplete_monogram",
            Self::MissingField { .. } => "missing_field",
            Self::Storage { .. } | Self::IoError(_) | Self::SerializationError(_) => "internal",
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => "config",
        }
    }

    /// Message shown to the customer in a dismissable notice.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::EmptyInput => {
                "Please select at least one font and enter some text, or add a monogram."
                    .to_string()
            }
            Self::BadRequest { message } => format!("The request was rejected: {}", message),
            Self::NotFound { key } => format!("No submission named '{}' was found.", key),
            Self::Conflict { key } => format!(
                "A submission named '{}' already exists for this order.",
                key
            ),
            Self::UploadFailed { .. } | Self::Http(_) => {
                "The preview could not be uploaded. Please try again.".to_string()
            }
            Self::SelectionFull { max } => {
                format!("You can compare up to {} fonts at a time.", max)
            }
            Self::UnknownStyle { font, style } => {
                format!("{} is not available in the '{}' style.", font, style)
            }
            Self::IncompleteMonogram => {
                "Enter all three initials before adding the monogram.".to_string()
            }
            Self::MissingField { field } => format!("Please fill in the {}.", field),
            _ => "Something went wrong on our side. Please try again later.".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::EmptyInput => "Select a font and type a preview text",
            Self::BadRequest { .. } => "Check the object key in the request path",
            Self::NotFound { .. } => "List stored objects to find the correct key",
            Self::Conflict { .. } => {
                "Use a different order number or contact support to replace the submission"
            }
            Self::UploadFailed { .. } | Self::Http(_) => {
                "Check that the proxy is reachable and retry"
            }
            Self::SelectionFull { .. } => "Deselect a font before adding another",
            Self::UnknownStyle { .. } => "Pick one of the styles listed in the catalog",
            Self::IncompleteMonogram => "Fill all three monogram initials",
            Self::MissingField { .. } => "Fill in the order number and customer name",
            Self::Storage { .. } => "Check the storage backend credentials and availability",
            Self::IoError(_) => "Check file permissions and free disk space",
            Self::SerializationError(_) => "Check that the payload is valid JSON",
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => {
                "Review the configuration file and command line flags"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ProofError>;
