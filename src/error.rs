use thiserror::Error;

/// Failures raised by the offset lookup and cut-length engine.
///
/// Every variant is a local, user-correctable condition. The engine never
/// substitutes a default offset when one of these occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CutError {
    #[error("Unsupported fitting type '{fitting_type}'. Supported types: {}", .supported.join(", "))]
    UnsupportedType {
        fitting_type: String,
        supported: Vec<String>,
    },

    #[error("No catalog entries found for fitting type '{fitting_type}'")]
    UnknownType { fitting_type: String },

    #[error(
        "No matching size '{size}' for fitting '{fitting_type}'. Available sizes: [{}]",
        .available.join(", ")
    )]
    SizeNotFound {
        fitting_type: String,
        size: String,
        available: Vec<String>,
    },

    #[error("Cannot convert '{value}' to a numeric offset{}", context_suffix(.context))]
    InvalidOffsetFormat { value: String, context: Option<String> },

    #[error(
        "Invalid {field} '{value}': expected a decimal, fraction or mixed number of inches \
         (at most 1000000 in magnitude, denominators up to 1000000)"
    )]
    InvalidMeasurement { field: String, value: String },

    #[error("Catalog row for {fitting_type} size {size} has no offset value")]
    MissingOffset { fitting_type: String, size: String },

    #[error(
        "No bushing thickness supplied and {fitting_type} size {size} has no secondary offset to use instead"
    )]
    MissingBushingThickness { fitting_type: String, size: String },

    #[error("Catalog already contains {fitting_type} size {size}")]
    DuplicateEntry { fitting_type: String, size: String },

    #[error("{calculation} result is out of range; check the measurements and offsets")]
    OutOfRange { calculation: String },
}

fn context_suffix(context: &Option<String>) -> String {
    match context {
        Some(c) => format!(" for {c}"),
        None => String::new(),
    }
}

/// Process-level error carrying the exit code the binary should return.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<CutError> for AppError {
    fn from(err: CutError) -> Self {
        AppError::new(2, err.to_string())
    }
}
