use thiserror::Error;

/// Failures produced while scoring one match side. Returned as data; the
/// orchestrator collects them into an [`EvaluationFailure`](crate::engine::EvaluationFailure).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("missing score input for part '{0}'")]
    MissingPartInput(String),

    #[error("invalid value for part '{part}': {reason}")]
    InvalidPartValue { part: String, reason: String },

    #[error(
        "cooperative bonus for part '{part}' requires {required} team values, got {supplied}"
    )]
    CooperativeGroupSizeMismatch {
        part: String,
        required: u8,
        supplied: usize,
    },

    #[error("unknown penalty id: {0}")]
    UnknownPenaltyId(String),

    #[error("malformed formula: {0}")]
    MalformedFormula(String),

    #[error("unknown symbol in formula: {0}")]
    UnknownSymbol(String),

    #[error("division by zero in formula")]
    DivisionByZero,

    #[error("formula result is not a finite number")]
    NonFiniteResult,
}

impl ScoringError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingPartInput(_) => "MissingPartInput",
            Self::InvalidPartValue { .. } => "InvalidPartValue",
            Self::CooperativeGroupSizeMismatch { .. } => "CooperativeGroupSizeMismatch",
            Self::UnknownPenaltyId(_) => "UnknownPenaltyId",
            Self::MalformedFormula(_) => "MalformedFormula",
            Self::UnknownSymbol(_) => "UnknownSymbol",
            Self::DivisionByZero => "DivisionByZero",
            Self::NonFiniteResult => "NonFiniteResult",
        }
    }

    /// Message prefixed with the kind name, as surfaced to API clients.
    pub fn describe(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("invalid score profile {path}: {issues}")]
    InvalidProfile { path: String, issues: String },

    #[error("no score profile assigned to stage '{0}' or its tournament")]
    NoProfileAssigned(String),

    #[error("telemetry error: {0}")]
    Telemetry(String),

    #[error("unsupported document format: {0} (expected .json or .toml)")]
    UnsupportedFormat(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
