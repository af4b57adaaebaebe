use std::fmt;

/// Errors raised while exchanging data with the remote API, as opposed to
/// contract deviations. A transport or decode problem means a case could
/// not be judged at all; it is never folded into the check failures.
#[derive(Debug, Clone, PartialEq)]
pub enum RestCheckError {
    Transport { operation: String, detail: String },
    InvalidJson { operation: String, detail: String },
}

impl RestCheckError {
    pub fn transport(operation: &str, detail: impl fmt::Display) -> Self {
        RestCheckError::Transport {
            operation: operation.to_string(),
            detail: detail.to_string(),
        }
    }

    pub fn invalid_json(operation: &str, detail: impl fmt::Display) -> Self {
        RestCheckError::InvalidJson {
            operation: operation.to_string(),
            detail: detail.to_string(),
        }
    }

    pub fn operation(&self) -> &str {
        match self {
            RestCheckError::Transport { operation, .. }
            | RestCheckError::InvalidJson { operation, .. } => operation,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, RestCheckError::Transport { .. })
    }
}

impl fmt::Display for RestCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestCheckError::Transport { operation, detail } => {
                write!(f, "Transport error during {operation}: {detail}")
            }
            RestCheckError::InvalidJson { operation, detail } => {
                write!(f, "Response to {operation} is not valid JSON: {detail}")
            }
        }
    }
}

impl std::error::Error for RestCheckError {}
