//! Domain errors for the security processor.

use security_processor_sdk::SecurityProcessorError;

use super::lifecycle::ProcessorState;

/// Internal domain errors.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("cannot {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: ProcessorState,
    },

    #[error("invalid authentication request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Policy(#[from] SecurityProcessorError),
}

impl From<DomainError> for SecurityProcessorError {
    fn from(e: DomainError) -> Self {
        match e {
            e @ DomainError::InvalidTransition { .. } => Self::InvalidState(e.to_string()),
            DomainError::InvalidRequest(msg) => Self::InvalidRequest(msg),
            DomainError::Policy(inner) => inner,
        }
    }
}
