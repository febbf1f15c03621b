use thiserror::Error;

/// Failures reported by a position source for an active subscription.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PositionErrorKind {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionError {
    pub kind: PositionErrorKind,
    pub message: String,
}

impl PositionError {
    pub fn new(kind: PositionErrorKind, message: impl Into<String>) -> Self {
        PositionError {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("Geolocation is not supported by this device")]
    NoPositionSupport,
    #[error("Error tracking location: permission denied ({0})")]
    PermissionDenied(String),
    #[error("Error tracking location: position unavailable ({0})")]
    PositionUnavailable(String),
    #[error("Error tracking location: timed out ({0})")]
    PositionTimeout(String),
    #[error("Please enter a journey name")]
    MissingJourneyName,
    #[error("No journey at index {index}, {len} saved")]
    JourneyIndexOutOfRange { index: usize, len: usize },
}

impl From<PositionError> for TrackerError {
    fn from(error: PositionError) -> Self {
        match error.kind {
            PositionErrorKind::PermissionDenied => TrackerError::PermissionDenied(error.message),
            PositionErrorKind::PositionUnavailable => {
                TrackerError::PositionUnavailable(error.message)
            }
            PositionErrorKind::Timeout => TrackerError::PositionTimeout(error.message),
        }
    }
}
