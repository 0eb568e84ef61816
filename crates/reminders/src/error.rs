use dayfuse_sdk::APIError;
use thiserror::Error;

/// Failure reported by the platform notification layer (browser or mobile OS)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    #[error("Notification permission was denied")]
    PermissionDenied,
    #[error("Not supported on this platform: {0}")]
    Unsupported(String),
    #[error("Platform call failed: {0}")]
    Failed(String),
}

/// Failure talking to the push relay
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("The relay could not be reached")]
    Unreachable,
    #[error("The relay has no such record")]
    NotFound,
    #[error("Push is not configured on the relay")]
    PushNotConfigured,
    #[error("The relay rejected the request: {0}")]
    Rejected(String),
}

impl From<APIError> for TransportError {
    fn from(e: APIError) -> Self {
        match e {
            APIError::Network => Self::Unreachable,
            APIError::NotFound => Self::NotFound,
            APIError::PushNotConfigured => Self::PushNotConfigured,
            other => Self::Rejected(other.to_string()),
        }
    }
}

/// Failure of a delivery backend to arm or disarm a reminder
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeliveryError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("The backend can not handle this handle")]
    ForeignHandle,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulingError {
    #[error("Notification permission was denied")]
    PermissionDenied,
    #[error("No usable notification channel on this device")]
    UnsupportedPlatform,
    #[error("Delivery backend failed: {0}")]
    DeliveryFailed(#[from] DeliveryError),
    #[error("The task has no reminder to reschedule")]
    NothingToReschedule,
    #[error("The new trigger time is not in the future")]
    TriggerInPast,
    #[error("Push subscription could not be registered: {0}")]
    SubscriptionRegistrationFailed(String),
}
