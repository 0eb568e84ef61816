use crate::capability::{DeviceCapability, PermissionState};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The mechanism a reminder is delivered through, ordered from the strongest
/// delivery guarantee to the weakest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Channel {
    /// Durable record on the relay, delivered with Web Push. Survives the app being closed.
    ServerDurable,
    /// Scheduled notification of the mobile OS. Survives the process being killed.
    NativeOs,
    /// In-page countdown, displayed through the service worker. Lost when the browser closes.
    ServiceWorker,
    /// In-page countdown calling the Notification API directly. Lost on reload.
    LocalTimer,
    /// No notification at all, the user gets a calendar file instead
    CalendarFallback,
}

impl Channel {
    pub fn is_notification(&self) -> bool {
        *self != Channel::CalendarFallback
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ServerDurable => "server-durable",
            Self::NativeOs => "native-os",
            Self::ServiceWorker => "service-worker",
            Self::LocalTimer => "local-timer",
            Self::CalendarFallback => "calendar-fallback",
        };
        f.write_str(name)
    }
}

/// Picks the best delivery channel the device supports.
///
/// Deterministic for a given capability. The permission state inside the
/// capability has to be current, callers re-read it before every selection.
pub fn select_channel(capability: &DeviceCapability) -> Channel {
    if capability.permission != PermissionState::Granted || capability.ios_web_restricted() {
        return Channel::CalendarFallback;
    }

    if capability.supports_web_push() && capability.has_push_subscription {
        Channel::ServerDurable
    } else if capability.is_native {
        Channel::NativeOs
    } else if capability.supports_service_worker && capability.supports_notifications {
        Channel::ServiceWorker
    } else if capability.supports_notifications {
        Channel::LocalTimer
    } else {
        Channel::CalendarFallback
    }
}
