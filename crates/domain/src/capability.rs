use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionState {
    /// The user has not been asked yet
    Default,
    Granted,
    Denied,
}

impl Default for PermissionState {
    fn default() -> Self {
        Self::Default
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IosVersion {
    pub major: u32,
    pub minor: u32,
}

impl IosVersion {
    /// First iOS release that delivers web push to home screen web apps
    pub const WEB_PUSH: IosVersion = IosVersion {
        major: 16,
        minor: 4,
    };

    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

/// What the current device is able to do with notifications.
///
/// Computed once per session by the platform layer. The permission state is
/// carried along but must be refreshed whenever the user changes it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCapability {
    /// Push API is available
    pub supports_push: bool,
    /// Notification API is available
    pub supports_notifications: bool,
    pub supports_service_worker: bool,
    /// Running as a native mobile build rather than in a browser
    pub is_native: bool,
    pub is_ios: bool,
    pub ios_version: Option<IosVersion>,
    /// Installed to the home screen and running standalone
    pub is_pwa_installed: bool,
    pub permission: PermissionState,
    /// A push subscription for this device has been registered with the relay
    pub has_push_subscription: bool,
}

impl DeviceCapability {
    /// Detects an iOS device and its version from a browser user agent.
    ///
    /// `Mozilla/5.0 (iPhone; CPU iPhone OS 16_4 like Mac OS X) ...` gives `(true, Some(16.4))`.
    pub fn detect_ios(user_agent: &str) -> (bool, Option<IosVersion>) {
        let is_ios = ["iPhone", "iPad", "iPod"]
            .iter()
            .any(|device| user_agent.contains(device));
        if !is_ios {
            return (false, None);
        }

        let version = user_agent.find(" OS ").and_then(|start| {
            let rest = &user_agent[start + 4..];
            let token = rest.split_whitespace().next()?;
            let mut parts = token.split('_');
            let major = parts.next()?.parse::<u32>().ok()?;
            let minor = parts
                .next()
                .and_then(|m| m.parse::<u32>().ok())
                .unwrap_or(0);
            Some(IosVersion::new(major, minor))
        });

        (true, version)
    }

    /// iOS only lets web apps notify when installed to the home screen on 16.4 or later
    pub fn ios_web_restricted(&self) -> bool {
        if !self.is_ios || self.is_native {
            return false;
        }
        let recent_enough = matches!(self.ios_version, Some(v) if v >= IosVersion::WEB_PUSH);
        !(recent_enough && self.is_pwa_installed)
    }

    /// Push, notifications and service workers are all present and usable
    pub fn supports_web_push(&self) -> bool {
        !self.is_native
            && self.supports_push
            && self.supports_notifications
            && self.supports_service_worker
            && !self.ios_web_restricted()
    }

    /// Instructions for the user when no notification channel is usable
    pub fn guidance(&self) -> PlatformGuidance {
        if self.ios_web_restricted() {
            match self.ios_version {
                Some(v) if v >= IosVersion::WEB_PUSH => PlatformGuidance::AddToHomeScreen,
                _ => PlatformGuidance::UpgradeIos,
            }
        } else if (self.supports_notifications || self.is_native)
            && self.permission != PermissionState::Granted
        {
            PlatformGuidance::EnableNotifications
        } else {
            PlatformGuidance::NotificationsUnsupported
        }
    }
}

/// Platform specific instructions shown along with a calendar file when push
/// notifications cannot be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlatformGuidance {
    UpgradeIos,
    AddToHomeScreen,
    EnableNotifications,
    NotificationsUnsupported,
}

impl Display for PlatformGuidance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::UpgradeIos => {
                "Reminders need iOS 16.4 or later. Until then, add the task to your calendar to get an alert."
            }
            Self::AddToHomeScreen => {
                "To get reminders on iOS, tap the Share button and choose \"Add to Home Screen\", then open DayFuse from your home screen."
            }
            Self::EnableNotifications => {
                "Notifications are turned off. Allow notifications for DayFuse in your browser or device settings to get reminders."
            }
            Self::NotificationsUnsupported => {
                "This browser cannot show notifications. Add the task to your calendar to get an alert."
            }
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE_16_4: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.4 Mobile/15E148 Safari/604.1";
    const IPAD_15_2_1: &str = "Mozilla/5.0 (iPad; CPU OS 15_2_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.2 Mobile/15E148 Safari/604.1";
    const CHROME: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

    #[test]
    fn it_detects_ios_versions() {
        assert_eq!(
            DeviceCapability::detect_ios(IPHONE_16_4),
            (true, Some(IosVersion::new(16, 4)))
        );
        assert_eq!(
            DeviceCapability::detect_ios(IPAD_15_2_1),
            (true, Some(IosVersion::new(15, 2)))
        );
        assert_eq!(DeviceCapability::detect_ios(CHROME), (false, None));
    }

    fn ios(version: IosVersion, installed: bool) -> DeviceCapability {
        DeviceCapability {
            supports_push: true,
            supports_notifications: true,
            supports_service_worker: true,
            is_ios: true,
            ios_version: Some(version),
            is_pwa_installed: installed,
            permission: PermissionState::Granted,
            ..Default::default()
        }
    }

    #[test]
    fn ios_web_push_needs_recent_version_and_installation() {
        assert!(!ios(IosVersion::new(16, 3), true).supports_web_push());
        assert!(!ios(IosVersion::new(17, 0), false).supports_web_push());
        assert!(ios(IosVersion::new(16, 4), true).supports_web_push());
    }

    #[test]
    fn it_gives_platform_guidance() {
        assert_eq!(
            ios(IosVersion::new(15, 0), false).guidance(),
            PlatformGuidance::UpgradeIos
        );
        assert_eq!(
            ios(IosVersion::new(17, 1), false).guidance(),
            PlatformGuidance::AddToHomeScreen
        );

        let denied = DeviceCapability {
            supports_notifications: true,
            permission: PermissionState::Denied,
            ..Default::default()
        };
        assert_eq!(denied.guidance(), PlatformGuidance::EnableNotifications);
        assert_eq!(
            DeviceCapability::default().guidance(),
            PlatformGuidance::NotificationsUnsupported
        );
    }
}
