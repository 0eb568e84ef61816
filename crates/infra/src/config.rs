use tracing::{info, warn};

const DEFAULT_PORT: usize = 5000;
const DEFAULT_VAPID_SUBJECT: &str = "mailto:support@dayfuse.app";
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30;
const DEFAULT_PUSH_TTL_SECS: u32 = 60 * 60 * 24;

/// Application identity towards push services
#[derive(Debug, Clone)]
pub struct VapidConfig {
    /// Base64url encoded public key handed to browsers when they subscribe
    pub public_key: String,
    /// PEM encoded private key used to sign push requests
    pub private_key_pem: Vec<u8>,
    /// `sub` claim, a mailto: or https: contact
    pub subject: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Push is disabled when this is `None`
    pub vapid: Option<VapidConfig>,
    /// Seconds between two sweeps for due notifications
    pub notification_sweep_interval_secs: u64,
    /// How long push services keep an undelivered message
    pub push_ttl_secs: u32,
}

impl Config {
    pub fn new() -> Self {
        let port = parse_env("PORT", DEFAULT_PORT);
        let notification_sweep_interval_secs =
            match parse_env("NOTIFICATION_SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL_SECS) {
                0 => {
                    warn!(
                        "NOTIFICATION_SWEEP_INTERVAL_SECS must be positive, falling back to {}.",
                        DEFAULT_SWEEP_INTERVAL_SECS
                    );
                    DEFAULT_SWEEP_INTERVAL_SECS
                }
                secs => secs,
            };

        Self {
            port,
            vapid: Self::vapid_from_env(),
            notification_sweep_interval_secs,
            push_ttl_secs: parse_env("PUSH_TTL_SECS", DEFAULT_PUSH_TTL_SECS),
        }
    }

    fn vapid_from_env() -> Option<VapidConfig> {
        let public_key = std::env::var("VAPID_PUBLIC_KEY").ok();
        let private_key_path = std::env::var("VAPID_PRIVATE_KEY_PATH").ok();
        let (public_key, private_key_path) = match (public_key, private_key_path) {
            (Some(public_key), Some(path)) => (public_key, path),
            _ => {
                warn!("VAPID_PUBLIC_KEY or VAPID_PRIVATE_KEY_PATH is not set. Push notifications are disabled.");
                return None;
            }
        };
        let private_key_pem = match std::fs::read(&private_key_path) {
            Ok(pem) => pem,
            Err(e) => {
                warn!(
                    "Unable to read the VAPID private key at {}: {:?}. Push notifications are disabled.",
                    private_key_path, e
                );
                return None;
            }
        };
        let subject = std::env::var("VAPID_SUBJECT").unwrap_or_else(|_| {
            info!(
                "Did not find VAPID_SUBJECT environment variable. Using {}",
                DEFAULT_VAPID_SUBJECT
            );
            DEFAULT_VAPID_SUBJECT.into()
        });

        Some(VapidConfig {
            public_key,
            private_key_pem,
            subject,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    key, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_falls_back_on_invalid_values() {
        std::env::set_var("DAYFUSE_TEST_PORT", "not-a-port");
        assert_eq!(parse_env("DAYFUSE_TEST_PORT", 5000usize), 5000);
        std::env::set_var("DAYFUSE_TEST_PORT", "8080");
        assert_eq!(parse_env("DAYFUSE_TEST_PORT", 5000usize), 8080);
        assert_eq!(parse_env("DAYFUSE_TEST_UNSET", 30u64), 30);
    }
}
