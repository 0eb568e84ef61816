use chrono::Utc;

/// Source of "now" for everything that compares against a trigger time:
/// the client countdowns, the past-due checks and the relay sweep. Tests
/// swap in a fixed or settable clock.
pub trait ISys: Send + Sync {
    /// Milliseconds since the unix epoch
    fn get_timestamp_millis(&self) -> i64;
}

/// Wall clock
pub struct RealSys {}

impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
