use chrono_tz::Tz;

/// Default snooze length when the user does not pick one
pub const DEFAULT_SNOOZE_MINUTES: u32 = 10;

/// Delay of the follow up reminder after the primary one
pub const DEFAULT_FOLLOW_UP_DELAY_MILLIS: i64 = 60 * 1000;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Time zone of the user. A due date starts at midnight in this zone.
    pub tz: Tz,
    /// `None` disables follow up reminders
    pub follow_up_delay_millis: Option<i64>,
    pub snooze_minutes: u32,
    /// Signed in user. Needed for server durable reminders and push registration.
    pub user_id: Option<String>,
}

impl SchedulerConfig {
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            follow_up_delay_millis: Some(DEFAULT_FOLLOW_UP_DELAY_MILLIS),
            snooze_minutes: DEFAULT_SNOOZE_MINUTES,
            user_id: None,
        }
    }

    pub fn with_user<T: Into<String>>(mut self, user_id: T) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn without_follow_up(mut self) -> Self {
        self.follow_up_delay_millis = None;
        self
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new(chrono_tz::UTC)
    }
}
