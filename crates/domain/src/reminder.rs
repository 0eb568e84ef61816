use crate::channel::Channel;
use crate::shared::entity::TaskId;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReminderKind {
    /// Fires at the due instant of the task
    Primary,
    /// Fires shortly after the primary one in case the primary was missed
    FollowUp,
}

/// Key of a `ReminderEntry`, derived deterministically from the task id.
///
/// Arming a reminder under a key always cancels whatever was armed under the
/// same key before, which is what makes cancellation idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderKey {
    pub task_id: TaskId,
    pub kind: ReminderKind,
}

impl ReminderKey {
    pub fn primary(task_id: &TaskId) -> Self {
        Self {
            task_id: task_id.clone(),
            kind: ReminderKind::Primary,
        }
    }

    pub fn follow_up(task_id: &TaskId) -> Self {
        Self {
            task_id: task_id.clone(),
            kind: ReminderKind::FollowUp,
        }
    }

    /// Both keys a task can have reminders under
    pub fn all_for(task_id: &TaskId) -> [Self; 2] {
        [Self::primary(task_id), Self::follow_up(task_id)]
    }
}

/// String form used as the identifier towards platform notification APIs,
/// e.g. `abc123` or `abc123:followup`.
impl Display for ReminderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ReminderKind::Primary => write!(f, "{}", self.task_id),
            ReminderKind::FollowUp => write!(f, "{}:followup", self.task_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReminderState {
    Pending,
    Fired,
    Cancelled,
}

/// What is shown to the user when a reminder fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub task_id: TaskId,
    pub title: String,
    pub body: String,
}

/// A `ReminderEntry` is a single armed (or previously armed) reminder for a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderEntry {
    pub key: ReminderKey,
    /// The timestamp in millis at which the reminder should fire
    pub trigger_at: i64,
    pub channel: Channel,
    pub state: ReminderState,
    pub payload: NotificationPayload,
    /// Increases every time an entry is created under the same key, so that a
    /// late delivery report from an old entry is not mistaken for the new one.
    pub generation: u64,
}

impl ReminderEntry {
    pub fn task_id(&self) -> &TaskId {
        &self.key.task_id
    }

    pub fn is_pending(&self) -> bool {
        self.state == ReminderState::Pending
    }

    /// Pending -> Fired. Returns false if the entry was not pending.
    pub fn fire(&mut self) -> bool {
        if self.is_pending() {
            self.state = ReminderState::Fired;
            true
        } else {
            false
        }
    }

    /// Pending -> Cancelled. Returns false if the entry was not pending.
    pub fn cancel(&mut self) -> bool {
        if self.is_pending() {
            self.state = ReminderState::Cancelled;
            true
        } else {
            false
        }
    }
}
