mod web_push;

pub use web_push::{IPushProvider, PushError, PushPayload, RecordingPushProvider, WebPushProvider};
