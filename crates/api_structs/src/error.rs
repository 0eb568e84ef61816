use serde::{Deserialize, Serialize};

/// Body returned with every non-2xx response from the relay.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}
