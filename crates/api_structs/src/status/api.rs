use serde::{Deserialize, Serialize};

pub mod get_service_health {
    use super::*;

    /// Liveness of the relay
    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub message: String,
    }
}
