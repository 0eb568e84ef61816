mod error;
mod notification;
mod push;
mod status;
mod task;

pub mod dtos {
    pub use crate::notification::dtos::*;
    pub use crate::push::dtos::*;
    pub use crate::task::dtos::*;
}

pub use crate::error::ErrorResponse;
pub use crate::notification::api::*;
pub use crate::push::api::*;
pub use crate::status::api::*;
pub use crate::task::api::*;
