#![no_std]

mod error;
mod events;
mod helpers;
mod services;
mod types;

pub use error::LendingError;
pub use events::ExternalCallFailed;
pub use helpers::{call_failed, non_negative, protocol_call, service_call};
pub use services::*;
pub use types::*;

#[cfg(test)]
mod test;
