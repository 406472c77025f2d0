//! The NanoByte token: a capped, mintable, burnable token whose holders
//! delegate balance-weighted votes.
//!
//! [`TokenController`] is the single entry point. Every public operation is
//! atomic: all balance, allowance and checkpoint changes are validated first
//! and committed together, or the operation fails and nothing changes.
//! [`SharedToken`] wraps the controller behind a single-writer lock.

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod shared;
pub mod snapshot;

pub use config::TokenConfig;
pub use controller::TokenController;
pub use error::TokenError;
pub use events::TokenEvent;
pub use shared::SharedToken;
pub use snapshot::TokenSnapshot;
