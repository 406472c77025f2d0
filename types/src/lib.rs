//! Fundamental types for the NanoByte token ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account identities, time indices, token parameters, network identity and the
//! checked arithmetic every balance and vote mutation routes through.

pub mod account;
pub mod arith;
pub mod error;
pub mod network;
pub mod params;
pub mod time;

pub use account::AccountId;
pub use arith::Delta;
pub use error::{AccountIdError, ArithmeticError};
pub use network::NetworkId;
pub use params::{TokenParams, TOKEN_UNIT};
pub use time::BlockNumber;
