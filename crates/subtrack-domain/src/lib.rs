//! subtrack-domain
//!
//! Pure domain models for tracked subscriptions.
//! No I/O, no CLI, no storage. Only data types, core enums, and calendar helpers.

pub mod category;
pub mod common;
pub mod subscription;

pub use category::*;
pub use common::*;
pub use subscription::*;
