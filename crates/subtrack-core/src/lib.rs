//! subtrack-core
//!
//! Billing math, renewal advancement, aggregates, and the record store.
//! Depends on subtrack-domain. No CLI, no terminal I/O, no direct filesystem access.

pub mod aggregate;
pub mod billing;
pub mod error;
pub mod renewal;
pub mod sample;
pub mod storage;
pub mod store;
pub mod time;
pub mod validation;

pub use aggregate::*;
pub use error::CoreError;
pub use renewal::RenewalService;
pub use storage::{MemoryStorage, RecordStorage};
pub use store::{ListenerId, RecordStore, StoreEvent, StoreOptions};
pub use time::{Clock, FixedClock};
