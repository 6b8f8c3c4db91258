#![doc(test(attr(deny(warnings))))]

//! Subtrack tracks recurring subscriptions: what they cost per month and per
//! year, when they bill next, and which are overdue. The engine lives in the
//! workspace crates; this package wires them to a command-line front end.

pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Subtrack tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
