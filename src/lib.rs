#![doc(test(attr(deny(warnings))))]

//! Cashflow Core turns recurring financial commitments and historical ledger
//! activity into scheduled actions (auto-posted transactions or due reminders)
//! and multi-month cash-flow projections with scenario sensitivity.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use errors::{CashflowError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Cashflow Core tracing initialized.");
    });
}
