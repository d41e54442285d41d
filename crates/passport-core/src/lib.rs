//! Passport Core — Fundamental record handling for the passport tools.
//!
//! Records are arbitrary nested JSON values addressed by slash-delimited
//! paths. "Not present" is an ordinary state here, never an error: the
//! accessor functions in [`path`] are total.

pub mod batch;
pub mod config;
pub mod error;
pub mod path;
pub mod record;

pub use batch::{run_batch, BatchOutcome, BatchReport, BatchSummary};
pub use config::PassportConfig;
pub use error::CoreError;
pub use path::Path;
pub use record::{denull, is_blank, is_empty};
