//! Daily ingestion of the Astronomy Picture of the Day.
//!
//! An [`Ingestor`] performs one fetch, download, persist pass. A [`Worker`]
//! drives it once a day at a configured local time, optionally also right at
//! startup. Failures are logged and left for the next tick; nothing here
//! retries on its own.

pub mod error;
mod ingest;
mod schedule;
mod worker;

pub use crate::error::ErrorKind;
pub use crate::ingest::{Ingestor, Outcome};
pub use crate::schedule::next_run;
pub use crate::worker::Worker;
