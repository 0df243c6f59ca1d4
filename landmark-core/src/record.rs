//! Types and traits for recording training statistics.
//!
//! * [`Record`] - A container of key-value pairs
//! * [`RecordValue`] - Values that can be stored in a [`Record`]
//! * [`Recorder`] - A destination of records
//! * [`BufferedRecorder`] - Keeps records in memory
//!
//! ```rust
//! use landmark_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("opt_steps", RecordValue::Scalar(100.0));
//! record.insert("expreplay/mean_score", RecordValue::Scalar(-3.5));
//! assert_eq!(record.get_scalar("opt_steps").unwrap(), 100.0);
//! ```
mod base;
mod buffered_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use recorder::Recorder;
