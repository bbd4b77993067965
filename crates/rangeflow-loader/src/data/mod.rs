//! Immutable data types for range loading.
//!
//! Configuration, request descriptors, accounting and outcome types shared by
//! the [`core`](crate::core) and [`effects`](crate::effects) layers. Nothing in
//! here performs I/O.

pub mod config;
pub mod outcome;
pub mod progress;
pub mod range;
pub mod source;
pub mod state;

pub use config::LoaderConfig;
pub use outcome::{ErrorDetail, ErrorKind, Outcome};
pub use progress::Progress;
pub use range::ByteRange;
pub use source::{Credentials, DataSource, ReferrerPolicy, RequestMode};
pub use state::LoaderState;
