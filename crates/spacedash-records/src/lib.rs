//! spacedash-records — launch record store and chart queries.
//!
//! The [`RecordStore`] is loaded once from a CSV file and never mutated
//! afterwards. It is `Clone` + `Send` + `Sync` (backed by `Arc`) and can be
//! shared across request handlers without locking.
//!
//! The [`query`] module holds the two pure chart queries: the success
//! proportion (pie) and the payload/outcome correlation (scatter). Both
//! take the store plus a filter and return a small result table that is
//! discarded once rendered.

pub mod error;
pub mod query;
pub mod store;
pub mod types;

pub use error::{RecordError, RecordResult};
pub use query::{
    Correlation, CorrelationPoint, Proportion, ProportionSlice, SliceKey, payload_correlation,
    success_proportion,
};
pub use store::RecordStore;
pub use types::*;
