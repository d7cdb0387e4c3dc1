//! Status reporting for pipeline runs.
//!
//! The controller reports what happens to every stage as [`StatusLine`]s.
//! Where they end up is decided by the frontend through a [`StatusSink`].

mod sink;

pub use sink::{
    CollectingStatusSink, NoOpStatusSink, StatusLine, StatusSink, StdoutStatusSink,
    TracingStatusSink,
};
