//! Ways of feeding requests to a [`Driver`](crate::pipeline::Driver).
//!
//! - One-shot: a single request from the command line, answered with the
//!   process exit code
//! - Service: newline-delimited JSON requests over TCP, answered with
//!   `{"exitcode": n}` per request

mod oneshot;
mod service;

pub use oneshot::run_once;
pub use service::{ServiceFrontend, ServiceResponse, SERVICE_NAME};
