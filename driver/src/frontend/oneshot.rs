//! One-shot frontend.

use crate::pipeline::{Driver, RequestOutcome};
use crate::request::PlanningRequest;
use tracing::error;

/// Handles `request` and returns the exit code for the process.
///
/// Version, alias listings and removed files are printed to stdout. Errors are printed to
/// stderr and mapped to a driver exit code.
pub async fn run_once(driver: &Driver, request: PlanningRequest) -> i32 {
    match driver.handle(request).await {
        Ok(outcome) => {
            match &outcome {
                RequestOutcome::Version(version) => println!("{version}"),
                RequestOutcome::Aliases(names) => {
                    for name in names {
                        println!("{name}");
                    }
                }
                RequestOutcome::Cleanup(report) => {
                    for path in &report.removed {
                        println!("Removed {}", path.display());
                    }
                }
                RequestOutcome::Pipeline(_) => {}
            }
            outcome.exit_code()
        }
        Err(e) => {
            error!(error = %e, "request failed");
            eprintln!("Driver aborting: {e}");
            e.exit_code()
        }
    }
}
