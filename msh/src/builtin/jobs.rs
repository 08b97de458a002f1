//! Job tracking command handlers (jobs, wait).

use crate::shell::Shell;
use msh_types::{Context, ExitStatus, MshResult};
use tracing::debug;

pub const NO_JOBS_MESSAGE: &str = "jobs: there are no jobs";
pub const WAIT_START_MESSAGE: &str = "Waiting for background jobs...";
pub const WAIT_DONE_MESSAGE: &str = "All background jobs finished";

/// Execute the `jobs` builtin command.
///
/// Lists tracked background jobs as `[<index>] <pid> <status>` in table order.
pub fn execute_jobs(
    shell: &mut Shell,
    ctx: &mut Context,
    _argv: &[String],
) -> MshResult<ExitStatus> {
    let entries = shell.jobs.list();
    if entries.is_empty() {
        ctx.write_stdout(NO_JOBS_MESSAGE)?;
    } else {
        for entry in entries {
            ctx.write_stdout(&entry.to_string())?;
        }
    }
    Ok(ExitStatus::ExitedWith(0))
}

/// Execute the `wait` builtin command.
///
/// Blocks until every tracked background job has terminated.
pub fn execute_wait(
    shell: &mut Shell,
    ctx: &mut Context,
    _argv: &[String],
) -> MshResult<ExitStatus> {
    ctx.write_stdout(WAIT_START_MESSAGE)?;
    let drained = shell.wait_jobs()?;
    debug!("wait drained {} jobs", drained.len());
    ctx.write_stdout(WAIT_DONE_MESSAGE)?;
    Ok(ExitStatus::ExitedWith(0))
}
