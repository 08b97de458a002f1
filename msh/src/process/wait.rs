use msh_types::{MshError, MshResult};
use nix::errno::Errno;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;
use tracing::{debug, warn};

use super::state::ProcessState;

/// Source of child termination events.
///
/// Every call names the child it is interested in, so a wait can never consume
/// the exit of a process nobody asked about.
pub trait ChildWaiter {
    /// Returns the final state if `pid` has already terminated, without blocking.
    fn try_wait(&mut self, pid: Pid) -> MshResult<Option<ProcessState>>;

    /// Blocks until `pid` terminates.
    fn wait(&mut self, pid: Pid) -> MshResult<ProcessState>;
}

/// `waitpid(2)` backed waiter used by the running shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysWaiter;

impl ChildWaiter for SysWaiter {
    fn try_wait(&mut self, pid: Pid) -> MshResult<Option<ProcessState>> {
        wait_pid(pid, true)
    }

    fn wait(&mut self, pid: Pid) -> MshResult<ProcessState> {
        loop {
            if let Some(state) = wait_pid(pid, false)? {
                return Ok(state);
            }
        }
    }
}

/// Collects the status of `pid`.
///
/// `None` means the child is still alive (only possible with `no_hang`) or
/// reported a non-terminal change. An unknown child (`ECHILD`) is treated as
/// already gone.
pub fn wait_pid(pid: Pid, no_hang: bool) -> MshResult<Option<ProcessState>> {
    let options = if no_hang {
        Some(WaitPidFlag::WNOHANG)
    } else {
        None
    };

    loop {
        let state = match waitpid(pid, options) {
            Ok(WaitStatus::Exited(pid, status)) => {
                debug!("process {} exited with status {}", pid, status);
                ProcessState::Completed(status as u8, None)
            }
            Ok(WaitStatus::Signaled(pid, signal, core_dumped)) => {
                debug!(
                    "process {} killed by signal {:?} (core dumped: {})",
                    pid, signal, core_dumped
                );
                ProcessState::Completed(1, Some(signal))
            }
            Ok(WaitStatus::StillAlive) => return Ok(None),
            Err(Errno::ECHILD) => {
                debug!("no child process {} (ECHILD), treating as completed", pid);
                ProcessState::Completed(1, None)
            }
            Err(Errno::EINTR) => {
                debug!("waitpid for {} interrupted, retrying", pid);
                continue;
            }
            Err(source) => return Err(MshError::Wait { pid, source }),
            Ok(status) => {
                warn!("unexpected waitpid status for pid {}: {:?}", pid, status);
                return Ok(None);
            }
        };
        return Ok(Some(state));
    }
}
