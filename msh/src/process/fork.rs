use libc::{STDERR_FILENO, c_char};
use msh_types::{MshError, MshResult};
use nix::errno::Errno;
use nix::unistd::{ForkResult, Pid, fork, write};
use std::ffi::CString;
use std::io::Write;
use std::ptr;
use tracing::{debug, error};

use crate::config::MAX_ARGS;
use crate::parser::Command;

/// Exit status of a child whose program image could not be replaced.
pub const EXEC_FAILURE_STATUS: i32 = 127;

/// Converts the argument vector for `execvp`, rejecting what it cannot carry.
pub(crate) fn to_cstrings(argv: &[String]) -> MshResult<Vec<CString>> {
    if argv.len() > MAX_ARGS {
        return Err(MshError::TooManyArguments { max: MAX_ARGS });
    }
    argv.iter()
        .map(|arg| CString::new(arg.as_str()).map_err(|_| MshError::InvalidArgument(arg.clone())))
        .collect()
}

/// Forks and runs `cmd` in the child, returning the child's pid to the parent.
///
/// The parent does not wait; that is up to the caller.
pub(crate) fn fork_process(cmd: &Command) -> MshResult<Pid> {
    let argv = to_cstrings(&cmd.argv)?;
    let mut argv_ptrs: Vec<*const c_char> = argv.iter().map(|arg| arg.as_ptr()).collect();
    argv_ptrs.push(ptr::null());
    let exec_error_prefix = format!("msh: {}: ", cmd.name());

    // buffered output would otherwise be written twice, once by each process
    std::io::stdout().flush()?;
    std::io::stderr().flush()?;

    debug!("about to fork {:?} background:{}", cmd.argv, cmd.background);
    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => {
            debug!("forked {} with child pid {}", cmd.name(), child);
            Ok(child)
        }
        Ok(ForkResult::Child) => exec_child(&argv_ptrs, exec_error_prefix.as_bytes()),
        Err(errno) => {
            error!("fork failed for {}: {}", cmd.name(), errno);
            Err(MshError::Fork(errno))
        }
    }
}

/// Replaces the child image, or reports why not and exits.
///
/// Only async-signal-safe calls happen here: another thread may have held the
/// allocator or a std stream lock at fork time.
fn exec_child(argv: &[*const c_char], error_prefix: &[u8]) -> ! {
    unsafe { libc::execvp(argv[0], argv.as_ptr()) };
    let reason = Errno::last().desc();
    let _ = write(STDERR_FILENO, error_prefix);
    let _ = write(STDERR_FILENO, reason.as_bytes());
    let _ = write(STDERR_FILENO, b"\n");
    unsafe { libc::_exit(EXEC_FAILURE_STATUS) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::state::ProcessState;
    use crate::process::wait::{ChildWaiter, SysWaiter};
    use nix::unistd::getpid;

    fn init() {
        let _ = tracing_subscriber::fmt::try_init();
    }

    #[test]
    fn runs_program_from_path() {
        init();
        let cmd = Command::parse("true").unwrap();
        let pid = fork_process(&cmd).unwrap();
        assert_ne!(pid, getpid());
        assert_eq!(SysWaiter.wait(pid).unwrap(), ProcessState::Completed(0, None));
    }

    #[test]
    fn exec_failure_exits_with_distinct_status() {
        init();
        let cmd = Command::parse("msh-no-such-program-for-tests").unwrap();
        let pid = fork_process(&cmd).unwrap();
        let state = SysWaiter.wait(pid).unwrap();
        assert_eq!(state.exit_code(), Some(EXEC_FAILURE_STATUS));
    }

    #[test]
    fn too_many_arguments_rejected_before_fork() {
        init();
        let line = format!("echo {}", vec!["x"; MAX_ARGS].join(" "));
        let cmd = Command::parse(&line).unwrap();
        assert!(matches!(
            fork_process(&cmd),
            Err(MshError::TooManyArguments { max: MAX_ARGS })
        ));
    }

    #[test]
    fn nul_byte_rejected() {
        let argv = vec!["echo".to_string(), "a\0b".to_string()];
        assert!(matches!(
            to_cstrings(&argv),
            Err(MshError::InvalidArgument(arg)) if arg == "a\0b"
        ));
        assert_eq!(to_cstrings(&argv[..1]).unwrap().len(), 1);
    }
}
