use msh_types::MshError;
use tracing::error;

/// Render a fatal error as a single user-facing line without backtraces.
pub fn format_user_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<MshError>() {
        Some(MshError::Fork(errno)) => format!("msh: fork failed: {}", errno.desc()),
        Some(MshError::Wait { pid, source }) => {
            format!("msh: wait failed for pid {}: {}", pid, source.desc())
        }
        _ => format!("msh: {err:#}"),
    }
}

/// Print a fatal error on stderr and record it in the log.
pub fn display_user_error(err: &anyhow::Error) {
    error!("fatal: {:?}", err);
    eprintln!("{}", format_user_error(err));
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context as _;
    use nix::errno::Errno;
    use nix::unistd::Pid;

    #[test]
    fn fork_failure_names_the_os_error() {
        let err = anyhow::Error::new(MshError::Fork(Errno::EAGAIN));
        assert_eq!(
            format_user_error(&err),
            format!("msh: fork failed: {}", Errno::EAGAIN.desc())
        );
    }

    #[test]
    fn wait_failure_survives_context() {
        let result: Result<(), MshError> = Err(MshError::Wait {
            pid: Pid::from_raw(99),
            source: Errno::EINVAL,
        });
        let err = result.context("command failed").unwrap_err();
        assert_eq!(
            format_user_error(&err),
            format!("msh: wait failed for pid 99: {}", Errno::EINVAL.desc())
        );
    }

    #[test]
    fn other_errors_print_their_chain() {
        let err = anyhow::anyhow!("boom").context("reading input");
        assert_eq!(format_user_error(&err), "msh: reading input: boom");
    }
}
