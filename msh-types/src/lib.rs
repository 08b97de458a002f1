use nix::errno::Errno;
use nix::unistd::Pid;
use std::fmt::Debug;
use std::io::Write;
use thiserror::Error;

/// Mini shell specific error types
#[derive(Error, Debug)]
pub enum MshError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("fork failed: {0}")]
    Fork(#[source] Errno),

    #[error("wait failed for pid {pid}: {source}")]
    Wait { pid: Pid, source: Errno },

    #[error("unknown builtin command: {0}")]
    UnknownBuiltin(String),

    #[error("too many background jobs (max {capacity})")]
    CapacityExceeded { capacity: usize },

    #[error("process {0} is already tracked")]
    DuplicateJob(Pid),

    #[error("too many arguments (max {max})")]
    TooManyArguments { max: usize },

    #[error("argument contains a NUL byte: {0:?}")]
    InvalidArgument(String),
}

impl MshError {
    /// Whether the shell itself has to terminate after this error.
    ///
    /// Everything else is reported on the error stream and the loop carries on.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MshError::Io(_)
                | MshError::Fork(_)
                | MshError::Wait { .. }
                | MshError::UnknownBuiltin(_)
        )
    }
}

pub type MshResult<T> = std::result::Result<T, MshError>;

/// Per-command execution context handed to builtins and the launcher.
pub struct Context<'a> {
    pub shell_pid: Pid,
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
}

impl<'a> Context<'a> {
    pub fn new(shell_pid: Pid, out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Context {
            shell_pid,
            out,
            err,
        }
    }

    // Flushed on every line so that shell output stays ordered with output
    // written by children straight to the inherited descriptors.
    pub fn write_stdout(&mut self, msg: &str) -> MshResult<()> {
        writeln!(self.out, "{msg}")?;
        self.out.flush()?;
        Ok(())
    }

    pub fn write_stderr(&mut self, msg: &str) -> MshResult<()> {
        writeln!(self.err, "{msg}")?;
        self.err.flush()?;
        Ok(())
    }
}

impl Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::result::Result<(), std::fmt::Error> {
        f.debug_struct("Context")
            .field("shell_pid", &self.shell_pid)
            .finish()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ExitStatus {
    ExitedWith(i32),
    Running(Pid),
}
