use nix::sys::signal::Signal;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ProcessState {
    Running,
    Completed(u8, Option<Signal>),
}

impl ProcessState {
    pub fn is_completed(&self) -> bool {
        matches!(self, ProcessState::Completed(_, _))
    }

    /// Shell-style exit code: the exit status, or 128 + signal number.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ProcessState::Running => None,
            ProcessState::Completed(_, Some(signal)) => Some(128 + *signal as i32),
            ProcessState::Completed(code, None) => Some(*code as i32),
        }
    }
}

impl std::fmt::Display for ProcessState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ProcessState::Running => formatter.write_str("Running"),
            ProcessState::Completed(_, Some(Signal::SIGKILL)) => formatter.write_str("Killed"),
            ProcessState::Completed(_, Some(Signal::SIGTERM)) => formatter.write_str("Terminated"),
            ProcessState::Completed(_, _) => formatter.write_str("Done"),
        }
    }
}
