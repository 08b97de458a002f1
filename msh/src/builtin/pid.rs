use crate::shell::Shell;
use msh_types::{Context, ExitStatus, MshResult};

/// Execute the `pid` builtin command.
///
/// Prints the shell's pid followed by the pid in the first job slot, or 0
/// when no job is tracked.
pub fn execute(shell: &mut Shell, ctx: &mut Context, _argv: &[String]) -> MshResult<ExitStatus> {
    let first = shell.jobs.first_pid().map_or(0, |pid| pid.as_raw());
    let line = format!("{} {}", ctx.shell_pid, first);
    ctx.write_stdout(&line)?;
    Ok(ExitStatus::ExitedWith(0))
}
