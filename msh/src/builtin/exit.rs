use crate::shell::Shell;
use msh_types::{Context, ExitStatus, MshResult};

/// Execute the `exit` builtin command.
///
/// Ends the session with status 0. Background jobs are neither waited for
/// nor signalled.
pub fn execute(shell: &mut Shell, ctx: &mut Context, _argv: &[String]) -> MshResult<ExitStatus> {
    ctx.write_stdout("Shell terminated")?;
    shell.exit(0);
    Ok(ExitStatus::ExitedWith(0))
}
