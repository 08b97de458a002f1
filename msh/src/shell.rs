use crate::builtin;
use crate::config::ShellConfig;
use crate::parser::Command;
use crate::process::fork::fork_process;
use crate::process::{ChildWaiter, Completion, JobTable, SysWaiter};
use msh_types::{Context, ExitStatus, MshError, MshResult};
use nix::unistd::{Pid, getpid};
use tracing::{debug, info};

pub const APP_NAME: &str = "msh";

pub struct Shell {
    pub config: ShellConfig,
    pub exited: Option<ExitStatus>,
    pub pid: Pid,
    pub(crate) jobs: JobTable,
    waiter: Box<dyn ChildWaiter>,
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("pid", &self.pid)
            .field("jobs", &self.jobs)
            .field("exited", &self.exited)
            .finish()
    }
}

impl Shell {
    pub fn new(config: ShellConfig) -> Self {
        Self::with_waiter(config, Box::new(SysWaiter))
    }

    pub fn with_waiter(config: ShellConfig, waiter: Box<dyn ChildWaiter>) -> Self {
        let jobs = JobTable::new(config.job_capacity());
        Shell {
            config,
            exited: None,
            pid: getpid(),
            jobs,
            waiter,
        }
    }

    pub fn jobs(&self) -> &JobTable {
        &self.jobs
    }

    /// Marks the shell as finished. Background jobs are left running.
    pub fn exit(&mut self, code: i32) {
        if !self.jobs.is_empty() {
            info!("exiting with {} background jobs still running", self.jobs.len());
        }
        self.exited = Some(ExitStatus::ExitedWith(code));
    }

    pub fn reap_jobs(&mut self) -> MshResult<Vec<Completion>> {
        self.jobs.reap_nonblocking(self.waiter.as_mut())
    }

    pub fn wait_jobs(&mut self) -> MshResult<Vec<Completion>> {
        self.jobs.wait_all(self.waiter.as_mut())
    }

    /// Runs one parsed command line, either as a builtin or as a program.
    pub fn eval(&mut self, ctx: &mut Context, cmd: &Command) -> MshResult<ExitStatus> {
        if builtin::is_builtin(cmd.name()) {
            debug!("dispatch builtin {}", cmd.name());
            let handler = builtin::registry::BUILTIN_REGISTRY
                .get(cmd.name())
                .ok_or_else(|| MshError::UnknownBuiltin(cmd.name().to_string()))?;
            return handler(self, ctx, cmd.args());
        }
        self.launch(ctx, cmd)
    }

    /// Starts an external program.
    ///
    /// A foreground launch waits for that very child. A background launch is
    /// registered in the job table and acknowledged as `[<slot>] <pid>`.
    pub fn launch(&mut self, ctx: &mut Context, cmd: &Command) -> MshResult<ExitStatus> {
        if cmd.background && self.jobs.is_full() {
            return Err(MshError::CapacityExceeded {
                capacity: self.jobs.capacity(),
            });
        }

        let pid = fork_process(cmd)?;

        if cmd.background {
            let slot = self.jobs.register(pid)?;
            ctx.write_stdout(&format!("[{slot}] {pid}"))?;
            return Ok(ExitStatus::Running(pid));
        }

        let state = self.waiter.wait(pid)?;
        let code = state.exit_code().unwrap_or(0);
        debug!("foreground {} pid {} finished with {}", cmd.name(), pid, code);
        Ok(ExitStatus::ExitedWith(code))
    }
}
