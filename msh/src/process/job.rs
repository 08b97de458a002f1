use msh_types::{MshError, MshResult};
use nix::unistd::Pid;
use std::fmt;
use tracing::{debug, info, warn};

use super::state::ProcessState;
use super::wait::ChildWaiter;

/// A tracked background process.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Job {
    pub pid: Pid,
    /// Current 1-based position in the table, renumbered on every removal.
    pub slot: usize,
}

/// Snapshot row produced by [`JobTable::list`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct JobEntry {
    pub index: usize,
    pub pid: Pid,
    pub state: ProcessState,
}

impl fmt::Display for JobEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}", self.index, self.pid, self.state)
    }
}

/// A job whose termination was observed and which left the table.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Completion {
    /// Slot the job held when its exit was detected.
    pub slot: usize,
    pub pid: Pid,
    pub state: ProcessState,
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]+ Done", self.slot)
    }
}

/// Bounded, insertion-ordered registry of running background jobs.
///
/// Removal shifts every later job one slot to the left, so slots stay dense
/// and the relative order of the survivors never changes.
#[derive(Debug)]
pub struct JobTable {
    jobs: Vec<Job>,
    capacity: usize,
}

impl JobTable {
    pub fn new(capacity: usize) -> Self {
        JobTable {
            jobs: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.jobs.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pid held by the first slot, if any.
    pub fn first_pid(&self) -> Option<Pid> {
        self.jobs.first().map(|job| job.pid)
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.jobs.iter().any(|job| job.pid == pid)
    }

    /// Appends `pid` and returns the 1-based slot it was given.
    pub fn register(&mut self, pid: Pid) -> MshResult<usize> {
        if self.is_full() {
            warn!("job table full ({}), rejecting pid {}", self.capacity, pid);
            return Err(MshError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        if self.contains(pid) {
            return Err(MshError::DuplicateJob(pid));
        }

        let slot = self.jobs.len() + 1;
        self.jobs.push(Job { pid, slot });
        info!("registered background job [{}] pid {}", slot, pid);
        Ok(slot)
    }

    fn remove_at(&mut self, index: usize) -> Job {
        let job = self.jobs.remove(index);
        for (i, later) in self.jobs.iter_mut().enumerate().skip(index) {
            later.slot = i + 1;
        }
        debug!(
            "removed job pid {} from slot {}, {} left",
            job.pid,
            job.slot,
            self.jobs.len()
        );
        job
    }

    /// Collects every tracked job that has already terminated, without blocking.
    ///
    /// Jobs are checked in table order. A finished job is reported with the
    /// slot it occupies at that moment, which reflects removals made earlier
    /// in the same sweep.
    ///
    /// Every job is polled before any is removed, so a failed poll leaves the
    /// table untouched.
    pub fn reap_nonblocking(&mut self, waiter: &mut dyn ChildWaiter) -> MshResult<Vec<Completion>> {
        let mut finished = Vec::new();
        for job in &self.jobs {
            if let Some(state) = waiter.try_wait(job.pid)? {
                if state.is_completed() {
                    finished.push((job.pid, state));
                }
            }
        }

        let mut completed = Vec::with_capacity(finished.len());
        for (pid, state) in finished {
            if let Some(index) = self.jobs.iter().position(|job| job.pid == pid) {
                let job = self.remove_at(index);
                info!("background job [{}] pid {} finished: {:?}", job.slot, pid, state);
                completed.push(Completion {
                    slot: job.slot,
                    pid,
                    state,
                });
            }
        }
        Ok(completed)
    }

    /// Blocks until every tracked job has terminated.
    ///
    /// Always waits on the oldest job first; the table is empty on success.
    pub fn wait_all(&mut self, waiter: &mut dyn ChildWaiter) -> MshResult<Vec<Completion>> {
        let mut completed = Vec::with_capacity(self.jobs.len());

        while let Some(job) = self.jobs.first().copied() {
            debug!("waiting for job [{}] pid {}", job.slot, job.pid);
            let state = waiter.wait(job.pid)?;
            if let Some(index) = self.jobs.iter().position(|j| j.pid == job.pid) {
                let job = self.remove_at(index);
                completed.push(Completion {
                    slot: job.slot,
                    pid: job.pid,
                    state,
                });
            }
        }
        info!("drained {} background jobs", completed.len());
        Ok(completed)
    }

    pub fn list(&self) -> Vec<JobEntry> {
        self.jobs
            .iter()
            .enumerate()
            .map(|(i, job)| JobEntry {
                index: i + 1,
                pid: job.pid,
                state: ProcessState::Running,
            })
            .collect()
    }
}
