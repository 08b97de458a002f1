pub mod fork;
pub mod job;
pub mod state;
pub mod wait;

pub use job::{Completion, Job, JobEntry, JobTable};
pub use state::ProcessState;
pub use wait::{ChildWaiter, SysWaiter};
