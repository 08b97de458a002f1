use std::path::PathBuf;

/// Prompt printed before every read.
pub const DEFAULT_PROMPT: &str = "minishell> ";

/// Default number of background jobs tracked at once.
pub const DEFAULT_JOB_CAPACITY: usize = 10;

/// Upper bound for `MSH_MAX_JOBS`. The job table compacts by shifting, which
/// only stays cheap for small tables.
pub const MAX_JOB_CAPACITY: usize = 64;

/// Longest accepted input line in bytes, newline excluded.
pub const MAX_LINE_LEN: usize = 256;

/// Longest accepted argument vector; with its terminating null it fits 32 slots.
pub const MAX_ARGS: usize = 31;

/// Default `EnvFilter` directive for the log file.
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    prompt: String,
    job_capacity: usize,
    log_filter: String,
    log_file: Option<PathBuf>,
}

impl ShellConfig {
    pub fn new(
        prompt: Option<String>,
        job_capacity: Option<usize>,
        log_filter: Option<String>,
        log_file: Option<PathBuf>,
    ) -> Self {
        let prompt = prompt.unwrap_or_else(|| DEFAULT_PROMPT.to_string());
        let job_capacity = job_capacity
            .unwrap_or(DEFAULT_JOB_CAPACITY)
            .clamp(1, MAX_JOB_CAPACITY);
        let log_filter = log_filter
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            prompt,
            job_capacity,
            log_filter,
            log_file,
        }
    }

    pub fn from_getter(mut getter: impl FnMut(&str) -> Option<String>) -> Self {
        let prompt = getter("MSH_PROMPT");
        let job_capacity = getter("MSH_MAX_JOBS").and_then(|value| value.trim().parse().ok());
        let log_filter = getter("MSH_LOG");
        let log_file = getter("MSH_LOG_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        ShellConfig::new(prompt, job_capacity, log_filter, log_file)
    }

    pub fn from_env() -> Self {
        Self::from_getter(|key| std::env::var(key).ok())
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn job_capacity(&self) -> usize {
        self.job_capacity
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    pub fn log_file(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    pub fn with_job_capacity(mut self, job_capacity: usize) -> Self {
        self.job_capacity = job_capacity.clamp(1, MAX_JOB_CAPACITY);
        self
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        ShellConfig::new(None, None, None, None)
    }
}
