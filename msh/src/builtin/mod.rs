//! Builtin commands executed inside the shell process.
//!
//! A reserved name always wins over a program of the same name on `PATH`.

pub mod exit;
pub mod jobs;
pub mod pid;
pub mod registry;

/// Names reserved for builtins.
pub const BUILTIN_NAMES: [&str; 4] = ["exit", "pid", "jobs", "wait"];

/// Whether `name` is handled by the shell instead of being launched.
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name)
}
