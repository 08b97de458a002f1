use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn run_msh_with(script: &str, envs: &[(&str, &str)]) -> (Output, u32) {
    let log_dir = TempDir::new().expect("create temp log dir");
    let mut child = Command::new(env!("CARGO_BIN_EXE_msh"))
        .env("MSH_LOG_FILE", log_dir.path().join("debug.log"))
        .env("MSH_LOG", "debug")
        .envs(envs.iter().copied())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to execute msh");
    let pid = child.id();

    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(script.as_bytes())
        .expect("write script");
    let output = child.wait_with_output().expect("wait for msh");
    (output, pid)
}

fn run_msh(script: &str) -> (Output, u32) {
    run_msh_with(script, &[])
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn end_of_input_exits_with_success() {
    let (output, pid) = run_msh("");
    assert!(output.status.success(), "shell failed: {:?}", output);
    let out = stdout(&output);
    assert!(out.starts_with(&format!("Mini-shell started (PID: {pid})\n")));
    assert!(out.contains("minishell> "));
}

#[test]
fn foreground_output_reaches_stdout() {
    let (output, _) = run_msh("echo hello world\n");
    assert!(output.status.success(), "shell failed: {:?}", output);
    assert!(stdout(&output).contains("hello world\n"));
}

#[test]
fn exit_builtin_ends_session() {
    let (output, _) = run_msh("exit\necho after-exit\n");
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("Shell terminated\n"));
    assert!(!out.contains("after-exit"));
}

#[test]
fn pid_builtin_reports_shell_pid() {
    let (output, pid) = run_msh("pid\n");
    assert!(stdout(&output).contains(&format!("{pid} 0\n")));
}

#[test]
fn builtins_shadow_programs_of_the_same_name() {
    // /usr/bin/wait or a shell function would not print these notices
    let (output, _) = run_msh("wait\n");
    let out = stdout(&output);
    assert!(out.contains("Waiting for background jobs...\n"));
    assert!(out.contains("All background jobs finished\n"));
}

#[test]
fn jobs_on_empty_table() {
    let (output, _) = run_msh("jobs\n");
    assert!(stdout(&output).contains("jobs: there are no jobs\n"));
}

#[test]
fn wait_returns_once_background_job_exits() {
    let (output, _) = run_msh("sleep 0.1 &\nwait\njobs\n");
    assert!(output.status.success(), "shell failed: {:?}", output);
    let out = stdout(&output);

    let ack = out.find("[1] ").expect("background acknowledgment");
    let done = out
        .find("All background jobs finished")
        .expect("wait completion");
    let empty = out.find("jobs: there are no jobs").expect("empty jobs");
    assert!(ack < done && done < empty);
}

#[test]
fn completion_notice_appears_before_next_prompt() {
    let (output, _) = run_msh("sleep 0.1 &\nsleep 0.3\njobs\n");
    let out = stdout(&output);
    let notice = out.find("[1]+ Done\n").expect("completion notice");
    assert!(out[notice..].starts_with("[1]+ Done\nminishell> "));
    assert!(out.contains("jobs: there are no jobs"));
}

#[test]
fn jobs_lists_running_background_jobs() {
    let (output, _) = run_msh("sleep 1 &\nsleep 1 &\njobs\nwait\n");
    let out = stdout(&output);
    let lines: Vec<&str> = out
        .lines()
        .map(|line| line.trim_start_matches("minishell> "))
        .filter(|line| line.ends_with(" Running"))
        .collect();
    assert_eq!(lines.len(), 2, "unexpected listing: {out}");
    assert!(lines[0].starts_with("[1] "));
    assert!(lines[1].starts_with("[2] "));
}

#[test]
fn overflowing_the_job_table_does_not_crash() {
    let mut script = String::new();
    for _ in 0..11 {
        script.push_str("sleep 0.5 &\n");
    }
    script.push_str("jobs\nwait\njobs\n");

    let (output, _) = run_msh(&script);
    assert!(output.status.success(), "shell failed: {:?}", output);
    let out = stdout(&output);
    let err = stderr(&output);

    assert!(out.contains("[10] "));
    assert!(!out.contains("[11] "));
    assert!(err.contains("msh: too many background jobs (max 10)"));
    assert!(out.contains("jobs: there are no jobs"));
}

#[test]
fn job_capacity_follows_environment() {
    let (output, _) = run_msh_with("sleep 0.3 &\nsleep 0.3 &\nwait\n", &[("MSH_MAX_JOBS", "1")]);
    assert!(output.status.success(), "shell failed: {:?}", output);
    assert!(stderr(&output).contains("too many background jobs (max 1)"));
    assert!(!stdout(&output).contains("[2] "));
}

#[test]
fn unknown_program_is_reported_and_shell_continues() {
    let (output, _) = run_msh("msh-definitely-missing-program\njobs\n");
    assert!(output.status.success(), "shell failed: {:?}", output);
    assert!(stderr(&output).contains("msh: msh-definitely-missing-program:"));
    assert!(stdout(&output).contains("jobs: there are no jobs"));
}

#[test]
fn background_exec_failure_is_tracked_until_reaped() {
    let (output, _) = run_msh("msh-missing-background-program &\nsleep 0.2\njobs\n");
    assert!(output.status.success(), "shell failed: {:?}", output);
    let out = stdout(&output);
    let err = stderr(&output);

    let ack = out.find("[1] ").expect("background acknowledgment");
    let done = out.find("[1]+ Done\n").expect("completion notice");
    let empty = out.find("jobs: there are no jobs").expect("empty jobs");
    assert!(ack < done && done < empty);
    assert!(err.contains("msh: msh-missing-background-program: "));
}

#[test]
fn custom_prompt() {
    let (output, _) = run_msh_with("\n", &[("MSH_PROMPT", "$ ")]);
    let out = stdout(&output);
    assert_eq!(out.matches("$ ").count(), 2);
    assert!(!out.contains("minishell> "));
}
