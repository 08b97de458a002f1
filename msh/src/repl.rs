use crate::config::MAX_LINE_LEN;
use crate::parser::Command;
use crate::shell::Shell;
use anyhow::{Context as _, Result};
use msh_types::{Context, ExitStatus};
use std::io::{self, BufRead, Read, Write};
use tracing::{debug, info};

/// Outcome of reading one input line.
#[derive(Debug, PartialEq, Eq)]
enum LineRead {
    Eof,
    /// `buf` holds the line without its terminator.
    Line,
    /// The line exceeded `MAX_LINE_LEN` and was discarded up to its newline.
    TooLong,
}

/// Reads one line into `buf`, never buffering more than `MAX_LINE_LEN`
/// bytes plus a `\r\n` terminator.
fn read_line<R: BufRead>(input: &mut R, buf: &mut Vec<u8>) -> io::Result<LineRead> {
    buf.clear();
    let limit = MAX_LINE_LEN as u64 + 2;
    let read = input.by_ref().take(limit).read_until(b'\n', buf)?;
    if read == 0 {
        return Ok(LineRead::Eof);
    }

    let terminated = buf.last() == Some(&b'\n');
    if !terminated && read as u64 == limit {
        input.skip_until(b'\n')?;
        buf.clear();
        return Ok(LineRead::TooLong);
    }

    while matches!(buf.last(), Some(b'\n' | b'\r')) {
        buf.pop();
    }
    if buf.len() > MAX_LINE_LEN {
        buf.clear();
        return Ok(LineRead::TooLong);
    }
    Ok(LineRead::Line)
}

pub struct Repl<'a> {
    pub shell: &'a mut Shell,
}

impl<'a> Repl<'a> {
    pub fn new(shell: &'a mut Shell) -> Self {
        Repl { shell }
    }

    /// Reads and runs commands until end of input or `exit`.
    ///
    /// Finished background jobs are reported only at the top of each
    /// iteration, before the prompt. Returns the shell's exit code; an `Err`
    /// means a fatal error ended the session.
    pub fn run<R, W, E>(&mut self, mut input: R, out: &mut W, err: &mut E) -> Result<i32>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        writeln!(out, "Mini-shell started (PID: {})", self.shell.pid)?;
        writeln!(out, "Type 'exit' to quit")?;
        writeln!(out)?;

        let mut buf = Vec::new();
        loop {
            for done in self.shell.reap_jobs().context("failed to reap background jobs")? {
                writeln!(out, "{done}")?;
            }

            write!(out, "{}", self.shell.config.prompt())?;
            out.flush()?;

            let line = match read_line(&mut input, &mut buf).context("failed to read input")? {
                LineRead::Eof => {
                    info!("end of input");
                    return Ok(0);
                }
                LineRead::TooLong => {
                    writeln!(err, "msh: input line too long (max {MAX_LINE_LEN} bytes)")?;
                    err.flush()?;
                    continue;
                }
                LineRead::Line => String::from_utf8_lossy(&buf),
            };
            let Some(cmd) = Command::parse(&line) else {
                continue;
            };
            debug!("read command {:?}", cmd);

            let mut ctx = Context::new(self.shell.pid, &mut *out, &mut *err);
            match self.shell.eval(&mut ctx, &cmd) {
                Ok(status) => debug!("{} -> {:?}", cmd.name(), status),
                Err(e) if e.is_fatal() => {
                    return Err(e).with_context(|| format!("failed to run {}", cmd.name()));
                }
                Err(e) => {
                    debug!("{} failed: {}", cmd.name(), e);
                    ctx.write_stderr(&format!("msh: {e}"))?;
                }
            }

            if let Some(ExitStatus::ExitedWith(code)) = self.shell.exited {
                return Ok(code);
            }
        }
    }
}
