/// Token that requests background execution when it ends a line.
pub const BACKGROUND_MARKER: &str = "&";

/// A single input line split into an argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub argv: Vec<String>,
    pub background: bool,
}

impl Command {
    /// Splits `line` on runs of whitespace and strips a trailing `&`.
    ///
    /// Returns `None` when nothing is left to run. No quoting, escaping or
    /// expansion is performed.
    pub fn parse(line: &str) -> Option<Self> {
        let mut argv: Vec<String> = line.split_whitespace().map(str::to_string).collect();

        let background = argv.last().is_some_and(|last| last == BACKGROUND_MARKER);
        if background {
            argv.pop();
        }

        if argv.is_empty() {
            return None;
        }
        Some(Command { argv, background })
    }

    pub fn name(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }
}
