// Browser Invocation
// One call of the external browser tool, built per operation and not retained

use std::fmt;

use super::profile::ConnectionDescriptor;

/// Default browser tool: `python illdb_browser.py`
pub const DEFAULT_PROGRAM: &str = "python";
pub const DEFAULT_PROGRAM_ARGS: &[&str] = &["illdb_browser.py"];

/// The external executable plus any fixed leading arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserCommand {
    program: String,
    args: Vec<String>,
}

impl BrowserCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Parse a whitespace separated command line (`python illdb_browser.py`)
    ///
    /// Returns None when the line holds no program.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    /// Program path taken verbatim when explicit arguments are given
    ///
    /// Lets a path containing spaces (`/opt/my tools/python3`) be used. With
    /// no arguments the program is split like `parse`.
    pub fn from_parts(program: &str, args: Vec<String>) -> Option<Self> {
        if args.is_empty() {
            return Self::parse(program);
        }
        if program.trim().is_empty() {
            return None;
        }
        Some(Self::new(program, args))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Default for BrowserCommand {
    fn default() -> Self {
        Self::new(
            DEFAULT_PROGRAM,
            DEFAULT_PROGRAM_ARGS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

/// Operation verb understood by the browser tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Set,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Set => "set",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built browser call
///
/// Argument order is fixed:
/// `[program args] --bucket=<bucket> --host <h> --port <p> -u <user> -p <pwd> <verb> <operands>`
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    command: &'a BrowserCommand,
    bucket: &'a str,
    descriptor: &'a ConnectionDescriptor,
    verb: Verb,
    operands: Vec<&'a str>,
}

impl<'a> Invocation<'a> {
    pub fn get(
        command: &'a BrowserCommand,
        bucket: &'a str,
        descriptor: &'a ConnectionDescriptor,
        key: &'a str,
    ) -> Self {
        Self {
            command,
            bucket,
            descriptor,
            verb: Verb::Get,
            operands: vec![key],
        }
    }

    pub fn set(
        command: &'a BrowserCommand,
        bucket: &'a str,
        descriptor: &'a ConnectionDescriptor,
        key: &'a str,
        value: &'a str,
    ) -> Self {
        Self {
            command,
            bucket,
            descriptor,
            verb: Verb::Set,
            operands: vec![key, value],
        }
    }

    pub fn program(&self) -> &str {
        self.command.program()
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn bucket(&self) -> &str {
        self.bucket
    }

    /// Arguments after the program; each operand stays one discrete argument
    pub fn args(&self) -> Vec<String> {
        let mut args = self.command.args().to_vec();
        args.push(format!("--bucket={}", self.bucket));
        args.extend(self.descriptor.to_args());
        args.push(self.verb.as_str().to_string());
        args.extend(self.operands.iter().map(|s| s.to_string()));
        args
    }
}

// Trace form; password masked, operands shown quoted
impl fmt::Display for Invocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command.program())?;
        for arg in self.command.args() {
            write!(f, " {}", arg)?;
        }
        write!(f, " --bucket={} {} {}", self.bucket, self.descriptor, self.verb)?;
        for operand in &self.operands {
            write!(f, " {:?}", operand)?;
        }
        Ok(())
    }
}
