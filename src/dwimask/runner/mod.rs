//! # External Command Execution
//!
//! Every MRtrix3 and ANTs call goes through the [`CommandRunner`] trait:
//! - Production: [`SystemRunner`] spawns real processes
//! - Testing: `RecordingRunner` records invocations and fakes their effects
//!
//! Runs are strictly sequential; each call blocks until the process exits
//! and a non-zero exit status is an error.

use crate::error::Result;
use std::borrow::Cow;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

#[cfg(test)]
pub mod recording;
pub mod system;

#[cfg(test)]
pub use recording::RecordingRunner;
pub use system::SystemRunner;

/// One external command: program, arguments, and extra environment.
///
/// Arguments are kept as `OsString` so paths reach the process byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub envs: Vec<(String, String)>,
}

impl Invocation {
    pub fn new<P: AsRef<Path>>(program: P) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            envs: Vec::new(),
        }
    }

    pub fn arg<S: Into<OsString>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn path_arg<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().as_os_str())
    }

    pub fn env<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Bare executable name, without its directory.
    pub fn program_name(&self) -> Cow<'_, str> {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
    }

    /// Shell-like rendering for logs and command history. Non-UTF-8 bytes
    /// are shown lossily; the process itself receives the raw arguments.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program_name())
            .chain(self.args.iter().map(|a| a.to_string_lossy()))
            .map(|word| quote(&word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

fn quote(word: &str) -> String {
    if !word.is_empty() && !word.chars().any(|c| c.is_whitespace() || "'\"$`\\".contains(c)) {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

pub trait CommandRunner {
    /// Runs `invocation` with `cwd` as working directory and waits for it.
    /// Tools communicate through files in `cwd`; their output is only logged.
    fn run(&mut self, invocation: &Invocation, cwd: &Path) -> Result<()>;
}
