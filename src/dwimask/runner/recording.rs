//! In-memory [`CommandRunner`] for tests: nothing is spawned, every
//! invocation is recorded, and per-program responders can fake the files a
//! real tool would have written.

use crate::error::{MaskError, Result};
use crate::runner::{CommandRunner, Invocation};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

type Responder = Box<dyn FnMut(&Invocation, &Path) -> Result<()>>;

#[derive(Default)]
pub struct RecordingRunner {
    invocations: Vec<(Invocation, PathBuf)>,
    responders: HashMap<String, Responder>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a responder for the program with this bare name.
    pub fn respond<F>(mut self, program: &str, responder: F) -> Self
    where
        F: FnMut(&Invocation, &Path) -> Result<()> + 'static,
    {
        self.responders
            .insert(program.to_string(), Box::new(responder));
        self
    }

    /// Makes every call to `program` fail with the given stderr.
    pub fn fail(self, program: &str, stderr: &str) -> Self {
        let stderr = stderr.to_string();
        self.respond(program, move |inv, _| {
            Err(MaskError::CommandFailed {
                command: inv.command_line(),
                status: "exit status: 1".to_string(),
                stderr: stderr.clone(),
            })
        })
    }

    pub fn invocations(&self) -> Vec<&Invocation> {
        self.invocations.iter().map(|(inv, _)| inv).collect()
    }

    pub fn programs(&self) -> Vec<String> {
        self.invocations
            .iter()
            .map(|(inv, _)| inv.program_name().into_owned())
            .collect()
    }

    pub fn find(&self, program: &str) -> Option<&Invocation> {
        self.invocations
            .iter()
            .map(|(inv, _)| inv)
            .find(|inv| inv.program_name() == program)
    }

    pub fn working_dirs(&self) -> Vec<&Path> {
        self.invocations.iter().map(|(_, cwd)| cwd.as_path()).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, invocation: &Invocation, cwd: &Path) -> Result<()> {
        self.invocations
            .push((invocation.clone(), cwd.to_path_buf()));
        let name = invocation.program_name();
        match self.responders.get_mut(name.as_ref()) {
            Some(responder) => responder(invocation, cwd),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut runner = RecordingRunner::new();
        let cwd = Path::new("/tmp");
        runner.run(&Invocation::new("/usr/bin/mrconvert"), cwd).unwrap();
        runner.run(&Invocation::new("mrmath"), cwd).unwrap();

        assert_eq!(runner.programs(), vec!["mrconvert", "mrmath"]);
        assert_eq!(runner.working_dirs(), vec![cwd, cwd]);
    }

    #[test]
    fn test_responder_writes_into_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = RecordingRunner::new().respond("mrinfo", |inv, cwd| {
            std::fs::write(cwd.join(&inv.args[1]), "{}")?;
            Ok(())
        });
        let inv = Invocation::new("/usr/bin/mrinfo").args(["-json_all", "header.json"]);
        runner.run(&inv, dir.path()).unwrap();
        assert!(dir.path().join("header.json").exists());
    }

    #[test]
    fn test_fail_produces_command_error() {
        let mut runner = RecordingRunner::new().fail("dwiextract", "no b=0 volumes");
        let err = runner
            .run(&Invocation::new("dwiextract"), Path::new("."))
            .unwrap_err();
        assert!(err.to_string().contains("no b=0 volumes"));
        assert_eq!(runner.programs(), vec!["dwiextract"]);
    }
}
