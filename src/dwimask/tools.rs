//! Locating the external executables the pipeline shells out to.
//!
//! The process environment is captured once into a [`ToolEnv`] so that
//! discovery and the `ANTSPATH` check are plain functions of that snapshot.

use crate::error::{MaskError, Result};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const MRCONVERT: &str = "mrconvert";
pub const DWIEXTRACT: &str = "dwiextract";
pub const MRMATH: &str = "mrmath";
pub const MRINFO: &str = "mrinfo";
pub const ANTS_BRAIN_EXTRACTION: &str = "antsBrainExtraction.sh";

#[derive(Debug, Clone, Default)]
pub struct ToolEnv {
    pub path: Option<OsString>,
    pub ants_path: Option<String>,
}

impl ToolEnv {
    pub fn from_process() -> Self {
        Self {
            path: env::var_os("PATH"),
            ants_path: env::var("ANTSPATH").ok(),
        }
    }

    /// ANTSPATH must be present and non-empty for ANTs scripts to find
    /// their own binaries.
    pub fn ants_path(&self) -> Result<&str> {
        match self.ants_path.as_deref() {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(MaskError::AntsPathUnset),
        }
    }

    pub fn find_executable(&self, name: &str) -> Option<PathBuf> {
        let path = self.path.as_ref()?;
        env::split_paths(path)
            .map(|dir| dir.join(name))
            .find(|candidate| is_executable(candidate))
    }

    /// Resolves every tool the ants algorithm needs, failing on the first
    /// one that is missing.
    pub fn resolve_toolset(&self) -> Result<Toolset> {
        let mrtrix = |name: &str| {
            self.find_executable(name)
                .ok_or_else(|| MaskError::ExecutableNotFound(name.to_string(), "MRtrix3"))
        };

        let ants_brain_extraction = self
            .find_executable(ANTS_BRAIN_EXTRACTION)
            .or_else(|| {
                let dir = self.ants_path.as_deref()?;
                let candidate = Path::new(dir).join(ANTS_BRAIN_EXTRACTION);
                is_executable(&candidate).then_some(candidate)
            })
            .ok_or_else(|| {
                MaskError::ExecutableNotFound(ANTS_BRAIN_EXTRACTION.to_string(), "ANTs")
            })?;

        Ok(Toolset {
            mrconvert: mrtrix(MRCONVERT)?,
            dwiextract: mrtrix(DWIEXTRACT)?,
            mrmath: mrtrix(MRMATH)?,
            mrinfo: mrtrix(MRINFO)?,
            ants_brain_extraction,
        })
    }
}

/// Absolute locations of the executables used by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolset {
    pub mrconvert: PathBuf,
    pub dwiextract: PathBuf,
    pub mrmath: PathBuf,
    pub mrinfo: PathBuf,
    pub ants_brain_extraction: PathBuf,
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn install(dir: &Path, name: &str) {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    fn env_with(dir: &Path, ants_path: Option<&str>) -> ToolEnv {
        ToolEnv {
            path: Some(dir.as_os_str().to_owned()),
            ants_path: ants_path.map(str::to_string),
        }
    }

    #[test]
    fn test_ants_path_unset_is_an_error() {
        let env = ToolEnv::default();
        assert!(matches!(env.ants_path(), Err(MaskError::AntsPathUnset)));
    }

    #[test]
    fn test_ants_path_blank_is_an_error() {
        let env = ToolEnv {
            ants_path: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(env.ants_path(), Err(MaskError::AntsPathUnset)));
    }

    #[test]
    fn test_find_executable_on_path() {
        let dir = tempfile::tempdir().unwrap();
        install(dir.path(), MRCONVERT);
        let env = env_with(dir.path(), None);
        assert_eq!(
            env.find_executable(MRCONVERT),
            Some(dir.path().join(MRCONVERT))
        );
        assert_eq!(env.find_executable(MRMATH), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MRINFO), "").unwrap();
        let env = env_with(dir.path(), None);
        assert_eq!(env.find_executable(MRINFO), None);
    }

    #[test]
    fn test_resolve_toolset_reports_missing_tool() {
        let dir = tempfile::tempdir().unwrap();
        install(dir.path(), MRCONVERT);
        install(dir.path(), ANTS_BRAIN_EXTRACTION);
        let env = env_with(dir.path(), Some("/opt/ants"));

        let err = env.resolve_toolset().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to find command \"dwiextract\"; please check MRtrix3 installation"
        );
    }

    #[test]
    fn test_ants_script_falls_back_to_antspath() {
        let bin = tempfile::tempdir().unwrap();
        let ants = tempfile::tempdir().unwrap();
        for name in [MRCONVERT, DWIEXTRACT, MRMATH, MRINFO] {
            install(bin.path(), name);
        }
        install(ants.path(), ANTS_BRAIN_EXTRACTION);
        let env = env_with(bin.path(), ants.path().to_str());

        let tools = env.resolve_toolset().unwrap();
        assert_eq!(
            tools.ants_brain_extraction,
            ants.path().join(ANTS_BRAIN_EXTRACTION)
        );
        assert_eq!(tools.mrinfo, bin.path().join(MRINFO));
    }

    #[test]
    fn test_missing_ants_script() {
        let bin = tempfile::tempdir().unwrap();
        for name in [MRCONVERT, DWIEXTRACT, MRMATH, MRINFO] {
            install(bin.path(), name);
        }
        let env = env_with(bin.path(), Some("/nonexistent/ants"));
        let err = env.resolve_toolset().unwrap_err();
        assert!(err.to_string().contains("antsBrainExtraction.sh"));
        assert!(err.to_string().contains("ANTs installation"));
    }
}
