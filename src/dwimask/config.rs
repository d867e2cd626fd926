//! # Configuration
//!
//! Settings are loaded with [`confique`], layering in priority order:
//! 1. **Command line**: `-scratch`, `-nocleanup` (applied by the API layer)
//! 2. **Environment variables**: `DWI2MASK_SCRATCH`, `DWI2MASK_CLEANUP`,
//!    `DWI2MASK_TISSUE_CLASSES`
//! 3. **Config file**: `-config <file>`, or `dwi2mask/config.toml` in the OS
//!    config directory (via `directories`)
//! 4. **Compiled defaults**
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `scratch_dir` | working directory | Where scratch directories are created |
//! | `cleanup` | `true` | Delete the scratch directory after a successful run |
//! | `tissue_classes` | `3x3x2x1` | `-c` argument of antsBrainExtraction.sh |

use crate::error::Result;
use confique::Config;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.toml";

#[derive(Config, Debug, Clone, PartialEq, Eq)]
pub struct MaskConfig {
    /// Parent directory for scratch directories.
    #[config(env = "DWI2MASK_SCRATCH")]
    pub scratch_dir: Option<PathBuf>,

    /// Delete intermediate files once the mask has been written.
    #[config(default = true)]
    #[config(env = "DWI2MASK_CLEANUP")]
    pub cleanup: bool,

    /// Tissue classification passed to antsBrainExtraction.sh via `-c`.
    #[config(default = "3x3x2x1")]
    #[config(env = "DWI2MASK_TISSUE_CLASSES")]
    pub tissue_classes: String,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            scratch_dir: None,
            cleanup: true,
            tissue_classes: "3x3x2x1".to_string(),
        }
    }
}

impl MaskConfig {
    /// Loads from `file` if given, otherwise from the default location.
    /// A missing file is not an error.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file.map(Path::to_path_buf).or_else(Self::default_path) {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "mrtrix", "dwi2mask")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    }
}
