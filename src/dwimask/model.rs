use std::ffi::OsString;
use std::path::PathBuf;
use tracing::Level;

/// How chatty the run is, both for our own log output and for the flags
/// forwarded to MRtrix3 and ANTs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Info,
    Debug,
}

impl Verbosity {
    pub fn from_flags(quiet: bool, info: bool, debug: bool, verbose: u8) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug || verbose >= 2 {
            Verbosity::Debug
        } else if info || verbose == 1 {
            Verbosity::Info
        } else {
            Verbosity::Normal
        }
    }

    /// Flag appended to every MRtrix3 command.
    pub fn mrtrix_flag(&self) -> &'static str {
        match self {
            Verbosity::Quiet | Verbosity::Normal => "-quiet",
            Verbosity::Info => "-info",
            Verbosity::Debug => "-debug",
        }
    }

    pub fn log_level(&self) -> Level {
        match self {
            Verbosity::Quiet => Level::WARN,
            Verbosity::Normal => Level::INFO,
            Verbosity::Info => Level::DEBUG,
            Verbosity::Debug => Level::TRACE,
        }
    }
}

/// Template image and its brain mask, handed to antsBrainExtraction.sh.
/// The template image should be T2-weighted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePair {
    pub image: PathBuf,
    pub mask: PathBuf,
}

/// Gradient table to embed while importing the DWI series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GradientImport {
    /// Use whatever the input header already carries.
    #[default]
    Embedded,
    /// MRtrix3 format scheme (`-grad`).
    MRtrix(PathBuf),
    /// FSL bvecs/bvals pair (`-fslgrad`).
    Fsl { bvecs: PathBuf, bvals: PathBuf },
}

impl GradientImport {
    pub fn mrconvert_args(&self) -> Vec<OsString> {
        match self {
            GradientImport::Embedded => Vec::new(),
            GradientImport::MRtrix(file) => vec!["-grad".into(), file.into()],
            GradientImport::Fsl { bvecs, bvals } => {
                vec!["-fslgrad".into(), bvecs.into(), bvals.into()]
            }
        }
    }
}
