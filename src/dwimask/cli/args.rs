use crate::cli::setup::get_version;
use clap::{ArgAction, Args, Parser, Subcommand};
use dwimask::model::{GradientImport, TemplatePair, Verbosity};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dwi2mask", bin_name = "dwi2mask", version = get_version())]
#[command(about = "Generate a binary mask from DWI data", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Do not display information messages or progress status
    #[arg(long, global = true, help_heading = "Standard options")]
    pub quiet: bool,

    /// Display information messages
    #[arg(long, global = true, help_heading = "Standard options")]
    pub info: bool,

    /// Display debugging messages
    #[arg(long, global = true, help_heading = "Standard options")]
    pub debug: bool,

    /// Increase verbosity (repeat for debugging output)
    #[arg(short, long, action = ArgAction::Count, global = true, help_heading = "Standard options")]
    pub verbose: u8,

    /// Force overwrite of output files
    #[arg(long, global = true, help_heading = "Standard options")]
    pub force: bool,

    /// Number of threads for MRtrix3 commands and ANTs
    #[arg(long, global = true, value_name = "number", help_heading = "Standard options")]
    pub nthreads: Option<u32>,

    /// Configuration file (defaults to dwi2mask/config.toml in the user config directory)
    #[arg(long, global = true, value_name = "file", help_heading = "Standard options")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.info, self.debug, self.verbose)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Use ANTs Brain Extraction to derive a DWI brain mask
    Ants(AntsArgs),
}

#[derive(Args, Debug)]
pub struct AntsArgs {
    /// The input DWI series
    pub input: PathBuf,

    /// The output mask image
    pub output: PathBuf,

    /// Provide the template image and corresponding mask for
    /// antsBrainExtraction.sh to use; the template image should be T2-weighted.
    #[arg(
        long,
        num_args = 2,
        value_names = ["TemplateImage", "MaskImage"],
        help_heading = "Options specific to the \"ants\" algorithm"
    )]
    pub template: Option<Vec<PathBuf>>,

    /// Gradient scheme in MRtrix3 format
    #[arg(long, value_name = "file", conflicts_with = "fslgrad", help_heading = "DW gradient table import")]
    pub grad: Option<PathBuf>,

    /// Gradient scheme in FSL bvecs/bvals format
    #[arg(
        long,
        num_args = 2,
        value_names = ["bvecs", "bvals"],
        help_heading = "DW gradient table import"
    )]
    pub fslgrad: Option<Vec<PathBuf>>,

    /// Parent directory for the scratch directory
    #[arg(long, value_name = "dir")]
    pub scratch: Option<PathBuf>,

    /// Keep the scratch directory and ANTs intermediates
    #[arg(long)]
    pub nocleanup: bool,
}

impl AntsArgs {
    pub fn template_pair(&self) -> Option<TemplatePair> {
        match self.template.as_deref() {
            Some([image, mask]) => Some(TemplatePair {
                image: image.clone(),
                mask: mask.clone(),
            }),
            _ => None,
        }
    }

    pub fn gradient(&self) -> GradientImport {
        if let Some(file) = &self.grad {
            return GradientImport::MRtrix(file.clone());
        }
        match self.fslgrad.as_deref() {
            Some([bvecs, bvals]) => GradientImport::Fsl {
                bvecs: bvecs.clone(),
                bvals: bvals.clone(),
            },
            _ => GradientImport::Embedded,
        }
    }
}
