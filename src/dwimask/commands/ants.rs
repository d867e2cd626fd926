//! The `ants` mask algorithm: mean b=0 image through antsBrainExtraction.sh.
//!
//! Order of operations:
//! 1. Preflight: template option, output overwrite, `ANTSPATH`, executables.
//!    Nothing is spawned until all of these pass.
//! 2. Staging into a scratch directory (DWI series, template image and mask).
//! 3. Mean b=0 extraction, brain extraction, and conversion of the ANTs mask
//!    to the user's output with strides matching the input series.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MaskError, Result};
use crate::header::{ImageHeader, Strides, CANONICAL_STRIDES};
use crate::model::{GradientImport, TemplatePair, Verbosity};
use crate::runner::{CommandRunner, Invocation};
use crate::scratch::ScratchDir;
use crate::tools::{ToolEnv, Toolset};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const INPUT_IMAGE: &str = "input.mif";
const TEMPLATE_IMAGE: &str = "template_image.nii";
const TEMPLATE_MASK: &str = "template_mask.nii";
const BZERO_SERIES: &str = "bzero_series.mif";
const BZERO_MEAN: &str = "bzero_mean.mif";
const BZERO_IMAGE: &str = "bzero.nii";
const HEADER_JSON: &str = "header.json";
const ANTS_OUTPUT_PREFIX: &str = "out";
pub const ANTS_MASK_OUTPUT: &str = "outBrainExtractionMask.nii.gz";

const ITK_THREADS_VAR: &str = "ITK_GLOBAL_DEFAULT_NUMBER_OF_THREADS";

/// Fully resolved request: paths are absolute and configuration defaults
/// have already been merged in.
#[derive(Debug, Clone)]
pub struct AntsRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub template: Option<TemplatePair>,
    pub gradient: GradientImport,
    pub scratch_root: PathBuf,
    pub cleanup: bool,
    pub force: bool,
    pub nthreads: Option<u32>,
    pub verbosity: Verbosity,
    pub tissue_classes: String,
    pub command_history: String,
}

pub fn run<R: CommandRunner>(
    runner: &mut R,
    env: &ToolEnv,
    request: &AntsRequest,
) -> Result<CmdResult> {
    let (tools, template) = preflight(env, request)?;
    let scratch = ScratchDir::create(&request.scratch_root)?;

    let mut pipeline = Pipeline {
        runner,
        tools: &tools,
        scratch: &scratch,
        request,
        template,
    };
    let outcome = pipeline.get_inputs().and_then(|()| pipeline.execute());

    match outcome {
        Ok(strides) => {
            let retained = scratch.finish(request.cleanup)?;
            let mut result = CmdResult::default()
                .with_output(request.output.clone())
                .with_strides(strides.clone())
                .with_retained_scratch(retained.clone());
            result.add_message(CmdMessage::success(format!(
                "Brain mask written to {}",
                request.output.display()
            )));
            result.add_message(CmdMessage::info(format!("Output strides: {}", strides)));
            if let Some(path) = retained {
                result.add_message(CmdMessage::warning(format!(
                    "Scratch directory retained; location: {}",
                    path.display()
                )));
            }
            Ok(result)
        }
        Err(e) => {
            let path = scratch.retain();
            warn!("Scratch directory retained; location: {}", path.display());
            Err(e)
        }
    }
}

/// Checks every precondition that can be verified without running a tool.
pub fn preflight<'a>(
    env: &ToolEnv,
    request: &'a AntsRequest,
) -> Result<(Toolset, &'a TemplatePair)> {
    let template = request
        .template
        .as_ref()
        .ok_or(MaskError::MissingTemplate)?;

    if request.output.exists() && !request.force {
        return Err(MaskError::OutputExists(request.output.clone()));
    }

    env.ants_path()?;
    let tools = env.resolve_toolset()?;
    Ok((tools, template))
}

struct Pipeline<'a, R: CommandRunner> {
    runner: &'a mut R,
    tools: &'a Toolset,
    scratch: &'a ScratchDir,
    request: &'a AntsRequest,
    template: &'a TemplatePair,
}

impl<R: CommandRunner> Pipeline<'_, R> {
    fn run(&mut self, invocation: Invocation) -> Result<()> {
        self.runner.run(&invocation, self.scratch.path())
    }

    /// Adds the options every MRtrix3 command shares.
    fn run_mrtrix(&mut self, invocation: Invocation) -> Result<()> {
        let mut invocation = invocation.arg(self.request.verbosity.mrtrix_flag());
        if let Some(n) = self.request.nthreads {
            invocation = invocation.args(["-nthreads".to_string(), n.to_string()]);
        }
        self.run(invocation)
    }

    fn get_inputs(&mut self) -> Result<()> {
        info!("Importing input data into scratch directory");
        let input = Invocation::new(&self.tools.mrconvert)
            .path_arg(&self.request.input)
            .arg(INPUT_IMAGE)
            .args(self.request.gradient.mrconvert_args());
        self.run_mrtrix(input)?;

        let template = self.template;
        for (source, staged) in [
            (&template.image, TEMPLATE_IMAGE),
            (&template.mask, TEMPLATE_MASK),
        ] {
            let convert = Invocation::new(&self.tools.mrconvert)
                .path_arg(source)
                .arg(staged)
                .args(["-strides", CANONICAL_STRIDES]);
            self.run_mrtrix(convert)?;
        }
        Ok(())
    }

    fn execute(&mut self) -> Result<Strides> {
        info!("Computing mean b=0 image");
        let extract = Invocation::new(&self.tools.dwiextract)
            .arg(INPUT_IMAGE)
            .arg("-bzero")
            .arg(BZERO_SERIES);
        self.run_mrtrix(extract)?;

        let mean = Invocation::new(&self.tools.mrmath)
            .args([BZERO_SERIES, "mean", BZERO_MEAN, "-axis", "3"]);
        self.run_mrtrix(mean)?;

        let bzero = Invocation::new(&self.tools.mrconvert)
            .args([BZERO_MEAN, BZERO_IMAGE, "-strides", CANONICAL_STRIDES]);
        self.run_mrtrix(bzero)?;

        info!("Running ANTs brain extraction");
        let brain_extraction = self.brain_extraction();
        self.run(brain_extraction)?;

        let mask = self.scratch.to_scratch(ANTS_MASK_OUTPUT);
        if !mask.is_file() {
            return Err(MaskError::MissingOutput(
                mask,
                crate::tools::ANTS_BRAIN_EXTRACTION.to_string(),
            ));
        }

        let strides = self.input_strides()?;
        info!(strides = %strides, "Writing output mask");

        let mut finalize = Invocation::new(&self.tools.mrconvert)
            .arg(ANTS_MASK_OUTPUT)
            .path_arg(&self.request.output)
            .args(["-strides".to_string(), strides.to_string()])
            .arg("-copy_properties")
            .path_arg(&self.request.input)
            .args(["-append_property", "command_history"])
            .arg(self.request.command_history.clone());
        if self.request.force {
            finalize = finalize.arg("-force");
        }
        self.run_mrtrix(finalize)?;

        Ok(strides)
    }

    fn brain_extraction(&self) -> Invocation {
        let mut invocation = Invocation::new(&self.tools.ants_brain_extraction)
            .args(["-d", "3"])
            .arg("-c")
            .arg(self.request.tissue_classes.clone())
            .args(["-a", BZERO_IMAGE])
            .args(["-e", TEMPLATE_IMAGE])
            .args(["-m", TEMPLATE_MASK])
            .args(["-o", ANTS_OUTPUT_PREFIX]);
        if !self.request.cleanup {
            invocation = invocation.args(["-k", "1"]);
        }
        if self.request.verbosity >= Verbosity::Debug {
            invocation = invocation.arg("-z");
        }
        if let Some(n) = self.request.nthreads {
            invocation = invocation.env(ITK_THREADS_VAR, n.to_string());
        }
        invocation
    }

    fn input_strides(&mut self) -> Result<Strides> {
        let mrinfo = Invocation::new(&self.tools.mrinfo)
            .arg(INPUT_IMAGE)
            .args(["-json_all", HEADER_JSON]);
        self.run_mrtrix(mrinfo)?;
        let header = ImageHeader::load(self.scratch.to_scratch(HEADER_JSON))?;
        header.spatial_strides()
    }
}

/// Absolute form of a user-supplied path, relative to the invocation
/// directory.
pub fn from_user(working_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    }
}
