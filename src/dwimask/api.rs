//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for mask generation, regardless of the UI driving it.
//!
//! The facade:
//! - **Normalizes inputs**: user paths become absolute against the invocation
//!   directory, and configuration defaults are merged under CLI options
//! - **Dispatches** to the algorithm in `commands/`
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It never prints and never exits. Pipeline logic lives in `commands/*.rs`.
//!
//! `MaskApi<R: CommandRunner>` is generic over how external tools are run:
//! - Production: `MaskApi<SystemRunner>`
//! - Testing: `MaskApi<RecordingRunner>`

use crate::commands::{self, ants::AntsRequest};
use crate::config::MaskConfig;
use crate::error::Result;
use crate::model::{GradientImport, TemplatePair, Verbosity};
use crate::runner::CommandRunner;
use crate::tools::ToolEnv;
use chrono::Utc;
use std::path::{Path, PathBuf};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options for the `ants` algorithm as the user gave them.
#[derive(Debug, Clone, Default)]
pub struct AntsOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub template: Option<TemplatePair>,
    pub gradient: GradientImport,
    pub scratch: Option<PathBuf>,
    pub nocleanup: bool,
    pub force: bool,
    pub nthreads: Option<u32>,
    pub verbosity: Verbosity,
    /// The command line as typed, recorded in the output header.
    pub command_line: String,
}

pub struct MaskApi<R: CommandRunner> {
    runner: R,
    env: ToolEnv,
    config: MaskConfig,
    working_dir: PathBuf,
}

impl<R: CommandRunner> MaskApi<R> {
    pub fn new(runner: R, env: ToolEnv, config: MaskConfig, working_dir: PathBuf) -> Self {
        Self {
            runner,
            env,
            config,
            working_dir,
        }
    }

    pub fn ants(&mut self, options: AntsOptions) -> Result<commands::CmdResult> {
        let request = self.ants_request(options);
        commands::ants::run(&mut self.runner, &self.env, &request)
    }

    /// Resolves user options against the working directory and config.
    pub fn ants_request(&self, options: AntsOptions) -> AntsRequest {
        let cwd = self.working_dir.as_path();
        let abs = |p: &Path| commands::ants::from_user(cwd, p);

        let gradient = match options.gradient {
            GradientImport::Embedded => GradientImport::Embedded,
            GradientImport::MRtrix(file) => GradientImport::MRtrix(abs(&file)),
            GradientImport::Fsl { bvecs, bvals } => GradientImport::Fsl {
                bvecs: abs(&bvecs),
                bvals: abs(&bvals),
            },
        };

        let scratch_root = options
            .scratch
            .as_deref()
            .or(self.config.scratch_dir.as_deref())
            .map(abs)
            .unwrap_or_else(|| self.working_dir.clone());

        AntsRequest {
            input: abs(&options.input),
            output: abs(&options.output),
            template: options.template.map(|t| TemplatePair {
                image: abs(&t.image),
                mask: abs(&t.mask),
            }),
            gradient,
            scratch_root,
            cleanup: self.config.cleanup && !options.nocleanup,
            force: options.force,
            nthreads: options.nthreads,
            verbosity: options.verbosity,
            tissue_classes: self.config.tissue_classes.clone(),
            command_history: format!(
                "{}  (dwimask version={}, {})",
                options.command_line,
                VERSION,
                Utc::now().format("%Y-%m-%d %H:%M:%S")
            ),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}
