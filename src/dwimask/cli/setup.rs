use crate::cli::args::Cli;
use clap::CommandFactory;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::ffi::OsString;

/// Returns the version string, including the git hash for non-release builds.
/// Format: "0.3.1" for releases, "0.3.1@abc1234" for dev builds
pub fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    static VERSION_STRING: Lazy<String> = Lazy::new(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, GIT_HASH)
        }
    });
    &VERSION_STRING
}

/// Rewrites MRtrix3-style single-dash long options (`-template`) into the
/// double-dash form clap parses. Only names clap knows are rewritten, so
/// short flag clusters like `-vv` and negative numbers pass through.
/// Nothing after a bare `--` is touched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let known = long_option_names(&Cli::command());
    let mut passthrough = false;

    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            if arg.to_str() == Some("--") {
                passthrough = true;
                return arg;
            }
            let rewritten = arg
                .to_str()
                .and_then(|s| s.strip_prefix('-'))
                .filter(|name| !name.starts_with('-') && known.contains(*name))
                .map(|name| OsString::from(format!("--{}", name)));
            rewritten.unwrap_or(arg)
        })
        .collect()
}

fn long_option_names(cmd: &clap::Command) -> HashSet<String> {
    let mut names: HashSet<String> = ["help", "version"].iter().map(|s| s.to_string()).collect();
    collect_long_names(cmd, &mut names);
    names
}

fn collect_long_names(cmd: &clap::Command, names: &mut HashSet<String>) {
    for arg in cmd.get_arguments() {
        if let Some(long) = arg.get_long() {
            if long.len() > 1 {
                names.insert(long.to_string());
            }
        }
    }
    for sub in cmd.get_subcommands() {
        collect_long_names(sub, names);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::Commands;
    use clap::Parser;
    use dwimask::model::{GradientImport, Verbosity};
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(normalize_args(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_single_dash_long_options_are_rewritten() {
        let out = normalize_args([
            "dwi2mask", "ants", "dwi.mif", "mask.mif", "-template", "t.nii", "m.nii",
            "-nocleanup",
        ]);
        let out: Vec<_> = out.iter().map(|s| s.to_str().unwrap()).collect();
        assert_eq!(
            out,
            vec![
                "dwi2mask", "ants", "dwi.mif", "mask.mif", "--template", "t.nii", "m.nii",
                "--nocleanup"
            ]
        );
    }

    #[test]
    fn test_short_clusters_and_unknown_words_pass_through() {
        let out = normalize_args(["dwi2mask", "-vv", "-1", "-bogus", "--force", "-h"]);
        let out: Vec<_> = out.iter().map(|s| s.to_str().unwrap()).collect();
        assert_eq!(out, vec!["dwi2mask", "-vv", "-1", "-bogus", "--force", "-h"]);
    }

    #[test]
    fn test_nothing_after_double_dash_is_rewritten() {
        let out = normalize_args(["dwi2mask", "ants", "--", "-force", "-template"]);
        let out: Vec<_> = out.iter().map(|s| s.to_str().unwrap()).collect();
        assert_eq!(out, vec!["dwi2mask", "ants", "--", "-force", "-template"]);
    }

    #[test]
    fn test_parse_mrtrix_style_command_line() {
        let cli = parse(&[
            "dwi2mask", "ants", "dwi.mif", "mask.mif", "-template", "T2.nii.gz",
            "T2_mask.nii.gz", "-fslgrad", "bvecs", "bvals", "-force", "-nthreads", "4",
            "-debug",
        ])
        .unwrap();

        assert!(cli.force);
        assert_eq!(cli.nthreads, Some(4));
        assert_eq!(cli.verbosity(), Verbosity::Debug);
        let Commands::Ants(args) = cli.command;
        assert_eq!(args.input, PathBuf::from("dwi.mif"));
        let template = args.template_pair().unwrap();
        assert_eq!(template.image, PathBuf::from("T2.nii.gz"));
        assert_eq!(template.mask, PathBuf::from("T2_mask.nii.gz"));
        assert_eq!(
            args.gradient(),
            GradientImport::Fsl {
                bvecs: PathBuf::from("bvecs"),
                bvals: PathBuf::from("bvals"),
            }
        );
    }

    #[test]
    fn test_template_is_optional_at_parse_time() {
        let cli = parse(&["dwi2mask", "ants", "dwi.mif", "mask.mif"]).unwrap();
        let Commands::Ants(args) = cli.command;
        assert_eq!(args.template_pair(), None);
        assert_eq!(args.gradient(), GradientImport::Embedded);
        assert!(!args.nocleanup);
    }

    #[test]
    fn test_template_needs_two_values() {
        assert!(parse(&["dwi2mask", "ants", "dwi.mif", "mask.mif", "-template", "T2.nii"]).is_err());
    }

    #[test]
    fn test_grad_and_fslgrad_conflict() {
        assert!(parse(&[
            "dwi2mask", "ants", "dwi.mif", "mask.mif", "-grad", "grad.b", "-fslgrad", "bvecs",
            "bvals",
        ])
        .is_err());
    }

    #[test]
    fn test_global_options_before_subcommand() {
        let cli = parse(&["dwi2mask", "-quiet", "ants", "dwi.mif", "mask.mif"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_version_string_starts_with_package_version() {
        assert!(get_version().starts_with(env!("CARGO_PKG_VERSION")));
    }
}
