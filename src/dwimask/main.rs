use dwimask::api::{AntsOptions, MaskApi};
use dwimask::config::MaskConfig;
use dwimask::error::Result;
use dwimask::logging::init_logging;
use dwimask::model::Verbosity;
use dwimask::runner::SystemRunner;
use dwimask::tools::ToolEnv;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

mod cli;
use cli::args::{AntsArgs, Cli, Commands};
use cli::print::{print_error, print_messages};
use cli::setup::normalize_args;

fn main() {
    if let Err(e) = run() {
        print_error(&e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: MaskApi<SystemRunner>,
    verbosity: Verbosity,
    force: bool,
    nthreads: Option<u32>,
    command_line: String,
}

fn run() -> Result<()> {
    let raw: Vec<OsString> = std::env::args_os().collect();
    let command_line = raw
        .iter()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");
    let cli = Cli::parse_from(normalize_args(raw));
    let verbosity = cli.verbosity();
    init_logging(verbosity);

    let mut ctx = init_context(&cli, verbosity, command_line)?;

    match cli.command {
        Commands::Ants(args) => handle_ants(&mut ctx, args),
    }
}

fn init_context(cli: &Cli, verbosity: Verbosity, command_line: String) -> Result<AppContext> {
    let config = MaskConfig::load(cli.config.as_deref())?;
    let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let api = MaskApi::new(SystemRunner::new(), ToolEnv::from_process(), config, working_dir);

    Ok(AppContext {
        api,
        verbosity,
        force: cli.force,
        nthreads: cli.nthreads,
        command_line,
    })
}

fn handle_ants(ctx: &mut AppContext, args: AntsArgs) -> Result<()> {
    let options = AntsOptions {
        template: args.template_pair(),
        gradient: args.gradient(),
        input: args.input,
        output: args.output,
        scratch: args.scratch,
        nocleanup: args.nocleanup,
        force: ctx.force,
        nthreads: ctx.nthreads,
        verbosity: ctx.verbosity,
        command_line: ctx.command_line.clone(),
    };

    let result = ctx.api.ants(options)?;
    print_messages(&result.messages, ctx.verbosity);
    Ok(())
}
