//! setwafenv — print Bourne shell statements that configure the waf build tool.
//!
//! Usage: eval `setwafenv [list|unset] -i <root_install_dir> [-c <compiler> -t <ufid>]`

mod commands;

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use wafenv_core::HostInfo;
use wafenv_rules::{load_rules_toml, locate_rules};

use commands::setenv::Request;

const LONG_ABOUT: &str = "\
Configure the waf build tool by printing Bourne shell statements that set the
environment variables it understands. Run the output with 'eval'.

If '-c' is not given, the default compiler for this host is used ('list' shows
it). If '-t' is not given, the ufid 'dbg_mt_exc' is used.

'-i' names the root installation directory. The actual prefix is a
sub-directory named '<uplid>-<ufid>', so builds of several configurations can
share one root. Without '-i', a PREFIX previously exported by this tool is used
to recover the root.

Example:
  eval `setwafenv -c gcc-4.7.2 -t dbg_mt_exc -i ~/bde-install`";

#[derive(Parser, Debug)]
#[command(name = "setwafenv", version, about = "Configure the waf build environment", long_about = LONG_ABOUT)]
struct Cli {
    /// Optional command: list the available compilers, or unset all variables
    #[arg(value_enum, num_args = 0..)]
    actions: Vec<Action>,
    /// Compiler and version (e.g., gcc-4.7.2)
    #[arg(short, long)]
    compiler: Option<String>,
    /// Universal flag id (e.g., dbg_mt_exc)
    #[arg(short = 't', long)]
    ufid: Option<String>,
    /// Root installation directory
    #[arg(short, long)]
    install_dir: Option<PathBuf>,
    /// Comma-separated option keys whose evaluation is logged
    #[arg(short, long = "debug-opt-keys", value_delimiter = ',')]
    debug_opt_keys: Vec<String>,
    /// Force the uplid to this value, skipping host and compiler checks
    #[arg(long, alias = "force_uplid")]
    force_uplid: Option<String>,
    /// Rule database (default: lib/wafenv-rules.toml beside waf on PATH)
    #[arg(long, env = "BDE_WAF_RULES")]
    rules: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Action {
    /// List the default and available compilers
    List,
    /// Print statements that unset every variable
    Unset,
}

/// Rendered standard output and whether the run succeeded.
#[derive(Debug)]
struct Output {
    stdout: String,
    success: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let previous_prefix = std::env::var("PREFIX").ok();
    match run(&cli, previous_prefix, std::env::var_os("PATH"), HostInfo::probe) {
        Ok(output) => {
            print!("{}", output.stdout);
            if output.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = match verbose {
        0 if quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Execute one invocation. Nothing is printed here, so a failure never
/// leaves partial output.
///
/// `unset` wins over every other argument, `list` included.
fn run(
    cli: &Cli,
    previous_prefix: Option<String>,
    path_var: Option<OsString>,
    probe_host: fn() -> wafenv_core::Result<HostInfo>,
) -> anyhow::Result<Output> {
    if std::env::consts::OS == "windows" {
        bail!("this tool is currently not supported on windows");
    }

    if cli.actions.contains(&Action::Unset) {
        return Ok(Output {
            stdout: commands::unset::render(),
            success: true,
        });
    }

    let rules_path = locate_rules(cli.rules.as_deref(), path_var.as_deref())?;
    let rules = load_rules_toml(&rules_path)
        .with_context(|| format!("loading {}", rules_path.display()))?;

    if cli.actions.contains(&Action::List) {
        let probe = probe_host()?.probe_id()?;
        return Ok(Output {
            stdout: commands::list::render(&rules, &probe),
            success: false,
        });
    }

    let request = Request {
        compiler: cli.compiler.clone(),
        ufid: cli.ufid.clone(),
        install_dir: cli.install_dir.clone(),
        debug_keys: cli.debug_opt_keys.clone(),
        force_uplid: cli.force_uplid.clone(),
        previous_prefix,
    };
    let stdout = commands::setenv::render(&request, &rules, probe_host)?;
    Ok(Output {
        stdout,
        success: true,
    })
}
