#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]

mod args;
mod config;
mod error;
mod logging;
mod query;

use args::Args;
use config::Config;
use datatype_query_api::{
    DatatypeRegistry, DescriptorLocator, DescriptorRegistry, ProcessLauncher, ToolResolver,
};
use error::CliError;
use std::env;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{debug, warn};

fn main() -> ExitCode {
    let args: Args = argh::from_env();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let settings = Config::load(args.config.as_deref())?;
    logging::init(&config::log_filter(
        args.verbose,
        env::var(config::LOG_ENV).ok(),
        &settings,
    ))?;

    let descriptor_dir = config::descriptor_dir(
        args.descriptors.clone(),
        env::var_os(config::DESCRIPTORS_ENV),
        &settings,
        config::default_descriptor_dir(),
    )
    .ok_or(CliError::NoDescriptorDirectory)?;
    debug!(directory = %descriptor_dir.display(), "using descriptor directory");

    let registry = DescriptorRegistry::load(&descriptor_dir).unwrap_or_else(|error| {
        warn!(%error, "no datatypes loaded");
        DescriptorRegistry::default()
    });
    let descriptor = registry.obtain(&args.file)?;
    let resolver = ToolResolver::new(DescriptorLocator::new(descriptor_dir));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", query::describe(&args.file, &descriptor))?;

    match args.requested_mode() {
        Some(mode) => {
            let launcher = match &settings.script_host {
                Some(host) => ProcessLauncher::new().with_script_host(host.as_str()),
                None => ProcessLauncher::new(),
            };
            query::launch_tool(&resolver, &launcher, &descriptor, mode, &args.file, &mut out)
        }
        None => query::list_tools(&resolver, &descriptor, &mut out),
    }
}
