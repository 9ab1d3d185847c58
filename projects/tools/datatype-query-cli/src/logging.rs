use crate::error::CliError;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber filtered by `directive`.
pub fn init(directive: &str) -> Result<(), CliError> {
    let filter = EnvFilter::try_new(directive).map_err(|source| CliError::LogFilter {
        filter: directive.to_owned(),
        source,
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}
