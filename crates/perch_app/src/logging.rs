//! Logger setup for hosts and the simulator.

use log::LevelFilter;

use crate::error::AppError;

/// Environment variable that overrides the configured level.
pub const LOG_ENV: &str = "PERCH_LOG";

/// Level to run with: `PERCH_LOG` if it is set to a valid level, otherwise
/// `configured`.
pub fn resolve_level(configured: LevelFilter) -> LevelFilter {
    pick_level(configured, std::env::var(LOG_ENV).ok().as_deref())
}

fn pick_level(configured: LevelFilter, env: Option<&str>) -> LevelFilter {
    env.and_then(|v| v.trim().parse().ok()).unwrap_or(configured)
}

/// Installs a stderr logger.  Fails if a logger is already installed.
pub fn init(level: LevelFilter) -> Result<(), AppError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{:<5} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}
