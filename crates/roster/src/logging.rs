use anyhow::{anyhow, Result};
use roster_config::{get_log_dir, get_log_path, Config};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Sends tracing output to the log file. `RUST_LOG` wins over the configured level.
pub fn init(config: &Config) -> Result<()> {
    let configured = level_filter(&config.log.level)?;

    std::fs::create_dir_all(get_log_dir())?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(get_log_path())?;

    let filter = EnvFilter::try_from_default_env().unwrap_or(configured);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    Ok(())
}

/// A bare word must be a level name; anything else is parsed as directives.
/// Without this a typo like `verbos` would be read as a target and log nothing.
fn level_filter(level: &str) -> Result<EnvFilter> {
    let level = level.trim();
    let is_directive = level.contains(['=', ',', ':', '[']);
    if !is_directive {
        level.parse::<LevelFilter>().map_err(|_| {
            anyhow!(
                "Invalid log.level '{}' (expected trace, debug, info, warn, error or off)",
                level
            )
        })?;
    }
    EnvFilter::try_new(level).map_err(|e| anyhow!("Invalid log.level '{}': {}", level, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names_accepted() {
        for level in ["trace", "debug", "info", "warn", "error", "off", " INFO "] {
            assert!(level_filter(level).is_ok(), "{}", level);
        }
    }

    #[test]
    fn test_misspelled_level_rejected() {
        let err = level_filter("verbos").unwrap_err();
        assert!(err.to_string().contains("Invalid log.level 'verbos'"));
    }

    #[test]
    fn test_directives_accepted() {
        assert!(level_filter("roster_form=debug,warn").is_ok());
        assert!(level_filter("roster_client=nope").is_err());
    }
}
