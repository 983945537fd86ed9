use std::sync::Once;

/// Logger setup.
///
/// `env_filter` uses `env_logger` syntax, e.g. "pixel_stage=debug".
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(filter: Option<String>) -> Self {
        Self { env_filter: filter, ..Default::default() }
    }
}

static INIT: Once = Once::new();

/// Install the global logger; later calls do nothing.
///
/// Filter precedence: `config.env_filter`, then `RUST_LOG`, then `info`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(config.write_style);
        // A test harness may already own the logger
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized");
    });
}
