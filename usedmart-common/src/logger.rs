use std::{
    str::FromStr,
    sync::{Arc, RwLock},
};
use tracing::{subscriber::set_global_default, Level};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    filter::DynFilterFn,
    fmt::{self},
    layer::SubscriberExt,
    Layer, Registry,
};
use usedmart_error::{UMError, UMResult};
use usedmart_models::constants::{LOG_DIR, LOG_FILE_PREFIX};

/// Console plus daily rolling file output sharing one runtime-adjustable level.
pub struct Logger {
    level: Arc<RwLock<Level>>,
    _file_guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn new(level: Option<Level>) -> Self {
        Logger {
            level: Arc::new(RwLock::new(level.unwrap_or(Level::INFO))),
            _file_guard: None,
        }
    }

    /// Unknown names fall back to `INFO` in release builds and `DEBUG` otherwise.
    pub fn parse_level(name: &str) -> Level {
        Level::from_str(name.trim()).unwrap_or(if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        })
    }

    #[inline]
    pub fn set_level(&self, new_level: Level) {
        let mut level = self.level.write().unwrap_or_else(|e| e.into_inner());
        *level = new_level;
    }

    #[inline]
    pub fn get_level(&self) -> Level {
        *self.level.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Installs the global subscriber. Call once, after the runtime directory is applied.
    pub fn initialize(&mut self) -> UMResult<()> {
        let file_appender = rolling::daily(LOG_DIR, LOG_FILE_PREFIX);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        self._file_guard = Some(guard);

        let console_filter = {
            let level = Arc::clone(&self.level);
            DynFilterFn::new(move |metadata, _| {
                metadata.level() <= &*level.read().unwrap_or_else(|e| e.into_inner())
            })
        };
        let file_filter = {
            let level = Arc::clone(&self.level);
            DynFilterFn::new(move |metadata, _| {
                metadata.level() <= &*level.read().unwrap_or_else(|e| e.into_inner())
            })
        };

        let console_layer = {
            #[cfg(debug_assertions)]
            let layer = fmt::layer()
                .pretty()
                .with_writer(std::io::stdout)
                .with_file(true)
                .with_line_number(true);

            #[cfg(not(debug_assertions))]
            let layer = fmt::layer()
                .with_writer(std::io::stdout)
                .with_file(false)
                .with_line_number(false);

            layer.with_filter(console_filter)
        };

        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_filter(file_filter);

        let subscriber = Registry::default().with(console_layer).with(file_layer);
        set_global_default(subscriber).map_err(|_| UMError::from("Failed to set logger"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parsing() {
        assert_eq!(Logger::parse_level("warn"), Level::WARN);
        assert_eq!(Logger::parse_level(" ERROR "), Level::ERROR);
        let fallback = Logger::parse_level("loud");
        assert!(fallback == Level::DEBUG || fallback == Level::INFO);
    }

    #[test]
    fn test_level_is_adjustable() {
        let logger = Logger::new(None);
        assert_eq!(logger.get_level(), Level::INFO);
        logger.set_level(Level::TRACE);
        assert_eq!(logger.get_level(), Level::TRACE);
    }
}
