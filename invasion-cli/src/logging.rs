//! Logging for the invasion CLI.
//!
//! Diagnostics go to stderr through `tracing`; stdout carries only destruction
//! events and maps. `RUST_LOG` holds the filter directives and
//! `INVASION_LOG_FORMAT` picks human or JSON lines.

use std::{
    env,
    ffi::OsStr,
    io,
    str::FromStr,
    sync::OnceLock,
};

use thiserror::Error;
use tracing::debug;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, filter::ParseError, fmt::format::FmtSpan, layer::SubscriberExt,
    util::SubscriberInitExt,
};

const FORMAT_VAR: &str = "INVASION_LOG_FORMAT";
const FILTER_VAR: &str = "RUST_LOG";
const DEFAULT_DIRECTIVES: &str = "info";

/// Whether this process installed the global subscriber.
static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Shape of each log line.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    /// Compact text, one event per line, span timings on close.
    #[default]
    Human,
    /// Flattened JSON objects carrying the current span.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim();
        if value.eq_ignore_ascii_case("human") {
            Ok(Self::Human)
        } else if value.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(LoggingError::UnsupportedFormat {
                provided: value.to_owned(),
            })
        }
    }
}

/// Logging configuration resolved from the environment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogSettings {
    /// Line format.
    pub format: LogFormat,
    /// `EnvFilter` directives.
    pub directives: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            directives: DEFAULT_DIRECTIVES.to_owned(),
        }
    }
}

/// Errors raised while configuring logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A logging variable held bytes that are not UTF-8.
    #[error("environment variable `{name}` is not valid UTF-8")]
    NotUnicode {
        /// Variable name.
        name: &'static str,
    },
    /// `INVASION_LOG_FORMAT` named neither `human` nor `json`.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Trimmed value.
        provided: String,
    },
    /// `RUST_LOG` could not be parsed as filter directives.
    #[error("invalid log filter `{directives}`: {source}")]
    InvalidFilter {
        /// Raw directives.
        directives: String,
        /// Parser failure.
        #[source]
        source: ParseError,
    },
}

impl LogSettings {
    /// Reads `INVASION_LOG_FORMAT` and `RUST_LOG`.
    ///
    /// # Errors
    /// See [`LogSettings::from_values`].
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_values(
            env::var_os(FORMAT_VAR).as_deref(),
            env::var_os(FILTER_VAR).as_deref(),
        )
    }

    /// Builds settings from raw variable values; unset or blank values keep
    /// the defaults.
    ///
    /// # Errors
    /// Returns [`LoggingError`] for non-UTF-8 values or an unknown format.
    pub fn from_values(
        format: Option<&OsStr>,
        directives: Option<&OsStr>,
    ) -> Result<Self, LoggingError> {
        let mut settings = Self::default();
        if let Some(raw) = utf8(FORMAT_VAR, format)? {
            settings.format = raw.parse()?;
        }
        if let Some(raw) = utf8(FILTER_VAR, directives)? {
            settings.directives = raw.to_owned();
        }
        Ok(settings)
    }

    fn filter(&self) -> Result<EnvFilter, LoggingError> {
        EnvFilter::try_new(&self.directives).map_err(|source| LoggingError::InvalidFilter {
            directives: self.directives.clone(),
            source,
        })
    }

    /// Installs the global subscriber; returns `false` if one already exists.
    ///
    /// # Errors
    /// Returns [`LoggingError::InvalidFilter`] for unparsable directives.
    pub fn install(&self) -> Result<bool, LoggingError> {
        let filter = self.filter()?;
        let lines = tracing_subscriber::fmt::layer().with_writer(io::stderr);
        let lines = match self.format {
            LogFormat::Human => lines.compact().with_span_events(FmtSpan::CLOSE).boxed(),
            LogFormat::Json => lines
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(false)
                .boxed(),
        };
        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(lines)
            .try_init()
            .is_ok();
        if LogTracer::init().is_err() {
            debug!("`log` records already routed elsewhere");
        }
        Ok(installed)
    }
}

fn utf8<'a>(name: &'static str, value: Option<&'a OsStr>) -> Result<Option<&'a str>, LoggingError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let text = value.to_str().ok_or(LoggingError::NotUnicode { name })?;
    Ok(Some(text).filter(|text| !text.trim().is_empty()))
}

/// Configures logging from the environment once per process.
///
/// Later calls return the first outcome without touching the environment.
/// Returns `false` when another subscriber was already installed.
///
/// # Errors
/// Returns [`LoggingError`] if the environment holds an invalid setting.
pub fn init_logging() -> Result<bool, LoggingError> {
    if let Some(installed) = INSTALLED.get() {
        return Ok(*installed);
    }
    let installed = LogSettings::from_env()?.install()?;
    Ok(*INSTALLED.get_or_init(|| installed))
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("human", LogFormat::Human)]
    #[case("HUMAN", LogFormat::Human)]
    #[case(" json ", LogFormat::Json)]
    fn log_format_parses_known_names(#[case] raw: &str, #[case] expected: LogFormat) {
        assert_eq!(raw.parse::<LogFormat>().expect("format must parse"), expected);
    }

    #[rstest]
    #[case("xml", "xml")]
    #[case(" yaml ", "yaml")]
    fn log_format_rejects_unknown_names(#[case] raw: &str, #[case] trimmed: &str) {
        match raw.parse::<LogFormat>() {
            Err(LoggingError::UnsupportedFormat { provided }) => assert_eq!(provided, trimmed),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[rstest]
    #[case::unset(None, None)]
    #[case::blank(Some(""), Some("  "))]
    fn missing_values_keep_defaults(#[case] format: Option<&str>, #[case] filter: Option<&str>) {
        let settings = LogSettings::from_values(format.map(OsStr::new), filter.map(OsStr::new))
            .expect("defaults must resolve");
        assert_eq!(settings, LogSettings::default());
        assert_eq!(settings.directives, "info");
    }

    #[test]
    fn values_override_defaults() {
        let settings = LogSettings::from_values(
            Some(OsStr::new("json")),
            Some(OsStr::new("invasion_core=trace")),
        )
        .expect("settings must resolve");
        assert_eq!(settings.format, LogFormat::Json);
        assert_eq!(settings.directives, "invasion_core=trace");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_values_are_rejected() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(&[0x66, 0xff]);
        let err = LogSettings::from_values(Some(raw), None).expect_err("bytes must be rejected");
        assert!(matches!(err, LoggingError::NotUnicode { name: FORMAT_VAR }));
    }

    #[test]
    fn malformed_directives_are_reported() {
        let settings = LogSettings {
            format: LogFormat::Human,
            directives: "invasion_core=loud".to_owned(),
        };
        let err = settings.install().expect_err("directives must be rejected");
        assert!(matches!(err, LoggingError::InvalidFilter { .. }));
    }

    #[test]
    fn init_logging_repeats_first_outcome() {
        let first = init_logging().expect("logging must initialise");
        assert_eq!(init_logging().expect("repeat must succeed"), first);
    }
}
