//! Per-invocation logging context
//!
//! Calculations log through [`tracing`]. The subscriber that receives those events
//! is built from [`LogSettings`] for one command and installed only for that
//! command's duration (see [`LogSettings::scope`]), so there is no process-wide
//! logger to configure or reset.
//!
//! Log entries are rendered from a template such as
//! `{time} {level} [{target}] {message}`.

use crate::errors::{QoError, QoResult};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{Dispatch, Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Registry;

/// Default log entry template
pub const DEFAULT_ENTRY_FORMAT: &str = "{time} {level} [{target}] {message}";

/// Map a `-v` count to a level filter
///
/// 0 shows only errors, 1 adds warnings, 2 adds info and 3 or more shows debug output.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Time,
    Level,
    Target,
    Message,
}

/// Event formatter driven by a `{placeholder}` template
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryFormat {
    pieces: Vec<Piece>,
}

impl EntryFormat {
    /// Parse a template; recognised placeholders are `{time}`, `{level}`,
    /// `{target}` and `{message}`.
    pub fn parse(template: &str) -> QoResult<Self> {
        let invalid = |reason: String| QoError::LogFormat {
            template: template.to_string(),
            reason,
        };

        let mut pieces = Vec::new();
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            if open > 0 {
                pieces.push(Piece::Literal(rest[..open].to_string()));
            }
            let offset = template.len() - rest.len() + open;
            let close = rest[open..]
                .find('}')
                .ok_or_else(|| invalid(format!("unclosed '{{' at offset {offset}")))?;
            let name = &rest[open + 1..open + close];
            pieces.push(match name {
                "time" => Piece::Time,
                "level" => Piece::Level,
                "target" => Piece::Target,
                "message" => Piece::Message,
                other => return Err(invalid(format!("unknown placeholder {{{other}}}"))),
            });
            rest = &rest[open + close + 1..];
        }
        if !rest.is_empty() {
            pieces.push(Piece::Literal(rest.to_string()));
        }
        Ok(Self { pieces })
    }
}

impl Default for EntryFormat {
    fn default() -> Self {
        Self {
            pieces: vec![
                Piece::Time,
                Piece::Literal(" ".to_string()),
                Piece::Level,
                Piece::Literal(" [".to_string()),
                Piece::Target,
                Piece::Literal("] ".to_string()),
                Piece::Message,
            ],
        }
    }
}

impl<S, N> FormatEvent<S, N> for EntryFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => writer.write_str(text)?,
                Piece::Time => SystemTime.format_time(&mut writer)?,
                Piece::Level => write!(writer, "{}", metadata.level())?,
                Piece::Target => writer.write_str(metadata.target())?,
                Piece::Message => ctx.format_fields(writer.by_ref(), event)?,
            }
        }
        writeln!(writer)
    }
}

/// Everything needed to build the logging context of one invocation
#[derive(Clone, Debug)]
pub struct LogSettings {
    pub level: LevelFilter,
    /// Entries are also written here (the file is truncated first)
    pub log_file: Option<PathBuf>,
    pub entry_format: EntryFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::ERROR,
            log_file: None,
            entry_format: EntryFormat::default(),
        }
    }
}

impl LogSettings {
    /// Build a dispatcher writing to stderr and, if configured, the log file
    pub fn build(&self) -> QoResult<Dispatch> {
        let file_layer = match &self.log_file {
            Some(path) => {
                let file = File::create(path).map_err(|source| QoError::Io {
                    path: path.clone(),
                    source,
                })?;
                Some(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file))
                        .event_format(self.entry_format.clone()),
                )
            }
            None => None,
        };

        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .event_format(self.entry_format.clone());

        let subscriber = Registry::default()
            .with(self.level)
            .with(stderr_layer)
            .with(file_layer);

        Ok(Dispatch::new(subscriber))
    }

    /// Run `f` with this logging context as the default for the current thread
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> QoResult<T> {
        let dispatch = self.build()?;
        Ok(tracing::dispatcher::with_default(&dispatch, f))
    }
}
