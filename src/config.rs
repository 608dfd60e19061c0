//! Run options supplied once when a dialogue starts.

use crate::command::CommandResolver;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Callback invoked once when the script is exhausted.
pub type CompleteFn = Arc<dyn Fn() + Send + Sync>;

/// Sink for the built-in `alert` command.
pub type AlertFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Text shown when the script finishes and no completion callback is set.
pub const DEFAULT_COMPLETION_TEXT: &str = "Done!";

/// Extra delay applied after a character is revealed (punctuation pauses).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelayTable(HashMap<char, Duration>);

impl DelayTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the extra delay for `ch`.
    pub fn with(mut self, ch: char, delay: Duration) -> Self {
        self.0.insert(ch, delay);
        self
    }

    /// Extra delay for `ch`, zero when the character has no entry.
    pub fn extra_delay(&self, ch: char) -> Duration {
        self.0.get(&ch).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(char, Duration)> for DelayTable {
    fn from_iter<I: IntoIterator<Item = (char, Duration)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Options for a dialogue run.
///
/// Built with [`Config::default`] and the chained `with_*` methods:
///
/// ```
/// use dialogue::{Config, DelayTable};
/// use std::time::Duration;
///
/// let config = Config::default()
///     .with_type_speed(Duration::from_millis(30))
///     .with_command_delimiter("/")
///     .with_delay_table(DelayTable::new().with('.', Duration::from_millis(300)));
/// assert_eq!(config.command_delimiter.as_deref(), Some("/"));
/// ```
pub struct Config {
    /// Prefix marking a command line. `None` makes every line a candidate.
    pub command_delimiter: Option<String>,
    /// Replaces the default command dispatch entirely.
    pub command_resolver: Option<Box<dyn CommandResolver>>,
    pub delay_table: DelayTable,
    /// Base delay between characters. Zero disables the animation.
    pub type_speed: Duration,
    /// Upper bound of a random extra delay added to each reveal step.
    pub jitter: Duration,
    pub on_complete: Option<CompleteFn>,
    /// Delivery target for the `alert` command. Logged when unset.
    pub on_alert: Option<AlertFn>,
    /// Indicator appended to the visible text while a line is printing.
    pub cursor: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command_delimiter: None,
            command_resolver: None,
            delay_table: DelayTable::default(),
            type_speed: Duration::from_millis(50),
            jitter: Duration::ZERO,
            on_complete: None,
            on_alert: None,
            cursor: None,
        }
    }
}

impl Config {
    pub fn with_command_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.command_delimiter = Some(delimiter.into());
        self
    }

    pub fn with_command_resolver(mut self, resolver: impl CommandResolver + 'static) -> Self {
        self.command_resolver = Some(Box::new(resolver));
        self
    }

    pub fn with_delay_table(mut self, table: DelayTable) -> Self {
        self.delay_table = table;
        self
    }

    pub fn with_type_speed(mut self, speed: Duration) -> Self {
        self.type_speed = speed;
        self
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_on_complete(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Arc::new(f));
        self
    }

    pub fn with_on_alert(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_alert = Some(Arc::new(f));
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("command_delimiter", &self.command_delimiter)
            .field("command_resolver", &self.command_resolver.is_some())
            .field("delay_table", &self.delay_table)
            .field("type_speed", &self.type_speed)
            .field("jitter", &self.jitter)
            .field("on_complete", &self.on_complete.is_some())
            .field("on_alert", &self.on_alert.is_some())
            .field("cursor", &self.cursor)
            .finish()
    }
}
