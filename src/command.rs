//! The [`CommandResolver`] capability and the [`Command`] trait used by the
//! default resolver.

use crate::config::AlertFn;

/// Decides whether a text entry is a command.
///
/// Given the raw line and its script index, returns the next index to try:
///
/// - `index` unchanged means "not a command", and the line is typed normally.
/// - anything greater means the command consumed that many slots without
///   visible typing.
///
/// Resolvers never fail. Malformed input must come back as `index`.
///
/// Any `FnMut(&str, usize) -> usize + Send` closure is a resolver:
///
/// ```
/// use dialogue::{Config, Entry, Dialogue, State};
///
/// let config = Config::default().with_command_resolver(|value: &str, index: usize| {
///     if value == "skip" { index + 1 } else { index }
/// });
/// let dialogue = Dialogue::new(vec![Entry::text("skip"), Entry::text("x")], config);
/// assert_eq!(dialogue.cursor(), 1);
/// assert_eq!(dialogue.state(), State::Done);
/// ```
pub trait CommandResolver: Send {
    fn resolve(&mut self, value: &str, index: usize) -> usize;
}

impl<F> CommandResolver for F
where
    F: FnMut(&str, usize) -> usize + Send,
{
    fn resolve(&mut self, value: &str, index: usize) -> usize {
        self(value, index)
    }
}

/// What a [`Command`] can reach while executing.
pub struct Context {
    pub(crate) alert: Option<AlertFn>,
}

impl Context {
    pub fn new(alert: Option<AlertFn>) -> Self {
        Self { alert }
    }

    /// Display `message` to the user through the configured alert sink.
    pub fn alert(&self, message: &str) {
        match &self.alert {
            Some(alert) => alert(message),
            None => tracing::info!(message, "alert"),
        }
    }
}

/// A single named command recognised by the default resolver.
///
/// Implement this trait to add a command, then register it with
/// [`DefaultResolver::with_command`](crate::DefaultResolver::with_command).
/// Built-ins define `pub const NAME` and return it from [`name`](Self::name).
pub trait Command: Send + Sync + 'static {
    /// The keyword following the delimiter, e.g. `"alert"`.
    fn name(&self) -> &'static str;

    /// Run the command with everything after the first space.
    ///
    /// Returns how many script slots the command consumes, normally 1.
    fn execute(&self, argument: &str, ctx: &Context) -> usize;
}
