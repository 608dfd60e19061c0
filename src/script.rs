//! Script entries: the ordered sequence a [`Dialogue`](crate::Dialogue) walks through.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Side effect run synchronously when the interpreter reaches it.
pub type EffectFn = Arc<dyn Fn() + Send + Sync>;

/// One element of a script.
#[derive(Clone)]
pub enum Entry {
    /// A line revealed one character at a time (or a command, see
    /// [`CommandResolver`](crate::CommandResolver)).
    Text(String),

    /// A non-interactive delay before traversal continues.
    Pause(Duration),

    /// A callback invoked immediately, consuming no time.
    Effect(EffectFn),
}

impl Entry {
    /// Create a `Text` entry.
    pub fn text(text: impl Into<String>) -> Self {
        Entry::Text(text.into())
    }

    /// Create a `Pause` entry from a millisecond count.
    pub fn pause_ms(ms: u64) -> Self {
        Entry::Pause(Duration::from_millis(ms))
    }

    /// Create an `Effect` entry from a closure.
    pub fn effect(f: impl Fn() + Send + Sync + 'static) -> Self {
        Entry::Effect(Arc::new(f))
    }

    /// The line content if this is a `Text` entry.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Entry::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Entry::Pause(duration) => f.debug_tuple("Pause").field(duration).finish(),
            Entry::Effect(_) => f.write_str("Effect(..)"),
        }
    }
}

impl From<&str> for Entry {
    fn from(text: &str) -> Self {
        Entry::text(text)
    }
}

impl From<String> for Entry {
    fn from(text: String) -> Self {
        Entry::Text(text)
    }
}

impl From<Duration> for Entry {
    fn from(duration: Duration) -> Self {
        Entry::Pause(duration)
    }
}

/// An ordered script. The index into this vector is the only position cursor.
pub type Script = Vec<Entry>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_text() {
        assert_eq!(Entry::text("hi").as_text(), Some("hi"));
        assert_eq!(Entry::pause_ms(10).as_text(), None);
        assert_eq!(Entry::effect(|| {}).as_text(), None);
    }

    #[test]
    fn test_debug_hides_callback() {
        assert_eq!(format!("{:?}", Entry::effect(|| {})), "Effect(..)");
        assert_eq!(format!("{:?}", Entry::text("a")), "Text(\"a\")");
    }

    #[test]
    fn test_from_conversions() {
        let script: Script = vec!["Hi".into(), Duration::from_millis(500).into()];
        assert_eq!(script[0].as_text(), Some("Hi"));
        assert!(matches!(script[1], Entry::Pause(d) if d == Duration::from_millis(500)));
    }
}
