//! The script interpreter and the advance protocol.

use crate::command::CommandResolver;
use crate::config::{CompleteFn, Config, DEFAULT_COMPLETION_TEXT};
use crate::resolver::DefaultResolver;
use crate::script::{Entry, Script};
use crate::state::{Run, Snapshot, State, Timer, TimerKind};
use crate::typing::{self, Pace};
use tracing::{debug, info, trace, warn};

/// A running dialogue: walks a script, types its lines, and reacts to
/// advance signals.
///
/// `Dialogue` never sleeps. Each suspension (a pause, a reveal step) leaves
/// one pending [`Timer`] which the owner fires with [`Dialogue::fire`] once
/// its delay has elapsed. [`Player`](crate::Player) does that with real
/// timers; tests can fire them directly.
///
/// ```
/// use dialogue::{Config, Dialogue, Entry, State};
/// use std::time::Duration;
///
/// let config = Config::default().with_type_speed(Duration::from_millis(10));
/// let mut dialogue = Dialogue::new(vec![Entry::text("Hi")], config);
/// assert_eq!(dialogue.text(), "H");
///
/// let timer = dialogue.pending_timer().unwrap();
/// dialogue.fire(timer);
/// assert_eq!(dialogue.text(), "Hi");
/// assert_eq!(dialogue.state(), State::Done);
///
/// dialogue.advance();
/// assert_eq!(dialogue.state(), State::Finished);
/// ```
pub struct Dialogue {
    script: Script,
    run: Run,
    resolver: Box<dyn CommandResolver>,
    pace: Pace,
    on_complete: Option<CompleteFn>,
    cursor_marker: Option<String>,
}

impl Dialogue {
    /// Create a dialogue and start traversal from the first entry.
    pub fn new(script: Script, mut config: Config) -> Self {
        let resolver = config.command_resolver.take().unwrap_or_else(|| {
            Box::new(DefaultResolver::new(
                config.command_delimiter.clone(),
                config.on_alert.clone(),
            ))
        });
        let mut dialogue = Self {
            script,
            run: Run::new(0),
            resolver,
            pace: Pace::from_config(&config),
            on_complete: config.on_complete,
            cursor_marker: config.cursor,
        };
        dialogue.run_from(0);
        dialogue
    }

    /// Replace the script and restart from the first entry.
    ///
    /// Pending timers are cancelled and every timer scheduled for the old
    /// script becomes stale.
    pub fn load(&mut self, script: Script) {
        let generation = self.run.generation + 1;
        debug!(generation, entries = script.len(), "loading script");
        self.script = script;
        self.run = Run::new(generation);
        self.run_from(0);
    }

    /// The external advance signal.
    ///
    /// | State | Effect |
    /// |---|---|
    /// | `Printing` | the current line is shown in full, state becomes `Done` |
    /// | `Done` | traversal resumes at the next entry |
    /// | `Finished`, `Waiting` | nothing |
    ///
    /// Ignored entirely while a pause is pending.
    pub fn advance(&mut self) {
        if !self.run.active {
            trace!("advance ignored while inactive");
            return;
        }
        match self.run.state {
            State::Printing => {
                debug!(index = self.run.cursor, "fast-forwarding line");
                if let Some(line) = self.script.get(self.run.cursor).and_then(Entry::as_text) {
                    typing::finish_printing(&mut self.run, line);
                }
            }
            State::Done => self.run_from(self.run.cursor + 1),
            State::Waiting | State::Finished => {}
        }
    }

    /// Fire a timer previously returned by [`pending_timer`](Self::pending_timer).
    ///
    /// Timers that were cancelled, replaced, or scheduled for an earlier
    /// script are ignored.
    pub fn fire(&mut self, timer: Timer) {
        if !self.run.is_current(&timer) {
            trace!(?timer, "dropping stale timer");
            return;
        }
        self.run.cancel_timer();
        match timer.kind {
            TimerKind::Reveal { index } => {
                if let Some(line) = self.script.get(index).and_then(Entry::as_text) {
                    typing::reveal_next(&mut self.run, &self.pace, line, index);
                }
            }
            TimerKind::Resume { index } => self.run_from(index),
        }
    }

    /// Walk the script from `index`, resolving effects and commands until a
    /// line needs typing, a pause suspends traversal, or the script ends.
    fn run_from(&mut self, mut index: usize) {
        while index < self.script.len() {
            match &self.script[index] {
                Entry::Effect(effect) => {
                    trace!(index, "running effect");
                    effect();
                    index += 1;
                }
                Entry::Pause(duration) => {
                    debug!(index, ?duration, "pausing");
                    self.run.active = false;
                    self.run
                        .schedule(*duration, TimerKind::Resume { index: index + 1 });
                    return;
                }
                Entry::Text(value) => {
                    let next = self.resolver.resolve(value, index);
                    if next == index {
                        break;
                    }
                    if next < index {
                        warn!(index, next, "command resolver moved backwards, typing line");
                        break;
                    }
                    index = next;
                }
            }
        }

        self.run.active = true;

        if index >= self.script.len() {
            self.complete();
            return;
        }

        self.run.cursor = index;
        self.run.reveal.reset();
        let Some(line) = self.script[index].as_text() else {
            return;
        };
        if self.pace.is_instant() {
            typing::finish_printing(&mut self.run, line);
        } else {
            self.run.state = State::Printing;
            typing::reveal_next(&mut self.run, &self.pace, line, index);
        }
    }

    fn complete(&mut self) {
        if self.run.state == State::Finished {
            return;
        }
        info!(entries = self.script.len(), "dialogue finished");
        self.run.state = State::Finished;
        self.run.cursor = self.script.len();
        self.run.cancel_timer();
        match &self.on_complete {
            Some(on_complete) => on_complete(),
            None => {
                self.run.reveal.visible = DEFAULT_COMPLETION_TEXT.to_string();
                self.run.reveal.count = DEFAULT_COMPLETION_TEXT.chars().count();
            }
        }
    }

    /// The timer the owner should fire next, if any.
    pub fn pending_timer(&self) -> Option<Timer> {
        self.run.pending
    }

    /// Currently visible text, possibly a partial line.
    pub fn text(&self) -> &str {
        &self.run.reveal.visible
    }

    pub fn state(&self) -> State {
        self.run.state
    }

    /// False while a pause is pending.
    pub fn is_active(&self) -> bool {
        self.run.active
    }

    /// Index of the entry being shown, or the script length once finished.
    pub fn cursor(&self) -> usize {
        self.run.cursor
    }

    /// Characters of the current line revealed so far.
    pub fn revealed(&self) -> usize {
        self.run.reveal.count
    }

    /// Bumped every time a new script is loaded.
    pub fn generation(&self) -> u64 {
        self.run.generation
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.run.reveal.visible.clone(),
            state: self.run.state,
            active: self.run.active,
            cursor: self.cursor_marker.clone(),
        }
    }
}
