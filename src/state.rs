//! Run state shared between the interpreter and the typing engine.

use std::time::Duration;

/// Where the current run stands. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Characters of the current line are being revealed.
    Printing,
    /// Reserved for pausing mid-line on input. Never entered.
    Waiting,
    /// The current line is fully visible and waits for an advance.
    Done,
    /// The cursor has passed the end of the script.
    Finished,
}

/// Progress through the line currently being typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealState {
    /// Visible prefix of the line.
    pub visible: String,
    /// Characters revealed so far. Never exceeds the line's length.
    pub count: usize,
}

impl RevealState {
    pub fn reset(&mut self) {
        self.visible.clear();
        self.count = 0;
    }
}

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Reveal the next character of the entry at `index`.
    Reveal { index: usize },
    /// Resume traversal at `index` after a pause.
    Resume { index: usize },
}

/// A scheduled continuation. At most one is pending per dialogue.
///
/// `generation` identifies the script the timer was scheduled for and `seq`
/// the individual scheduling, so a timer that was cancelled or belongs to an
/// older script is ignored when fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub generation: u64,
    pub seq: u64,
    pub delay: Duration,
    pub kind: TimerKind,
}

/// The single mutable run: cursor, reveal progress, state and the pending timer.
///
/// Owned by the interpreter and lent to the typing engine, which touches
/// everything but `cursor`.
#[derive(Debug)]
pub(crate) struct Run {
    pub cursor: usize,
    pub reveal: RevealState,
    pub state: State,
    pub active: bool,
    pub generation: u64,
    pub pending: Option<Timer>,
    next_seq: u64,
}

impl Run {
    pub fn new(generation: u64) -> Self {
        Self {
            cursor: 0,
            reveal: RevealState::default(),
            state: State::Printing,
            active: false,
            generation,
            pending: None,
            next_seq: 0,
        }
    }

    /// Schedule `kind` after `delay`, replacing any pending timer.
    pub fn schedule(&mut self, delay: Duration, kind: TimerKind) -> Timer {
        let timer = Timer {
            generation: self.generation,
            seq: self.next_seq,
            delay,
            kind,
        };
        self.next_seq += 1;
        self.pending = Some(timer);
        timer
    }

    pub fn cancel_timer(&mut self) {
        self.pending = None;
    }

    /// True if `timer` is the one currently pending for this run.
    pub fn is_current(&self, timer: &Timer) -> bool {
        timer.generation == self.generation && self.pending.as_ref() == Some(timer)
    }
}

/// Render-facing view of a dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub text: String,
    pub state: State,
    /// False while a pause is pending; the shell should ignore or dim input.
    pub active: bool,
    pub cursor: Option<String>,
}

impl Snapshot {
    /// The visible text, with the cursor appended while a line is typing.
    pub fn display(&self) -> String {
        match (&self.cursor, self.state) {
            (Some(cursor), State::Printing) if self.active => format!("{}{}", self.text, cursor),
            _ => self.text.clone(),
        }
    }

    /// Whether a "more text pending" indicator should be shown.
    pub fn has_more(&self) -> bool {
        self.state == State::Done
    }
}
