//! Typing engine: reveals one text line a character at a time.
//!
//! Each step appends a character and schedules the next step after the base
//! type speed plus any per-character extra delay. The final character is never
//! appended by a step; [`finish_printing`] shows the full line instead.

use crate::config::{Config, DelayTable};
use crate::state::{Run, State, TimerKind};
use rand::Rng;
use std::time::Duration;
use tracing::trace;

/// Timing options the typing engine reads.
#[derive(Debug, Clone)]
pub(crate) struct Pace {
    pub type_speed: Duration,
    pub jitter: Duration,
    pub delay_table: DelayTable,
}

impl Pace {
    pub fn from_config(config: &Config) -> Self {
        Self {
            type_speed: config.type_speed,
            jitter: config.jitter,
            delay_table: config.delay_table.clone(),
        }
    }

    /// Zero speed means lines appear whole, without any timer.
    pub fn is_instant(&self) -> bool {
        self.type_speed.is_zero()
    }

    /// Delay before the step following `ch`. Extra delay for the line's last
    /// character is suppressed.
    fn step_delay(&self, ch: char, is_last: bool) -> Duration {
        let mut delay = self.type_speed;
        if !is_last {
            delay += self.delay_table.extra_delay(ch);
        }
        if !self.jitter.is_zero() {
            let max = self.jitter.as_millis() as u64;
            delay += Duration::from_millis(rand::thread_rng().gen_range(0..=max));
        }
        delay
    }
}

/// Reveal the next character of `line` (the entry at `index`).
///
/// When at most one character remains the line is finished instead.
pub(crate) fn reveal_next(run: &mut Run, pace: &Pace, line: &str, index: usize) {
    let len = line.chars().count();
    if run.reveal.count + 1 >= len {
        finish_printing(run, line);
        return;
    }

    // The visible text is always a prefix of the line, so its byte length is
    // the offset of the next character.
    let Some(ch) = line
        .get(run.reveal.visible.len()..)
        .and_then(|rest| rest.chars().next())
    else {
        finish_printing(run, line);
        return;
    };

    let is_last = run.reveal.count + 1 == len;
    run.reveal.visible.push(ch);
    run.reveal.count += 1;

    let delay = pace.step_delay(ch, is_last);
    trace!(index, count = run.reveal.count, ?delay, "revealed character");
    run.schedule(delay, TimerKind::Reveal { index });
}

/// Show the whole line and mark it done. Cancels any pending reveal step, so
/// it is safe to call at any point of the animation.
pub(crate) fn finish_printing(run: &mut Run, line: &str) {
    run.reveal.visible.clear();
    run.reveal.visible.push_str(line);
    run.reveal.count = line.chars().count();
    run.state = State::Done;
    run.cancel_timer();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pace(ms: u64) -> Pace {
        Pace {
            type_speed: Duration::from_millis(ms),
            jitter: Duration::ZERO,
            delay_table: DelayTable::new(),
        }
    }

    fn printing() -> Run {
        let mut run = Run::new(0);
        run.state = State::Printing;
        run
    }

    /// Run reveal steps until done, returning the delays of each scheduled step.
    fn type_out(run: &mut Run, pace: &Pace, line: &str) -> Vec<Duration> {
        let mut delays = Vec::new();
        reveal_next(run, pace, line, 0);
        while let Some(timer) = run.pending.take() {
            delays.push(timer.delay);
            reveal_next(run, pace, line, 0);
        }
        delays
    }

    #[test]
    fn test_first_step_reveals_one_character() {
        let mut run = printing();
        reveal_next(&mut run, &pace(10), "Hello", 0);
        assert_eq!(run.reveal.visible, "H");
        assert_eq!(run.reveal.count, 1);
        assert_eq!(run.state, State::Printing);
        assert!(run.pending.is_some());
    }

    #[test]
    fn test_line_of_n_chars_takes_n_steps() {
        let mut run = printing();
        // The first step runs synchronously, the other four on timers.
        let delays = type_out(&mut run, &pace(10), "Hello");
        assert_eq!(delays, vec![Duration::from_millis(10); 4]);
        assert_eq!(run.reveal.visible, "Hello");
        assert_eq!(run.reveal.count, 5);
        assert_eq!(run.state, State::Done);
    }

    #[test]
    fn test_single_character_finishes_immediately() {
        let mut run = printing();
        reveal_next(&mut run, &pace(10), "!", 0);
        assert_eq!(run.reveal.visible, "!");
        assert_eq!(run.state, State::Done);
        assert!(run.pending.is_none());
    }

    #[test]
    fn test_empty_line_finishes_immediately() {
        let mut run = printing();
        reveal_next(&mut run, &pace(10), "", 0);
        assert_eq!(run.reveal.visible, "");
        assert_eq!(run.reveal.count, 0);
        assert_eq!(run.state, State::Done);
    }

    #[test]
    fn test_delay_table_applies_after_character() {
        let mut pace = pace(10);
        pace.delay_table = DelayTable::new().with(',', Duration::from_millis(100));
        let mut run = printing();
        let delays = type_out(&mut run, &pace, "a,bc");
        let ms: Vec<u128> = delays.iter().map(Duration::as_millis).collect();
        assert_eq!(ms, vec![10, 110, 10]);
    }

    #[test]
    fn test_trailing_punctuation_adds_no_delay() {
        let mut pace = pace(10);
        pace.delay_table = DelayTable::new().with('.', Duration::from_millis(300));
        let mut run = printing();
        let delays = type_out(&mut run, &pace, "Hi.");
        assert!(delays.iter().all(|d| *d == Duration::from_millis(10)));
        assert_eq!(pace.step_delay('.', true), Duration::from_millis(10));
        assert_eq!(pace.step_delay('.', false), Duration::from_millis(310));
    }

    #[test]
    fn test_jitter_stays_in_bounds() {
        let mut pace = pace(10);
        pace.jitter = Duration::from_millis(5);
        for _ in 0..50 {
            let delay = pace.step_delay('a', false);
            assert!(delay >= Duration::from_millis(10));
            assert!(delay <= Duration::from_millis(15));
        }
    }

    #[test]
    fn test_multibyte_characters() {
        let mut run = printing();
        reveal_next(&mut run, &pace(10), "héllo", 0);
        reveal_next(&mut run, &pace(10), "héllo", 0);
        assert_eq!(run.reveal.visible, "hé");
        assert_eq!(run.reveal.count, 2);
    }

    #[test]
    fn test_finish_printing_snaps_and_cancels() {
        let mut run = printing();
        reveal_next(&mut run, &pace(10), "Hello", 0);
        finish_printing(&mut run, "Hello");
        assert_eq!(run.reveal.visible, "Hello");
        assert_eq!(run.reveal.count, 5);
        assert_eq!(run.state, State::Done);
        assert!(run.pending.is_none());

        // Idempotent.
        finish_printing(&mut run, "Hello");
        assert_eq!(run.reveal.visible, "Hello");
    }
}
