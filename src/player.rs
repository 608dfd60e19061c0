//! Async driver that owns a [`Dialogue`] and runs its timers for real.
//!
//! The player is the single owner of the run state: advance and load signals
//! reach it over a channel, and every change is published as a [`Snapshot`]
//! on a watch channel for the shell to render.

use crate::config::Config;
use crate::engine::Dialogue;
use crate::script::Script;
use crate::state::{Snapshot, Timer};
use anyhow::{Result, anyhow};
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};
use tracing::debug;

/// Requests the shell can send to a running player.
#[derive(Debug)]
pub enum Signal {
    Advance,
    Load(Script),
}

/// Cloneable handle for driving a [`Player`] and observing its output.
#[derive(Clone)]
pub struct PlayerHandle {
    signals: mpsc::UnboundedSender<Signal>,
    snapshots: watch::Receiver<Snapshot>,
}

impl PlayerHandle {
    /// Send the advance signal.
    pub fn advance(&self) -> Result<()> {
        self.send(Signal::Advance)
    }

    /// Replace the script, restarting from its first entry.
    pub fn load(&self, script: Script) -> Result<()> {
        self.send(Signal::Load(script))
    }

    fn send(&self, signal: Signal) -> Result<()> {
        self.signals
            .send(signal)
            .map_err(|_| anyhow!("Player has stopped"))
    }

    /// A receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }
}

/// Runs a dialogue against the tokio clock.
///
/// ```no_run
/// use dialogue::{Config, Entry, Player, State};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let (player, handle) = Player::new(vec![Entry::text("Hello!")], Config::default());
///     let task = tokio::spawn(player.run());
///
///     let mut snapshots = handle.subscribe();
///     snapshots.wait_for(|s| s.state == State::Done).await?;
///     handle.advance()?;
///     snapshots.wait_for(|s| s.state == State::Finished).await?;
///
///     drop((handle, snapshots));
///     task.await?;
///     Ok(())
/// }
/// ```
pub struct Player {
    dialogue: Dialogue,
    signals: mpsc::UnboundedReceiver<Signal>,
    snapshots: watch::Sender<Snapshot>,
}

impl Player {
    /// Start `script` and return the player with a handle to it.
    ///
    /// Traversal begins immediately, so effects before the first line have
    /// already run when this returns.
    pub fn new(script: Script, config: Config) -> (Self, PlayerHandle) {
        let dialogue = Dialogue::new(script, config);
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(dialogue.snapshot());
        let player = Self {
            dialogue,
            signals: signal_rx,
            snapshots: snapshot_tx,
        };
        let handle = PlayerHandle {
            signals: signal_tx,
            snapshots: snapshot_rx,
        };
        (player, handle)
    }

    /// Drive the dialogue until every [`PlayerHandle`] has been dropped.
    ///
    /// Returns the dialogue in its final state.
    pub async fn run(mut self) -> Dialogue {
        // The deadline is fixed when a timer is first seen, so signals that
        // arrive while it is pending do not push it back.
        let mut armed: Option<(Timer, Instant)> = None;

        loop {
            self.publish();

            armed = match (self.dialogue.pending_timer(), armed) {
                (Some(timer), Some((current, deadline))) if timer == current => {
                    Some((current, deadline))
                }
                (Some(timer), _) => Some((timer, Instant::now() + timer.delay)),
                (None, _) => None,
            };

            let deadline = armed.map(|(_, deadline)| deadline);
            let expired = async move {
                match deadline {
                    Some(deadline) => sleep_until(deadline).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                () = expired => {
                    if let Some((timer, _)) = armed.take() {
                        self.dialogue.fire(timer);
                    }
                }
                signal = self.signals.recv() => match signal {
                    Some(Signal::Advance) => self.dialogue.advance(),
                    Some(Signal::Load(script)) => self.dialogue.load(script),
                    None => break,
                },
            }
        }

        debug!("all handles dropped, stopping player");
        self.dialogue
    }

    fn publish(&self) {
        let snapshot = self.dialogue.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Entry;
    use crate::state::State;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn config(ms: u64) -> Config {
        Config::default().with_type_speed(Duration::from_millis(ms))
    }

    #[tokio::test(start_paused = true)]
    async fn test_line_timing() {
        let (player, handle) = Player::new(vec![Entry::text("Hello")], config(10));
        let task = tokio::spawn(player.run());
        let start = Instant::now();

        let mut snapshots = handle.subscribe();
        snapshots.wait_for(|s| s.state == State::Done).await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(40) && elapsed < Duration::from_millis(45));
        assert_eq!(handle.snapshot().text, "Hello");

        drop((handle, snapshots));
        let dialogue = task.await.unwrap();
        assert_eq!(dialogue.state(), State::Done);
    }

    #[tokio::test(start_paused = true)]
    async fn test_advance_fast_forwards() {
        let (player, handle) = Player::new(vec![Entry::text("A long line")], config(100));
        let task = tokio::spawn(player.run());
        let start = Instant::now();

        handle.advance().unwrap();
        let mut snapshots = handle.subscribe();
        let snapshot = snapshots
            .wait_for(|s| s.state == State::Done)
            .await
            .unwrap()
            .clone();
        assert_eq!(snapshot.text, "A long line");
        assert!(start.elapsed() < Duration::from_millis(100));

        drop((handle, snapshots));
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_and_effect() {
        let effects = Arc::new(AtomicUsize::new(0));
        let completions = Arc::new(AtomicUsize::new(0));
        let (e, c) = (effects.clone(), completions.clone());
        let script = vec![
            Entry::text("Hi"),
            Entry::pause_ms(500),
            Entry::effect(move || {
                e.fetch_add(1, Ordering::SeqCst);
            }),
            Entry::text("Bye"),
        ];
        let config = config(10).with_on_complete(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        let (player, handle) = Player::new(script, config);
        let task = tokio::spawn(player.run());
        let start = Instant::now();
        let mut snapshots = handle.subscribe();

        snapshots.wait_for(|s| s.text == "Hi").await.unwrap();
        handle.advance().unwrap();
        snapshots.wait_for(|s| !s.active).await.unwrap();
        assert_eq!(effects.load(Ordering::SeqCst), 0);

        snapshots
            .wait_for(|s| s.text == "Bye" && s.state == State::Done)
            .await
            .unwrap();
        assert_eq!(effects.load(Ordering::SeqCst), 1);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(530) && elapsed < Duration::from_millis(540));

        handle.advance().unwrap();
        snapshots
            .wait_for(|s| s.state == State::Finished)
            .await
            .unwrap();
        handle.advance().unwrap();
        handle.advance().unwrap();

        drop((handle, snapshots));
        let dialogue = task.await.unwrap();
        assert_eq!(dialogue.state(), State::Finished);
        assert_eq!(dialogue.text(), "Bye");
        assert_eq!(completions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_replaces_running_script() {
        let (player, handle) = Player::new(vec![Entry::text("First line")], config(50));
        let task = tokio::spawn(player.run());
        let mut snapshots = handle.subscribe();

        snapshots.wait_for(|s| s.text == "Fir").await.unwrap();
        handle.load(vec![Entry::text("New")]).unwrap();
        let snapshot = snapshots
            .wait_for(|s| s.state == State::Done)
            .await
            .unwrap()
            .clone();
        assert_eq!(snapshot.text, "New");

        drop((handle, snapshots));
        let dialogue = task.await.unwrap();
        assert_eq!(dialogue.generation(), 1);
    }

    #[tokio::test]
    async fn test_handle_errors_after_stop() {
        let (player, handle) = Player::new(vec![Entry::text("x")], config(0));
        drop(player);
        assert!(handle.advance().is_err());
    }
}
