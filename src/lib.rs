//! # Dialogue
//!
//! A scripted dialogue engine that reveals text one character at a time.
//!
//! A script is an ordered list of [`Entry`] values: text lines, timed pauses,
//! and side-effect callbacks. The engine walks the script, runs effects and
//! commands without delay, and types each line at a controllable pace. A
//! single external *advance* signal either fast-forwards the line being typed
//! or moves on to the next entry. It suits dialogue boxes, interactive
//! fiction, onboarding flows and chat simulations.
//!
//! ## Quick start
//!
//! ```no_run
//! use dialogue::{Config, Entry, Player, State};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let script = vec![
//!         Entry::text("Hi"),
//!         Entry::pause_ms(500),
//!         Entry::effect(|| println!("*door creaks*")),
//!         Entry::text("Bye"),
//!     ];
//!     let config = Config::default().with_type_speed(Duration::from_millis(40));
//!
//!     let (player, handle) = Player::new(script, config);
//!     let task = tokio::spawn(player.run());
//!
//!     let mut snapshots = handle.subscribe();
//!     while snapshots.changed().await.is_ok() {
//!         let snapshot = snapshots.borrow_and_update().clone();
//!         println!("{}", snapshot.display());
//!         match snapshot.state {
//!             State::Done => handle.advance()?,
//!             State::Finished => break,
//!             _ => {}
//!         }
//!     }
//!
//!     drop((handle, snapshots));
//!     task.await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Driving without a runtime
//!
//! [`Dialogue`] is the synchronous core. It never sleeps; each suspension
//! leaves a pending [`Timer`] that the owner fires when its delay elapses.
//! [`Player`] does that on the tokio clock, but a game loop can just as well
//! poll [`Dialogue::pending_timer`] and call [`Dialogue::fire`].
//!
//! ## Commands
//!
//! A text line can be a command. With a delimiter configured (say `/`), a line
//! such as `/alert Watch out!` runs the `alert` command with argument
//! `Watch out!` and is never typed. Unknown or malformed commands are typed as
//! ordinary text. Replace dispatch wholesale with
//! [`Config::with_command_resolver`], or add commands with
//! [`DefaultResolver::with_command`]:
//!
//! ```
//! use dialogue::command::{Command, Context};
//!
//! pub struct Shout;
//!
//! impl Shout {
//!     pub const NAME: &'static str = "shout";
//! }
//!
//! impl Command for Shout {
//!     fn name(&self) -> &'static str { Self::NAME }
//!
//!     fn execute(&self, argument: &str, ctx: &Context) -> usize {
//!         ctx.alert(&argument.to_uppercase());
//!         1
//!     }
//! }
//! ```
//!
//! ## Script files
//!
//! [`parse_str`] and [`parse_file`] read a small line format (`say "…"`,
//! `wait 500ms`, `# comment`) used by the `dialogue` binary.

pub mod command;
pub mod commands;
pub mod config;
pub mod engine;
pub mod input;
pub mod parser;
pub mod player;
pub mod resolver;
pub mod script;
pub mod state;
pub(crate) mod typing;

pub use command::{Command, CommandResolver, Context};
pub use commands::Alert;
pub use config::{Config, DEFAULT_COMPLETION_TEXT, DelayTable};
pub use engine::Dialogue;
pub use parser::{parse_file, parse_str};
pub use player::{Player, PlayerHandle, Signal};
pub use resolver::DefaultResolver;
pub use script::{Entry, Script};
pub use state::{RevealState, Snapshot, State, Timer, TimerKind};
