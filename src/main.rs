use anyhow::{Context, Result, anyhow};
use clap::Parser;
use dialogue::input::spawn_reader;
use dialogue::{Config, DelayTable, Player, Snapshot, State, parse_file};
use std::io::{BufReader, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Most recent `alert` message, shown above the dialogue on every render.
type Banner = Arc<Mutex<Option<String>>>;

#[derive(Parser, Debug)]
#[command(
    name = "dialogue",
    about = "Play a dialogue script in the terminal, one character at a time. Press Enter to advance.",
    version
)]
struct Args {
    /// Path to the script file
    #[arg(short, long)]
    script: String,

    /// Milliseconds between characters (0 shows lines at once)
    #[arg(long, default_value_t = 50)]
    speed: u64,

    /// Prefix marking command lines, e.g. "/"
    #[arg(short, long)]
    delimiter: Option<String>,

    /// Extra delay after a character, as CHAR=MS (repeatable)
    #[arg(long = "delay", value_parser = parse_delay)]
    delays: Vec<(char, Duration)>,

    /// Indicator shown after the text while a line is typing
    #[arg(long)]
    cursor: Option<String>,

    /// Random extra milliseconds (0..=N) added to each character
    #[arg(long, default_value_t = 0)]
    jitter: u64,
}

impl Args {
    fn config(&self, banner: &Banner) -> Config {
        let banner = Arc::clone(banner);
        let mut config = Config::default()
            .with_type_speed(Duration::from_millis(self.speed))
            .with_jitter(Duration::from_millis(self.jitter))
            .with_delay_table(self.delays.iter().copied().collect::<DelayTable>())
            .with_on_alert(move |message| {
                if let Ok(mut current) = banner.lock() {
                    *current = Some(message.to_string());
                }
            });
        if let Some(delimiter) = &self.delimiter {
            config = config.with_command_delimiter(delimiter.clone());
        }
        if let Some(cursor) = &self.cursor {
            config = config.with_cursor(cursor.clone());
        }
        config
    }
}

fn parse_delay(s: &str) -> Result<(char, Duration)> {
    let (ch, ms) = s
        .rsplit_once('=')
        .ok_or_else(|| anyhow!("Expected CHAR=MS, got: {}", s))?;
    let mut chars = ch.chars();
    let (Some(ch), None) = (chars.next(), chars.next()) else {
        return Err(anyhow!("Expected a single character before '=', got: {}", ch));
    };
    let ms: u64 = ms.trim().parse().context("Invalid milliseconds value")?;
    Ok((ch, Duration::from_millis(ms)))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let script = parse_file(&args.script)
        .with_context(|| format!("Failed to parse script file: {}", args.script))?;
    info!(entries = script.len(), "loaded script");

    let banner = Banner::default();
    let (player, handle) = Player::new(script, args.config(&banner));
    let task = tokio::spawn(player.run());

    let mut snapshots = handle.subscribe();
    let mut input = spawn_reader(BufReader::new(std::io::stdin()));

    render(&snapshots.borrow_and_update().clone(), &banner)?;

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                render(&snapshot, &banner)?;
                if snapshot.state == State::Finished {
                    break;
                }
            }
            line = input.recv() => match line {
                Some(()) => handle.advance()?,
                None => break,
            },
        }
    }

    drop((handle, snapshots));
    let dialogue = task.await.context("Player task failed")?;
    render(&dialogue.snapshot(), &banner)?;
    println!();

    Ok(())
}

fn render(snapshot: &Snapshot, banner: &Banner) -> Result<()> {
    clear_screen()?;
    if let Some(message) = banner.lock().ok().and_then(|current| current.clone()) {
        print!("[!] {}\r\n\r\n", message);
    }
    print!("{}", snapshot.display());
    if snapshot.has_more() && snapshot.active {
        print!("  \u{25bc}");
    }
    std::io::stdout().flush()?;
    Ok(())
}

fn clear_screen() -> Result<()> {
    print!("\x1B[2J\x1B[1;1H");
    std::io::stdout().flush()?;
    Ok(())
}
