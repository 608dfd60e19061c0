use std::io::BufRead;
use std::thread;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

/// Spawns a background thread that turns each input line into an advance
/// request. The channel closes when the reader hits EOF or fails.
pub fn spawn_reader<R: BufRead + Send + 'static>(reader: R) -> UnboundedReceiver<()> {
    let (tx, rx) = unbounded_channel();

    thread::spawn(move || {
        for line in reader.lines() {
            if line.is_err() || tx.send(()).is_err() {
                break;
            }
        }
    });

    rx
}
