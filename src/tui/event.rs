use crossterm::event::{KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;

/// Consecutive terminal read errors tolerated before input is given up
const MAX_CONSECUTIVE_ERRORS: u32 = 5;

#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    /// Periodic tick used to expire flash messages
    Tick,
}

/// Merges terminal key presses and a fixed-rate tick into one channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick_interval =
                tokio::time::interval(std::time::Duration::from_millis(tick_rate_ms));
            let mut errors = 0;

            loop {
                tokio::select! {
                    maybe_event = reader.next() => {
                        match maybe_event {
                            Some(Ok(evt)) => {
                                errors = 0;
                                if let crossterm::event::Event::Key(key) = evt {
                                    // Press only (Windows also reports releases)
                                    if key.kind == KeyEventKind::Press && tx.send(Event::Key(key)).is_err() {
                                        break;
                                    }
                                }
                            }
                            Some(Err(e)) => {
                                errors += 1;
                                if errors >= MAX_CONSECUTIVE_ERRORS {
                                    tracing::warn!(error = %e, errors, "terminal input failing, stopping");
                                    break;
                                }
                                tracing::debug!(error = %e, "terminal event stream error");
                            }
                            None => {
                                tracing::debug!("terminal event stream closed");
                                break;
                            }
                        }
                    }
                    _ = tick_interval.tick() => {
                        if tx.send(Event::Tick).is_err() {
                            break;
                        }
                    }
                }
            }
            // Dropping tx closes the channel; next() then returns None
        });

        Self::from_receiver(rx)
    }

    /// Handler over an existing channel. Input ends when every sender is dropped.
    pub fn from_receiver(rx: mpsc::UnboundedReceiver<Event>) -> Self {
        EventHandler { rx }
    }

    /// Next event, or `None` once terminal input has ended for good.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
