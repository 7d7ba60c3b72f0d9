#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Event;

/// Drives the typing indicator animation when nothing else happens.
const TICK_MILLIS: u64 = 300;

/// Maps a key press to a chat event. Anything without a binding goes to the
/// input box.
fn key_to_event(input: Input) -> Event {
    match input {
        Input { key: Key::Enter, .. } => return Event::KeyboardEnter(),
        Input { key: Key::Up, .. } | Input { key: Key::MouseScrollUp, .. } => {
            return Event::UIScrollUp();
        }
        Input { key: Key::Down, .. } | Input { key: Key::MouseScrollDown, .. } => {
            return Event::UIScrollDown();
        }
        Input { key: Key::PageUp, .. } => return Event::UIScrollPageUp(),
        Input { key: Key::PageDown, .. } => return Event::UIScrollPageDown(),
        Input {
            key: Key::Char(char),
            ctrl: true,
            ..
        } => match char {
            'c' => return Event::KeyboardCTRLC(),
            'd' => return Event::UIScrollPageDown(),
            'n' => return Event::KeyboardCTRLN(),
            'u' => return Event::UIScrollPageUp(),
            _ => return Event::KeyboardCharInput(input),
        },
        input => return Event::KeyboardCharInput(input),
    }
}

fn crossterm_to_event(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Paste(text) => return Some(Event::KeyboardPaste(text)),
        CrosstermEvent::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => return Some(Event::UIScrollUp()),
            MouseEventKind::ScrollDown => return Some(Event::UIScrollDown()),
            _ => return None,
        },
        CrosstermEvent::Key(key_event) => return Some(key_to_event(key_event.into())),
        _ => return None,
    }
}

/// Merges terminal input, backend results and a periodic tick into one stream
/// for the UI loop.
pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            events,
        };
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => crossterm_to_event(input),
                    Some(Err(err)) => {
                        tracing::error!(error = ?err, "Failed to read terminal event");
                        None
                    }
                    None => None
                },
                _ = time::sleep(time::Duration::from_millis(TICK_MILLIS)) => Some(Event::UITick())
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
