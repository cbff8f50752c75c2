use anyhow::Result;
pub use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{KeyEventKind, KeyEventState};
use std::time::Duration;

/// Where the interactive loop gets its input from
pub trait EventSource {
    /// Wait up to `timeout` for an event to become available
    fn poll(&mut self, timeout: Duration) -> Result<bool>;

    /// Read the next event
    fn read(&mut self) -> Result<Event>;
}

/// Terminal input through crossterm
pub struct TerminalEventSource;

impl EventSource for TerminalEventSource {
    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        Ok(crossterm::event::poll(timeout)?)
    }

    fn read(&mut self) -> Result<Event> {
        Ok(crossterm::event::read()?)
    }
}

/// Replays a fixed list of events, then keeps answering `q`
pub struct SimulatedEventSource {
    pub(crate) events: Vec<Event>,
    position: usize,
}

impl SimulatedEventSource {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events,
            position: 0,
        }
    }

    pub fn key_event(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        })
    }

    pub fn key(code: KeyCode) -> Event {
        Self::key_event(code, KeyModifiers::empty())
    }

    pub fn char_key(c: char) -> Event {
        Self::key(KeyCode::Char(c))
    }

    pub fn ctrl_char_key(c: char) -> Event {
        Self::key_event(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn resize(width: u16, height: u16) -> Event {
        Event::Resize(width, height)
    }

    pub fn remaining(&self) -> usize {
        self.events.len() - self.position
    }
}

impl EventSource for SimulatedEventSource {
    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        Ok(self.position < self.events.len())
    }

    fn read(&mut self) -> Result<Event> {
        match self.events.get(self.position) {
            Some(event) => {
                self.position += 1;
                Ok(event.clone())
            }
            None => Ok(SimulatedEventSource::char_key('q')),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_events_in_order() {
        let mut source = SimulatedEventSource::new(vec![
            SimulatedEventSource::char_key('/'),
            SimulatedEventSource::key(KeyCode::Enter),
            SimulatedEventSource::ctrl_char_key('d'),
        ]);

        assert!(source.poll(Duration::ZERO).unwrap());
        assert_eq!(source.remaining(), 3);

        let Event::Key(first) = source.read().unwrap() else {
            panic!("expected a key event");
        };
        assert_eq!(first.code, KeyCode::Char('/'));

        let Event::Key(second) = source.read().unwrap() else {
            panic!("expected a key event");
        };
        assert_eq!(second.code, KeyCode::Enter);

        let Event::Key(third) = source.read().unwrap() else {
            panic!("expected a key event");
        };
        assert!(third.modifiers.contains(KeyModifiers::CONTROL));

        assert!(!source.poll(Duration::ZERO).unwrap());
    }

    #[test]
    fn exhausted_source_asks_to_quit() {
        let mut source = SimulatedEventSource::new(Vec::new());
        let Event::Key(key) = source.read().unwrap() else {
            panic!("expected a key event");
        };
        assert_eq!(key.code, KeyCode::Char('q'));
    }
}
