use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::state::Side;
use crate::config::KeyBindings;

/// One held movement direction for one paddle, independent of key bindings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaddleInput {
    LeftUp,
    LeftDown,
    RightUp,
    RightDown,
}

impl PaddleInput {
    pub const ALL: [PaddleInput; 4] = [
        PaddleInput::LeftUp,
        PaddleInput::LeftDown,
        PaddleInput::RightUp,
        PaddleInput::RightDown,
    ];

    pub fn side(self) -> Side {
        match self {
            PaddleInput::LeftUp | PaddleInput::LeftDown => Side::Left,
            PaddleInput::RightUp | PaddleInput::RightDown => Side::Right,
        }
    }

    fn bit(self) -> u8 {
        match self {
            PaddleInput::LeftUp => 0b0001,
            PaddleInput::LeftDown => 0b0010,
            PaddleInput::RightUp => 0b0100,
            PaddleInput::RightDown => 0b1000,
        }
    }
}

/// The set of movement keys held during a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSet(u8);

impl InputSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, input: PaddleInput) {
        self.0 |= input.bit();
    }

    pub fn remove(&mut self, input: PaddleInput) {
        self.0 &= !input.bit();
    }

    pub fn contains(&self, input: PaddleInput) -> bool {
        self.0 & input.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Drop every key belonging to `side` (e.g. when the AI drives that paddle)
    pub fn without_side(mut self, side: Side) -> Self {
        for input in PaddleInput::ALL {
            if input.side() == side {
                self.remove(input);
            }
        }
        self
    }

    /// -1 for up, +1 for down, 0 when both or neither are held
    pub fn vertical(&self, side: Side) -> f32 {
        let (up, down) = match side {
            Side::Left => (PaddleInput::LeftUp, PaddleInput::LeftDown),
            Side::Right => (PaddleInput::RightUp, PaddleInput::RightDown),
        };
        let mut direction = 0.0;
        if self.contains(up) {
            direction -= 1.0;
        }
        if self.contains(down) {
            direction += 1.0;
        }
        direction
    }
}

impl FromIterator<PaddleInput> for InputSet {
    fn from_iter<I: IntoIterator<Item = PaddleInput>>(iter: I) -> Self {
        let mut set = InputSet::empty();
        for input in iter {
            set.insert(input);
        }
        set
    }
}

/// Discrete actions produced by key presses during a match
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    Abort,
    Rematch,
    Paddle(PaddleInput),
}

/// Parse a key name from the config file ("Up", "Esc", "W", ...)
pub fn parse_key(name: &str) -> Option<KeyCode> {
    match name.to_ascii_lowercase().as_str() {
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "enter" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "space" => Some(KeyCode::Char(' ')),
        "tab" => Some(KeyCode::Tab),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeyCode::Char(c)),
                _ => None,
            }
        }
    }
}

fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Concrete key codes mapped onto match actions
#[derive(Debug, Clone)]
pub struct KeyMap {
    entries: Vec<(KeyCode, InputAction)>,
}

impl KeyMap {
    pub fn from_bindings(bindings: &KeyBindings) -> Self {
        let wanted = [
            (&bindings.left_paddle_up, InputAction::Paddle(PaddleInput::LeftUp)),
            (&bindings.left_paddle_down, InputAction::Paddle(PaddleInput::LeftDown)),
            (&bindings.right_paddle_up, InputAction::Paddle(PaddleInput::RightUp)),
            (&bindings.right_paddle_down, InputAction::Paddle(PaddleInput::RightDown)),
            (&bindings.abort, InputAction::Abort),
            (&bindings.rematch, InputAction::Rematch),
        ];

        let mut entries = Vec::with_capacity(wanted.len());
        for (name, action) in wanted {
            match parse_key(name) {
                Some(code) => entries.push((normalize(code), action)),
                None => tracing::warn!("Ignoring unknown key binding {:?} for {:?}", name, action),
            }
        }
        Self { entries }
    }

    pub fn action_for(&self, code: KeyCode) -> Option<InputAction> {
        let code = normalize(code);
        self.entries
            .iter()
            .find(|(bound, _)| *bound == code)
            .map(|(_, action)| *action)
    }
}

/// Turns key events into a held-key set.
///
/// Most terminals only report presses (plus auto-repeat), so a key stays held
/// for `hold` after its last press/repeat, or until a release event arrives.
#[derive(Debug)]
pub struct KeyTracker {
    hold: Duration,
    last_seen: HashMap<PaddleInput, Instant>,
}

impl KeyTracker {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            last_seen: HashMap::new(),
        }
    }

    pub fn press(&mut self, input: PaddleInput, now: Instant) {
        self.last_seen.insert(input, now);
    }

    pub fn release(&mut self, input: PaddleInput) {
        self.last_seen.remove(&input);
    }

    pub fn clear(&mut self) {
        self.last_seen.clear();
    }

    pub fn held(&self, now: Instant) -> InputSet {
        self.last_seen
            .iter()
            .filter(|(_, seen)| now.saturating_duration_since(**seen) <= self.hold)
            .map(|(input, _)| *input)
            .collect()
    }
}

/// Drain pending terminal events. Movement keys update `tracker`; other
/// actions are returned in arrival order.
pub fn poll_input(keymap: &KeyMap, tracker: &mut KeyTracker) -> Result<Vec<InputAction>, std::io::Error> {
    let mut actions = Vec::new();

    while event::poll(Duration::from_millis(0))? {
        if let Event::Key(key) = event::read()? {
            let Some(action) = keymap.action_for(key.code) else {
                continue;
            };
            match (action, key.kind) {
                (InputAction::Paddle(input), KeyEventKind::Release) => tracker.release(input),
                (InputAction::Paddle(input), _) => tracker.press(input, Instant::now()),
                (other, KeyEventKind::Press) => actions.push(other),
                _ => {}
            }
        }
    }

    Ok(actions)
}
