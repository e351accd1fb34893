use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    ForceQuit, // Ctrl+C, always exits
    OpenMenu,  // F10 toggles the menu bar
    Escape,
    Submit,
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    NextTab,
    PrevTab,
    InputChar(char),
    Resize,
    /// A modified key, matched against menu accelerators.
    Shortcut(KeyChord),
}

/// Keys an accelerator can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordKey {
    Char(char),
    Left,
    Right,
}

/// A key press with its modifiers, normalised for accelerator matching.
///
/// Terminals have no Command key, so `Command`, `Control` and
/// `CommandOrControl` all mean Ctrl here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub key: ChordKey,
}

impl KeyChord {
    /// Parse an accelerator string like `"CommandOrControl+Shift+T"`.
    pub fn parse(accelerator: &str) -> Option<Self> {
        let (modifiers, key) = match accelerator.strip_suffix("++") {
            // "Ctrl++" names the plus key itself.
            Some(rest) => (rest, "+"),
            None => accelerator.rsplit_once('+').unwrap_or(("", accelerator)),
        };

        let mut chord = KeyChord {
            ctrl: false,
            shift: false,
            alt: false,
            key: parse_key(key)?,
        };
        for modifier in modifiers.split('+').filter(|m| !m.is_empty()) {
            match modifier {
                "CommandOrControl" | "CmdOrCtrl" | "Command" | "Cmd" | "Control" | "Ctrl" => {
                    chord.ctrl = true
                }
                "Shift" => chord.shift = true,
                "Alt" | "Option" => chord.alt = true,
                _ => return None,
            }
        }
        Some(chord)
    }

    pub fn matches(&self, accelerator: &str) -> bool {
        let Some(expected) = Self::parse(accelerator) else {
            return false;
        };
        // Shift is implied by the character for symbols like '+'.
        let shift_matters = match self.key {
            ChordKey::Char(c) => c.is_ascii_alphabetic(),
            _ => true,
        };
        self.key == expected.key
            && self.ctrl == expected.ctrl
            && self.alt == expected.alt
            && (!shift_matters || self.shift == expected.shift)
    }
}

fn parse_key(key: &str) -> Option<ChordKey> {
    match key {
        "Plus" => Some(ChordKey::Char('+')),
        "Left" => Some(ChordKey::Left),
        "Right" => Some(ChordKey::Right),
        _ => {
            let mut chars = key.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            Some(ChordKey::Char(c.to_ascii_lowercase()))
        }
    }
}

/// Map a crossterm key event to a `TuiEvent`.
pub fn map_key(key_event: KeyEvent) -> Option<TuiEvent> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    let modifiers = key_event.modifiers;
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);
    let shift = modifiers.contains(KeyModifiers::SHIFT);

    let chord = |key| {
        TuiEvent::Shortcut(KeyChord {
            ctrl,
            shift,
            alt,
            key,
        })
    };

    match key_event.code {
        KeyCode::Char('c') if ctrl && !alt => Some(TuiEvent::ForceQuit),
        KeyCode::Char(c) if ctrl || alt => Some(chord(ChordKey::Char(c.to_ascii_lowercase()))),
        KeyCode::Char(c) => Some(TuiEvent::InputChar(c)),
        KeyCode::Left if alt || ctrl => Some(chord(ChordKey::Left)),
        KeyCode::Right if alt || ctrl => Some(chord(ChordKey::Right)),
        KeyCode::Left => Some(TuiEvent::CursorLeft),
        KeyCode::Right => Some(TuiEvent::CursorRight),
        KeyCode::Up => Some(TuiEvent::CursorUp),
        KeyCode::Down => Some(TuiEvent::CursorDown),
        KeyCode::Enter => Some(TuiEvent::Submit),
        KeyCode::Esc => Some(TuiEvent::Escape),
        KeyCode::Tab => Some(TuiEvent::NextTab),
        KeyCode::BackTab => Some(TuiEvent::PrevTab),
        KeyCode::F(10) => Some(TuiEvent::OpenMenu),
        _ => None,
    }
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    if !event::poll(timeout).unwrap_or(false) {
        return None;
    }
    match event::read().ok()? {
        Event::Key(key_event) => {
            log::debug!("Key event: {:?} with modifiers {:?}", key_event.code, key_event.modifiers);
            map_key(key_event)
        }
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}
