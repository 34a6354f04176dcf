//! The terminal event alphabet produced by the input decoder.

use std::fmt;

/// A decoded terminal event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// The terminal was resized to `(width, height)`.
    Resize(u16, u16),
    /// Text was pasted while bracketed paste mode was active.
    Paste(String),
    /// The terminal gained input focus (`CSI I`).
    FocusGained,
    /// The terminal lost input focus (`CSI O`).
    FocusLost,
}

/// A keyboard event: a code plus the modifiers held at the time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code.
    pub code: KeyCode,
    /// Active modifiers.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a key event with explicit modifiers.
    #[must_use]
    pub fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// Create a key event with no modifiers.
    #[must_use]
    pub fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// True if Ctrl is held.
    #[must_use]
    pub fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// True if Alt is held.
    #[must_use]
    pub fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// True if Shift is held.
    #[must_use]
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// A key code.
///
/// `Char` holds a full grapheme cluster rather than a single `char`, since
/// a single keystroke in a modern terminal can deliver a multi-codepoint
/// cluster (an emoji with a skin-tone modifier pasted via an IME, for
/// example) as one `Key` event.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum KeyCode {
    /// A character or grapheme cluster.
    Char(String),
    /// Enter / Return.
    Enter,
    /// Backspace.
    Backspace,
    /// Tab.
    Tab,
    /// Escape.
    Escape,
    /// Space.
    Space,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Delete.
    Delete,
    /// Insert.
    Insert,
    /// Function key (1-12).
    F(u8),
}

/// Keyboard modifier flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self(0);
    /// Shift.
    pub const SHIFT: Self = Self(1);
    /// Ctrl.
    pub const CTRL: Self = Self(2);
    /// Alt/Option.
    pub const ALT: Self = Self(4);

    /// Decode the modifier bits used by CSI `;<mod>` parameters and SGR
    /// mouse button masks: bit 0 = Shift, bit 1 = Alt, bit 2 = Ctrl.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        let mut m = 0u8;
        if bits & 0b001 != 0 {
            m |= Self::SHIFT.0;
        }
        if bits & 0b010 != 0 {
            m |= Self::ALT.0;
        }
        if bits & 0b100 != 0 {
            m |= Self::CTRL.0;
        }
        Self(m)
    }

    /// True if `self` contains every bit set in `other`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0 && other.0 != 0
    }

    /// Union of two modifier sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Which mouse button (or wheel direction) an event concerns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    /// No button (a motion-only event).
    None,
    /// Left button.
    Left,
    /// Middle button.
    Middle,
    /// Right button.
    Right,
    /// Wheel scrolled up.
    WheelUp,
    /// Wheel scrolled down.
    WheelDown,
}

/// What happened to the mouse.
///
/// `Press`/`Release`/`Motion` are the raw actions the decoder produces;
/// `Click`/`DoubleClick`/`TripleClick`/`Drag`/`Scroll` are produced by the
/// mouse enricher ([`crate::mouse`]) from sequences of raw actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseAction {
    /// A button went down.
    Press,
    /// A button went up.
    Release,
    /// The mouse moved with no button held.
    Motion,
    /// A full press-release cycle with no intervening drag.
    Click,
    /// Two clicks within the double-click window and position tolerance.
    DoubleClick,
    /// Three clicks within the window and tolerance.
    TripleClick,
    /// The mouse moved more than the drag threshold while a button was
    /// held.
    Drag,
    /// The wheel was scrolled.
    Scroll,
}

/// A mouse event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MouseEvent {
    /// Column (0-based).
    pub x: u16,
    /// Row (0-based).
    pub y: u16,
    /// The button involved.
    pub button: MouseButton,
    /// What happened.
    pub action: MouseAction,
    /// Active modifiers.
    pub modifiers: Modifiers,
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Enter => write!(f, "Enter"),
            KeyCode::Backspace => write!(f, "Backspace"),
            KeyCode::Tab => write!(f, "Tab"),
            KeyCode::Escape => write!(f, "Escape"),
            KeyCode::Space => write!(f, "Space"),
            KeyCode::Up => write!(f, "Up"),
            KeyCode::Down => write!(f, "Down"),
            KeyCode::Left => write!(f, "Left"),
            KeyCode::Right => write!(f, "Right"),
            KeyCode::Home => write!(f, "Home"),
            KeyCode::End => write!(f, "End"),
            KeyCode::PageUp => write!(f, "PageUp"),
            KeyCode::PageDown => write!(f, "PageDown"),
            KeyCode::Delete => write!(f, "Delete"),
            KeyCode::Insert => write!(f, "Insert"),
            KeyCode::F(n) => write!(f, "F{n}"),
        }
    }
}
