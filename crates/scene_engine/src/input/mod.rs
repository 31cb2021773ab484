//! Keyboard and mouse input
//!
//! [`crate::render::Window`] turns GLFW events into [`InputEvent`]s and the
//! engine feeds them to an [`InputDispatcher`], which runs the registered
//! callbacks.

pub mod dispatcher;

pub use dispatcher::{handlers, InputDispatcher, KeyCallback, LoopControl, MouseCallback};

use bitflags::bitflags;

/// Key codes
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Num0, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Tab key
    Tab,
    /// Backspace key
    Backspace,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Left or right shift
    Shift,
    /// Left or right control
    Control,
    /// Left or right alt
    Alt,
    /// Any key without a mapping
    Unknown,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
    /// Extra buttons 4..8
    Other(u8),
}

/// What happened to a key or button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    /// Went down
    Press,
    /// Came up
    Release,
    /// Held long enough to auto-repeat
    Repeat,
}

bitflags! {
    /// Modifier keys held during an event
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Either shift
        const SHIFT = 1 << 0;
        /// Either control
        const CONTROL = 1 << 1;
        /// Either alt
        const ALT = 1 << 2;
        /// Either super / command
        const SUPER = 1 << 3;
    }
}

/// Keyboard event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Logical key
    pub key: KeyCode,
    /// Platform scancode
    pub scancode: i32,
    /// Press, release or repeat
    pub action: Action,
    /// Held modifiers
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Convenience constructor without scancode or modifiers
    pub fn new(key: KeyCode, action: Action) -> Self {
        Self { key, scancode: 0, action, modifiers: Modifiers::empty() }
    }
}

/// Mouse button event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseButtonEvent {
    /// Button
    pub button: MouseButton,
    /// Press or release
    pub action: Action,
    /// Held modifiers
    pub modifiers: Modifiers,
}

impl MouseButtonEvent {
    /// Convenience constructor without modifiers
    pub fn new(button: MouseButton, action: Action) -> Self {
        Self { button, action, modifiers: Modifiers::empty() }
    }
}

/// Window event relevant to the scene loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Keyboard
    Key(KeyEvent),
    /// Mouse button
    MouseButton(MouseButtonEvent),
    /// Cursor position in screen coordinates
    CursorMoved {
        /// X from the left edge
        x: f64,
        /// Y from the top edge
        y: f64,
    },
    /// Framebuffer size in pixels
    FramebufferResized {
        /// Width
        width: i32,
        /// Height
        height: i32,
    },
    /// User asked to close the window
    CloseRequested,
}

impl InputEvent {
    /// Convert a GLFW event; events the scene loop does not use map to `None`
    pub fn from_glfw(event: &glfw::WindowEvent) -> Option<Self> {
        match *event {
            glfw::WindowEvent::Key(key, scancode, action, mods) => Some(Self::Key(KeyEvent {
                key: key.into(),
                scancode,
                action: action.into(),
                modifiers: mods.into(),
            })),
            glfw::WindowEvent::MouseButton(button, action, mods) => {
                Some(Self::MouseButton(MouseButtonEvent {
                    button: button.into(),
                    action: action.into(),
                    modifiers: mods.into(),
                }))
            }
            glfw::WindowEvent::CursorPos(x, y) => Some(Self::CursorMoved { x, y }),
            glfw::WindowEvent::FramebufferSize(width, height) => {
                Some(Self::FramebufferResized { width, height })
            }
            glfw::WindowEvent::Close => Some(Self::CloseRequested),
            _ => None,
        }
    }
}

impl From<glfw::Action> for Action {
    fn from(action: glfw::Action) -> Self {
        match action {
            glfw::Action::Press => Self::Press,
            glfw::Action::Release => Self::Release,
            glfw::Action::Repeat => Self::Repeat,
        }
    }
}

impl From<glfw::Modifiers> for Modifiers {
    fn from(mods: glfw::Modifiers) -> Self {
        let mut out = Self::empty();
        out.set(Self::SHIFT, mods.contains(glfw::Modifiers::Shift));
        out.set(Self::CONTROL, mods.contains(glfw::Modifiers::Control));
        out.set(Self::ALT, mods.contains(glfw::Modifiers::Alt));
        out.set(Self::SUPER, mods.contains(glfw::Modifiers::Super));
        out
    }
}

impl From<glfw::MouseButton> for MouseButton {
    fn from(button: glfw::MouseButton) -> Self {
        match button {
            glfw::MouseButton::Button1 => Self::Left,
            glfw::MouseButton::Button2 => Self::Right,
            glfw::MouseButton::Button3 => Self::Middle,
            glfw::MouseButton::Button4 => Self::Other(4),
            glfw::MouseButton::Button5 => Self::Other(5),
            glfw::MouseButton::Button6 => Self::Other(6),
            glfw::MouseButton::Button7 => Self::Other(7),
            glfw::MouseButton::Button8 => Self::Other(8),
        }
    }
}

impl From<glfw::Key> for KeyCode {
    fn from(key: glfw::Key) -> Self {
        use glfw::Key as G;
        match key {
            G::A => Self::A, G::B => Self::B, G::C => Self::C, G::D => Self::D,
            G::E => Self::E, G::F => Self::F, G::G => Self::G, G::H => Self::H,
            G::I => Self::I, G::J => Self::J, G::K => Self::K, G::L => Self::L,
            G::M => Self::M, G::N => Self::N, G::O => Self::O, G::P => Self::P,
            G::Q => Self::Q, G::R => Self::R, G::S => Self::S, G::T => Self::T,
            G::U => Self::U, G::V => Self::V, G::W => Self::W, G::X => Self::X,
            G::Y => Self::Y, G::Z => Self::Z,
            G::Num0 => Self::Num0, G::Num1 => Self::Num1, G::Num2 => Self::Num2,
            G::Num3 => Self::Num3, G::Num4 => Self::Num4, G::Num5 => Self::Num5,
            G::Num6 => Self::Num6, G::Num7 => Self::Num7, G::Num8 => Self::Num8,
            G::Num9 => Self::Num9,
            G::F1 => Self::F1, G::F2 => Self::F2, G::F3 => Self::F3, G::F4 => Self::F4,
            G::F5 => Self::F5, G::F6 => Self::F6, G::F7 => Self::F7, G::F8 => Self::F8,
            G::F9 => Self::F9, G::F10 => Self::F10, G::F11 => Self::F11, G::F12 => Self::F12,
            G::Space => Self::Space,
            G::Enter | G::KpEnter => Self::Enter,
            G::Escape => Self::Escape,
            G::Tab => Self::Tab,
            G::Backspace => Self::Backspace,
            G::Up => Self::Up,
            G::Down => Self::Down,
            G::Left => Self::Left,
            G::Right => Self::Right,
            G::LeftShift | G::RightShift => Self::Shift,
            G::LeftControl | G::RightControl => Self::Control,
            G::LeftAlt | G::RightAlt => Self::Alt,
            _ => Self::Unknown,
        }
    }
}
