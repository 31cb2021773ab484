//! Callback registry for keyboard and mouse events

use super::{Action, InputEvent, KeyCode, KeyEvent, MouseButton, MouseButtonEvent};
use std::collections::HashMap;

/// Requests a callback can make of the main loop
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopControl {
    close_requested: bool,
}

impl LoopControl {
    /// Ask the main loop to close the window after this frame
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Whether a close has been requested
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }
}

/// Callback seeing every key event
pub type KeyCallback = Box<dyn FnMut(&KeyEvent, &mut LoopControl)>;
/// Callback seeing every mouse button event
pub type MouseCallback = Box<dyn FnMut(&MouseButtonEvent, &mut LoopControl)>;

/// Routes input events to registered callbacks
///
/// For each key event the generic callbacks run first, in registration
/// order, then the binding for the exact `(action, key)` pair if one exists.
/// Mouse buttons work the same way.
#[derive(Default)]
pub struct InputDispatcher {
    key_callbacks: Vec<KeyCallback>,
    key_bindings: HashMap<(Action, KeyCode), Box<dyn FnMut()>>,
    mouse_callbacks: Vec<MouseCallback>,
    mouse_bindings: HashMap<(Action, MouseButton), Box<dyn FnMut()>>,
    cursor: (f64, f64),
}

impl InputDispatcher {
    /// Empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for every key event
    pub fn add_key_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&KeyEvent, &mut LoopControl) + 'static,
    {
        self.key_callbacks.push(Box::new(callback));
    }

    /// Run `callback` whenever `key` sees `action`; replaces an earlier binding
    pub fn bind_key<F>(&mut self, action: Action, key: KeyCode, callback: F)
    where
        F: FnMut() + 'static,
    {
        if self.key_bindings.insert((action, key), Box::new(callback)).is_some() {
            log::debug!("Replaced key binding for {:?} {:?}", action, key);
        }
    }

    /// Register a callback for every mouse button event
    pub fn add_mouse_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&MouseButtonEvent, &mut LoopControl) + 'static,
    {
        self.mouse_callbacks.push(Box::new(callback));
    }

    /// Run `callback` whenever `button` sees `action`; replaces an earlier binding
    pub fn bind_mouse<F>(&mut self, action: Action, button: MouseButton, callback: F)
    where
        F: FnMut() + 'static,
    {
        if self.mouse_bindings.insert((action, button), Box::new(callback)).is_some() {
            log::debug!("Replaced mouse binding for {:?} {:?}", action, button);
        }
    }

    /// Run the callbacks interested in `event`
    pub fn dispatch(&mut self, event: &InputEvent, control: &mut LoopControl) {
        match event {
            InputEvent::Key(key_event) => {
                for callback in &mut self.key_callbacks {
                    callback(key_event, control);
                }
                if let Some(binding) = self.key_bindings.get_mut(&(key_event.action, key_event.key)) {
                    binding();
                }
            }
            InputEvent::MouseButton(button_event) => {
                for callback in &mut self.mouse_callbacks {
                    callback(button_event, control);
                }
                if let Some(binding) =
                    self.mouse_bindings.get_mut(&(button_event.action, button_event.button))
                {
                    binding();
                }
            }
            InputEvent::CursorMoved { x, y } => self.cursor = (*x, *y),
            InputEvent::FramebufferResized { .. } => {}
            InputEvent::CloseRequested => control.request_close(),
        }
    }

    /// Last cursor position seen by [`InputDispatcher::dispatch`]
    pub fn cursor_position(&self) -> (f64, f64) {
        self.cursor
    }

    /// Number of generic key callbacks
    pub fn key_callback_count(&self) -> usize {
        self.key_callbacks.len()
    }
}

/// Ready-made callbacks
pub mod handlers {
    use super::LoopControl;
    use crate::input::{Action, KeyCode, KeyEvent};

    /// Close the window when Escape is pressed
    pub fn quit_on_escape(event: &KeyEvent, control: &mut LoopControl) {
        if event.key == KeyCode::Escape && event.action == Action::Press {
            log::info!("Escape pressed, closing window");
            control.request_close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_generic_callbacks_run_before_binding() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = InputDispatcher::new();

        let log = Rc::clone(&order);
        dispatcher.bind_key(Action::Press, KeyCode::W, move || log.borrow_mut().push("binding"));
        let log = Rc::clone(&order);
        dispatcher.add_key_callback(move |_, _| log.borrow_mut().push("first"));
        let log = Rc::clone(&order);
        dispatcher.add_key_callback(move |_, _| log.borrow_mut().push("second"));

        let mut control = LoopControl::default();
        dispatcher.dispatch(&InputEvent::Key(KeyEvent::new(KeyCode::W, Action::Press)), &mut control);

        assert_eq!(*order.borrow(), vec!["first", "second", "binding"]);
    }

    #[test]
    fn test_binding_matches_action_and_key() {
        let hits = Rc::new(RefCell::new(0));
        let mut dispatcher = InputDispatcher::new();
        let counter = Rc::clone(&hits);
        dispatcher.bind_key(Action::Press, KeyCode::Space, move || *counter.borrow_mut() += 1);

        let mut control = LoopControl::default();
        dispatcher.dispatch(&InputEvent::Key(KeyEvent::new(KeyCode::Space, Action::Release)), &mut control);
        dispatcher.dispatch(&InputEvent::Key(KeyEvent::new(KeyCode::A, Action::Press)), &mut control);
        assert_eq!(*hits.borrow(), 0);

        dispatcher.dispatch(&InputEvent::Key(KeyEvent::new(KeyCode::Space, Action::Press)), &mut control);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_rebinding_replaces() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = InputDispatcher::new();
        let a = Rc::clone(&hits);
        dispatcher.bind_mouse(Action::Press, MouseButton::Left, move || a.borrow_mut().push(1));
        let b = Rc::clone(&hits);
        dispatcher.bind_mouse(Action::Press, MouseButton::Left, move || b.borrow_mut().push(2));

        let mut control = LoopControl::default();
        dispatcher.dispatch(
            &InputEvent::MouseButton(MouseButtonEvent::new(MouseButton::Left, Action::Press)),
            &mut control,
        );
        assert_eq!(*hits.borrow(), vec![2]);
    }

    #[test]
    fn test_quit_on_escape() {
        let mut dispatcher = InputDispatcher::new();
        dispatcher.add_key_callback(handlers::quit_on_escape);

        let mut control = LoopControl::default();
        dispatcher.dispatch(&InputEvent::Key(KeyEvent::new(KeyCode::Escape, Action::Release)), &mut control);
        assert!(!control.close_requested());
        dispatcher.dispatch(&InputEvent::Key(KeyEvent::new(KeyCode::Escape, Action::Press)), &mut control);
        assert!(control.close_requested());
    }

    #[test]
    fn test_cursor_and_close_events() {
        let mut dispatcher = InputDispatcher::new();
        let mut control = LoopControl::default();

        dispatcher.dispatch(&InputEvent::CursorMoved { x: 12.5, y: 40.0 }, &mut control);
        assert_eq!(dispatcher.cursor_position(), (12.5, 40.0));
        assert!(!control.close_requested());

        dispatcher.dispatch(&InputEvent::CloseRequested, &mut control);
        assert!(control.close_requested());
    }
}
