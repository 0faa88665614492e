//! Keyboard input from the terminal
//!
//! Most terminals only report key presses and auto-repeats, not releases, so
//! a key is treated as held until `hold_window` has passed since its last
//! press. Where the terminal supports the keyboard enhancement protocol,
//! release events are requested and clear the key immediately.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement},
};
use log::{debug, warn};
use std::time::{Duration, Instant};

// Internal
use super::{InputError, InputReport, InputSource, Lateral, Longitudinal};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Time of the last press of each arrow key.
#[derive(Clone, Debug)]
pub struct HeldKeys {
    hold_window: Duration,
    up: Option<Instant>,
    down: Option<Instant>,
    left: Option<Instant>,
    right: Option<Instant>,
    terminate: bool,
}

/// Arrow key input read from the terminal in raw mode.
///
/// Raw mode is enabled on creation and restored on drop.
pub struct KeyboardInput {
    keys: HeldKeys,
    enhanced: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl HeldKeys {
    pub fn new(hold_window: Duration) -> Self {
        Self {
            hold_window,
            up: None,
            down: None,
            left: None,
            right: None,
            terminate: false,
        }
    }

    /// Update the held keys with a key event received at `now`.
    pub fn handle(&mut self, key: KeyEvent, now: Instant) {
        // Ctrl+C is not delivered as a signal in raw mode
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.terminate = true;
            return;
        }

        let slot = match key.code {
            KeyCode::Up => &mut self.up,
            KeyCode::Down => &mut self.down,
            KeyCode::Left => &mut self.left,
            KeyCode::Right => &mut self.right,
            KeyCode::Esc | KeyCode::Char('q') => {
                if key.kind != KeyEventKind::Release {
                    self.terminate = true;
                }
                return;
            }
            _ => return,
        };

        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => *slot = Some(now),
            KeyEventKind::Release => *slot = None,
        }
    }

    /// Build the input report for a tick starting at `now`.
    pub fn report(&self, now: Instant) -> InputReport {
        let held = |slot: Option<Instant>| match slot {
            Some(t) => now.saturating_duration_since(t) <= self.hold_window,
            None => false,
        };

        InputReport {
            longitudinal: Longitudinal::from_held(held(self.up), held(self.down)),
            lateral: Lateral::from_held(held(self.left), held(self.right)),
            terminate: self.terminate,
        }
    }
}

impl KeyboardInput {
    /// Put the terminal into raw mode and start reading keys.
    pub fn new(hold_window: Duration) -> Result<Self, InputError> {
        enable_raw_mode()?;

        let enhanced = match supports_keyboard_enhancement() {
            Ok(true) => {
                execute!(
                    std::io::stdout(),
                    PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
                )?;
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!("Could not query keyboard enhancement support: {}", e);
                false
            }
        };

        debug!("Keyboard input started (release events: {})", enhanced);

        Ok(Self {
            keys: HeldKeys::new(hold_window),
            enhanced,
        })
    }
}

impl InputSource for KeyboardInput {
    fn poll(&mut self, _sim_time_s: f64) -> Result<InputReport, InputError> {
        // Drain all pending events without blocking
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.keys.handle(key, Instant::now());
            }
        }

        Ok(self.keys.report(Instant::now()))
    }
}

impl Drop for KeyboardInput {
    fn drop(&mut self) {
        if self.enhanced {
            let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
