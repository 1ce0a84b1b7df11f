use std::sync::{Arc, Mutex, MutexGuard};

use playterm_types::Geometry;
use vt100::Parser;

use super::widget::{ElementRef, InputHandler, TerminalWidget};
use super::DEFAULT_SCROLLBACK_LINES;

/// Terminal screen state shared between the widget and its handles
struct ScreenState {
    parser: Parser,
    geometry: Geometry,
    element: Option<ElementRef>,
    input: Option<InputHandler>,
    bytes_written: usize,
}

/// VT100 screen model bound to one element
///
/// Output is fed through a `vt100` parser so embedders can read back the
/// rendered screen through a [`ScreenHandle`].
pub struct ScreenWidget {
    state: Arc<Mutex<ScreenState>>,
}

/// Cloneable read/input handle onto a [`ScreenWidget`]
#[derive(Clone)]
pub struct ScreenHandle {
    state: Arc<Mutex<ScreenState>>,
}

fn lock(state: &Mutex<ScreenState>) -> MutexGuard<'_, ScreenState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// vt100 cannot hold an empty grid
fn at_least_one_cell(geometry: Geometry) -> Geometry {
    Geometry::new(geometry.cols.max(1), geometry.rows.max(1))
}

impl ScreenWidget {
    /// Create a new screen widget
    pub fn new(geometry: Geometry) -> Self {
        Self::with_scrollback(geometry, DEFAULT_SCROLLBACK_LINES)
    }

    pub fn with_scrollback(geometry: Geometry, scrollback_lines: usize) -> Self {
        let geometry = at_least_one_cell(geometry);
        let parser = Parser::new(geometry.rows, geometry.cols, scrollback_lines);

        Self {
            state: Arc::new(Mutex::new(ScreenState {
                parser,
                geometry,
                element: None,
                input: None,
                bytes_written: 0,
            })),
        }
    }

    /// Handle for reading the screen after the widget has been handed to a session
    pub fn handle(&self) -> ScreenHandle {
        ScreenHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl TerminalWidget for ScreenWidget {
    fn open(&mut self, element: &ElementRef) {
        lock(&self.state).element = Some(element.clone());
    }

    fn write(&mut self, data: &str) {
        let mut state = lock(&self.state);
        state.parser.process(data.as_bytes());
        state.bytes_written += data.len();
    }

    fn resize(&mut self, geometry: Geometry) {
        let geometry = at_least_one_cell(geometry);
        let mut state = lock(&self.state);
        state.parser.set_size(geometry.rows, geometry.cols);
        state.geometry = geometry;
    }

    fn proposed_geometry(&self) -> Geometry {
        lock(&self.state).geometry
    }

    fn on_input(&mut self, handler: InputHandler) {
        lock(&self.state).input = Some(handler);
    }

    fn dispose(&mut self) {
        let mut state = lock(&self.state);
        state.input = None;
        state.element = None;
    }

    fn widget_name(&self) -> &str {
        "screen"
    }
}

impl ScreenHandle {
    /// Get screen contents as plain text
    pub fn contents(&self) -> String {
        lock(&self.state).parser.screen().contents()
    }

    /// Get screen contents with ANSI formatting preserved
    pub fn contents_formatted(&self) -> String {
        let state = lock(&self.state);
        String::from_utf8_lossy(&state.parser.screen().contents_formatted()).to_string()
    }

    /// Get cursor position (row, col)
    pub fn cursor_position(&self) -> (u16, u16) {
        lock(&self.state).parser.screen().cursor_position()
    }

    pub fn geometry(&self) -> Geometry {
        lock(&self.state).geometry
    }

    /// Element the widget is open on, if any
    pub fn element(&self) -> Option<ElementRef> {
        lock(&self.state).element.clone()
    }

    pub fn bytes_written(&self) -> usize {
        lock(&self.state).bytes_written
    }

    /// Feed keystrokes as if typed into the widget
    /// Returns false when nothing is subscribed to input
    pub fn type_keys(&self, keys: &str) -> bool {
        let state = lock(&self.state);
        match state.input.as_ref() {
            Some(handler) => {
                handler(keys);
                true
            }
            None => false,
        }
    }
}
