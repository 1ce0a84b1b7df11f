/// Rendering capability abstraction for terminal bindings
use playterm_types::Geometry;
use std::fmt;

/// Callback fired with every chunk of locally produced input (keystrokes, paste)
pub type InputHandler = Box<dyn Fn(&str) + Send + Sync>;

/// Opaque reference to a UI element supplied by the embedding application
///
/// The multiplexer never interprets the id; it only hands it back to the
/// widget it opens on that element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef {
    id: String,
}

impl ElementRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl From<&str> for ElementRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Terminal widget trait - the surface that paints instance output and reports input
///
/// Widgets are driven from a single task; implementations need `Send` only so
/// the owning session can move between tasks.
pub trait TerminalWidget: Send {
    /// Attach the widget to a UI element
    fn open(&mut self, element: &ElementRef);

    /// Render output produced by the remote instance
    fn write(&mut self, data: &str);

    /// Apply a new viewport geometry
    fn resize(&mut self, geometry: Geometry);

    /// Geometry the widget would like given its current element
    fn proposed_geometry(&self) -> Geometry;

    /// Subscribe to locally produced input
    /// A later call replaces the previous handler
    fn on_input(&mut self, handler: InputHandler);

    /// Release resources held by the widget
    fn dispose(&mut self) {}

    /// Get widget name for debugging
    fn widget_name(&self) -> &str;
}
