//! UI surface injected by the embedding application
//!
//! Instead of discovering UI elements by querying global page structure, a
//! session asks its `Surface` which elements and replay snippets belong to a
//! target key, and how to build a widget for each element.

use std::collections::HashMap;

use playterm_terminal::{ElementRef, TerminalWidget};

/// Clickable content that replays its text as input to an instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub id: String,
    pub text: String,
}

impl Snippet {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Source of UI elements, widgets and replay snippets
pub trait Surface: Send {
    /// Elements that render terminals for `target`, in display order
    fn elements(&self, target: &str) -> Vec<ElementRef>;

    /// Build the widget that will render on `element`
    fn create_widget(&mut self, element: &ElementRef) -> Box<dyn TerminalWidget>;

    /// Replay snippets tagged for `target`
    fn snippets(&self, _target: &str) -> Vec<Snippet> {
        Vec::new()
    }

    /// Remove the verification UI shown for `target`
    fn dismiss_verification(&mut self, _target: &str) {}
}

pub type WidgetFactory = Box<dyn FnMut(&ElementRef) -> Box<dyn TerminalWidget> + Send>;
pub type DismissHandler = Box<dyn FnMut(&str) + Send>;

#[derive(Debug, Default)]
struct TargetEntry {
    elements: Vec<ElementRef>,
    snippets: Vec<Snippet>,
}

/// Explicit target → elements/snippets mapping with a widget factory
pub struct SurfaceMap {
    targets: HashMap<String, TargetEntry>,
    factory: WidgetFactory,
    on_dismiss: Option<DismissHandler>,
}

impl SurfaceMap {
    pub fn new<F>(factory: F) -> Self
    where
        F: FnMut(&ElementRef) -> Box<dyn TerminalWidget> + Send + 'static,
    {
        Self {
            targets: HashMap::new(),
            factory: Box::new(factory),
            on_dismiss: None,
        }
    }

    /// Map another element to `target`
    pub fn element(mut self, target: &str, element: &str) -> Self {
        self.add_element(target, ElementRef::new(element));
        self
    }

    /// Tag a replay snippet for `target`
    pub fn snippet(mut self, target: &str, id: &str, text: &str) -> Self {
        self.add_snippet(target, Snippet::new(id, text));
        self
    }

    /// Called with the target once its verification UI should go away
    pub fn on_dismiss<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.on_dismiss = Some(Box::new(handler));
        self
    }

    pub fn add_element(&mut self, target: &str, element: ElementRef) {
        self.targets
            .entry(target.to_string())
            .or_default()
            .elements
            .push(element);
    }

    pub fn add_snippet(&mut self, target: &str, snippet: Snippet) {
        self.targets
            .entry(target.to_string())
            .or_default()
            .snippets
            .push(snippet);
    }
}

impl Surface for SurfaceMap {
    fn elements(&self, target: &str) -> Vec<ElementRef> {
        self.targets
            .get(target)
            .map(|entry| entry.elements.clone())
            .unwrap_or_default()
    }

    fn create_widget(&mut self, element: &ElementRef) -> Box<dyn TerminalWidget> {
        (self.factory)(element)
    }

    fn snippets(&self, target: &str) -> Vec<Snippet> {
        self.targets
            .get(target)
            .map(|entry| entry.snippets.clone())
            .unwrap_or_default()
    }

    fn dismiss_verification(&mut self, target: &str) {
        if let Some(handler) = self.on_dismiss.as_mut() {
            handler(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playterm_terminal::ScreenWidget;
    use playterm_types::Geometry;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_surface_map_lookup() {
        let surface = SurfaceMap::new(|_| {
            Box::new(ScreenWidget::new(Geometry::default())) as Box<dyn TerminalWidget>
        })
        .element(".term", "left")
        .element(".term", "right")
        .snippet(".term", "step-1", "docker run hello-world\n");

        assert_eq!(
            surface.elements(".term"),
            vec![ElementRef::new("left"), ElementRef::new("right")]
        );
        assert_eq!(
            surface.snippets(".term"),
            vec![Snippet::new("step-1", "docker run hello-world\n")]
        );
        assert!(surface.elements(".other").is_empty());
    }

    #[test]
    fn test_factory_and_dismiss_are_invoked() {
        let created = Arc::new(Mutex::new(Vec::new()));
        let dismissed = Arc::new(Mutex::new(Vec::new()));
        let created_log = Arc::clone(&created);
        let dismissed_log = Arc::clone(&dismissed);

        let mut surface = SurfaceMap::new(move |element| {
            created_log.lock().unwrap().push(element.id().to_string());
            Box::new(ScreenWidget::new(Geometry::default())) as Box<dyn TerminalWidget>
        })
        .on_dismiss(move |target| dismissed_log.lock().unwrap().push(target.to_string()));

        let widget = surface.create_widget(&ElementRef::new("left"));
        assert_eq!(widget.widget_name(), "screen");
        surface.dismiss_verification(".term");

        assert_eq!(*created.lock().unwrap(), vec!["left".to_string()]);
        assert_eq!(*dismissed.lock().unwrap(), vec![".term".to_string()]);
    }
}
