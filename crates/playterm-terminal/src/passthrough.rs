use std::io::Write;

use playterm_types::Geometry;

use super::widget::{ElementRef, InputHandler, TerminalWidget};

/// Geometry probe consulted whenever a proposal is requested
pub type GeometrySource = Box<dyn Fn() -> Geometry + Send>;

/// Widget that copies instance output verbatim to a writer
///
/// The host terminal does the actual emulation, so this is what the CLI binds
/// to stdout.
pub struct PassthroughWidget<W: Write + Send> {
    writer: W,
    geometry: Geometry,
    source: Option<GeometrySource>,
    element: Option<ElementRef>,
    input: Option<InputHandler>,
}

impl<W: Write + Send> PassthroughWidget<W> {
    pub fn new(writer: W, geometry: Geometry) -> Self {
        Self {
            writer,
            geometry,
            source: None,
            element: None,
            input: None,
        }
    }

    /// Propose geometry from a live probe (e.g. the host terminal size)
    pub fn with_geometry_source(mut self, source: GeometrySource) -> Self {
        self.source = Some(source);
        self
    }

    /// Forward locally produced input to the subscriber, if any
    pub fn emit_input(&self, data: &str) -> bool {
        match self.input.as_ref() {
            Some(handler) => {
                handler(data);
                true
            }
            None => false,
        }
    }

    pub fn element(&self) -> Option<&ElementRef> {
        self.element.as_ref()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> TerminalWidget for PassthroughWidget<W> {
    fn open(&mut self, element: &ElementRef) {
        self.element = Some(element.clone());
    }

    fn write(&mut self, data: &str) {
        let result = self
            .writer
            .write_all(data.as_bytes())
            .and_then(|_| self.writer.flush());
        if let Err(e) = result {
            log::warn!("Failed to write terminal output: {}", e);
        }
    }

    fn resize(&mut self, geometry: Geometry) {
        self.geometry = geometry;
    }

    fn proposed_geometry(&self) -> Geometry {
        match self.source.as_ref() {
            Some(source) => source(),
            None => self.geometry,
        }
    }

    fn on_input(&mut self, handler: InputHandler) {
        self.input = Some(handler);
    }

    fn dispose(&mut self) {
        self.input = None;
        let _ = self.writer.flush();
    }

    fn widget_name(&self) -> &str {
        "passthrough"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_output_is_copied_verbatim() {
        let mut widget = PassthroughWidget::new(Vec::new(), Geometry::default());
        widget.write("\x1b[1mbold\x1b[0m");
        widget.write(" plain");

        assert_eq!(widget.into_inner(), b"\x1b[1mbold\x1b[0m plain".to_vec());
    }

    #[test]
    fn test_geometry_source_wins_over_stored_geometry() {
        let widget = PassthroughWidget::new(Vec::new(), Geometry::new(80, 24))
            .with_geometry_source(Box::new(|| Geometry::new(200, 50)));

        assert_eq!(widget.proposed_geometry(), Geometry::new(200, 50));
    }

    #[test]
    fn test_emit_input_requires_subscription() {
        let mut widget = PassthroughWidget::new(Vec::new(), Geometry::default());
        assert!(!widget.emit_input("x"));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        widget.on_input(Box::new(move |data| sink.lock().unwrap().push(data.to_string())));

        assert!(widget.emit_input("pwd\n"));
        assert_eq!(*seen.lock().unwrap(), vec!["pwd\n".to_string()]);
    }
}
