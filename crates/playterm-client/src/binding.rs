use playterm_terminal::{ElementRef, TerminalWidget};
use playterm_types::{ClientMessage, Geometry};

use crate::channel::Outbound;

/// One UI element rendering one instance through one widget
///
/// Local input produced by the widget is sent out tagged with the instance
/// name the binding was opened for.
pub struct TerminalBinding {
    element: ElementRef,
    widget: Box<dyn TerminalWidget>,
}

impl std::fmt::Debug for TerminalBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalBinding")
            .field("element", &self.element)
            .field("widget", &self.widget.widget_name())
            .finish()
    }
}

impl TerminalBinding {
    /// Open `widget` on `element` and route its input to `instance`
    pub fn open(
        element: ElementRef,
        mut widget: Box<dyn TerminalWidget>,
        instance: &str,
        outbound: &Outbound,
    ) -> Self {
        widget.open(&element);

        let outbound = outbound.clone();
        let instance = instance.to_string();
        widget.on_input(Box::new(move |data| {
            outbound.send(ClientMessage::input(instance.as_str(), data));
        }));

        Self { element, widget }
    }

    pub fn element(&self) -> &ElementRef {
        &self.element
    }

    pub fn write(&mut self, data: &str) {
        self.widget.write(data);
    }

    pub fn resize(&mut self, geometry: Geometry) {
        self.widget.resize(geometry);
    }

    pub fn proposed_geometry(&self) -> Geometry {
        self.widget.proposed_geometry()
    }

    pub fn dispose(&mut self) {
        self.widget.dispose();
    }
}
