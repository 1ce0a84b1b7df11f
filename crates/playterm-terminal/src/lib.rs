// Terminal widget module
//
// This module defines the rendering capability a session binds instances to,
// plus the widgets shipped with playterm: a VT100 screen model, a raw
// passthrough writer and a JSONL transcript recorder.

mod passthrough;
mod screen;
mod transcript;
pub mod widget;

// Re-export public API
pub use passthrough::{GeometrySource, PassthroughWidget};
pub use screen::{ScreenHandle, ScreenWidget};
pub use transcript::TranscriptWidget;
pub use widget::{ElementRef, InputHandler, TerminalWidget};

// Constants
pub const DEFAULT_SCROLLBACK_LINES: usize = 1000;
