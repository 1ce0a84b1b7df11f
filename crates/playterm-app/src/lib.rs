// playterm: drive remote playground terminals from a local shell
//
// The binary wires a session manager to stdin/stdout:
// - `new` verifies with a pre-issued token, creates a session and one
//   instance per target
// - `attach` joins an existing session, optionally rebinding a known instance
//
// Output is rendered raw to stdout and optionally recorded as JSONL
// transcripts.

pub mod app;
pub mod cli;
pub mod config;
pub mod viewport;

pub use cli::{Cli, Commands};
pub use config::{AppConfig, FileConfig};
