//! Viewport geometry negotiation
//!
//! Geometry is session-global: one proposal goes out for the whole session
//! and an inbound geometry is applied to every terminal of every instance.

use playterm_types::{ClientMessage, Geometry};

use crate::channel::Outbound;
use crate::registry::InstanceRegistry;

/// Geometry to propose for the session, taken from the first bound terminal
pub fn proposal(registry: &InstanceRegistry) -> Option<Geometry> {
    registry
        .first_binding()
        .map(|binding| binding.proposed_geometry())
}

/// Send the current proposal out; nothing is sent while no terminal is bound
pub fn emit_proposal(registry: &InstanceRegistry, outbound: &Outbound) -> Option<Geometry> {
    let geometry = proposal(registry)?;
    log::debug!("Proposing viewport {}", geometry);
    outbound.send(ClientMessage::resize(geometry));
    Some(geometry)
}

/// Apply an inbound geometry to every terminal
///
/// A geometry with a zero side is dropped.
pub fn apply(registry: &mut InstanceRegistry, geometry: Geometry) {
    if geometry.cols == 0 || geometry.rows == 0 {
        log::warn!("Ignoring empty viewport {}", geometry);
        return;
    }
    let resized = registry.resize_all(geometry);
    log::debug!("Applied viewport {} to {} terminal(s)", geometry, resized);
}
