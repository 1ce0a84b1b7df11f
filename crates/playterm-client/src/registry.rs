use std::collections::HashMap;

use indexmap::IndexMap;
use playterm_types::{Geometry, InstanceDescriptor};

use crate::binding::TerminalBinding;
use crate::buffer::OutputBuffer;

/// One addressable remote shell and the terminals rendering it
#[derive(Debug)]
pub struct Instance {
    descriptor: InstanceDescriptor,
    bindings: Vec<TerminalBinding>,
}

impl Instance {
    fn new(descriptor: InstanceDescriptor) -> Self {
        Self {
            descriptor,
            bindings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &InstanceDescriptor {
        &self.descriptor
    }

    /// Bindings in creation order
    pub fn bindings(&self) -> &[TerminalBinding] {
        &self.bindings
    }

    pub fn is_bound(&self) -> bool {
        !self.bindings.is_empty()
    }
}

/// Where a chunk of instance output ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Written to this many bindings
    Rendered(usize),
    /// Held until the first binding exists
    Buffered,
}

/// Instances of one session, keyed by name in insertion order
///
/// Buffers live beside the instances and only for names without bindings;
/// the first bind flushes and drops the buffer for good.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: IndexMap<String, Instance>,
    buffers: HashMap<String, OutputBuffer>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.instances.get(name)
    }

    /// Instance names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.instances.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instance> {
        self.instances.values()
    }

    /// Get the instance for `name`, inserting an empty placeholder if absent
    pub fn ensure(&mut self, name: &str) -> &mut Instance {
        self.instances
            .entry(name.to_string())
            .or_insert_with(|| {
                log::debug!("Registering placeholder instance {}", name);
                Instance::new(InstanceDescriptor::named(name))
            })
    }

    /// Record a freshly allocated instance
    ///
    /// A placeholder already registered under the same name keeps its
    /// bindings, buffer and position; only its descriptor is replaced.
    pub fn upsert(&mut self, descriptor: InstanceDescriptor) -> &Instance {
        let name = descriptor.name.clone();
        let instance = self.ensure(&name);
        instance.descriptor = descriptor;
        instance
    }

    /// Route output for `name` to its bindings, or buffer it
    pub fn deliver(&mut self, name: &str, data: &str) -> Delivery {
        let instance = self.ensure(name);
        if instance.is_bound() {
            for binding in instance.bindings.iter_mut() {
                binding.write(data);
            }
            return Delivery::Rendered(instance.bindings.len());
        }

        self.buffers
            .entry(name.to_string())
            .or_default()
            .push(data);
        Delivery::Buffered
    }

    /// Append bindings to `name`, after any it already has
    ///
    /// Pending output is replayed to the new bindings in creation order and
    /// the buffer is discarded. With no new bindings the buffer stays put.
    /// Returns the number of bindings appended.
    pub fn bind(&mut self, name: &str, bindings: Vec<TerminalBinding>) -> usize {
        let added = bindings.len();
        let instance = self.ensure(name);
        let first_new = instance.bindings.len();
        instance.bindings.extend(bindings);

        if added == 0 {
            return 0;
        }

        if let Some(buffer) = self.buffers.remove(name) {
            let pending = buffer.take();
            log::debug!(
                "Flushing {} buffered bytes to {} new terminal(s) of {}",
                pending.len(),
                added,
                name
            );
            if let Some(instance) = self.instances.get_mut(name) {
                for binding in instance.bindings[first_new..].iter_mut() {
                    binding.write(&pending);
                }
            }
        }

        added
    }

    /// Output waiting for `name`'s first binding
    pub fn buffered(&self, name: &str) -> Option<&str> {
        self.buffers.get(name).map(OutputBuffer::as_str)
    }

    /// First binding of the first instance, in insertion order, that has one
    pub fn first_binding(&self) -> Option<&TerminalBinding> {
        self.instances
            .values()
            .find_map(|instance| instance.bindings.first())
    }

    /// Apply a geometry to every binding of every instance
    pub fn resize_all(&mut self, geometry: Geometry) -> usize {
        let mut resized = 0;
        for instance in self.instances.values_mut() {
            for binding in instance.bindings.iter_mut() {
                binding.resize(geometry);
                resized += 1;
            }
        }
        resized
    }

    /// Dispose every binding and forget all instances and buffers
    pub fn clear(&mut self) {
        for (name, mut instance) in self.instances.drain(..) {
            log::debug!("Disposing {} terminal(s) of {}", instance.bindings.len(), name);
            for binding in instance.bindings.iter_mut() {
                binding.dispose();
            }
        }
        self.buffers.clear();
    }
}
