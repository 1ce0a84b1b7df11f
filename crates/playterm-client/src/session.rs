use std::collections::HashMap;

use playterm_types::{ClientMessage, Geometry, InstanceDescriptor, ServerMessage, SessionId};

use crate::api::ApiClient;
use crate::binding::TerminalBinding;
use crate::channel::{ControlChannel, Outbound};
use crate::config::ClientConfig;
use crate::error::{ChannelError, InstanceError, TerminalError};
use crate::registry::{Delivery, Instance, InstanceRegistry};
use crate::resize;
use crate::surface::Surface;

/// Replay snippet wired to an instance
#[derive(Debug, Clone)]
struct SnippetTrigger {
    instance: String,
    text: String,
}

/// Drives every instance of one session over a single control channel
///
/// The manager is owned by one task and mutated only through `&mut self`.
/// Inbound messages are handled one at a time, in arrival order, through
/// [`SessionManager::handle`]; the only suspension points are the two HTTP
/// exchanges (`create_instance` and, before the manager exists, session
/// creation).
pub struct SessionManager {
    session_id: SessionId,
    api: ApiClient,
    channel: ControlChannel,
    outbound: Outbound,
    registry: InstanceRegistry,
    surface: Box<dyn Surface>,
    snippets: HashMap<String, SnippetTrigger>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session_id", &self.session_id)
            .field("base_url", &self.api.config().base_url)
            .field("instances", &self.registry.len())
            .field("snippets", &self.snippets.len())
            .finish()
    }
}

impl SessionManager {
    /// Create a manager for an existing session over an open channel
    pub fn init(
        session_id: SessionId,
        config: ClientConfig,
        channel: ControlChannel,
        surface: Box<dyn Surface>,
    ) -> Self {
        Self::with_api(session_id, ApiClient::new(config), channel, surface)
    }

    /// Create a manager that reuses an existing API client
    pub fn with_api(
        session_id: SessionId,
        api: ApiClient,
        channel: ControlChannel,
        surface: Box<dyn Surface>,
    ) -> Self {
        log::info!("Session {} initialized against {}", session_id, api.config().base_url);
        let outbound = channel.outbound();

        Self {
            session_id,
            api,
            channel,
            outbound,
            registry: InstanceRegistry::new(),
            surface,
            snippets: HashMap::new(),
        }
    }

    /// Open the session's websocket channel and create a manager on it
    pub async fn connect(
        session_id: SessionId,
        config: ClientConfig,
        surface: Box<dyn Surface>,
    ) -> Result<Self, ChannelError> {
        let url = config.channel_url(session_id.as_str())?;
        let channel = ControlChannel::connect(&url).await?;
        Ok(Self::init(session_id, config, channel, surface))
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn config(&self) -> &ClientConfig {
        self.api.config()
    }

    pub fn registry(&self) -> &InstanceRegistry {
        &self.registry
    }

    pub fn instance(&self, name: &str) -> Option<&Instance> {
        self.registry.get(name)
    }

    /// Instance names in registry insertion order
    pub fn instance_names(&self) -> Vec<String> {
        self.registry.names().map(str::to_string).collect()
    }

    /// Output waiting for `name`'s first terminal
    pub fn buffered(&self, name: &str) -> Option<&str> {
        self.registry.buffered(name)
    }

    pub fn binding_count(&self, name: &str) -> usize {
        self.registry
            .get(name)
            .map(|instance| instance.bindings().len())
            .unwrap_or(0)
    }

    /// Handle for sending raw messages on the control channel
    pub fn outbound(&self) -> Outbound {
        self.outbound.clone()
    }

    pub fn surface_mut(&mut self) -> &mut dyn Surface {
        self.surface.as_mut()
    }

    // ------------------------------------------------------------------
    // Inbound dispatch
    // ------------------------------------------------------------------

    /// Dispatch one inbound message
    ///
    /// `ViewportResize` is applied to every terminal of every instance, not
    /// only the instance that asked for it. That session-wide behavior is
    /// kept deliberately even though per-instance geometry is probably what
    /// viewers expect.
    pub fn handle(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::TerminalOut(name, data) => {
                if self.registry.deliver(&name, &data) == Delivery::Buffered {
                    log::debug!("Buffered {} bytes for unbound instance {}", data.len(), name);
                }
            }
            ServerMessage::ViewportResize(cols, rows) => {
                resize::apply(&mut self.registry, Geometry::new(cols, rows));
            }
        }
    }

    /// Wait for the next inbound message without handling it
    pub async fn next_message(&mut self) -> Option<ServerMessage> {
        self.channel.recv().await
    }

    /// Wait for and handle one inbound message; false once the channel closed
    pub async fn pump(&mut self) -> bool {
        match self.channel.recv().await {
            Some(message) => {
                self.handle(message);
                true
            }
            None => false,
        }
    }

    /// Handle every message already queued, without waiting
    pub fn pump_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Some(message) = self.channel.try_recv() {
            self.handle(message);
            handled += 1;
        }
        handled
    }

    /// Handle inbound messages until the remote side closes the channel
    pub async fn run(&mut self) {
        while self.pump().await {}
        log::info!("Session {} channel closed", self.session_id);
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Propose the first bound terminal's geometry to the remote side
    ///
    /// Sends nothing while no terminal is bound.
    pub fn resize(&self) -> Option<Geometry> {
        resize::emit_proposal(&self.registry, &self.outbound)
    }

    /// Viewport trigger for the embedding application (window resize, SIGWINCH)
    pub fn on_viewport_change(&self) -> Option<Geometry> {
        self.resize()
    }

    // ------------------------------------------------------------------
    // Instance and terminal lifecycle
    // ------------------------------------------------------------------

    /// Ask the service for a new instance in this session
    ///
    /// Not retried; the caller decides what to do with a failure.
    pub async fn create_instance(&mut self) -> Result<InstanceDescriptor, InstanceError> {
        let descriptor = self.api.create_instance(&self.session_id).await?;
        self.registry.upsert(descriptor.clone());
        Ok(descriptor)
    }

    /// Bind every element the surface maps to `target` to instance `name`
    ///
    /// Each new terminal proposes its geometry as soon as it is opened. Replay
    /// snippets for `target` are rewired to `name`. Output buffered for
    /// `name` is replayed into the new terminals. Returns how many terminals
    /// were bound.
    pub fn create_terminal(&mut self, target: &str, name: &str) -> usize {
        self.registry.ensure(name);

        let elements = self.surface.elements(target);
        if elements.is_empty() {
            log::warn!("No elements mapped to target '{}'", target);
        }

        let mut bindings = Vec::with_capacity(elements.len());
        for element in elements {
            let widget = self.surface.create_widget(&element);
            let binding = TerminalBinding::open(element, widget, name, &self.outbound);
            self.outbound
                .send(ClientMessage::resize(binding.proposed_geometry()));
            bindings.push(binding);
        }

        for snippet in self.surface.snippets(target) {
            log::debug!("Wiring snippet {} to {}", snippet.id, name);
            self.snippets.insert(
                snippet.id,
                SnippetTrigger {
                    instance: name.to_string(),
                    text: snippet.text,
                },
            );
        }

        let bound = self.registry.bind(name, bindings);
        log::info!("Bound {} terminal(s) for {} to instance {}", bound, target, name);
        bound
    }

    /// Create an instance and bind `target` to it
    pub async fn terminal(&mut self, target: &str) -> Result<InstanceDescriptor, TerminalError> {
        let descriptor = self.create_instance().await.map_err(|e| {
            log::warn!("Could not create instance for {}: {}", target, e);
            TerminalError::from(e)
        })?;

        self.create_terminal(target, &descriptor.name);
        Ok(descriptor)
    }

    /// Send input to an instance as if typed into one of its terminals
    pub fn send_input(&self, name: &str, data: &str) {
        self.outbound.send(ClientMessage::input(name, data));
    }

    /// Activate a wired replay snippet; false if `id` was never wired
    pub fn replay_snippet(&self, id: &str) -> bool {
        match self.snippets.get(id) {
            Some(trigger) => {
                self.send_input(&trigger.instance, &trigger.text);
                true
            }
            None => false,
        }
    }

    /// End the session: dispose every terminal, drop buffers and snippet
    /// wiring, then close the control channel
    pub async fn shutdown(mut self) {
        log::info!(
            "Shutting down session {} ({} instance(s))",
            self.session_id,
            self.registry.len()
        );
        self.registry.clear();
        self.snippets.clear();
        self.channel.close().await;
    }
}
