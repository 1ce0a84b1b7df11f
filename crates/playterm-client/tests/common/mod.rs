#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use playterm_client::{
    ChannelError, ClientConfig, Connector, ControlChannel, ElementRef, Geometry, SurfaceMap,
    TerminalWidget,
};
use playterm_terminal::InputHandler;
use serde_json::Value;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Something a recording widget was asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    Open,
    Write(String),
    Resize(Geometry),
    Dispose,
}

#[derive(Default)]
struct Recording {
    events: Vec<(String, WidgetEvent)>,
    inputs: HashMap<String, InputHandler>,
    dismissed: Vec<String>,
}

/// Shared log of everything the test widgets saw, in global order
#[derive(Clone, Default)]
pub struct Recorder {
    inner: Arc<Mutex<Recording>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recording> {
        self.inner.lock().unwrap()
    }

    pub fn widget(&self, element: &ElementRef, geometry: Geometry) -> RecordingWidget {
        RecordingWidget {
            label: element.id().to_string(),
            geometry,
            recorder: self.clone(),
        }
    }

    /// Surface whose widgets all record here and propose `geometry`
    pub fn surface(&self, geometry: Geometry) -> SurfaceMap {
        let factory_recorder = self.clone();
        let dismiss_recorder = self.clone();
        SurfaceMap::new(move |element| {
            Box::new(factory_recorder.widget(element, geometry)) as Box<dyn TerminalWidget>
        })
        .on_dismiss(move |target| dismiss_recorder.lock().dismissed.push(target.to_string()))
    }

    pub fn events(&self) -> Vec<(String, WidgetEvent)> {
        self.lock().events.clone()
    }

    /// Every write as (element, data), in the order it happened
    pub fn writes(&self) -> Vec<(String, String)> {
        self.lock()
            .events
            .iter()
            .filter_map(|(label, event)| match event {
                WidgetEvent::Write(data) => Some((label.clone(), data.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn writes_to(&self, element: &str) -> Vec<String> {
        self.writes()
            .into_iter()
            .filter(|(label, _)| label == element)
            .map(|(_, data)| data)
            .collect()
    }

    pub fn resizes_of(&self, element: &str) -> Vec<Geometry> {
        self.lock()
            .events
            .iter()
            .filter_map(|(label, event)| match event {
                WidgetEvent::Resize(geometry) if label == element => Some(*geometry),
                _ => None,
            })
            .collect()
    }

    /// Simulate keystrokes typed into the widget on `element`
    pub fn type_into(&self, element: &str, data: &str) -> bool {
        let recording = self.lock();
        match recording.inputs.get(element) {
            Some(handler) => {
                handler(data);
                true
            }
            None => false,
        }
    }

    pub fn dismissed(&self) -> Vec<String> {
        self.lock().dismissed.clone()
    }

    fn record(&self, label: &str, event: WidgetEvent) {
        self.lock().events.push((label.to_string(), event));
    }
}

/// Widget that records every call into a [`Recorder`]
pub struct RecordingWidget {
    label: String,
    geometry: Geometry,
    recorder: Recorder,
}

impl TerminalWidget for RecordingWidget {
    fn open(&mut self, element: &ElementRef) {
        self.label = element.id().to_string();
        self.recorder.record(&self.label, WidgetEvent::Open);
    }

    fn write(&mut self, data: &str) {
        self.recorder.record(&self.label, WidgetEvent::Write(data.to_string()));
    }

    fn resize(&mut self, geometry: Geometry) {
        self.geometry = geometry;
        self.recorder.record(&self.label, WidgetEvent::Resize(geometry));
    }

    fn proposed_geometry(&self) -> Geometry {
        self.geometry
    }

    fn on_input(&mut self, handler: InputHandler) {
        self.recorder.lock().inputs.insert(self.label.clone(), handler);
    }

    fn dispose(&mut self) {
        self.recorder.lock().inputs.remove(&self.label);
        self.recorder.record(&self.label, WidgetEvent::Dispose);
    }

    fn widget_name(&self) -> &str {
        "recording"
    }
}

/// Connector that hands out a pre-built channel and remembers the URL asked for
#[derive(Default)]
pub struct LoopbackConnector {
    channel: Mutex<Option<ControlChannel>>,
    pub urls: Mutex<Vec<String>>,
}

impl LoopbackConnector {
    pub fn new(channel: ControlChannel) -> Self {
        Self {
            channel: Mutex::new(Some(channel)),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for LoopbackConnector {
    async fn connect(&self, url: &Url) -> Result<ControlChannel, ChannelError> {
        self.urls.lock().unwrap().push(url.to_string());
        self.channel.lock().unwrap().take().ok_or(ChannelError::Closed)
    }
}

/// Mock playground service
pub struct PlaygroundMock {
    server: MockServer,
}

impl PlaygroundMock {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.uri())
    }

    /// Session creation answering `status` with a plain-text body
    pub async fn mock_session(&self, token: &str, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("X-Requested-With", "XMLHttpRequest"))
            .and(body_string_contains(format!("g-recaptcha-response={}", token)))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Instance creation answering 200 with `descriptor`
    pub async fn mock_instance(&self, session_id: &str, descriptor: Value) {
        Mock::given(method("POST"))
            .and(path(format!("/sessions/{}/instances", session_id)))
            .and(header("X-Requested-With", "XMLHttpRequest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(descriptor))
            .mount(&self.server)
            .await;
    }

    /// Instance creation answering 200 with `descriptor`, once
    pub async fn mock_instance_once(&self, session_id: &str, descriptor: Value) {
        Mock::given(method("POST"))
            .and(path(format!("/sessions/{}/instances", session_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(descriptor))
            .up_to_n_times(1)
            .mount(&self.server)
            .await;
    }

    /// Instance creation answering `status` with a descriptor body
    pub async fn mock_instance_with_status(&self, session_id: &str, status: u16, descriptor: Value) {
        Mock::given(method("POST"))
            .and(path(format!("/sessions/{}/instances", session_id)))
            .respond_with(ResponseTemplate::new(status).set_body_json(descriptor))
            .mount(&self.server)
            .await;
    }

    /// Instance creation failing with `status`
    pub async fn mock_instance_status(&self, session_id: &str, status: u16) {
        Mock::given(method("POST"))
            .and(path(format!("/sessions/{}/instances", session_id)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Instance creation answering 200 with a raw body
    pub async fn mock_instance_body(&self, session_id: &str, body: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/sessions/{}/instances", session_id)))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }
}
