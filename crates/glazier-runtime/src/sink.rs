#![forbid(unsafe_code)]

//! One-way outputs of a session: drawing surfaces and quotation consumers.

use glazier_layout::{ItemPayload, Scene};

/// A drawing surface that paints a whole scene.
///
/// Rendering is a pure function of the scene; nothing flows back into the
/// tree.
pub trait SceneRenderer {
    fn render(&mut self, scene: &Scene);
}

/// Receives the finished quotation payload.
pub trait QuotationSink {
    fn submit(&mut self, payload: &ItemPayload);
}

/// Collects scenes, handy for hosts that paint later and for tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub scenes: Vec<Scene>,
}

impl SceneRenderer for RecordingRenderer {
    fn render(&mut self, scene: &Scene) {
        self.scenes.push(scene.clone());
    }
}

/// Collects submitted payloads.
#[derive(Debug, Clone, Default)]
pub struct RecordingQuotationSink {
    pub items: Vec<ItemPayload>,
}

impl QuotationSink for RecordingQuotationSink {
    fn submit(&mut self, payload: &ItemPayload) {
        self.items.push(payload.clone());
    }
}
