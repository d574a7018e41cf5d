#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use hashbrown::HashMap;
use mocap_motion_core::{
    BodyId, Collaborators, Frame, MotionError, PoseTarget, Renderer, Reporter,
};

pub fn approx(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// Reporter that keeps everything it was told.
#[derive(Default)]
pub struct RecordingReporter {
    pub errors: Mutex<Vec<MotionError>>,
    pub warnings: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn errors(&self) -> Vec<MotionError> {
        self.errors.lock().unwrap().clone()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.lock().unwrap().len()
    }
}

impl Reporter for RecordingReporter {
    fn error(&self, error: &MotionError) {
        self.errors.lock().unwrap().push(error.clone());
    }

    fn warn(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
}

/// Renderer that counts refresh requests.
#[derive(Default)]
pub struct CountingRenderer {
    pub renders: AtomicUsize,
    pub ui_updates: AtomicUsize,
}

impl CountingRenderer {
    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }

    pub fn ui_updates(&self) -> usize {
        self.ui_updates.load(Ordering::SeqCst)
    }
}

impl Renderer for CountingRenderer {
    fn request_render(&self) {
        self.renders.fetch_add(1, Ordering::SeqCst);
    }

    fn update_ui(&self) {
        self.ui_updates.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn recording_collaborators() -> (Collaborators, Arc<RecordingReporter>, Arc<CountingRenderer>) {
    let reporter = Arc::new(RecordingReporter::default());
    let renderer = Arc::new(CountingRenderer::default());
    (
        Collaborators::new(reporter.clone(), renderer.clone()),
        reporter,
        renderer,
    )
}

/// Body that remembers the last frame it received.
pub struct TestBody {
    pub id: BodyId,
    pub name: String,
    pub last: Option<Frame>,
}

impl PoseTarget for TestBody {
    fn id(&self) -> &BodyId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn apply_frame(&mut self, frame: &Frame) {
        self.last = Some(frame.clone());
    }
}

pub fn bodies(entries: &[(&str, &str)]) -> HashMap<BodyId, TestBody> {
    entries
        .iter()
        .map(|(id, name)| {
            let id = BodyId::from(*id);
            (
                id.clone(),
                TestBody {
                    id,
                    name: name.to_string(),
                    last: None,
                },
            )
        })
        .collect()
}
