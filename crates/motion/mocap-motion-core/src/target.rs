//! Pose targets and the collaborator traits the engine reports through.
//!
//! Hosts (a scene graph, a UI shell, a test harness) implement these and hand
//! them to the engine; nothing here reaches for global state.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::error::MotionError;
use crate::frame::Frame;
use crate::ids::BodyId;

/// A body that can receive interpolated frames.
pub trait PoseTarget {
    fn id(&self) -> &BodyId;
    /// Name used to pick body-prefixed channels out of a shared table.
    fn name(&self) -> &str;
    fn apply_frame(&mut self, frame: &Frame);
}

/// Trait for resolving body ids to live targets.
/// Hosts implement this and pass it into `update`/`set_time` calls.
pub trait BodyResolver {
    fn body_mut(&mut self, id: &BodyId) -> Option<&mut dyn PoseTarget>;
    fn contains(&self, id: &BodyId) -> bool;
}

impl<T: PoseTarget> BodyResolver for HashMap<BodyId, T> {
    fn body_mut(&mut self, id: &BodyId) -> Option<&mut dyn PoseTarget> {
        self.get_mut(id).map(|body| body as &mut dyn PoseTarget)
    }

    fn contains(&self, id: &BodyId) -> bool {
        self.contains_key(id)
    }
}

/// User-facing error/warning channel.
pub trait Reporter: Send + Sync {
    fn error(&self, error: &MotionError);
    fn warn(&self, message: &str);
}

/// Render/UI refresh hooks fired after state changes.
pub trait Renderer: Send + Sync {
    fn request_render(&self);
    fn update_ui(&self);
}

/// Forwards reports to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn error(&self, error: &MotionError) {
        log::error!("[{}] {error}", error.category());
    }

    fn warn(&self, message: &str) {
        log::warn!("{message}");
    }
}

/// Renderer that does nothing; for headless use.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn request_render(&self) {}
    fn update_ui(&self) {}
}

/// Reporter and renderer injected together.
#[derive(Clone)]
pub struct Collaborators {
    pub reporter: Arc<dyn Reporter>,
    pub renderer: Arc<dyn Renderer>,
}

impl Collaborators {
    pub fn new(reporter: Arc<dyn Reporter>, renderer: Arc<dyn Renderer>) -> Self {
        Self { reporter, renderer }
    }

    /// Ask the host to redraw and refresh its panels.
    pub fn refresh(&self) {
        self.renderer.update_ui();
        self.renderer.request_render();
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::new(Arc::new(LogReporter), Arc::new(NullRenderer))
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy {
        id: BodyId,
        applied: usize,
    }

    impl PoseTarget for Dummy {
        fn id(&self) -> &BodyId {
            &self.id
        }
        fn name(&self) -> &str {
            "dummy"
        }
        fn apply_frame(&mut self, _frame: &Frame) {
            self.applied += 1;
        }
    }

    #[test]
    fn hashmap_resolves_bodies() {
        let id = BodyId::from("b1");
        let mut bodies = HashMap::new();
        bodies.insert(
            id.clone(),
            Dummy {
                id: id.clone(),
                applied: 0,
            },
        );
        assert!(bodies.contains(&id));
        assert!(!bodies.contains(&BodyId::from("missing")));
        bodies.body_mut(&id).unwrap().apply_frame(&Frame::default());
        assert_eq!(bodies[&id].applied, 1);
    }
}
