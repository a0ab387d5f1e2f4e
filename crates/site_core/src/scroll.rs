use std::sync::Arc;

use tracing::debug;

/// Something that owns a scroll offset: the native window, or a
/// smooth-scroll controller layered over it.
pub trait ScrollSurface: Send + Sync {
    fn scroll_to(&self, offset: f64);
    /// Returns false when no element carries the anchor id.
    fn scroll_to_anchor(&self, anchor: &str) -> bool;
}

/// Surface used when nothing is rendered, e.g. the operator console.
pub struct HeadlessScroll;

impl ScrollSurface for HeadlessScroll {
    fn scroll_to(&self, offset: f64) {
        debug!(offset, "headless scroll");
    }

    fn scroll_to_anchor(&self, anchor: &str) -> bool {
        debug!(anchor, "headless anchor scroll");
        false
    }
}

/// Scroll dependency handed to whatever triggers scroll resets.
///
/// The smooth-scroll controller is attached when it mounts and detached on
/// teardown; while attached its internal offset is reset alongside the
/// native position.
#[derive(Clone)]
pub struct ScrollHandle {
    native: Arc<dyn ScrollSurface>,
    smooth: Option<Arc<dyn ScrollSurface>>,
}

impl ScrollHandle {
    pub fn new(native: Arc<dyn ScrollSurface>) -> Self {
        Self {
            native,
            smooth: None,
        }
    }

    pub fn headless() -> Self {
        Self::new(Arc::new(HeadlessScroll))
    }

    pub fn attach_smooth(&mut self, controller: Arc<dyn ScrollSurface>) {
        self.smooth = Some(controller);
    }

    pub fn detach_smooth(&mut self) -> Option<Arc<dyn ScrollSurface>> {
        self.smooth.take()
    }

    pub fn has_smooth(&self) -> bool {
        self.smooth.is_some()
    }

    pub fn reset_to_top(&self) {
        self.native.scroll_to(0.0);
        if let Some(smooth) = &self.smooth {
            smooth.scroll_to(0.0);
        }
    }

    pub fn scroll_to_anchor(&self, anchor: &str) -> bool {
        match &self.smooth {
            Some(smooth) => smooth.scroll_to_anchor(anchor),
            None => self.native.scroll_to_anchor(anchor),
        }
    }
}
