//! Frame clock with a cancellation token.
//!
//! The window asks for the next redraw only while [`FrameLoop::tick`] keeps
//! producing timestamps. Any [`LoopHandle`] can stop the loop; the next tick
//! then returns `None` and no further frame is scheduled.
//!
//! [`FrameLoop::frame`] fixes the order of one frame: draw the scene as it
//! stands, then advance the animation to the frame's time.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use instant::Instant;

use crate::app::SceneApp;

#[derive(Clone, Debug, Default)]
pub struct LoopHandle {
    cancelled: Arc<AtomicBool>,
}

impl LoopHandle {
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            log::info!("frame loop cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct FrameLoop {
    start: Instant,
    last_ms: f64,
    frames: u64,
    handle: LoopHandle,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last_ms: 0.0,
            frames: 0,
            handle: LoopHandle::default(),
        }
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Milliseconds since the loop started, or `None` once cancelled.
    pub fn tick(&mut self) -> Option<f64> {
        if self.handle.is_cancelled() {
            return None;
        }
        let now = self.start.elapsed().as_secs_f64() * 1000.0;
        // never run backwards, the cube rotation is derived from this value
        self.last_ms = now.max(self.last_ms);
        self.frames += 1;
        Some(self.last_ms)
    }

    /// Runs one frame: `draw`, then [`SceneApp::update`] with the frame's time.
    ///
    /// Nothing is drawn or updated while `ready` is false, and a failed draw
    /// skips the update. Returns `Ok(false)` once the loop is cancelled,
    /// otherwise the caller schedules the next frame.
    pub fn frame<E>(
        &mut self,
        scene: &mut SceneApp,
        ready: bool,
        draw: impl FnOnce(&SceneApp) -> Result<(), E>,
    ) -> Result<bool, E> {
        let Some(time_ms) = self.tick() else {
            return Ok(false);
        };
        if !ready {
            return Ok(true);
        }
        draw(scene)?;
        scene.update(time_ms);
        Ok(true)
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}
