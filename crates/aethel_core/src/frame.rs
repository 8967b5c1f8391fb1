//! Frame scheduling
//!
//! The display-refresh side of the runtime. Components register a per-frame
//! callback and cancel it on teardown; the host advances the loop once per
//! display frame with the raw elapsed time.

use slotmap::{new_key_type, SlotMap};

/// Largest frame delta handed to callbacks, in seconds
///
/// Long pauses (tab resume, debugger breaks) would otherwise hand springs a
/// step large enough to destabilize them.
pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;

new_key_type! {
    pub struct FrameCallbackId;
}

/// Timing information for one frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    pub frame: u64,
    /// Clamped seconds since the previous frame
    pub dt: f32,
    /// Sum of all clamped deltas so far
    pub elapsed: f64,
}

/// Per-frame callback
pub type FrameCallback = Box<dyn FnMut(&FrameTime)>;

/// Runs registered callbacks once per frame
pub struct FrameLoop {
    callbacks: SlotMap<FrameCallbackId, FrameCallback>,
    frame: u64,
    elapsed: f64,
    max_dt: f32,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            callbacks: SlotMap::with_key(),
            frame: 0,
            elapsed: 0.0,
            max_dt: MAX_FRAME_DT,
        }
    }

    /// Override the frame delta cap
    pub fn with_max_dt(mut self, max_dt: f32) -> Self {
        if max_dt.is_finite() && max_dt > 0.0 {
            self.max_dt = max_dt;
        }
        self
    }

    /// Schedule `callback` to run every frame until cancelled
    pub fn request<F>(&mut self, callback: F) -> FrameCallbackId
    where
        F: FnMut(&FrameTime) + 'static,
    {
        self.callbacks.insert(Box::new(callback))
    }

    /// Cancel a scheduled callback; false if it was already gone
    pub fn cancel(&mut self, id: FrameCallbackId) -> bool {
        self.callbacks.remove(id).is_some()
    }

    /// Advance one frame by `raw_dt` seconds and run every callback
    ///
    /// Negative or non-finite deltas become zero.
    pub fn advance(&mut self, raw_dt: f32) -> FrameTime {
        let dt = if raw_dt.is_finite() && raw_dt > 0.0 {
            raw_dt.min(self.max_dt)
        } else {
            0.0
        };
        self.frame += 1;
        self.elapsed += dt as f64;

        let time = FrameTime {
            frame: self.frame,
            dt,
            elapsed: self.elapsed,
        };
        for (_, callback) in self.callbacks.iter_mut() {
            callback(&time);
        }
        time
    }

    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}
