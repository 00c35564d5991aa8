//! Frame-granular scheduling primitives.
//!
//! Everything runs on the browser main thread; "waiting" only ever means
//! asking for the next animation frame. `FrameScheduler` abstracts
//! `requestAnimationFrame` so the loop and the move coalescing can be driven
//! by a fake scheduler on the host.

use super::error::PadResult;

pub type FrameHandle = i32;

pub trait FrameScheduler {
    /// Ask for one callback on the next display refresh.
    fn request_frame(&mut self) -> PadResult<FrameHandle>;
    /// Drop a previously requested callback. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// How an offered value will reach its consumer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Offer {
    /// A frame callback is pending and will `take` the value.
    Scheduled(FrameHandle),
    /// No frame could be requested; the caller should flush right away.
    Immediate,
}

/// Single-slot, latest-wins cell flushed at most once per frame.
///
/// A newer offer cancels the pending frame request and replaces the stored
/// value, so at most one update is ever in flight.
#[derive(Debug)]
pub struct PendingUpdate<T> {
    slot: Option<T>,
    handle: Option<FrameHandle>,
}

impl<T> Default for PendingUpdate<T> {
    fn default() -> Self {
        Self {
            slot: None,
            handle: None,
        }
    }
}

impl<T> PendingUpdate<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offer<S: FrameScheduler + ?Sized>(&mut self, value: T, scheduler: &mut S) -> Offer {
        if let Some(h) = self.handle.take() {
            scheduler.cancel_frame(h);
        }
        self.slot = Some(value);
        match scheduler.request_frame() {
            Ok(h) => {
                self.handle = Some(h);
                Offer::Scheduled(h)
            }
            Err(e) => {
                log::warn!("[pad] frame request failed, flushing inline: {}", e);
                Offer::Immediate
            }
        }
    }

    /// Consume the latest value; called from the frame callback.
    pub fn take(&mut self) -> Option<T> {
        self.handle = None;
        self.slot.take()
    }

    /// Drop the stored value and its frame request.
    pub fn clear<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(h) = self.handle.take() {
            scheduler.cancel_frame(h);
        }
        self.slot = None;
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }
}

/// Start/stop state of a self-rescheduling frame loop.
#[derive(Debug)]
pub struct RenderTick<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameHandle>,
    running: bool,
}

impl<S: FrameScheduler> RenderTick<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            running: false,
        }
    }

    /// Returns `Ok(false)` if the loop was already running.
    pub fn start(&mut self) -> PadResult<bool> {
        if self.running {
            return Ok(false);
        }
        self.pending = Some(self.scheduler.request_frame()?);
        self.running = true;
        Ok(true)
    }

    pub fn stop(&mut self) {
        if let Some(h) = self.pending.take() {
            self.scheduler.cancel_frame(h);
        }
        self.running = false;
    }

    /// Mark the pending request as delivered. A callback that fires after
    /// `stop` returns false and must not draw.
    pub fn begin_frame(&mut self) -> bool {
        self.pending = None;
        self.running
    }

    /// Request the next frame while the loop is running.
    pub fn schedule_next(&mut self) -> PadResult<()> {
        if !self.running || self.pending.is_some() {
            return Ok(());
        }
        match self.scheduler.request_frame() {
            Ok(h) => {
                self.pending = Some(h);
                Ok(())
            }
            Err(e) => {
                self.running = false;
                Err(e)
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
