//! Game loop driver
//!
//! Binds an [`Updater`] to a host frame source. The host calls
//! [`GameLoop::on_frame`] when a requested frame fires; each call runs
//! exactly one tick and asks for the next frame.

use std::time::{Duration, Instant};

use crate::error::EngineError;
use crate::sim::{Command, Updater, World};

/// Handle for a requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// Host per-frame callback primitive (requestAnimationFrame and friends)
pub trait FrameSource {
    fn request_frame(&mut self) -> FrameToken;
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Lifecycle of a single session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Paused,
    Running,
    /// Terminal
    Unmounted,
}

pub struct GameLoop<F: FrameSource> {
    frames: F,
    updater: Updater,
    world: Option<World>,
    pending: Option<FrameToken>,
    unmounted: bool,
}

impl<F: FrameSource> GameLoop<F> {
    pub fn new(frames: F, updater: Updater) -> Self {
        Self {
            frames,
            updater,
            world: None,
            pending: None,
            unmounted: false,
        }
    }

    /// Install the session's starting world
    pub fn mount(&mut self, world: World) -> Result<(), EngineError> {
        if self.unmounted {
            return Err(EngineError::Unmounted);
        }
        log::info!(
            "Mounted world with {} particles ({} systems, {})",
            world.len(),
            self.updater.len(),
            if world.paused { "paused" } else { "running" }
        );
        self.world = Some(world);
        Ok(())
    }

    /// Request the first frame
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.unmounted {
            return Err(EngineError::Unmounted);
        }
        if self.world.is_none() {
            return Err(EngineError::NotMounted);
        }
        if self.pending.is_none() {
            self.pending = Some(self.frames.request_frame());
            log::info!("Game loop started");
        }
        Ok(())
    }

    /// Cancel the pending frame and end the session, returning the last world
    pub fn stop(&mut self) -> Option<World> {
        if let Some(token) = self.pending.take() {
            self.frames.cancel_frame(token);
        }
        if !self.unmounted {
            log::info!("Game loop stopped");
        }
        self.unmounted = true;
        self.world.take()
    }

    /// Run one tick for a fired frame.
    ///
    /// Frames after `stop` and stale tokens are ignored. On failure the
    /// previous world is kept and no further frame is requested.
    pub fn on_frame(&mut self, token: FrameToken) -> Result<(), EngineError> {
        if self.unmounted || self.pending != Some(token) {
            log::trace!("Ignoring frame {:?}", token);
            return Ok(());
        }
        self.pending = None;

        let Some(world) = self.world.as_ref() else {
            return Err(EngineError::NotMounted);
        };
        let next = self.updater.update(world.clone())?;
        self.world = Some(next);

        self.pending = Some(self.frames.request_frame());
        Ok(())
    }

    /// Forward an input command to the mounted world
    pub fn enqueue(&mut self, command: Command) -> Result<(), EngineError> {
        if self.unmounted {
            return Err(EngineError::Unmounted);
        }
        let world = self.world.as_mut().ok_or(EngineError::NotMounted)?;
        world.queue.enqueue(command);
        Ok(())
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn state(&self) -> SessionState {
        match (&self.world, self.unmounted) {
            (_, true) => SessionState::Unmounted,
            (None, false) => SessionState::Uninitialized,
            (Some(world), false) if world.paused => SessionState::Paused,
            (Some(_), false) => SessionState::Running,
        }
    }

    /// Whether a frame is waiting to fire
    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut F {
        &mut self.frames
    }
}

impl<F: FrameSource> Drop for GameLoop<F> {
    fn drop(&mut self) {
        if let Some(token) = self.pending.take() {
            self.frames.cancel_frame(token);
        }
    }
}

/// Frame source driven by hand. Hosts with their own scheduler (and tests)
/// fire the requested tokens themselves.
#[derive(Debug, Default)]
pub struct ManualFrames {
    next: u64,
    pub requested: Vec<FrameToken>,
    pub cancelled: Vec<FrameToken>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently requested token
    pub fn last(&self) -> Option<FrameToken> {
        self.requested.last().copied()
    }
}

impl FrameSource for ManualFrames {
    fn request_frame(&mut self) -> FrameToken {
        self.next += 1;
        let token = FrameToken(self.next);
        self.requested.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.cancelled.push(token);
    }
}

/// Native frame source that paces frames at a fixed rate
#[derive(Debug)]
pub struct FixedRateFrames {
    interval: Duration,
    deadline: Instant,
    next: u64,
    pending: Option<FrameToken>,
}

impl FixedRateFrames {
    /// Pace at `fps` frames per second. A non-positive rate, or one too
    /// slow to fit a `Duration`, means unpaced.
    pub fn new(fps: f32) -> Self {
        let interval = if fps <= 0.0 {
            Duration::ZERO
        } else {
            Duration::try_from_secs_f32(1.0 / fps).unwrap_or_else(|e| {
                log::warn!("Unpaced frames: cannot pace at {} fps ({})", fps, e);
                Duration::ZERO
            })
        };
        Self {
            interval,
            deadline: Instant::now(),
            next: 0,
            pending: None,
        }
    }

    /// Block until the pending frame is due and return its token.
    /// None when nothing is pending (the loop stopped or failed).
    pub fn wait(&mut self) -> Option<FrameToken> {
        let token = self.pending.take()?;
        let now = Instant::now();
        if self.deadline > now {
            std::thread::sleep(self.deadline - now);
        }
        let base = self.deadline.max(now);
        self.deadline = base.checked_add(self.interval).unwrap_or(base);
        Some(token)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameSource for FixedRateFrames {
    fn request_frame(&mut self) -> FrameToken {
        self.next += 1;
        let token = FrameToken(self.next);
        self.pending = Some(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.pending == Some(token) {
            self.pending = None;
        }
    }
}
