//! The dedicated render thread
//!
//! All engine state lives on one thread. Platform callbacks post
//! [`EngineEvent`]s into an mpsc queue; the thread interleaves draining that
//! queue with firing the single delayed draw tick. Posting after the thread
//! has exited degrades to a logged warning, never a panic.

use crate::engine::{EngineCore, EngineEvent};
use log::{debug, warn};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// The one delayed-callback slot the draw loop uses. Re-posting replaces
/// the pending deadline, so at most one tick is ever scheduled.
#[derive(Debug, Default)]
pub struct TickSchedule {
    next: Option<Instant>,
}

impl TickSchedule {
    pub fn new() -> Self {
        Self { next: None }
    }

    /// Schedule the tick to fire immediately
    pub fn post_now(&mut self, now: Instant) {
        self.next = Some(now);
    }

    /// Schedule the tick `delay` from now, replacing any pending deadline
    pub fn post_delayed(&mut self, now: Instant, delay: Duration) {
        self.next = Some(now + delay);
    }

    /// Cancel the pending tick
    pub fn remove(&mut self) {
        self.next = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.next.is_some()
    }

    pub fn due(&self, now: Instant) -> bool {
        matches!(self.next, Some(at) if now >= at)
    }

    /// How long the event loop may block before the tick fires.
    /// None = nothing scheduled, block indefinitely.
    pub fn timeout(&self, now: Instant) -> Option<Duration> {
        self.next.map(|at| at.saturating_duration_since(now))
    }
}

enum ThreadMessage {
    Event(EngineEvent),
    Shutdown,
}

/// Handle to the spawned render thread. Owns the sending side of the event
/// queue; dropping the handle shuts the thread down.
pub struct RenderThread {
    tx: mpsc::Sender<ThreadMessage>,
    handle: Option<JoinHandle<()>>,
}

impl RenderThread {
    /// Move the engine core onto its own thread and start the event loop
    pub fn spawn(core: EngineCore) -> Self {
        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("wallpet-render".to_string())
            .spawn(move || run_loop(core, rx))
            .expect("failed to spawn render thread");
        Self {
            tx,
            handle: Some(handle),
        }
    }

    /// Post an event to the render thread. Returns false (after a warning)
    /// when the thread is no longer running.
    pub fn post(&self, event: EngineEvent) -> bool {
        match self.tx.send(ThreadMessage::Event(event)) {
            Ok(()) => true,
            Err(mpsc::SendError(ThreadMessage::Event(event))) => {
                warn!("render thread is gone, dropping {event:?}");
                false
            }
            Err(_) => false,
        }
    }

    /// Stop the event loop and join the thread. Idempotent.
    pub fn shutdown(&mut self) {
        let _ = self.tx.send(ThreadMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_loop(mut core: EngineCore, rx: mpsc::Receiver<ThreadMessage>) {
    debug!("render thread started");
    loop {
        core.run_tick(Instant::now());

        let message = match core.tick_timeout(Instant::now()) {
            Some(timeout) => match rx.recv_timeout(timeout) {
                Ok(m) => Some(m),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            },
            // Nothing scheduled: block until an event arrives
            None => match rx.recv() {
                Ok(m) => Some(m),
                Err(_) => break,
            },
        };

        match message {
            Some(ThreadMessage::Event(event)) => core.handle_event(event, Instant::now()),
            Some(ThreadMessage::Shutdown) => break,
            None => {}
        }
    }
    debug!("render thread stopped");
}
