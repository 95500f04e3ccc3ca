//! Driver: runs an [`Engine`] on a tokio runtime.
//!
//! DESIGN
//! ======
//! One task owns the engine. It waits on whichever comes first: the next host
//! event on the channel, or the engine's next timer deadline. Each wakeup calls
//! exactly one synchronous engine handler, so handlers never interleave. Host
//! events win ties so a release is never judged after a stale timer that was
//! due at the same instant; the engine drains due timers itself before
//! handling the event.

#[cfg(test)]
#[path = "driver_test.rs"]
mod driver_test;

use std::ops::ControlFlow;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::camera::Point;
use crate::engine::{Action, BubbleHost, Engine, EngineCore};
use crate::input::PointerEvent;
use crate::task::Task;

/// Pending host events before senders wait.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Everything the host can tell the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    Tasks { tasks: Vec<Task> },
    Viewport { width: f64, height: f64 },
    Pointer { event: PointerEvent },
    /// Pinch zoom to `scale` about the screen point `(x, y)`.
    Zoom { x: f64, y: f64, scale: f64 },
    Recenter,
    Shutdown,
}

impl HostEvent {
    /// Hand the event to `core` at time `now`. `Break` on shutdown.
    pub fn deliver(self, core: &mut EngineCore, now: f64) -> ControlFlow<(), Vec<Action>> {
        let actions = match self {
            Self::Tasks { tasks } => core.set_tasks(now, tasks),
            Self::Viewport { width, height } => core.set_viewport(now, width, height),
            Self::Pointer { event } => core.on_pointer(now, event),
            Self::Zoom { x, y, scale } => core.zoom_about(now, Point::new(x, y), scale),
            Self::Recenter => core.request_recenter(now),
            Self::Shutdown => return ControlFlow::Break(()),
        };
        ControlFlow::Continue(actions)
    }
}

/// Spawn the engine loop. Returns the event sender and a handle yielding the engine on exit.
pub fn spawn<H>(engine: Engine<H>) -> (mpsc::Sender<HostEvent>, JoinHandle<Engine<H>>)
where
    H: BubbleHost + Send + 'static,
{
    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let handle = tokio::spawn(run(engine, rx));
    (tx, handle)
}

/// Run until [`HostEvent::Shutdown`] or until every sender is dropped.
pub async fn run<H: BubbleHost>(mut engine: Engine<H>, mut rx: mpsc::Receiver<HostEvent>) -> Engine<H> {
    let origin = Instant::now();
    loop {
        let deadline = engine.next_deadline();
        tokio::select! {
            biased;
            received = rx.recv() => {
                let Some(event) = received else {
                    debug!("host channel closed; stopping canvas driver");
                    break;
                };
                let now = elapsed_ms(origin);
                match event.deliver(&mut engine.core, now) {
                    ControlFlow::Continue(actions) => engine.dispatch(actions),
                    ControlFlow::Break(()) => {
                        debug!("shutdown requested; stopping canvas driver");
                        break;
                    }
                }
            }
            () = sleep_until_ms(origin, deadline) => {
                // Sleep granularity can wake us a hair early.
                let now = elapsed_ms(origin).max(deadline.unwrap_or(0.0));
                engine.advance(now);
            }
        }
    }
    engine
}

fn elapsed_ms(origin: Instant) -> f64 {
    origin.elapsed().as_secs_f64() * 1000.0
}

async fn sleep_until_ms(origin: Instant, deadline: Option<f64>) {
    match deadline {
        Some(ms) => {
            let offset = Duration::try_from_secs_f64(ms.max(0.0) / 1000.0).unwrap_or(Duration::ZERO);
            tokio::time::sleep_until(origin + offset).await;
        }
        None => std::future::pending().await,
    }
}
