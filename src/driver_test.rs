use std::time::Duration;

use super::*;
use crate::config::CanvasConfig;

#[derive(Default)]
struct RecordingHost {
    selected: Vec<String>,
    cycled: Vec<String>,
}

impl BubbleHost for RecordingHost {
    fn on_bubble_selected(&mut self, id: &str) {
        self.selected.push(id.to_owned());
    }

    fn on_bubble_status_cycle(&mut self, id: &str) {
        self.cycled.push(id.to_owned());
    }
}

fn pointer(event: PointerEvent) -> HostEvent {
    HostEvent::Pointer { event }
}

/// Spawn an engine with one bubble on a 400x400 viewport and let it settle.
///
/// A single bubble is recentered onto the viewport center.
async fn started() -> (mpsc::Sender<HostEvent>, JoinHandle<Engine<RecordingHost>>) {
    let engine = Engine::new(CanvasConfig::default(), RecordingHost::default()).unwrap();
    let (tx, handle) = spawn(engine);
    tx.send(HostEvent::Viewport { width: 400.0, height: 400.0 }).await.unwrap();
    tx.send(HostEvent::Tasks { tasks: vec![Task::new("a", "A", 3, 3)] }).await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    (tx, handle)
}

// =============================================================
// HostEvent
// =============================================================

#[test]
fn host_event_json_shape() {
    let raw = r#"{ "type": "pointer", "event": { "kind": "up", "x": 3.0, "y": 4.0 } }"#;
    let event: HostEvent = serde_json::from_str(raw).unwrap();
    assert_eq!(event, pointer(PointerEvent::Up { x: 3.0, y: 4.0 }));

    let event: HostEvent = serde_json::from_str(r#"{ "type": "recenter" }"#).unwrap();
    assert_eq!(event, HostEvent::Recenter);

    let event: HostEvent = serde_json::from_str(r#"{ "type": "zoom", "x": 1.0, "y": 2.0, "scale": 1.5 }"#).unwrap();
    assert_eq!(event, HostEvent::Zoom { x: 1.0, y: 2.0, scale: 1.5 });
}

#[test]
fn shutdown_breaks_delivery() {
    let mut core = EngineCore::default();
    assert!(HostEvent::Shutdown.deliver(&mut core, 0.0).is_break());
    assert!(HostEvent::Recenter.deliver(&mut core, 0.0).is_continue());
}

// =============================================================
// Event loop
// =============================================================

#[tokio::test(start_paused = true)]
async fn tap_reaches_host() {
    let (tx, handle) = started().await;
    tx.send(pointer(PointerEvent::Down { x: 200.0, y: 200.0 })).await.unwrap();
    tokio::time::sleep(Duration::from_millis(80)).await;
    tx.send(pointer(PointerEvent::Up { x: 200.0, y: 200.0 })).await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    tx.send(HostEvent::Shutdown).await.unwrap();

    let host = handle.await.unwrap().into_host();
    assert_eq!(host.selected, vec!["a"]);
    assert!(host.cycled.is_empty());
}

#[tokio::test(start_paused = true)]
async fn held_press_fires_timer_without_events() {
    let (tx, handle) = started().await;
    tx.send(pointer(PointerEvent::Down { x: 200.0, y: 200.0 })).await.unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;
    tx.send(HostEvent::Shutdown).await.unwrap();

    let engine = handle.await.unwrap();
    assert_eq!(engine.core.gesture().held(), Some("a"));
    let host = engine.into_host();
    assert_eq!(host.cycled, vec!["a"]);
    assert!(host.selected.is_empty());
}

#[tokio::test(start_paused = true)]
async fn swipe_before_long_press_only_pans() {
    let (tx, handle) = started().await;
    tx.send(pointer(PointerEvent::Down { x: 200.0, y: 200.0 })).await.unwrap();
    tx.send(pointer(PointerEvent::Move { x: 230.0, y: 200.0 })).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    tx.send(pointer(PointerEvent::Up { x: 230.0, y: 200.0 })).await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    tx.send(HostEvent::Shutdown).await.unwrap();

    let engine = handle.await.unwrap();
    let screen = engine.core.viewport().canvas_to_screen(engine.core.position("a").unwrap()).unwrap();
    assert!(screen.distance(Point::new(230.0, 200.0)) < 1e-6);
    let host = engine.into_host();
    assert!(host.selected.is_empty());
    assert!(host.cycled.is_empty());
}

#[tokio::test(start_paused = true)]
async fn closing_channel_stops_loop() {
    let (tx, handle) = started().await;
    drop(tx);
    let engine = handle.await.unwrap();
    assert!(engine.core.position("a").is_some());
}
