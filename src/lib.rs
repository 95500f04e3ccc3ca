//! Bubble canvas engine for the to-do app.
//!
//! Tasks are shown as circles sized by priority and importance and colored by
//! status. This crate owns everything between the host's task list and the
//! platform's draw-circle primitive: initial placement, continuous overlap
//! relaxation, tap / long-press / pan disambiguation, and the pan/scale
//! viewport with its recenter animation. The host feeds it tasks, the viewport
//! size and raw pointer events, and receives [`engine::Action`]s back.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::Engine`] and testable [`engine::EngineCore`] |
//! | [`driver`] | tokio event loop interleaving host events with engine timers |
//! | [`layout`] | Spiral placement of new bubbles, purge and clamp |
//! | [`sim`] | Repulsion tick with drag exemption |
//! | [`input`] | Pointer event types and the gesture state machine |
//! | [`viewport`] | Viewport size, camera and recenter animation |
//! | [`camera`] | Points, circles and the screen/canvas transform |
//! | [`store`] | Owned position map with draw order |
//! | [`hit`] | Topmost-first hit-testing |
//! | [`timer`] | Cancellable deadlines |
//! | [`sizing`] | Radius and color mappings, themes |
//! | [`task`] | Host task records, status cycling and filters |
//! | [`render`] | Sprites, label fitting and the platform [`render::Surface`] |
//! | [`config`] | Tunables with env / JSON overrides |
//! | [`consts`] | Default values for the tunables |

pub mod camera;
pub mod config;
pub mod consts;
pub mod driver;
pub mod engine;
pub mod hit;
pub mod input;
pub mod layout;
pub mod render;
pub mod sim;
pub mod sizing;
pub mod store;
pub mod task;
pub mod timer;
pub mod viewport;
