//! Rendering and interaction layer for a packed-bit Game of Life grid.
//!
//! The simulation sits behind [`engine::Engine`]. Decoding, painting,
//! pointer mapping and pacing are GPU-independent and live in
//! [`session::Session`]. [`state::State`] only presents the resulting canvas
//! with wgpu and hosts the egui controls.

pub mod bitfield;
pub mod canvas;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod paint;
pub mod render;
pub mod render_loop;
pub mod rules;
pub mod session;
pub mod state;
pub mod ui;
pub mod universe;
pub mod view;
