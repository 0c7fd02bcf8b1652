//! Vitrine: an interactive 3D showroom core. Exclusive camera interactions
//! with fly-to transitions, and virtual screens whose textures are drawn
//! procedurally and respond to UV picks.

pub mod app;
pub mod assets;
pub mod interaction;
pub mod render;
pub mod scene;
pub mod screen;
pub mod ui;
