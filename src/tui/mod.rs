//! Terminal front end: key bindings, a cursor over the enemy line and a
//! board that stands in for the engine's scene graph.

pub mod app;
pub mod controller;
pub mod ui;
