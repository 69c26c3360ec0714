//! Procedural ASCII globe: a sampled lat/lon grid classified against
//! coastline shapes, rotated, projected and drawn as coloured glyphs.

pub mod app;
pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod globe;
pub mod hash;
pub mod logging;
pub mod render;
