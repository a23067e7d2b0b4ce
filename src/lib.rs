//! Animated voxel dome and blueprint ring previews.
//!
//! The dome is a hemisphere of unit voxels, spun about its vertical axis,
//! projected with a fixed oblique mapping and composited far to near.

pub mod animation;
pub mod block;
pub mod config;
pub mod error;
pub mod graphics;
pub mod logging;
pub mod math;
pub mod render;
pub mod snapshot;
pub mod state;
pub mod terminal;
pub mod voxel;
pub mod widget;

#[cfg(test)]
mod testing;
