//! A small 2D rasterizer for RGB565 display panels.
//!
//! Shapes, bitmaps and text are decomposed into clipped pixel and span
//! writes against a [`device::Device`], which only has to know how to put
//! one pixel on the glass.

/// The display driver contract, plus an in-memory framebuffer driver
pub mod device;

/// Graphics primitives, such as color and fonts
pub mod graphics;

/// Coordinates, rotation and the clip surface
pub mod layout;

/// Rendering engine implementation
pub mod render;

pub use device::Device;
pub use graphics::{color565, Color565};
pub use render::Gfx;
