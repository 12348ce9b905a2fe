//! Debug line geometry emitted while solving.
//!
//! Purely observational; nothing here feeds back into the solver.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Color tag for a debug line. Hosts map these to their own palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebugColor {
    /// Muzzle boresight ray.
    Magenta,
    /// Horizontally corrected aim point.
    Green,
    /// Final aim point.
    Cyan,
}

impl DebugColor {
    /// Linear RGBA.
    pub const fn rgba(self) -> [f32; 4] {
        match self {
            Self::Magenta => [1.0, 0.0, 1.0, 1.0],
            Self::Green => [0.0, 1.0, 0.0, 1.0],
            Self::Cyan => [0.0, 1.0, 1.0, 1.0],
        }
    }
}

/// A single world-space line segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebugLine {
    pub start: Point3<f32>,
    pub end: Point3<f32>,
    pub color: DebugColor,
}

/// Receiver for debug geometry.
pub trait DebugSink {
    fn line(&mut self, start: Point3<f32>, end: Point3<f32>, color: DebugColor);

    /// Three axis-aligned segments of half-length `size` centered on `point`.
    fn axis_cross(&mut self, point: Point3<f32>, size: f32, color: DebugColor) {
        for axis in [Vector3::y(), Vector3::x(), Vector3::z()] {
            self.line(point + axis * size, point - axis * size, color);
        }
    }
}

impl DebugSink for Vec<DebugLine> {
    fn line(&mut self, start: Point3<f32>, end: Point3<f32>, color: DebugColor) {
        self.push(DebugLine { start, end, color });
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDebug;

impl DebugSink for NoDebug {
    fn line(&mut self, _start: Point3<f32>, _end: Point3<f32>, _color: DebugColor) {}
}
