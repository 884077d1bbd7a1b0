//! Tolerance constants for layout geometry.

/// Key edges are computed from surface fractions in `f32`.
pub const GEOMETRY_EPSILON: f32 = 1e-3;
