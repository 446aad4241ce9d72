//! Easing primitives shared by every effect.

/// Moves `current` a fixed fraction of the remaining distance toward `target`.
pub fn approach(current: f32, target: f32, rate: f32) -> f32 {
    current + (target - current) * rate
}

/// Component-wise [`approach`] for 2D positions.
pub fn approach2(current: [f32; 2], target: [f32; 2], rate: f32) -> [f32; 2] {
    [
        approach(current[0], target[0], rate),
        approach(current[1], target[1], rate),
    ]
}

/// Decreases `value` by `step`, landing on exactly zero instead of drifting
/// into float residue or going negative.
pub fn decay(value: f32, step: f32) -> f32 {
    let next = value - step;
    if next <= step * 1e-3 {
        0.0
    } else {
        next
    }
}

/// GLSL `smoothstep`, including the reversed-edge form (`edge0 > edge1`).
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// GLSL `fract`.
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}
