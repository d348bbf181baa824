//! Fixed-width parameter records consumed by native per-type slots.

/// Scalar precision of native parameter records.
pub type Scalar = f32;

/// Four scalars laid out exactly like the native engine's per-type slot.
///
/// Integer fields are stored by reinterpreting their bit pattern as a
/// scalar (see [`int_as_scalar`]); readers must undo it with
/// [`scalar_as_int`], never with a numeric cast.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Scalar4 {
    pub x: Scalar,
    pub y: Scalar,
    pub z: Scalar,
    pub w: Scalar,
}

impl Scalar4 {
    pub const fn new(x: Scalar, y: Scalar, z: Scalar, w: Scalar) -> Self {
        Self { x, y, z, w }
    }
}

/// Stores the bits of `value` in a scalar slot.
pub fn int_as_scalar(value: i32) -> Scalar {
    bytemuck::cast(value)
}

/// Recovers an integer stored with [`int_as_scalar`].
pub fn scalar_as_int(value: Scalar) -> i32 {
    bytemuck::cast(value)
}
