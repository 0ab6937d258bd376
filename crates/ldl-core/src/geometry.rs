//! Connector geometry.
//!
//! A [`Connector`] is a rigid offset from its owning entity's local origin.
//! Its local +Z axis is the outward facing direction and its X/Y axes span the
//! mating plane. Mating two connectors makes their poses coincide with
//! opposite facing, which is a half turn about the connector X axis.
//!
//! All composition is plain `f64` 4×4 matrix arithmetic.

use glam::{DMat4, DVec3, DVec4};

/// Half turn about the connector X axis, `diag(1, -1, -1, 1)`.
///
/// Built from exact columns so no trigonometric rounding enters the chain.
pub const CONNECTOR_FLIP: DMat4 = DMat4::from_cols(DVec4::X, DVec4::NEG_Y, DVec4::NEG_Z, DVec4::W);

/// A named attachment socket, stored as an offset transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    offset: DMat4,
}

impl Connector {
    pub fn new(offset: DMat4) -> Self {
        Self { offset }
    }

    /// A connector translated from the origin, facing along local +Z.
    pub fn from_translation(translation: DVec3) -> Self {
        Self::new(DMat4::from_translation(translation))
    }

    pub fn offset(&self) -> DMat4 {
        self.offset
    }
}

/// Computes the local alignment transform for mating `moved` onto `base`.
///
/// The result is expressed in the base entity's local frame:
/// `base · FLIP · moved⁻¹`. Composing it after the base entity's world
/// transform yields the moved entity's new world transform, see
/// [`mated_transform`].
///
/// # Examples
///
/// ```
/// use glam::DVec3;
/// use ldl_core::geometry::{Connector, align_into, translation};
///
/// let base = Connector::from_translation(DVec3::new(1.0, 0.0, 0.0));
/// let moved = Connector::from_translation(DVec3::new(-1.0, 0.0, 0.0));
/// let aligned = align_into(&base, &moved);
/// assert_eq!(translation(&aligned), DVec3::new(2.0, 0.0, 0.0));
/// ```
pub fn align_into(base: &Connector, moved: &Connector) -> DMat4 {
    base.offset * CONNECTOR_FLIP * moved.offset.inverse()
}

/// World transform for the moved entity after mating its connector to the
/// base entity's connector.
pub fn mated_transform(base_world: &DMat4, base: &Connector, moved: &Connector) -> DMat4 {
    *base_world * align_into(base, moved)
}

/// Returns the translation column of a transform.
pub fn translation(transform: &DMat4) -> DVec3 {
    transform.w_axis.truncate()
}

/// Returns `transform` with only its translation column replaced.
pub fn with_translation(transform: &DMat4, translation: DVec3) -> DMat4 {
    let mut result = *transform;
    result.w_axis = translation.extend(transform.w_axis.w);
    result
}
