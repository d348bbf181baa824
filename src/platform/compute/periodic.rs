use std::f32::consts::PI;

use glam::Vec3;

use super::external::Evaluator;
use crate::platform::record::{Scalar, Scalar4, scalar_as_int};

/// Periodic modulation of the concentration profile along one box axis, e.g.
/// to induce a lamellar phase in a diblock copolymer melt.
///
/// $V(\vec r) = A \tanh\left[\frac{1}{2 \pi p w} \cos\left(\frac{2 \pi p r_i}{L_i}\right)\right]$
///
/// with order parameter `A`, periodicity `p`, interface width `w` relative to
/// the box length `L_i`, and axis `i`.
///
/// Parameter record layout: `x = i` (int bits), `y = A`, `z = w`, `w = p` (int bits).
#[derive(Debug, Clone, Copy)]
pub struct PeriodicEvaluator {
    position: Vec3,
    box_lengths: Vec3,
    index: i32,
    order_parameter: Scalar,
    interface_width: Scalar,
    periodicity: i32,
}

impl Evaluator for PeriodicEvaluator {
    const NAME: &'static str = "periodic";

    fn new(position: Vec3, box_lengths: Vec3, params: &Scalar4) -> Self {
        Self {
            position,
            box_lengths,
            index: scalar_as_int(params.x),
            order_parameter: params.y,
            interface_width: params.z,
            periodicity: scalar_as_int(params.w),
        }
    }

    fn evaluate(&self) -> (Vec3, Scalar) {
        let axis = match self.index {
            0..=2 => self.index as usize,
            _ => return (Vec3::ZERO, 0.0),
        };
        let d = self.position[axis];
        let perp_length = self.box_lengths[axis];
        if self.periodicity == 0 || self.interface_width == 0.0 {
            return (Vec3::ZERO, 0.0);
        }

        let q = 2.0 * PI * self.periodicity as Scalar / perp_length;
        let clip = 1.0 / (q * (self.interface_width * perp_length));
        let arg = q * d;
        let tanh = (clip * arg.cos()).tanh();
        let sech_sq = 1.0 - tanh * tanh;

        let mut force = Vec3::ZERO;
        force[axis] = self.order_parameter * sech_sq * clip * arg.sin() * q;
        (force, self.order_parameter * tanh)
    }
}
