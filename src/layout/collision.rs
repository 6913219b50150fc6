use std::f32::consts::{PI, TAU};

use crate::geometry::{Point, angle_between, point_on_circle};

pub const DEFAULT_MIN_SEPARATION: f32 = 70.0;
pub const DEFAULT_MAX_ITERATIONS: usize = 50;
pub const DEFAULT_ANGLE_STEP: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedPoint {
    pub index: usize,
    pub point: Point,
}

impl IndexedPoint {
    pub fn new(index: usize, point: Point) -> Self {
        Self { index, point }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub positions: Vec<IndexedPoint>,
    /// Full passes over all pairs, including the final quiet one when converged.
    pub passes: usize,
    pub converged: bool,
}

/// Pushes points on a circle apart by rotating them along it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResolver {
    pub min_separation: f32,
    pub max_iterations: usize,
    pub angle_step: f32,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self {
            min_separation: DEFAULT_MIN_SEPARATION,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            angle_step: DEFAULT_ANGLE_STEP,
        }
    }
}

impl CollisionResolver {
    /// Every pair closer than `min_separation` is rotated apart by `angle_step` per pass, each
    /// point moving away from the other along the shorter arc. Adjustments are applied in
    /// place so later pairs of the same pass see them. Points are re-projected onto the circle
    /// after each move. Gives up after `max_iterations` passes.
    ///
    /// Coincident points get no special treatment: both read the same angle and the pair is
    /// split as if the second point were ahead of the first.
    pub fn resolve(&self, positions: &[IndexedPoint], center: Point, radius: f32) -> Resolution {
        let mut adjusted = positions.to_vec();
        let mut passes = 0;
        let mut converged = false;

        while passes < self.max_iterations {
            passes += 1;
            let mut moved = false;
            for i in 0..adjusted.len() {
                for j in (i + 1)..adjusted.len() {
                    let first = adjusted[i].point;
                    let second = adjusted[j].point;
                    if first.distance(second) >= self.min_separation {
                        continue;
                    }
                    moved = true;

                    let first_angle = angle_between(center, first);
                    let second_angle = angle_between(center, second);
                    let diff = ((second_angle - first_angle) + TAU) % TAU;
                    let (first_new, second_new) = if diff < PI {
                        (first_angle - self.angle_step, second_angle + self.angle_step)
                    } else {
                        (first_angle + self.angle_step, second_angle - self.angle_step)
                    };
                    adjusted[i].point = point_on_circle(center, radius, first_new);
                    adjusted[j].point = point_on_circle(center, radius, second_new);
                }
            }
            if !moved {
                converged = true;
                break;
            }
        }

        Resolution {
            positions: adjusted,
            passes,
            converged,
        }
    }
}
