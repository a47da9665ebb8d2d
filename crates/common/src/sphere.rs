use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Sphere used for proximity queries between the shark and the fish.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere-sphere overlap. Touching spheres collide.
    #[inline]
    pub fn collides(&self, other: &BoundingSphere) -> bool {
        self.center.distance(other.center) <= self.radius + other.radius
    }

    /// Same sphere moved to a new center.
    pub fn recentered(self, center: Vec3) -> Self {
        Self { center, ..self }
    }
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn touching_spheres_collide() {
        let a = BoundingSphere::new(Vec3::ZERO, 1.0);
        let b = BoundingSphere::new(Vec3::new(3.0, 0.0, 0.0), 2.0);
        assert!(a.collides(&b));
    }

    #[test]
    fn separated_spheres_do_not_collide() {
        let a = BoundingSphere::new(Vec3::ZERO, 1.0);
        let b = BoundingSphere::new(Vec3::new(3.0 + 1e-3, 0.0, 0.0), 2.0);
        assert!(!a.collides(&b));
    }

    #[test]
    fn capture_scenarios() {
        let capture = BoundingSphere::new(Vec3::ZERO, 2.0);
        let near = BoundingSphere::new(Vec3::new(1.5, 0.0, 0.0), 0.24);
        let far = BoundingSphere::new(Vec3::new(3.0, 0.0, 0.0), 0.24);
        assert!(capture.collides(&near));
        assert!(!capture.collides(&far));
    }

    #[test]
    fn recenter_keeps_radius() {
        let s = BoundingSphere::new(Vec3::ZERO, 12.0).recentered(Vec3::ONE);
        assert_eq!(s.center, Vec3::ONE);
        assert_eq!(s.radius, 12.0);
    }

    fn coord() -> impl Strategy<Value = f32> {
        -100.0f32..100.0
    }

    proptest! {
        #[test]
        fn collision_is_symmetric(
            ax in coord(), ay in coord(), az in coord(), ar in 0.0f32..50.0,
            bx in coord(), by in coord(), bz in coord(), br in 0.0f32..50.0,
        ) {
            let a = BoundingSphere::new(Vec3::new(ax, ay, az), ar);
            let b = BoundingSphere::new(Vec3::new(bx, by, bz), br);
            prop_assert_eq!(a.collides(&b), b.collides(&a));
        }

        #[test]
        fn sphere_collides_with_itself(
            x in coord(), y in coord(), z in coord(), r in 0.0f32..50.0,
        ) {
            let a = BoundingSphere::new(Vec3::new(x, y, z), r);
            prop_assert!(a.collides(&a));
        }
    }
}
