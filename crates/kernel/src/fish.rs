use crate::config::{FishSpawn, SchoolTuning};
use frenzy_common::{BoundingSphere, FishId};
use glam::Vec3;

/// One fish swimming a circular orbit.
#[derive(Debug, Clone, PartialEq)]
pub struct Fish {
    pub position: Vec3,
    pub scale: Vec3,
    /// Euler rotation in radians; only yaw (`y`) is driven.
    pub rotation: Vec3,
    pub speed: f32,
    pub angle: f32,
    pub angular_speed: f32,
    pub center: Vec3,
    pub radius: f32,
    pub bounds: BoundingSphere,
    active: bool,
}

impl Fish {
    /// Place a fish and derive its orbit from the spawn point.
    ///
    /// The orbit center takes its height from the spawn point, so the fish
    /// circles in the horizontal plane it started in.
    pub fn spawn(spawn: &FishSpawn, tuning: &SchoolTuning) -> Self {
        let center = Vec3::new(
            tuning.orbit_center.x,
            spawn.position.y,
            tuning.orbit_center.z,
        );
        let offset = spawn.position - center;
        let mut fish = Self {
            position: spawn.position,
            scale: spawn.scale,
            rotation: Vec3::ZERO,
            speed: tuning.speed,
            angle: offset.z.atan2(offset.x),
            angular_speed: tuning.angular_speed,
            center,
            radius: Vec3::new(offset.x, 0.0, offset.z).length(),
            bounds: BoundingSphere::default(),
            active: true,
        };
        fish.refresh_bounds(tuning.sphere_factor);
        fish
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn yaw(&self) -> f32 {
        self.rotation.y
    }

    /// Linear speed including the current multiplier.
    pub fn current_speed(&self, multiplier: f32) -> f32 {
        self.speed * multiplier
    }

    /// Advance along the orbit by `dt` seconds, scaled by `multiplier`.
    pub fn advance(&mut self, dt: f32, multiplier: f32, sphere_factor: f32) {
        self.angle += self.angular_speed * multiplier * dt;
        let (sin, cos) = self.angle.sin_cos();
        self.position = self.center + self.radius * Vec3::new(cos, 0.0, sin);

        // Tangent of the orbit, used only for facing.
        let facing = Vec3::new(sin, 0.0, -cos);
        self.rotation.y = facing.x.atan2(facing.z);
        self.refresh_bounds(sphere_factor);
    }

    fn refresh_bounds(&mut self, sphere_factor: f32) {
        self.bounds = BoundingSphere::new(self.position, sphere_factor * self.scale.max_element());
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Arena of fish addressed by stable [`FishId`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct School {
    fish: Vec<Fish>,
}

impl School {
    pub fn from_tuning(tuning: &SchoolTuning) -> Self {
        Self {
            fish: tuning
                .spawns
                .iter()
                .map(|spawn| Fish::spawn(spawn, tuning))
                .collect(),
        }
    }

    /// Total number of slots, eaten fish included.
    pub fn len(&self) -> usize {
        self.fish.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fish.is_empty()
    }

    pub fn alive_count(&self) -> usize {
        self.fish.iter().filter(|f| f.is_active()).count()
    }

    pub fn get(&self, id: FishId) -> Option<&Fish> {
        self.fish.get(id.index())
    }

    /// Every slot in index order, eaten fish included.
    pub fn iter(&self) -> impl Iterator<Item = (FishId, &Fish)> {
        self.fish.iter().enumerate().map(|(i, f)| (FishId(i), f))
    }

    /// Active fish in index order.
    pub fn active(&self) -> impl Iterator<Item = (FishId, &Fish)> {
        self.iter().filter(|(_, f)| f.is_active())
    }

    pub fn advance(&mut self, dt: f32, multiplier: f32, sphere_factor: f32) {
        for fish in self.fish.iter_mut().filter(|f| f.is_active()) {
            fish.advance(dt, multiplier, sphere_factor);
        }
    }

    /// Whether any active fish overlaps `sphere`.
    pub fn any_overlapping(&self, sphere: &BoundingSphere) -> bool {
        self.active().any(|(_, f)| sphere.collides(&f.bounds))
    }

    /// First active fish, in index order, that overlaps `sphere`.
    pub fn first_overlapping(&self, sphere: &BoundingSphere) -> Option<(FishId, &Fish)> {
        self.active().find(|(_, f)| sphere.collides(&f.bounds))
    }

    /// Mark a fish as eaten. Returns false if it was already inactive or
    /// the id is unknown.
    pub fn deactivate(&mut self, id: FishId) -> bool {
        match self.fish.get_mut(id.index()) {
            Some(fish) if fish.is_active() => {
                fish.deactivate();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tuning_with(spawns: Vec<FishSpawn>) -> SchoolTuning {
        SchoolTuning {
            spawns,
            ..SchoolTuning::default()
        }
    }

    #[test]
    fn spawn_derives_orbit() {
        let t = SchoolTuning::default();
        let fish = Fish::spawn(&FishSpawn::new(Vec3::new(3.0, 2.0, 4.0), Vec3::splat(0.3)), &t);
        assert_relative_eq!(fish.radius, 5.0);
        assert_relative_eq!(fish.angle, 4.0f32.atan2(3.0));
        assert_relative_eq!(fish.center.y, 2.0);
        assert_relative_eq!(fish.bounds.radius, 0.24, epsilon = 1e-6);
    }

    #[test]
    fn orbit_radius_is_preserved() {
        let mut school = School::from_tuning(&SchoolTuning::default());
        let radii: Vec<f32> = school.iter().map(|(_, f)| f.radius).collect();
        for step in 0..5_000 {
            let multiplier = if step % 3 == 0 { 3.5 } else { 1.0 };
            school.advance(1.0 / 60.0, multiplier, 0.8);
        }
        for ((_, fish), radius) in school.iter().zip(radii) {
            assert_relative_eq!(fish.position.distance(fish.center), radius, epsilon = 1e-3);
        }
    }

    #[test]
    fn height_is_unchanged_by_orbit() {
        let mut school = School::from_tuning(&SchoolTuning::default());
        let heights: Vec<f32> = school.iter().map(|(_, f)| f.position.y).collect();
        school.advance(2.0, 1.0, 0.8);
        for ((_, fish), y) in school.iter().zip(heights) {
            assert_relative_eq!(fish.position.y, y);
        }
    }

    #[test]
    fn yaw_follows_orbit_tangent() {
        let t = tuning_with(vec![FishSpawn::new(Vec3::new(1.0, 0.0, 0.0), Vec3::ONE)]);
        let mut fish = Fish::spawn(&t.spawns[0], &t);
        fish.angle = 0.0;
        fish.advance(0.0, 1.0, 0.8);
        // Tangent at angle 0 is (0, 0, -1): yaw of pi.
        assert_relative_eq!(fish.yaw().abs(), std::f32::consts::PI, epsilon = 1e-5);

        fish.angle = std::f32::consts::FRAC_PI_2;
        fish.advance(0.0, 1.0, 0.8);
        assert_relative_eq!(fish.yaw(), std::f32::consts::FRAC_PI_2, epsilon = 1e-5);
    }

    #[test]
    fn multiplier_scales_angular_step() {
        let t = tuning_with(vec![FishSpawn::new(Vec3::new(1.0, 0.0, 0.0), Vec3::ONE)]);
        let mut slow = Fish::spawn(&t.spawns[0], &t);
        let mut fast = slow.clone();
        slow.advance(1.0, 1.0, 0.8);
        fast.advance(1.0, 3.5, 0.8);
        assert_relative_eq!(slow.angle, 0.1);
        assert_relative_eq!(fast.angle, 0.35, epsilon = 1e-6);
        assert_relative_eq!(fast.current_speed(3.5), 1.05, epsilon = 1e-6);
    }

    #[test]
    fn inactive_fish_are_skipped_but_keep_their_slot() {
        let mut school = School::from_tuning(&SchoolTuning::default());
        let before = school.get(FishId(2)).unwrap().position;
        assert!(school.deactivate(FishId(2)));
        assert!(!school.deactivate(FishId(2)));
        assert!(!school.deactivate(FishId(99)));

        school.advance(1.0, 1.0, 0.8);
        assert_eq!(school.get(FishId(2)).unwrap().position, before);
        assert_eq!(school.len(), 10);
        assert_eq!(school.alive_count(), 9);
        assert!(school.active().all(|(id, _)| id != FishId(2)));
    }

    #[test]
    fn first_overlapping_uses_index_order() {
        let t = tuning_with(vec![
            FishSpawn::new(Vec3::new(50.0, 0.0, 0.0), Vec3::splat(0.3)),
            FishSpawn::new(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(0.3)),
            FishSpawn::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::splat(0.3)),
        ]);
        let mut school = School::from_tuning(&t);
        let reach = BoundingSphere::new(Vec3::ZERO, 2.0);
        let first = |school: &School| school.first_overlapping(&reach).map(|(id, _)| id);
        assert_eq!(first(&school), Some(FishId(1)));

        school.deactivate(FishId(1));
        assert_eq!(first(&school), Some(FishId(2)));
        assert!(school.any_overlapping(&reach));

        school.deactivate(FishId(2));
        assert_eq!(first(&school), None);
        assert!(!school.any_overlapping(&reach));
    }
}
