use frenzy_common::FishId;
use frenzy_kernel::Simulation;
use glam::{Mat4, Quat, Vec3};

/// Which loaded model a draw command uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelKind {
    Terrain,
    Fish,
    Shark,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::Terrain, ModelKind::Fish, ModelKind::Shark];
}

/// One model instance to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub model: ModelKind,
    pub transform: Mat4,
    /// Multiplier on the vertex-shader swim animation.
    pub sway: f32,
    pub fish: Option<FishId>,
}

/// Fixed placement of the static scenery and model scales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLayout {
    pub terrain_offset: Vec3,
    pub terrain_scale: f32,
    pub shark_scale: f32,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            terrain_offset: Vec3::new(0.0, -3.0, 0.0),
            terrain_scale: 0.08,
            shark_scale: 0.1,
        }
    }
}

/// Draw commands for one frame, grouped by model.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn build(sim: &Simulation, layout: &SceneLayout) -> Self {
        let school = sim.school();
        let mut commands = Vec::with_capacity(school.len() + 2);

        commands.push(DrawCommand {
            model: ModelKind::Terrain,
            transform: Mat4::from_scale_rotation_translation(
                Vec3::splat(layout.terrain_scale),
                Quat::IDENTITY,
                layout.terrain_offset,
            ),
            sway: 0.0,
            fish: None,
        });

        let multiplier = sim.fish_multiplier();
        for (id, fish) in school.active() {
            commands.push(DrawCommand {
                model: ModelKind::Fish,
                transform: Mat4::from_scale_rotation_translation(
                    fish.scale,
                    Quat::from_rotation_y(fish.yaw()),
                    fish.position,
                ),
                sway: multiplier,
                fish: Some(id),
            });
        }

        let shark = sim.shark();
        let rotation = Quat::from_rotation_y(-shark.heading) * Quat::from_rotation_z(shark.pitch);
        commands.push(DrawCommand {
            model: ModelKind::Shark,
            transform: Mat4::from_scale_rotation_translation(
                Vec3::splat(layout.shark_scale),
                rotation,
                shark.position,
            ),
            sway: sim.hunt().alertness.sway(),
            fish: None,
        });

        tracing::trace!("built {} draw commands", commands.len());
        Self { commands }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn of_kind(&self, kind: ModelKind) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(move |c| c.model == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use frenzy_common::SharkControls;
    use frenzy_kernel::{FishSpawn, SchoolTuning, Tuning};

    #[test]
    fn default_scene_draws_everything() {
        let sim = Simulation::default();
        let list = DrawList::build(&sim, &SceneLayout::default());
        assert_eq!(list.len(), 12);
        assert_eq!(list.of_kind(ModelKind::Terrain).count(), 1);
        assert_eq!(list.of_kind(ModelKind::Fish).count(), 10);
        assert_eq!(list.of_kind(ModelKind::Shark).count(), 1);
    }

    #[test]
    fn eaten_fish_are_not_drawn() {
        let mut tuning = Tuning {
            school: SchoolTuning {
                spawns: vec![
                    FishSpawn::new(Vec3::new(0.5, 0.0, 0.0), Vec3::splat(0.3)),
                    FishSpawn::new(Vec3::new(9.0, 0.0, 0.0), Vec3::splat(0.3)),
                ],
                ..SchoolTuning::default()
            },
            ..Tuning::default()
        };
        tuning.shark.position = Vec3::ZERO;
        let mut sim = Simulation::new(tuning);
        sim.step(1.0 / 60.0, SharkControls::NONE);

        let list = DrawList::build(&sim, &SceneLayout::default());
        let fish: Vec<_> = list.of_kind(ModelKind::Fish).filter_map(|c| c.fish).collect();
        assert_eq!(fish, vec![FishId(1)]);
        // Boosted school sways faster, alert shark too.
        assert!(list.of_kind(ModelKind::Fish).all(|c| c.sway == 3.5));
        assert_eq!(list.of_kind(ModelKind::Shark).next().unwrap().sway, 3.0);
    }

    #[test]
    fn shark_transform_places_model() {
        let sim = Simulation::default();
        let list = DrawList::build(&sim, &SceneLayout::default());
        let shark = list.of_kind(ModelKind::Shark).next().unwrap();
        let origin = shark.transform.transform_point3(Vec3::ZERO);
        assert!((origin - sim.shark().position).length() < 1e-5);

        // Model +X is the snout; it must line up with the swim direction.
        let snout = shark.transform.transform_vector3(Vec3::X).normalize();
        let heading = sim.shark().heading;
        let pitch = sim.shark().pitch;
        assert_relative_eq!(snout.x, heading.cos() * pitch.cos(), epsilon = 1e-5);
        assert_relative_eq!(snout.y, pitch.sin(), epsilon = 1e-5);
    }

    #[test]
    fn terrain_is_scaled_and_lowered() {
        let sim = Simulation::default();
        let list = DrawList::build(&sim, &SceneLayout::default());
        let terrain = list.of_kind(ModelKind::Terrain).next().unwrap();
        let p = terrain.transform.transform_point3(Vec3::new(100.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 8.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, -3.0, epsilon = 1e-5);
    }
}
