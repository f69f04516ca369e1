/// Per-body data a renderer needs to draw and pick a ball.
#[repr(C)]
#[derive(Default, Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Instance {
    pub position: [f32; 3],
    pub radius: f32,
    pub scale: [f32; 3],
    pub _padding0: f32,
    pub rotation: [f32; 3],
    pub _padding1: f32,
    pub picking_color: [f32; 4],
}

impl From<&physics::Body> for Instance {
    fn from(body: &physics::Body) -> Self {
        Self {
            position: body.position.into(),
            radius: body.radius,
            scale: body.scale.into(),
            rotation: body.rotation.into(),
            picking_color: id_to_color(body.id),
            ..Default::default()
        }
    }
}

pub fn snapshot(world: &physics::PhysicsWorld) -> Vec<Instance> {
    world.bodies.iter().map(Instance::from).collect()
}

/// Packs the id bytes into r, g, b, a (least significant first), normalized.
pub fn id_to_color(id: physics::BodyId) -> [f32; 4] {
    id.0.to_le_bytes().map(|byte| byte as f32 / 255.0)
}

pub fn color_to_id(color: [f32; 4]) -> physics::BodyId {
    let bytes = color.map(|channel| (channel * 255.0).round().clamp(0.0, 255.0) as u8);
    physics::BodyId(u32::from_le_bytes(bytes))
}

/// Body under a sampled picking-buffer pixel, if any is still alive.
pub fn pick(world: &physics::PhysicsWorld, color: [f32; 4]) -> Option<usize> {
    world.find(color_to_id(color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picking_colors_identify_bodies() {
        for id in [0, 1, 255, 256, 0x00ab_cdef, u32::MAX] {
            let id = physics::BodyId(id);
            assert_eq!(color_to_id(id_to_color(id)), id);
        }
        assert_eq!(id_to_color(physics::BodyId(0x0000_0102)), [2.0 / 255.0, 1.0 / 255.0, 0.0, 0.0]);
    }

    #[test]
    fn snapshot_mirrors_bodies() {
        let mut world = physics::PhysicsWorld::default();
        world.add_body(physics::BodyDescriptor::default());
        let id = world.add_body(physics::BodyDescriptor {
            position: nalgebra_glm::vec3(0.5, -0.25, 0.0),
            radius: 0.2,
            ..Default::default()
        });

        let instances = snapshot(&world);
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[1].position, [0.5, -0.25, 0.0]);
        assert_eq!(instances[1].radius, 0.2);
        assert_eq!(pick(&world, instances[1].picking_color), world.find(id));

        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        assert_eq!(bytes.len(), 2 * std::mem::size_of::<Instance>());
        assert_eq!(std::mem::size_of::<Instance>(), 64);
    }

    #[test]
    fn picking_a_removed_body_finds_nothing() {
        let mut world = physics::PhysicsWorld::default();
        let id = world.add_body(physics::BodyDescriptor::default());
        let color = id_to_color(id);
        world.remove_body(0);
        assert_eq!(pick(&world, color), None);
    }
}
