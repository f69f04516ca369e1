use rand::Rng;

/// Which bodies a tuning command applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Target {
    All,
    Body(usize),
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Command {
    AddBody(physics::BodyDescriptor),
    AddRandomBody,
    RemoveBody(usize),
    RemoveRandomBody,
    SetBodyCount(usize),
    SetGravity(f32),
    SetFriction { target: Target, value: f32 },
    SetRestitution { target: Target, value: f32 },
    SetGravityEnabled { target: Target, enabled: bool },
}

impl Command {
    pub fn apply(self, world: &mut physics::PhysicsWorld, rng: &mut impl Rng) {
        match self {
            Command::AddBody(descriptor) => {
                world.add_body(descriptor);
            }
            Command::AddRandomBody => {
                add_inheriting_body(world, rng);
            }
            Command::RemoveBody(index) => {
                world.remove_body(index);
            }
            Command::RemoveRandomBody => {
                if !world.is_empty() {
                    let index = rng.gen_range(0..world.len());
                    world.remove_body(index);
                }
            }
            Command::SetBodyCount(count) => set_body_count(world, count, rng),
            Command::SetGravity(gravity) => {
                log::info!("Gravity set to {gravity}");
                world.gravity = gravity;
            }
            Command::SetFriction { target, value } => {
                for_each_target(world, target, |body| body.friction = value)
            }
            Command::SetRestitution { target, value } => {
                for_each_target(world, target, |body| body.restitution = value)
            }
            Command::SetGravityEnabled { target, enabled } => {
                for_each_target(world, target, |body| body.gravity_enabled = enabled)
            }
        }
    }
}

/// Random body that picks up body 0's gravity flag, like the sandbox UI.
fn add_inheriting_body(world: &mut physics::PhysicsWorld, rng: &mut impl Rng) {
    let gravity_enabled = world.body(0).is_some_and(|first| first.gravity_enabled);
    world.add_random_body(rng);
    if let Some(body) = world.bodies.last_mut() {
        body.gravity_enabled = gravity_enabled;
    }
}

/// Grows with random bodies or shrinks by removing random slots. Never below one.
fn set_body_count(world: &mut physics::PhysicsWorld, count: usize, rng: &mut impl Rng) {
    let count = count.max(1);
    let previous = world.len();
    while world.len() < count {
        add_inheriting_body(world, rng);
    }
    while world.len() > count {
        let index = rng.gen_range(0..world.len());
        world.remove_body(index);
    }
    if previous != count {
        log::info!("Body count changed from {previous} to {count}");
    }
}

fn for_each_target(
    world: &mut physics::PhysicsWorld,
    target: Target,
    mut action: impl FnMut(&mut physics::Body),
) {
    match target {
        Target::All => world.bodies.iter_mut().for_each(action),
        Target::Body(index) => match world.body_mut(index) {
            Some(body) => action(body),
            None => log::warn!("No body in slot {index}, ignoring command"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(3)
    }

    #[test]
    fn body_count_grows_and_shrinks() {
        let mut world = physics::PhysicsWorld::default();
        let mut rng = rng();

        Command::SetBodyCount(10).apply(&mut world, &mut rng);
        assert_eq!(world.len(), 10);

        Command::SetBodyCount(4).apply(&mut world, &mut rng);
        assert_eq!(world.len(), 4);

        Command::SetBodyCount(0).apply(&mut world, &mut rng);
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn new_bodies_inherit_only_the_gravity_flag() {
        let mut world = physics::PhysicsWorld::default();
        let mut rng = rng();
        Command::AddRandomBody.apply(&mut world, &mut rng);
        Command::SetGravityEnabled {
            target: Target::Body(0),
            enabled: true,
        }
        .apply(&mut world, &mut rng);
        Command::SetFriction {
            target: Target::Body(0),
            value: 0.4,
        }
        .apply(&mut world, &mut rng);

        Command::SetBodyCount(3).apply(&mut world, &mut rng);
        assert!(world.bodies.iter().all(|body| body.gravity_enabled));
        assert_eq!(world.bodies[0].friction, 0.4);
        for body in world.bodies.iter().skip(1) {
            assert_eq!(body.friction, physics::DEFAULT_FRICTION);
            assert_eq!(body.restitution, physics::DEFAULT_RESTITUTION);
        }
    }

    #[test]
    fn broadcast_tunables_reach_every_body() {
        let mut world = physics::PhysicsWorld::default();
        let mut rng = rng();
        Command::SetBodyCount(5).apply(&mut world, &mut rng);
        Command::SetRestitution {
            target: Target::All,
            value: 0.25,
        }
        .apply(&mut world, &mut rng);
        Command::SetGravity(-4.0).apply(&mut world, &mut rng);

        assert!(world.bodies.iter().all(|body| body.restitution == 0.25));
        assert_eq!(world.gravity, -4.0);
    }

    #[test]
    fn targeted_tunables_leave_other_bodies_alone() {
        let mut world = physics::PhysicsWorld::default();
        let mut rng = rng();
        Command::SetBodyCount(2).apply(&mut world, &mut rng);
        Command::SetRestitution {
            target: Target::Body(1),
            value: 0.0,
        }
        .apply(&mut world, &mut rng);
        Command::SetRestitution {
            target: Target::Body(7),
            value: 0.5,
        }
        .apply(&mut world, &mut rng);

        assert_eq!(world.bodies[0].restitution, physics::DEFAULT_RESTITUTION);
        assert_eq!(world.bodies[1].restitution, 0.0);
    }

    #[test]
    fn explicit_add_and_remove() {
        let mut world = physics::PhysicsWorld::default();
        let mut rng = rng();
        for x in [-0.5, 0.0, 0.5] {
            Command::AddBody(physics::BodyDescriptor {
                position: nalgebra_glm::vec3(x, 0.0, 0.0),
                ..Default::default()
            })
            .apply(&mut world, &mut rng);
        }
        Command::RemoveBody(0).apply(&mut world, &mut rng);
        assert_eq!(world.bodies[0].position.x, 0.5);
        assert_eq!(world.len(), 2);

        Command::RemoveRandomBody.apply(&mut world, &mut rng);
        Command::RemoveRandomBody.apply(&mut world, &mut rng);
        Command::RemoveRandomBody.apply(&mut world, &mut rng);
        assert!(world.is_empty());
    }
}
