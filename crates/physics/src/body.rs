use rand::Rng;

pub const DENSITY: f32 = 1000.0;
pub const DEFAULT_FRICTION: f32 = 0.01;
pub const DEFAULT_RESTITUTION: f32 = 0.85;
pub const MIN_RANDOM_RADIUS: f32 = 0.05;
pub const MAX_RANDOM_RADIUS: f32 = 0.2;

/// Squared tangential speed below which ball friction is skipped.
pub const TANGENT_EPSILON: f32 = 1e-4;

/// Fraction of the overlap removed by positional correction per contact.
pub const CORRECTION_FRACTION: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AxisAlignedBoundingBox {
    pub min: nalgebra_glm::Vec3,
    pub max: nalgebra_glm::Vec3,
}

impl Default for AxisAlignedBoundingBox {
    fn default() -> Self {
        Self::unit_cube()
    }
}

impl AxisAlignedBoundingBox {
    pub fn unit_cube() -> Self {
        Self::from_half_extent(1.0)
    }

    pub fn from_half_extent(half_extent: f32) -> Self {
        Self {
            min: nalgebra_glm::vec3(-half_extent, -half_extent, -half_extent),
            max: nalgebra_glm::vec3(half_extent, half_extent, half_extent),
        }
    }
}

/// Everything needed to spawn a body. Mass is derived from the radius.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BodyDescriptor {
    pub position: nalgebra_glm::Vec3,
    pub velocity: nalgebra_glm::Vec3,
    pub radius: f32,
    pub friction: f32,
    pub restitution: f32,
    pub gravity_enabled: bool,
    pub scale: nalgebra_glm::Vec3,
    pub rotation: nalgebra_glm::Vec3,
}

impl Default for BodyDescriptor {
    fn default() -> Self {
        Self {
            position: nalgebra_glm::Vec3::zeros(),
            velocity: nalgebra_glm::Vec3::zeros(),
            radius: 0.1,
            friction: DEFAULT_FRICTION,
            restitution: DEFAULT_RESTITUTION,
            gravity_enabled: false,
            scale: nalgebra_glm::vec3(1.0, 1.0, 1.0),
            rotation: nalgebra_glm::Vec3::zeros(),
        }
    }
}

impl BodyDescriptor {
    /// Randomized ball in the style of the interactive sandbox: position,
    /// velocity and scale uniform in [-1, 1) per axis.
    pub fn random(rng: &mut impl Rng) -> Self {
        let mut unit_vector = || {
            nalgebra_glm::vec3(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            )
        };
        let position = unit_vector();
        let velocity = unit_vector();
        let scale = unit_vector();
        Self {
            position,
            velocity,
            scale,
            radius: rng.gen_range(MIN_RANDOM_RADIUS..MAX_RANDOM_RADIUS),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Body {
    pub id: crate::BodyId,
    pub position: nalgebra_glm::Vec3,
    pub velocity: nalgebra_glm::Vec3,
    pub radius: f32,
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    pub gravity_enabled: bool,
    pub scale: nalgebra_glm::Vec3,
    pub rotation: nalgebra_glm::Vec3,
}

impl Body {
    pub fn new(id: crate::BodyId, descriptor: BodyDescriptor) -> Self {
        debug_assert!(descriptor.radius > 0.0, "body radius must be positive");
        let BodyDescriptor {
            position,
            velocity,
            radius,
            friction,
            restitution,
            gravity_enabled,
            scale,
            rotation,
        } = descriptor;
        Self {
            id,
            position,
            velocity,
            radius,
            mass: Self::mass_from_radius(radius),
            friction,
            restitution,
            gravity_enabled,
            scale,
            rotation,
        }
    }

    pub fn mass_from_radius(radius: f32) -> f32 {
        (4.0 / 3.0) * std::f32::consts::PI * radius.powi(3) * DENSITY
    }

    /// Per-frame step. Gravity-driven bodies only move in `fixed_update`.
    pub fn update(&mut self, delta_time: f32, bounds: &AxisAlignedBoundingBox) {
        if !self.gravity_enabled {
            self.position += self.velocity * delta_time;
        }

        for axis in 0..3 {
            let mut wall_normal = nalgebra_glm::Vec3::zeros();
            if self.position[axis] - self.radius < bounds.min[axis] {
                self.position[axis] = bounds.min[axis] + self.radius;
                wall_normal[axis] = 1.0;
                self.handle_wall_collision(&wall_normal);
            } else if self.position[axis] + self.radius > bounds.max[axis] {
                self.position[axis] = bounds.max[axis] - self.radius;
                wall_normal[axis] = -1.0;
                self.handle_wall_collision(&wall_normal);
            }
        }
    }

    pub fn fixed_update(&mut self, fixed_step: f32, gravity: f32) {
        if !self.gravity_enabled {
            return;
        }

        // Translate with the pre-step velocity, then accelerate
        self.position += self.velocity * fixed_step;
        self.velocity.y += gravity * fixed_step;
    }

    pub fn handle_wall_collision(&mut self, wall_normal: &nalgebra_glm::Vec3) {
        let normal_velocity = wall_normal * nalgebra_glm::dot(&self.velocity, wall_normal);
        let tangent_velocity = self.velocity - normal_velocity;
        self.velocity =
            -normal_velocity * self.restitution + tangent_velocity * (1.0 - self.friction);
    }

    pub fn check_collision(a: &Body, b: &Body) -> bool {
        nalgebra_glm::distance(&a.position, &b.position) <= a.radius + b.radius
    }

    pub fn handle_ball_collision(&mut self, other: &mut Body) {
        let offset = other.position - self.position;
        let normal = if nalgebra_glm::length2(&offset) > 0.0 {
            nalgebra_glm::normalize(&offset)
        } else {
            log::debug!(
                "Bodies {:?} and {:?} share a center, resolving along +X",
                self.id,
                other.id
            );
            nalgebra_glm::vec3(1.0, 0.0, 0.0)
        };

        let relative_velocity = other.velocity - self.velocity;
        let velocity_along_normal = nalgebra_glm::dot(&relative_velocity, &normal);

        // Already separating
        if velocity_along_normal > 0.0 {
            return;
        }

        let inverse_mass_sum = 1.0 / self.mass + 1.0 / other.mass;

        let restitution = self.restitution.min(other.restitution);
        let j = -(1.0 + restitution) * velocity_along_normal / inverse_mass_sum;

        let impulse = normal * j;
        self.velocity -= impulse / self.mass;
        other.velocity += impulse / other.mass;

        let tangent = relative_velocity - normal * velocity_along_normal;
        if nalgebra_glm::length2(&tangent) > TANGENT_EPSILON {
            let tangent = nalgebra_glm::normalize(&tangent);
            let jt = -nalgebra_glm::dot(&relative_velocity, &tangent) / inverse_mass_sum;

            // Coulomb cone bounded by the normal impulse
            let friction = self.friction.min(other.friction);
            let friction_impulse = if jt.abs() < j * friction {
                tangent * jt
            } else {
                tangent * (-j * friction)
            };

            self.velocity -= friction_impulse / self.mass;
            other.velocity += friction_impulse / other.mass;
        }

        let penetration = self.radius + other.radius - nalgebra_glm::length(&offset);
        let correction = normal * penetration / (self.mass + other.mass) * CORRECTION_FRACTION;

        // Each body is pushed in proportion to its own mass
        self.position -= correction * self.mass;
        other.position += correction * other.mass;
    }
}
