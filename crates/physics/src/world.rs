pub const DEFAULT_GRAVITY: f32 = 9.81;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PhysicsWorld {
    pub gravity: f32,
    pub bounds: crate::AxisAlignedBoundingBox,
    pub bodies: Vec<crate::Body>,
    next_id: u32,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            bounds: crate::AxisAlignedBoundingBox::unit_cube(),
            bodies: Vec::new(),
            next_id: 0,
        }
    }
}

impl PhysicsWorld {
    pub fn with_bounds(bounds: crate::AxisAlignedBoundingBox) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn body(&self, index: usize) -> Option<&crate::Body> {
        self.bodies.get(index)
    }

    pub fn body_mut(&mut self, index: usize) -> Option<&mut crate::Body> {
        self.bodies.get_mut(index)
    }

    /// Slot currently holding the body with this id, if it is still alive.
    pub fn find(&self, id: crate::BodyId) -> Option<usize> {
        self.bodies.iter().position(|body| body.id == id)
    }

    pub fn add_body(&mut self, descriptor: crate::BodyDescriptor) -> crate::BodyId {
        let id = crate::BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.push(crate::Body::new(id, descriptor));
        log::trace!("Added body {id:?}, {} live", self.bodies.len());
        id
    }

    pub fn add_random_body(&mut self, rng: &mut impl rand::Rng) -> crate::BodyId {
        self.add_body(crate::BodyDescriptor::random(rng))
    }

    /// Swap-removes the body in `index`; the last body takes its slot.
    ///
    /// Panics if `index` is out of range.
    pub fn remove_body(&mut self, index: usize) -> crate::Body {
        let body = self.bodies.swap_remove(index);
        log::trace!("Removed body {:?}, {} live", body.id, self.bodies.len());
        body
    }

    pub fn frame_update(&mut self, delta_time: f32) {
        let bounds = self.bounds;
        self.bodies
            .iter_mut()
            .for_each(|body| body.update(delta_time, &bounds));
    }

    pub fn fixed_step_tick(&mut self, fixed_step: f32) {
        let gravity = self.gravity;
        self.bodies
            .iter_mut()
            .for_each(|body| body.fixed_update(fixed_step, gravity));

        // Ascending (i, j) order decides which body is `self` in the resolution
        for index_a in 0..self.bodies.len() {
            for index_b in (index_a + 1)..self.bodies.len() {
                let (head, tail) = self.bodies.split_at_mut(index_b);
                let body_a = &mut head[index_a];
                let body_b = &mut tail[0];
                if crate::Body::check_collision(body_a, body_b) {
                    body_a.handle_ball_collision(body_b);
                }
            }
        }
    }

    /// Pairs currently in contact, in resolution order.
    pub fn colliding_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for index_a in 0..self.bodies.len() {
            for index_b in (index_a + 1)..self.bodies.len() {
                if crate::Body::check_collision(&self.bodies[index_a], &self.bodies[index_b]) {
                    pairs.push((index_a, index_b));
                }
            }
        }
        pairs
    }
}
