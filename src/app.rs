use rand::SeedableRng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTimestep {
    pub step: f32,
    pub accumulator: f32,
}

impl FixedTimestep {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
        }
    }

    pub fn accumulate(&mut self, delta_time: f32) {
        self.accumulator += delta_time;
    }

    /// Takes one step out of the accumulator if a whole step is available.
    pub fn consume(&mut self) -> bool {
        if self.accumulator >= self.step {
            self.accumulator -= self.step;
            true
        } else {
            false
        }
    }
}

pub struct Context {
    pub world: physics::PhysicsWorld,
    pub timestep: FixedTimestep,
    pub commands: Vec<crate::command::Command>,
    pub rng: rand::rngs::StdRng,
    pub delta_time: f64,
    pub last_frame: chrono::DateTime<chrono::Utc>,
    pub frame: u64,
    pub should_exit: bool,
}

impl Context {
    pub fn new(settings: &crate::config::Settings) -> crate::config::Result<Self> {
        settings.validate()?;

        let mut rng = match settings.seed {
            Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
            None => rand::rngs::StdRng::from_entropy(),
        };

        let mut world = physics::PhysicsWorld::with_bounds(settings.bounds());
        world.gravity = settings.gravity;
        (0..settings.initial_bodies).for_each(|_| {
            world.add_random_body(&mut rng);
        });
        world.bodies.iter_mut().for_each(|body| {
            body.friction = settings.friction;
            body.restitution = settings.restitution;
            body.gravity_enabled = settings.gravity_enabled;
        });
        log::info!("Spawned {} bodies", world.len());

        Ok(Self {
            world,
            timestep: FixedTimestep::new(settings.fixed_step),
            commands: Vec::new(),
            rng,
            delta_time: 0.0,
            last_frame: chrono::Utc::now(),
            frame: 0,
            should_exit: false,
        })
    }

    pub fn queue(&mut self, command: crate::command::Command) {
        self.commands.push(command);
    }

    /// Advances one frame and returns how many fixed ticks ran.
    pub fn step(&mut self, delta_time: f32) -> usize {
        let Self {
            world,
            commands,
            rng,
            timestep,
            ..
        } = self;

        for command in commands.drain(..) {
            command.apply(world, rng);
        }

        timestep.accumulate(delta_time);
        world.frame_update(delta_time);

        let mut ticks = 0;
        while timestep.consume() {
            world.fixed_step_tick(timestep.step);
            ticks += 1;
        }
        log::trace!("Frame {} ran {ticks} fixed ticks", self.frame);

        self.frame += 1;
        ticks
    }

    pub fn instances(&self) -> Vec<crate::snapshot::Instance> {
        crate::snapshot::snapshot(&self.world)
    }
}

pub trait State {
    /// Called once before the main loop
    fn initialize(&mut self, _context: &mut Context) {}

    /// Called every frame before the simulation advances
    fn update(&mut self, _context: &mut Context) {}
}

pub fn run(
    mut state: impl State,
    settings: crate::config::Settings,
) -> crate::config::Result<()> {
    env_logger::init();

    let mut context = Context::new(&settings)?;
    state.initialize(&mut context);

    let frame_budget = std::time::Duration::from_secs_f32(settings.fixed_step);
    context.last_frame = chrono::Utc::now();

    loop {
        let now = chrono::Utc::now();
        let duration_since_last_frame = now.signed_duration_since(context.last_frame);
        context.delta_time = duration_since_last_frame
            .num_microseconds()
            .unwrap_or_default() as f64
            / 1_000_000.0;
        context.last_frame = now;

        state.update(&mut context);
        context.step(context.delta_time as f32);

        if context.should_exit {
            break;
        }
        if settings
            .max_frames
            .is_some_and(|max_frames| context.frame >= max_frames)
        {
            log::info!("Reached frame limit of {}", context.frame);
            break;
        }

        // Cap the frame rate at one frame per fixed step
        let elapsed = chrono::Utc::now()
            .signed_duration_since(now)
            .to_std()
            .unwrap_or_default();
        if let Some(remaining) = frame_budget.checked_sub(elapsed) {
            std::thread::sleep(remaining);
        }
    }

    Ok(())
}
