use ballpit::command::{Command, Target};

#[derive(clap::Parser, Debug)]
struct Args {
    /// JSON settings file; defaults are used when omitted
    #[arg(short, long)]
    settings: Option<std::path::PathBuf>,

    /// Number of bodies, overriding the settings file
    #[arg(short, long)]
    bodies: Option<usize>,

    /// Frames to run before exiting
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Enable gravity for every body after this many frames
    #[arg(long)]
    drop_after: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = <Args as clap::Parser>::parse();

    let mut settings = match &args.settings {
        Some(path) => ballpit::config::Settings::load(path)?,
        None => ballpit::config::Settings::default(),
    };
    if let Some(bodies) = args.bodies {
        settings.initial_bodies = bodies;
    }
    settings.max_frames = Some(args.frames);

    ballpit::run(
        Headless {
            drop_after: args.drop_after,
        },
        settings,
    )?;

    Ok(())
}

pub struct Headless {
    drop_after: Option<u64>,
}

impl ballpit::app::State for Headless {
    fn initialize(&mut self, context: &mut ballpit::app::Context) {
        ballpit::log::info!(
            "Running {} bodies at a fixed step of {:.4}s",
            context.world.len(),
            context.timestep.step
        );
    }

    fn update(&mut self, context: &mut ballpit::app::Context) {
        if self.drop_after == Some(context.frame) {
            context.queue(Command::SetGravityEnabled {
                target: Target::All,
                enabled: true,
            });
        }

        if context.frame % 60 == 0 {
            let instances = context.instances();
            let kinetic_energy = context
                .world
                .bodies
                .iter()
                .map(|body| 0.5 * body.mass * ballpit::nalgebra_glm::length2(&body.velocity))
                .sum::<f32>();
            ballpit::log::info!(
                "Frame {}: {} bodies ({} instance bytes), {} contacts, kinetic energy {kinetic_energy:.3}",
                context.frame,
                instances.len(),
                std::mem::size_of_val(instances.as_slice()),
                context.world.colliding_pairs().len(),
            );
        }
    }
}
