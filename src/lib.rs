pub mod app;
pub mod command;
pub mod config;
pub mod snapshot;

pub use log;
pub use nalgebra_glm;
pub use physics;
pub use rand;

pub use self::app::run;
