#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to read settings file!")]
    ReadSettings(#[source] std::io::Error),

    #[error("Failed to parse settings!")]
    ParseSettings(#[source] serde_json::Error),

    #[error("Invalid setting '{name}': {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fixed_step: f32,
    pub gravity: f32,
    pub gravity_enabled: bool,
    pub friction: f32,
    pub restitution: f32,
    pub initial_bodies: usize,
    pub bounds_half_extent: f32,
    pub seed: Option<u64>,
    pub max_frames: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fixed_step: 1.0 / 60.0,
            gravity: physics::DEFAULT_GRAVITY,
            gravity_enabled: false,
            friction: physics::DEFAULT_FRICTION,
            restitution: physics::DEFAULT_RESTITUTION,
            initial_bodies: 1,
            bounds_half_extent: 1.0,
            seed: None,
            max_frames: None,
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading settings from '{}'...", path.display());
        let contents = std::fs::read_to_string(path).map_err(Error::ReadSettings)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json).map_err(Error::ParseSettings)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Friction and restitution outside [0, 1] are accepted; they only make
    /// contacts non-physical.
    pub fn validate(&self) -> Result<()> {
        if !(self.fixed_step > 0.0) {
            return Err(Error::InvalidSetting {
                name: "fixed_step",
                reason: format!("must be positive, got {}", self.fixed_step),
            });
        }
        if !(self.bounds_half_extent > physics::MAX_RANDOM_RADIUS) {
            return Err(Error::InvalidSetting {
                name: "bounds_half_extent",
                reason: format!(
                    "must exceed the largest spawn radius {}, got {}",
                    physics::MAX_RANDOM_RADIUS,
                    self.bounds_half_extent
                ),
            });
        }
        for (name, value) in [("friction", self.friction), ("restitution", self.restitution)] {
            if !(0.0..=1.0).contains(&value) {
                log::warn!("Setting '{name}' = {value} is outside [0, 1]");
            }
        }
        Ok(())
    }

    pub fn bounds(&self) -> physics::AxisAlignedBoundingBox {
        physics::AxisAlignedBoundingBox::from_half_extent(self.bounds_half_extent)
    }
}
