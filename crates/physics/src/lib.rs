mod body;
mod world;

pub use body::*;
pub use world::*;

#[derive(
    Default, Debug, PartialEq, Eq, Copy, Clone, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct BodyId(pub u32);
