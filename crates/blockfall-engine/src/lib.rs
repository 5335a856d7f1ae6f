pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding at requested placement")]
pub struct PieceCollisionError;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("hold already used since the last lock")]
pub struct HoldLockedError;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("spawned piece collides with the stack")]
pub struct SpawnCollisionError;
