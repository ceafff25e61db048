//! Domain layer - Pure business logic.

pub mod imaging;
pub mod jobs;
pub mod sizes;
