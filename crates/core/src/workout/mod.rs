//! Workout and comment records in both key shapes.
//!
//! `Workout` and `Comment` are addressed by a store-assigned integer id.
//! `WorkoutEntity` and `CommentEntity` are flat and addressed by a
//! caller-supplied [`CompoundKey`](crate::storage::CompoundKey).

mod entities;
mod types;

pub use entities::{CommentEntity, WorkoutEntity};
pub use types::{Comment, Exercise, Workout};
