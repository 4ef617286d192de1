pub mod error;
pub mod health;
pub mod resources;

pub use error::AppError;
