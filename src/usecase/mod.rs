pub mod rating;
pub mod types;

pub use rating::Rating;
pub use types::{Factor, Field, UseCase};
