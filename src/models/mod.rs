pub mod follow;
pub mod recipe;
pub mod user;
