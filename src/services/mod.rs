pub mod access;
pub mod auth;
pub mod feed;
pub mod profile;
pub mod recipe;
pub mod social;
pub mod upload;
