mod auth;
mod feed;
mod helpers;
mod recipes;
