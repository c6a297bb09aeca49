pub mod admin;
pub mod book;
pub mod config;
pub mod events;
pub mod transfer;
