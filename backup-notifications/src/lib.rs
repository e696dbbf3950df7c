pub mod config;
pub mod custom_resource;
pub mod handler;
