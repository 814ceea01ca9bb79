pub mod config;
pub mod controller;
pub mod headless;
pub mod mapping;
