pub mod config;
pub mod entity;
pub mod error;
pub mod event;
pub mod ports;
pub mod topics;
pub mod trust;
