pub mod catalog;
pub mod clock;
pub mod config;
pub mod consolidate;
pub mod error;
pub mod identity;
pub mod model;
pub mod notify;
pub mod placeholder;
pub mod progress;
pub mod reset;
pub mod storage;
pub mod tracker;
