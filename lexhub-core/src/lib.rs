pub mod auth;
pub mod cascade;
pub mod error;
pub mod events;
pub mod files;
pub mod policy;
pub mod sanitize;
pub mod search;
pub mod service;
pub mod storage;

pub use error::{Error, Result};
