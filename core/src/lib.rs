pub mod browser;
pub mod db;
pub mod error;
pub mod live;
pub mod models;
pub mod repository;

pub use error::{Error, Result, ValidationError};
