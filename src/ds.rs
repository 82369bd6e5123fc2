//! Data structures shared by every property service: the value and class
//! model, errors, and the accessor cache.

pub mod cache;
pub mod class;
pub mod error;
pub mod value;
