//! 投资组合

pub mod handler;
pub mod model;
pub mod service;
