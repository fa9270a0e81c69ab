//! 捐赠项目

pub mod handler;
pub mod model;
pub mod service;
