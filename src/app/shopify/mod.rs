//! Shopify 集成：OAuth、GraphQL 转发和店铺连接记录

pub mod gateway;
pub mod handler;
pub mod model;
pub mod service;
pub mod session;
