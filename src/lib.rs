//! # fundboard
//!
//! 捐赠/投资看板服务：
//! - 捐赠项目与投资条目的本地存储（每次修改整体写回）
//! - 募资进度、收益、ROI 等派生指标
//! - Shopify OAuth 与 GraphQL 查询的转发

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;
pub mod metrics;

pub use app::{router, AppState};
pub use config::Config;
