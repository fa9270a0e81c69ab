//! 基础设施层：日志和本地存储

pub mod logger;
pub mod storage;
