//! WordPressエクスポート → 静的ブログJSON 移行ツール

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod migrate;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod store;
pub mod transform;
pub mod validate;
pub mod wordpress;
