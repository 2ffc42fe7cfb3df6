// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DbErr;
use thiserror::Error;

/// 仓库层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("数据库错误: {0}")]
    Database(#[from] DbErr),

    /// 写入后未能读回记录
    #[error("未找到数据: {0}")]
    NotFound(String),

    #[error("无效参数: {0}")]
    InvalidParameter(String),
}

/// 流水线错误类型
///
/// 只有持久化失败会中止一次运行，抓取与解析失败都在流水线内部降级为跳过
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("持久化错误: {0}")]
    Persistence(#[from] RepositoryError),

    #[error("工作器错误: {0}")]
    Worker(String),
}
