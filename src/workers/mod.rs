// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供公告处理流水线和按主机分组的工作管理
pub mod manager;
pub mod notice_worker;
