// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 抓取引擎模块
///
/// - 抓取特质与请求/结果类型（traits）
/// - 基于reqwest的重试抓取器（reqwest_engine）
/// - 每主机并发限制（host_throttle）
pub mod host_throttle;
pub mod reqwest_engine;
pub mod traits;
