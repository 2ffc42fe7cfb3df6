// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 公告服务（notice_service）：内容指纹与幂等写入
/// - 分类器（classifier）：关键词、训练模型、远程LLM三层级联
pub mod classifier;
pub mod notice_service;
