// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 分类（category）：封闭的公告分类枚举及其关键词表
/// - 分类结果（classification）：分类、置信度与来源标签
/// - 公告（notice）：列表项、详情解析结果与持久化记录
/// - 来源（source）：公告板配置与内置注册表
pub mod category;
pub mod classification;
pub mod notice;
pub mod source;
