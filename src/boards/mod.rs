// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 公告板适配器模块
///
/// - 适配器特质（traits）
/// - 通用分页公告板（list_board）
/// - 招聘公告板（recruit_board）
/// - 公共解析函数（parsing）
/// - 适配器注册表（factory）
pub mod factory;
pub mod list_board;
pub mod parsing;
pub mod recruit_board;
pub mod traits;
