// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 公告板布局类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardKind {
    /// 通用分页公告板（`_prog/_board`）
    #[serde(alias = "board")]
    ListBoard,
    /// 招聘公告板（`_prog/recruit`），标记结构不统一
    #[serde(alias = "recruit")]
    RecruitBoard,
}

impl fmt::Display for BoardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardKind::ListBoard => write!(f, "list_board"),
            BoardKind::RecruitBoard => write!(f, "recruit_board"),
        }
    }
}

/// 公告来源
///
/// 一个物理公告板对应一条配置，运行期间不可变。
/// `id` 必须与数据库中已有的来源ID保持一致。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeSource {
    /// 来源ID
    pub id: i32,
    /// 来源名称
    pub name: String,
    /// 布局类型
    pub kind: BoardKind,
    /// 公告板代码（仅 ListBoard 使用）
    #[serde(default)]
    pub board_code: Option<String>,
    /// 菜单/栏目代码
    pub menu_code: String,
    /// 需要抓取的页数
    #[serde(default = "default_pages")]
    pub pages: u32,
}

fn default_pages() -> u32 {
    2
}

impl NoticeSource {
    fn list_board(id: i32, name: &str, board_code: &str, menu_code: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind: BoardKind::ListBoard,
            board_code: Some(board_code.to_string()),
            menu_code: menu_code.to_string(),
            pages: default_pages(),
        }
    }

    fn recruit_board(id: i32, name: &str, menu_code: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind: BoardKind::RecruitBoard,
            board_code: None,
            menu_code: menu_code.to_string(),
            pages: default_pages(),
        }
    }
}

/// 内置来源注册表
///
/// 配置文件中没有 `sources` 时使用
pub fn default_sources() -> Vec<NoticeSource> {
    vec![
        NoticeSource::list_board(1, "메인-0704", "sub07_0704", "0704"),
        NoticeSource::list_board(2, "메인-0709", "sub07_0709", "0709"),
        NoticeSource::list_board(3, "메인-0705", "sub07_0705", "0705"),
        NoticeSource::list_board(4, "메인-070808", "sub07_070808", "070808"),
        NoticeSource::recruit_board(5, "리크루트-07080401", "07080401"),
    ]
}
