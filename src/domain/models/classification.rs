// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::category::Category;
use std::fmt;

/// 分类结果来源
///
/// 记录是级联中的哪一层给出了最终结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// 关键词层直接达到阈值
    KeywordLocal,
    /// 训练模型达到阈值，携带模型版本
    Model(String),
    /// 模型与关键词结论一致后合并
    ModelWithKeyword(String),
    /// 远程LLM备份分类
    RemoteBackup,
    /// 所有层都未达到阈值，退回关键词结果
    KeywordFinal,
    /// 没有任何可用结果
    DefaultFallback,
    /// 级联内部出错
    ErrorFallback,
}

impl Provenance {
    /// 持久化使用的标签
    pub fn tag(&self) -> String {
        match self {
            Provenance::KeywordLocal => "keyword-local".to_string(),
            Provenance::Model(version) => version.clone(),
            Provenance::ModelWithKeyword(version) => format!("{}+keyword", version),
            Provenance::RemoteBackup => "openai-backup".to_string(),
            Provenance::KeywordFinal => "keyword-final".to_string(),
            Provenance::DefaultFallback => "default-fallback".to_string(),
            Provenance::ErrorFallback => "error-fallback".to_string(),
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

/// 分类结果
///
/// 每条公告只保留一个当前结果，重新分类时覆盖
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub category: Category,
    /// 置信度，始终在 [0, 1] 内
    pub confidence: f64,
    pub provenance: Provenance,
}

impl ClassificationResult {
    pub fn new(category: Category, confidence: f64, provenance: Provenance) -> Self {
        Self {
            category,
            confidence: clamp_confidence(confidence),
            provenance,
        }
    }
}

/// 把置信度限制在 [0, 1]，NaN 视为 0
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
