// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::category::Category;
use crate::domain::services::classifier::ClassifierError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

/// 训练模型特质
///
/// 只负责推理，训练在离线环境完成
pub trait TextModel: Send + Sync {
    /// 模型版本，用作分类来源标签
    fn version(&self) -> &str;

    /// 预测分类及置信度
    fn predict(&self, text: &str) -> Result<(Category, f64), ClassifierError>;
}

/// 模型输入文本
///
/// 标题重复三次以提高其权重
pub fn model_input(title: &str, body: &str) -> String {
    let title = title.trim();
    format!("{title} {title} {title} {}", body.trim())
}

pub(crate) fn default_version() -> String {
    "ml-1.0".to_string()
}

/// TF-IDF + 线性分类器
///
/// 从离线训练导出的 JSON 文件加载：词表、IDF 权重、
/// 每个分类的系数和截距。二分类模型只有一行系数。
#[derive(Debug, Clone, Deserialize)]
pub struct LinearTextModel {
    #[serde(default = "default_version")]
    version: String,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    classes: Vec<i32>,
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(skip)]
    categories: Vec<Category>,
}

impl LinearTextModel {
    /// 从文件加载模型
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    /// 从 JSON 字符串加载模型并校验维度
    pub fn from_json(raw: &str) -> Result<Self, ClassifierError> {
        let mut model: LinearTextModel = serde_json::from_str(raw)?;
        // the version becomes the persisted provenance tag, which must not be blank
        model.version = model.version.trim().to_string();
        if model.version.is_empty() {
            model.version = default_version();
        }
        model.categories = model
            .classes
            .iter()
            .map(|id| Category::from_id(*id).ok_or(ClassifierError::UnknownCategory(*id)))
            .collect::<Result<_, _>>()?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ClassifierError> {
        let features = self.idf.len();
        if let Some((token, index)) = self.vocabulary.iter().find(|(_, i)| **i >= features) {
            return Err(ClassifierError::InvalidModel(format!(
                "token '{}' maps to column {} but idf has {} entries",
                token, index, features
            )));
        }

        let expected_rows = match self.classes.len() {
            0 | 1 => {
                return Err(ClassifierError::InvalidModel(
                    "model needs at least two classes".to_string(),
                ))
            }
            2 => 1,
            n => n,
        };
        if self.coefficients.len() != expected_rows || self.intercepts.len() != expected_rows {
            return Err(ClassifierError::InvalidModel(format!(
                "expected {} coefficient rows and intercepts, got {} and {}",
                expected_rows,
                self.coefficients.len(),
                self.intercepts.len()
            )));
        }
        if self.coefficients.iter().any(|row| row.len() != features) {
            return Err(ClassifierError::InvalidModel(
                "coefficient row width does not match idf length".to_string(),
            ));
        }
        Ok(())
    }

    /// L2 归一化的稀疏 TF-IDF 向量
    fn vectorize(&self, text: &str) -> HashMap<usize, f64> {
        let lowered = text.to_lowercase();
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in TOKEN_PATTERN.find_iter(&lowered) {
            if let Some(&column) = self.vocabulary.get(token.as_str()) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        for (column, value) in counts.iter_mut() {
            let tf = if self.sublinear_tf {
                1.0 + value.ln()
            } else {
                *value
            };
            *value = tf * self.idf[*column];
        }

        let norm = counts.values().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in counts.values_mut() {
                *value /= norm;
            }
        }
        counts
    }

    /// 每个分类的概率，顺序与 `classes` 一致
    pub fn predict_proba(&self, text: &str) -> Vec<f64> {
        let features = self.vectorize(text);
        let scores: Vec<f64> = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| {
                features
                    .iter()
                    .map(|(column, value)| row[*column] * value)
                    .sum::<f64>()
                    + intercept
            })
            .collect();

        if self.classes.len() == 2 {
            let positive = 1.0 / (1.0 + (-scores[0]).exp());
            return vec![1.0 - positive, positive];
        }

        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let total: f64 = exps.iter().sum();
        exps.into_iter().map(|e| e / total).collect()
    }
}

impl TextModel for LinearTextModel {
    fn version(&self) -> &str {
        &self.version
    }

    fn predict(&self, text: &str) -> Result<(Category, f64), ClassifierError> {
        let probabilities = self.predict_proba(text);
        let mut best: Option<(usize, f64)> = None;
        for (index, probability) in probabilities.into_iter().enumerate() {
            if !probability.is_finite() {
                return Err(ClassifierError::Model(format!(
                    "non-finite probability for class {}",
                    self.classes[index]
                )));
            }
            match best {
                Some((_, best_p)) if probability <= best_p => {}
                _ => best = Some((index, probability)),
            }
        }

        best.map(|(index, probability)| (self.categories[index], probability))
            .ok_or_else(|| ClassifierError::Model("model produced no scores".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn three_class_model() -> &'static str {
        r#"{
            "version": "ml-test",
            "vocabulary": {"채용": 0, "인턴": 1, "봉사": 2, "세미나": 3},
            "idf": [1.0, 1.0, 1.0, 1.0],
            "classes": [3, 4, 1],
            "coefficients": [
                [4.0, 4.0, -2.0, -1.0],
                [-2.0, -1.0, 4.0, -1.0],
                [-1.0, -1.0, -1.0, 4.0]
            ],
            "intercepts": [0.0, 0.0, 0.0]
        }"#
    }

    #[test]
    fn test_model_input_repeats_title() {
        assert_eq!(model_input(" 제목 ", "본문"), "제목 제목 제목 본문");
    }

    #[test]
    fn test_multiclass_prediction() {
        let model = LinearTextModel::from_json(three_class_model()).unwrap();
        assert_eq!(model.version(), "ml-test");

        let (category, confidence) = model.predict("여름 인턴 채용").unwrap();
        assert_eq!(category, Category::JobInternship);
        assert!(confidence > 0.9 && confidence <= 1.0);

        let (category, _) = model.predict("봉사 모집").unwrap();
        assert_eq!(category, Category::Volunteer);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let model = LinearTextModel::from_json(three_class_model()).unwrap();
        let sum: f64 = model.predict_proba("세미나 안내").iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_tokens_fall_back_to_intercepts() {
        let model = LinearTextModel::from_json(three_class_model()).unwrap();
        let probabilities = model.predict_proba("nothing known here");
        for p in probabilities {
            assert!((p - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_binary_model_uses_sigmoid() {
        let raw = r#"{
            "vocabulary": {"창업": 0},
            "idf": [1.0],
            "classes": [12, 8],
            "coefficients": [[5.0]],
            "intercepts": [-1.0]
        }"#;
        let model = LinearTextModel::from_json(raw).unwrap();
        assert_eq!(model.version(), "ml-1.0");

        let (category, confidence) = model.predict("창업 경진대회").unwrap();
        assert_eq!(category, Category::Startup);
        assert!(confidence > 0.9);

        let (category, _) = model.predict("기타 공지").unwrap();
        assert_eq!(category, Category::Etc);
    }

    #[test]
    fn test_blank_version_falls_back_to_default() {
        let raw = r#"{
            "version": "  ",
            "vocabulary": {"창업": 0},
            "idf": [1.0],
            "classes": [12, 8],
            "coefficients": [[5.0]],
            "intercepts": [-1.0]
        }"#;
        let model = LinearTextModel::from_json(raw).unwrap();
        assert_eq!(model.version(), "ml-1.0");
        assert_eq!(
            crate::domain::models::classification::Provenance::Model(model.version().to_string())
                .tag(),
            "ml-1.0"
        );
    }

    #[test]
    fn test_rejects_unknown_category() {
        let raw = r#"{
            "vocabulary": {"a": 0},
            "idf": [1.0],
            "classes": [3, 99],
            "coefficients": [[1.0]],
            "intercepts": [0.0]
        }"#;
        let err = LinearTextModel::from_json(raw).unwrap_err();
        assert!(matches!(err, ClassifierError::UnknownCategory(99)));
    }

    #[test]
    fn test_rejects_mismatched_dimensions() {
        let raw = r#"{
            "vocabulary": {"aa": 0, "bb": 5},
            "idf": [1.0, 1.0],
            "classes": [1, 2, 3],
            "coefficients": [[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]],
            "intercepts": [0.0, 0.0, 0.0]
        }"#;
        let err = LinearTextModel::from_json(raw).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidModel(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(three_class_model().as_bytes()).unwrap();

        let model = LinearTextModel::load(file.path()).unwrap();
        assert_eq!(model.version(), "ml-test");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = LinearTextModel::load("/nonexistent/model.json").unwrap_err();
        assert!(matches!(err, ClassifierError::Io(_)));
    }
}
