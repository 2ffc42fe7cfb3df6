// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod keyword;
pub mod model;
pub mod remote;

use crate::config::settings::ClassifierSettings;
use crate::domain::models::category::Category;
use crate::domain::models::classification::{ClassificationResult, Provenance};
use keyword::{KeywordClassifier, MAX_KEYWORD_CONFIDENCE, NO_MATCH_CONFIDENCE};
use model::{default_version, model_input, LinearTextModel, TextModel};
use remote::{LlmClassifier, RemoteClassifier};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// 远程层给出有效分类时使用的固定置信度
pub const REMOTE_CONFIDENCE: f64 = 0.85;
/// 远程回复无法解析时的置信度
pub const REMOTE_UNPARSEABLE_CONFIDENCE: f64 = 0.3;
/// 远程请求失败时的置信度
pub const REMOTE_FAILURE_CONFIDENCE: f64 = 0.2;
/// 模型与关键词一致时的加成
const AGREEMENT_BONUS: f64 = 0.1;

/// 分类器错误
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unknown category id: {0}")]
    UnknownCategory(i32),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Remote classifier error: {0}")]
    Remote(String),
}

/// 分类级联
///
/// 依次尝试关键词、训练模型、远程服务，每层的置信度达到阈值即返回。
/// 三层都不够时，关键词有命中则以关键词结果收尾，否则归为兜底分类。
/// 任何意外错误都被吸收为 `error-fallback`，调用方不会看到错误。
pub struct ClassifierCascade {
    keyword: KeywordClassifier,
    model: Option<Arc<dyn TextModel>>,
    remote: Option<Arc<dyn RemoteClassifier>>,
    threshold: f64,
}

impl ClassifierCascade {
    /// 只有关键词层的级联
    pub fn new(threshold: f64) -> Self {
        Self {
            keyword: KeywordClassifier::new(),
            model: None,
            remote: None,
            threshold,
        }
    }

    pub fn with_model(mut self, model: Arc<dyn TextModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_remote(mut self, remote: Arc<dyn RemoteClassifier>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// 根据配置组装级联
    ///
    /// 模型文件缺失或损坏只会让模型层失效，不会阻止启动
    pub fn from_settings(settings: &ClassifierSettings) -> Self {
        let mut cascade = Self::new(settings.confidence_threshold);

        if let Some(path) = &settings.model_path {
            match LinearTextModel::load(path) {
                Ok(model) => {
                    info!(path = %path, version = model.version(), "Loaded text model");
                    cascade = cascade.with_model(Arc::new(model));
                }
                Err(e) => warn!(path = %path, error = %e, "Text model unavailable, skipping model tier"),
            }
        }

        match LlmClassifier::from_settings(&settings.remote) {
            Ok(Some(remote)) => {
                info!(model = %settings.remote.model, "Remote classifier enabled");
                cascade = cascade.with_remote(Arc::new(remote));
            }
            Ok(None) => debug!("No API key configured, remote classifier disabled"),
            Err(e) => warn!(error = %e, "Failed to build remote classifier"),
        }

        cascade
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// 分类一条公告，不会失败
    pub async fn classify(&self, title: &str, body: &str) -> ClassificationResult {
        match self.try_classify(title, body).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, title, "Classification failed, using error fallback");
                ClassificationResult::new(
                    Category::CATCH_ALL,
                    NO_MATCH_CONFIDENCE,
                    Provenance::ErrorFallback,
                )
            }
        }
    }

    async fn try_classify(
        &self,
        title: &str,
        body: &str,
    ) -> Result<ClassificationResult, ClassifierError> {
        let (kw_category, kw_confidence) = self.keyword.predict(title, body);
        debug!(category = %kw_category, confidence = kw_confidence, "Keyword tier");
        if kw_confidence >= self.threshold {
            return Ok(ClassificationResult::new(
                kw_category,
                kw_confidence,
                Provenance::KeywordLocal,
            ));
        }

        if let Some(model) = &self.model {
            let (ml_category, ml_confidence) = model.predict(&model_input(title, body))?;
            debug!(category = %ml_category, confidence = ml_confidence, "Model tier");
            if ml_confidence >= self.threshold {
                return Ok(ClassificationResult::new(
                    ml_category,
                    ml_confidence,
                    Provenance::Model(model_tag(model.as_ref())),
                ));
            }
            if ml_category == kw_category {
                let combined =
                    ((kw_confidence + ml_confidence) / 2.0 + AGREEMENT_BONUS).min(MAX_KEYWORD_CONFIDENCE);
                return Ok(ClassificationResult::new(
                    ml_category,
                    combined,
                    Provenance::ModelWithKeyword(model_tag(model.as_ref())),
                ));
            }
        }

        if let Some(remote) = &self.remote {
            let (category, confidence) = match remote.classify(title, body).await {
                Ok(Some(category)) => (category, REMOTE_CONFIDENCE),
                Ok(None) => (Category::CATCH_ALL, REMOTE_UNPARSEABLE_CONFIDENCE),
                Err(e) => {
                    warn!(error = %e, "Remote classifier failed");
                    (Category::CATCH_ALL, REMOTE_FAILURE_CONFIDENCE)
                }
            };
            debug!(category = %category, confidence, "Remote tier");
            if confidence >= self.threshold {
                return Ok(ClassificationResult::new(
                    category,
                    confidence,
                    Provenance::RemoteBackup,
                ));
            }
        }

        if kw_confidence > NO_MATCH_CONFIDENCE {
            Ok(ClassificationResult::new(
                kw_category,
                kw_confidence,
                Provenance::KeywordFinal,
            ))
        } else {
            Ok(ClassificationResult::new(
                Category::CATCH_ALL,
                NO_MATCH_CONFIDENCE,
                Provenance::DefaultFallback,
            ))
        }
    }
}

/// 模型版本作为来源标签，空白时用默认版本
fn model_tag(model: &dyn TextModel) -> String {
    let version = model.version().trim();
    if version.is_empty() {
        default_version()
    } else {
        version.to_string()
    }
}
