// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::RemoteClassifierSettings;
use crate::domain::models::category::Category;
use crate::domain::services::classifier::ClassifierError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use std::time::Duration;

static CATEGORY_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(1[0-2]|[1-9])\b").expect("category pattern is valid"));

/// 正文送往远程服务前的最大字符数
const MAX_BODY_CHARS: usize = 2000;

/// 远程分类特质
///
/// 远程服务不返回校准过的置信度，只给出分类编号
#[async_trait]
pub trait RemoteClassifier: Send + Sync {
    /// 请求远程分类
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(Category))` - 回复中解析出了有效分类
    /// * `Ok(None)` - 回复无法解析或编号越界
    /// * `Err(ClassifierError)` - 请求失败
    async fn classify(&self, title: &str, body: &str) -> Result<Option<Category>, ClassifierError>;
}

/// LLM 远程分类器
///
/// 调用 OpenAI 兼容的 `/chat/completions` 接口
///
/// # 配置
///
/// - `classifier.remote.api_key`，未配置时回退到 `OPENAI_API_KEY`
/// - `classifier.remote.model`，默认 `gpt-4o-mini`
/// - `classifier.remote.api_base_url`，默认 `https://api.openai.com/v1`
pub struct LlmClassifier {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_base_url: String,
}

impl LlmClassifier {
    pub fn new_with_config(
        api_key: String,
        model: String,
        api_base_url: String,
        timeout: Duration,
    ) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 根据配置创建分类器，没有 API 密钥时返回 `None`
    pub fn from_settings(settings: &RemoteClassifierSettings) -> Result<Option<Self>, ClassifierError> {
        let Some(api_key) = settings.api_key.clone().filter(|k| !k.trim().is_empty()) else {
            return Ok(None);
        };
        Self::new_with_config(
            api_key,
            settings.model.clone(),
            settings.api_base_url.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
        .map(Some)
    }

    fn build_prompt(title: &str, body: &str) -> String {
        let categories = Category::ALL
            .iter()
            .map(|c| format!("{}: {} ({})", c.id(), c.display_name(), c.code()))
            .collect::<Vec<_>>()
            .join("\n");
        let body: String = body.chars().take(MAX_BODY_CHARS).collect();

        format!(
            "다음 텍스트를 분석하여 가장 적절한 카테고리로 분류해주세요.\n\n\
             제목: {title}\n\
             내용: {body}\n\n\
             사용 가능한 카테고리:\n{categories}\n\n\
             응답 형식:\n\
             - 카테고리 번호만 숫자로 반환 (1-12)\n\
             - 추가 설명 없이 숫자만\n\n\
             카테고리 번호:"
        )
    }
}

#[async_trait]
impl RemoteClassifier for LlmClassifier {
    async fn classify(&self, title: &str, body: &str) -> Result<Option<Category>, ClassifierError> {
        let request_body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "당신은 텍스트 분류 전문가입니다. 주어진 텍스트를 정확히 분류하고 카테고리 번호만 반환하세요."
                },
                {
                    "role": "user",
                    "content": Self::build_prompt(title, body)
                }
            ],
            "max_tokens": 10,
            "temperature": 0.1
        });

        let url = format!("{}/chat/completions", self.api_base_url);
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Remote(format!(
                "LLM API returned error: {} - {}",
                status, error_text
            )));
        }

        let body: Value = response.json().await?;
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ClassifierError::Remote("Invalid response format from LLM API".to_string()))?;

        Ok(parse_category_reply(content))
    }
}

/// 从自由文本回复中解析分类编号
///
/// 第一个 1–9 的数字字符即为结果；回复中没有这样的字符时，
/// 再按词边界匹配 10–12。
pub fn parse_category_reply(reply: &str) -> Option<Category> {
    let first_digit = reply
        .chars()
        .filter_map(|c| c.to_digit(10))
        .find(|d| (1..=9).contains(d));
    if let Some(digit) = first_digit {
        return Category::from_id(digit as i32);
    }

    CATEGORY_NUMBER
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .and_then(Category::from_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_digit() {
        assert_eq!(parse_category_reply("3"), Some(Category::JobInternship));
        assert_eq!(parse_category_reply(" 5\n"), Some(Category::ItSw));
    }

    #[test]
    fn test_first_single_digit_wins_over_two_digit_numbers() {
        assert_eq!(parse_category_reply("10"), Some(Category::SpecialLecture));
        assert_eq!(parse_category_reply("분류: 12번"), Some(Category::SpecialLecture));
    }

    #[test]
    fn test_parse_digit_inside_sentence() {
        assert_eq!(
            parse_category_reply("카테고리 번호: 7"),
            Some(Category::Design)
        );
    }

    #[test]
    fn test_parse_skips_out_of_range_numbers() {
        assert_eq!(parse_category_reply("0"), None);
        assert_eq!(parse_category_reply("000"), None);
        assert_eq!(parse_category_reply("99 then 4"), Some(Category::VideoContent));
        assert_eq!(parse_category_reply("0 그리고 4"), Some(Category::Volunteer));
    }

    #[test]
    fn test_parse_unparseable_reply() {
        assert_eq!(parse_category_reply("모르겠습니다"), None);
        assert_eq!(parse_category_reply(""), None);
    }

    #[test]
    fn test_prompt_lists_every_category() {
        let prompt = LlmClassifier::build_prompt("제목", "본문");
        for category in Category::ALL {
            assert!(prompt.contains(&format!("{}: {}", category.id(), category.display_name())));
        }
    }

    #[test]
    fn test_prompt_truncates_long_body() {
        let body = "가".repeat(MAX_BODY_CHARS + 500);
        let prompt = LlmClassifier::build_prompt("제목", &body);
        assert!(!prompt.contains(&"가".repeat(MAX_BODY_CHARS + 1)));
    }

    #[test]
    fn test_from_settings_without_key_is_disabled() {
        let settings = RemoteClassifierSettings {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            api_base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 10,
        };
        assert!(LlmClassifier::from_settings(&settings).unwrap().is_none());
    }
}
