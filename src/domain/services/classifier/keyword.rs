// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::category::Category;

/// 标题命中权重
pub const TITLE_WEIGHT: u32 = 3;
/// 正文命中权重
pub const BODY_WEIGHT: u32 = 1;
/// 关键词层置信度上限
pub const MAX_KEYWORD_CONFIDENCE: f64 = 0.95;
/// 没有任何命中时的置信度
pub const NO_MATCH_CONFIDENCE: f64 = 0.1;

/// 关键词分类器
///
/// 按 `Category::ALL` 的优先级顺序逐个分类做子串匹配，
/// 同分时优先级靠前的分类胜出。
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    /// 计算每个分类的得分，按优先级顺序返回
    pub fn scores(&self, title: &str, body: &str) -> Vec<(Category, u32)> {
        let title = title.to_lowercase();
        let body = body.to_lowercase();

        Category::ALL
            .iter()
            .map(|category| {
                let score = category
                    .keywords()
                    .iter()
                    .map(|keyword| {
                        let mut score = 0;
                        if title.contains(keyword) {
                            score += TITLE_WEIGHT;
                        }
                        if body.contains(keyword) {
                            score += BODY_WEIGHT;
                        }
                        score
                    })
                    .sum();
                (*category, score)
            })
            .collect()
    }

    /// 关键词预测
    ///
    /// # 返回值
    ///
    /// 得分最高的分类及置信度 `min(score / 10, 0.95)`；
    /// 没有任何得分时返回兜底分类和 0.1
    pub fn predict(&self, title: &str, body: &str) -> (Category, f64) {
        let mut best: Option<(Category, u32)> = None;
        for (category, score) in self.scores(title, body) {
            if score == 0 {
                continue;
            }
            match best {
                // strict comparison keeps the earlier category on ties
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((category, score)),
            }
        }

        match best {
            Some((category, score)) => (
                category,
                (score as f64 / 10.0).min(MAX_KEYWORD_CONFIDENCE),
            ),
            None => (Category::CATCH_ALL, NO_MATCH_CONFIDENCE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_posting_scores_job_internship() {
        let classifier = KeywordClassifier::new();
        let (category, confidence) =
            classifier.predict("AI 개발자 채용", "인공지능 백엔드 개발자를 모집합니다");

        assert_eq!(category, Category::JobInternship);
        assert!(confidence >= 0.7, "confidence was {confidence}");
    }

    #[test]
    fn test_title_hits_weigh_three_times_body_hits() {
        let classifier = KeywordClassifier::new();
        let scores = classifier.scores("봉사", "");
        let volunteer = scores
            .iter()
            .find(|(c, _)| *c == Category::Volunteer)
            .map(|(_, s)| *s);
        assert_eq!(volunteer, Some(TITLE_WEIGHT));

        let scores = classifier.scores("", "봉사");
        let volunteer = scores
            .iter()
            .find(|(c, _)| *c == Category::Volunteer)
            .map(|(_, s)| *s);
        assert_eq!(volunteer, Some(BODY_WEIGHT));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let classifier = KeywordClassifier::new();
        let (category, _) = classifier.predict("STARTUP Demo Day", "");
        assert_eq!(category, Category::Startup);
    }

    #[test]
    fn test_tie_goes_to_earlier_category() {
        let classifier = KeywordClassifier::new();
        // "특강" (SpecialLecture) and "기획" (PlanningMarketing) both score 3
        let (category, confidence) = classifier.predict("특강 기획", "");
        assert_eq!(category, Category::SpecialLecture);
        assert!((confidence - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_confidence_is_capped() {
        let classifier = KeywordClassifier::new();
        let (category, confidence) = classifier.predict(
            "봉사 자원봉사 사회공헌 기부 나눔 헌혈",
            "봉사활동 사회봉사 지역사회 복지",
        );
        assert_eq!(category, Category::Volunteer);
        assert_eq!(confidence, MAX_KEYWORD_CONFIDENCE);
    }

    #[test]
    fn test_no_match_defaults_to_catch_all() {
        let classifier = KeywordClassifier::new();
        let (category, confidence) = classifier.predict("오늘의 날씨", "맑음");
        assert_eq!(category, Category::Etc);
        assert_eq!(confidence, NO_MATCH_CONFIDENCE);
    }
}
