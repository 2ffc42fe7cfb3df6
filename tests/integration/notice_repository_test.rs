// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::notice_repo;
use chrono::NaiveDate;
use noticrawl::domain::models::category::Category;
use noticrawl::domain::models::classification::{ClassificationResult, Provenance};
use noticrawl::domain::repositories::notice_repository::NoticeRepository;
use noticrawl::domain::services::notice_service::{fingerprint, NoticeService};
use noticrawl::infrastructure::database::entities::notice;
use sea_orm::{EntityTrait, PaginatorTrait};

const URL: &str = "https://plus.cnu.ac.kr/_prog/_board/?mode=V&no=101";

/// 测试同一URL重复写入
///
/// 第二次写入覆盖内容和指纹，但保持行ID不变且不产生新行
#[tokio::test]
async fn test_upsert_by_url_is_idempotent() {
    let (repo, db) = notice_repo().await;
    let service = NoticeService::new(repo.clone());

    let first = service
        .upsert(1, URL, "장학금 안내", Some("1차 공지"), NaiveDate::from_ymd_opt(2025, 9, 1))
        .await
        .unwrap();
    let second = service
        .upsert(1, URL, "장학금 안내 (수정)", Some("2차 공지"), None)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(notice::Entity::find().count(db.as_ref()).await.unwrap(), 1);

    let stored = repo.find_by_url(URL).await.unwrap().unwrap();
    assert_eq!(stored.id, first);
    assert_eq!(stored.title, "장학금 안내 (수정)");
    assert_eq!(stored.content, "2차 공지");
    assert_eq!(stored.posted_on, None);
    assert_eq!(stored.hash, fingerprint("장학금 안내 (수정)", Some("2차 공지")));
}

#[tokio::test]
async fn test_distinct_urls_get_distinct_ids() {
    let (repo, db) = notice_repo().await;
    let service = NoticeService::new(repo);

    let a = service.upsert(1, URL, "가", Some("본문"), None).await.unwrap();
    let b = service
        .upsert(2, "https://plus.cnu.ac.kr/_prog/_board/?mode=V&no=102", "가", Some("본문"), None)
        .await
        .unwrap();

    assert_ne!(a, b);
    assert_eq!(notice::Entity::find().count(db.as_ref()).await.unwrap(), 2);
}

/// 正文缺失时按空字符串存储，指纹与空正文一致
#[tokio::test]
async fn test_missing_body_is_stored_as_empty() {
    let (repo, _db) = notice_repo().await;
    let service = NoticeService::new(repo.clone());

    service.upsert(3, URL, "제목만", None, None).await.unwrap();

    let stored = repo.find_by_url(URL).await.unwrap().unwrap();
    assert_eq!(stored.content, "");
    assert_eq!(stored.hash, fingerprint("제목만", Some("")));
}

#[tokio::test]
async fn test_find_by_url_missing() {
    let (repo, _db) = notice_repo().await;
    assert!(repo.find_by_url(URL).await.unwrap().is_none());
}

/// 重新分类覆盖旧结果，每条公告只保留一行
#[tokio::test]
async fn test_classification_is_overwritten() {
    let (repo, _db) = notice_repo().await;
    let service = NoticeService::new(repo.clone());
    let id = service.upsert(1, URL, "채용", Some("모집"), None).await.unwrap();

    service
        .record_classification(
            id,
            &ClassificationResult::new(Category::Etc, 0.4, Provenance::KeywordFinal),
        )
        .await
        .unwrap();
    service
        .record_classification(
            id,
            &ClassificationResult::new(Category::JobInternship, 0.85, Provenance::RemoteBackup),
        )
        .await
        .unwrap();

    let stored = repo.find_classification(id).await.unwrap().unwrap();
    assert_eq!(stored.notice_id, id);
    assert_eq!(stored.category_id, Category::JobInternship.id());
    assert!((stored.confidence - 0.85).abs() < f64::EPSILON);
    assert_eq!(stored.model_version, "openai-backup");
}

#[tokio::test]
async fn test_long_model_version_is_truncated() {
    let (repo, _db) = notice_repo().await;
    let service = NoticeService::new(repo.clone());
    let id = service.upsert(1, URL, "학사", Some("안내"), None).await.unwrap();
    let version = "v".repeat(100);

    service
        .record_classification(
            id,
            &ClassificationResult::new(Category::AcademicInfo, 0.9, Provenance::Model(version)),
        )
        .await
        .unwrap();

    let stored = repo.find_classification(id).await.unwrap().unwrap();
    assert_eq!(stored.model_version.len(), 64);
}
