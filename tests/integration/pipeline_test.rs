// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{list_source, notice_repo};
use chrono::NaiveDate;
use noticrawl::boards::factory::BoardAdapters;
use noticrawl::domain::models::category::Category;
use noticrawl::domain::models::source::NoticeSource;
use noticrawl::domain::repositories::notice_repository::NoticeRepository;
use noticrawl::domain::services::classifier::ClassifierCascade;
use noticrawl::domain::services::notice_service::NoticeService;
use noticrawl::engines::host_throttle::HostThrottle;
use noticrawl::engines::reqwest_engine::ReqwestFetcher;
use noticrawl::infrastructure::database::entities::notice;
use noticrawl::infrastructure::repositories::notice_repo_impl::NoticeRepositoryImpl;
use noticrawl::utils::retry_policy::{PolitenessDelay, RetryPolicy};
use noticrawl::workers::manager::WorkerManager;
use noticrawl::workers::notice_worker::NoticePipeline;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use std::sync::Arc;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LIST_PAGE: &str = r#"
<html><body>
  <table class="board_list">
    <tbody>
      <tr>
        <td class="num">1</td>
        <td class="title"><a href="/view?id=1">AI 개발자 채용</a></td>
        <td class="date">2025.08.30</td>
        <td class="hits">42</td>
      </tr>
    </tbody>
  </table>
</body></html>"#;

const DETAIL_PAGE: &str = r#"
<html><body>
  <div class="board_view">
    <div class="top_info">작성자 취업지원팀 | 등록일 2025-09-01</div>
    <div class="board_viewDetail"><p>인공지능 백엔드 개발자를 모집합니다</p></div>
  </div>
</body></html>"#;

const EMPTY_DETAIL_PAGE: &str = "<html><body><div class=\"board_view\"></div></body></html>";

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

async fn mount_list_page(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/_prog/_board/"))
        .and(query_param("code", "sub07_0704"))
        .and(query_param("menu_dvs_cd", "0704"))
        .and(query_param("GotoPage", "1"))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn mount_detail_page(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/view"))
        .and(query_param("id", "1"))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// 指向模拟服务器的完整流水线，不做礼貌延迟，重试不等待
async fn manager_for(
    server: &MockServer,
    sources: Vec<NoticeSource>,
) -> (
    WorkerManager<NoticeRepositoryImpl>,
    Arc<NoticeRepositoryImpl>,
    Arc<DatabaseConnection>,
) {
    let fetcher = Arc::new(ReqwestFetcher::with_client(
        reqwest::Client::new(),
        RetryPolicy::immediate(1),
        RetryPolicy::immediate(0),
        PolitenessDelay::none(),
        HostThrottle::new(1),
    ));
    let root = Url::parse(&server.uri()).unwrap();
    let adapters = BoardAdapters::new(&root, fetcher).unwrap();

    let (repo, db) = notice_repo().await;
    let pipeline = NoticePipeline::new(
        adapters,
        NoticeService::new(repo.clone()),
        Arc::new(ClassifierCascade::new(0.7)),
    );
    (WorkerManager::new(Arc::new(pipeline), sources), repo, db)
}

/// 测试列表页到分类结果的完整链路
///
/// 招聘公告由关键词层直接判定，无需模型和远程分类
#[tokio::test]
async fn test_listed_notice_is_stored_and_classified() {
    let server = MockServer::start().await;
    mount_list_page(&server, LIST_PAGE).await;
    mount_detail_page(&server, DETAIL_PAGE).await;

    let (manager, repo, _db) = manager_for(&server, vec![list_source(1, "sub07_0704", "0704")]).await;

    let report = manager.run_cycle().await.unwrap();
    assert_eq!(report.items_stored(), 1);
    assert_eq!(report.items_skipped(), 0);

    let url = format!("{}/view?id=1", server.uri());
    let stored = repo.find_by_url(&url).await.unwrap().unwrap();
    assert_eq!(stored.source_id, 1);
    assert_eq!(stored.title, "AI 개발자 채용");
    assert_eq!(stored.content, "인공지능 백엔드 개발자를 모집합니다");
    assert_eq!(stored.posted_on, NaiveDate::from_ymd_opt(2025, 9, 1));
    assert_eq!(stored.hash.len(), 64);

    let classification = repo.find_classification(stored.id).await.unwrap().unwrap();
    assert_eq!(classification.category_id, Category::JobInternship.id());
    assert_eq!(classification.model_version, "keyword-local");
    assert!(classification.confidence >= 0.7);
}

#[tokio::test]
async fn test_repeated_cycles_keep_one_row_per_url() {
    let server = MockServer::start().await;
    mount_list_page(&server, LIST_PAGE).await;
    mount_detail_page(&server, DETAIL_PAGE).await;

    let (manager, repo, db) = manager_for(&server, vec![list_source(1, "sub07_0704", "0704")]).await;

    manager.run_cycle().await.unwrap();
    let url = format!("{}/view?id=1", server.uri());
    let first = repo.find_by_url(&url).await.unwrap().unwrap();

    manager.run_cycle().await.unwrap();
    let second = repo.find_by_url(&url).await.unwrap().unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.hash, second.hash);
    assert_eq!(notice::Entity::find().count(db.as_ref()).await.unwrap(), 1);
}

/// 详情页既没有正文也没有日期时不写入
#[tokio::test]
async fn test_empty_detail_creates_no_row() {
    let server = MockServer::start().await;
    mount_list_page(&server, LIST_PAGE).await;
    mount_detail_page(&server, EMPTY_DETAIL_PAGE).await;

    let (manager, _repo, db) = manager_for(&server, vec![list_source(1, "sub07_0704", "0704")]).await;

    let report = manager.run_cycle().await.unwrap();

    assert_eq!(report.items_stored(), 0);
    assert_eq!(report.items_skipped(), 1);
    assert_eq!(notice::Entity::find().count(db.as_ref()).await.unwrap(), 0);
}

/// 列表页 404 属于永久失败：只请求一次，跳过该页，本轮仍然成功
#[tokio::test]
async fn test_missing_list_page_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_prog/_board/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let (manager, _repo, db) = manager_for(&server, vec![list_source(1, "sub07_0704", "0704")]).await;

    let report = manager.run_cycle().await.unwrap();

    assert_eq!(report.pages_skipped(), 1);
    assert_eq!(report.items_stored(), 0);
    assert_eq!(notice::Entity::find().count(db.as_ref()).await.unwrap(), 0);
}

/// 列表页 503 按列表预算重试一次后放弃
#[tokio::test]
async fn test_unavailable_list_page_is_retried_then_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_prog/_board/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let (manager, _repo, _db) = manager_for(&server, vec![list_source(1, "sub07_0704", "0704")]).await;

    let report = manager.run_cycle().await.unwrap();

    assert_eq!(report.pages_skipped(), 1);
}
