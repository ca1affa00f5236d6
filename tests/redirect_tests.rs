//! 扫码重定向集成测试
//!
//! 覆盖 /s/{slug} 的重定向、扫码记录、计数一致性与 404 语义。

use std::sync::Arc;
use std::sync::Once;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use tempfile::TempDir;

use qrtrack::api::services::redirect_routes;
use qrtrack::config::init_config;
use qrtrack::services::{CreateQrRequest, QrService};
use qrtrack::storage::{QrCode, ScanEvent, SeaOrmStorage};

// =============================================================================
// 测试环境初始化
// =============================================================================

static INIT: Once = Once::new();

fn init_static_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn create_test_storage() -> (TempDir, Arc<SeaOrmStorage>) {
    init_static_config();
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let db_path = temp_dir.path().join("redirect_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("初始化 SQLite 存储失败");
    (temp_dir, Arc::new(storage))
}

/// 直接通过业务层造一个二维码，绕开 HTTP 认证
async fn seed_qr(storage: &Arc<SeaOrmStorage>, owner: &str, url: &str) -> QrCode {
    storage
        .upsert_user(owner, None, None)
        .await
        .expect("创建用户失败");
    QrService::new(storage.clone())
        .create_qr_code(
            owner,
            CreateQrRequest {
                title: "Seeded".to_string(),
                destination_url: url.to_string(),
            },
        )
        .await
        .expect("创建二维码失败")
}

macro_rules! test_app {
    ($storage:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($storage.clone()))
                .service(redirect_routes()),
        )
        .await
    };
}

// =============================================================================
// 重定向与扫码记录
// =============================================================================

#[actix_web::test]
async fn test_redirect_returns_307_with_location() {
    let (_dir, storage) = create_test_storage().await;
    let qr = seed_qr(&storage, "alice", "https://example.com/sale").await;
    let app = test_app!(storage);

    let req = TestRequest::get()
        .uri(&format!("/s/{}", qr.slug))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = resp
        .headers()
        .get("Location")
        .expect("缺少 Location 头")
        .to_str()
        .unwrap();
    assert_eq!(location, "https://example.com/sale");
}

#[actix_web::test]
async fn test_each_scan_adds_row_and_increments_count() {
    let (_dir, storage) = create_test_storage().await;
    let qr = seed_qr(&storage, "alice", "https://example.com").await;
    let app = test_app!(storage);

    for _ in 0..3 {
        let req = TestRequest::get()
            .uri(&format!("/s/{}", qr.slug))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    let (stored, scans) = storage
        .get_qr_code_with_scans("alice", qr.id)
        .await
        .expect("查询失败")
        .expect("二维码不存在");
    assert_eq!(stored.scans_count, 3);
    assert_eq!(scans.len(), 3);
}

#[actix_web::test]
async fn test_scan_captures_user_agent_device_and_country() {
    let (_dir, storage) = create_test_storage().await;
    let qr = seed_qr(&storage, "alice", "https://example.com").await;
    let app = test_app!(storage);

    let iphone_ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
                     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    let req = TestRequest::get()
        .uri(&format!("/s/{}", qr.slug))
        .insert_header(("User-Agent", iphone_ua))
        .insert_header(("cf-ipcountry", "us"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);

    let (_, scans) = storage
        .get_qr_code_with_scans("alice", qr.id)
        .await
        .expect("查询失败")
        .expect("二维码不存在");
    assert_eq!(scans.len(), 1);
    assert_eq!(scans[0].user_agent.as_deref(), Some(iphone_ua));
    assert_eq!(scans[0].device.as_deref(), Some("smartphone"));
    // 国家码统一为大写
    assert_eq!(scans[0].country.as_deref(), Some("US"));
}

#[actix_web::test]
async fn test_scan_without_headers_records_nulls() {
    let (_dir, storage) = create_test_storage().await;
    let qr = seed_qr(&storage, "alice", "https://example.com").await;
    let app = test_app!(storage);

    let req = TestRequest::get()
        .uri(&format!("/s/{}", qr.slug))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);

    let (_, scans) = storage
        .get_qr_code_with_scans("alice", qr.id)
        .await
        .expect("查询失败")
        .expect("二维码不存在");
    assert!(scans[0].user_agent.is_none());
    assert!(scans[0].device.is_none());
    assert!(scans[0].country.is_none());
}

#[actix_web::test]
async fn test_bogus_country_header_is_dropped() {
    let (_dir, storage) = create_test_storage().await;
    let qr = seed_qr(&storage, "alice", "https://example.com").await;
    let app = test_app!(storage);

    let req = TestRequest::get()
        .uri(&format!("/s/{}", qr.slug))
        .insert_header(("cf-ipcountry", "not-a-country"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);

    let (_, scans) = storage
        .get_qr_code_with_scans("alice", qr.id)
        .await
        .expect("查询失败")
        .expect("二维码不存在");
    assert!(scans[0].country.is_none());
}

// =============================================================================
// 404 语义
// =============================================================================

#[actix_web::test]
async fn test_unknown_slug_is_404_without_side_effects() {
    let (_dir, storage) = create_test_storage().await;
    let qr = seed_qr(&storage, "alice", "https://example.com").await;
    let app = test_app!(storage);

    let req = TestRequest::get().uri("/s/zzzzzzzz").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        resp.headers().get("Cache-Control").unwrap().to_str().unwrap(),
        "public, max-age=60"
    );

    // 未命中的扫码不产生任何记录
    let (stored, scans) = storage
        .get_qr_code_with_scans("alice", qr.id)
        .await
        .expect("查询失败")
        .expect("二维码不存在");
    assert_eq!(stored.scans_count, 0);
    assert!(scans.is_empty());
}

#[actix_web::test]
async fn test_slug_match_is_case_sensitive() {
    let (_dir, storage) = create_test_storage().await;
    storage
        .upsert_user("alice", None, None)
        .await
        .expect("创建用户失败");
    let qr = storage
        .insert_qr_code("alice", "Case", "https://example.com", "aB3xY9Qz")
        .await
        .expect("插入失败")
        .expect("固定 slug 不应冲突");
    let app = test_app!(storage);

    // 只有逐字符一致的 slug 才命中
    let req = TestRequest::get().uri("/s/aB3xY9Qz").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);

    let req = TestRequest::get().uri("/s/AB3XY9QZ").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // 大小写不匹配的请求不产生扫码记录
    let (stored, scans) = storage
        .get_qr_code_with_scans("alice", qr.id)
        .await
        .expect("查询失败")
        .expect("二维码不存在");
    assert_eq!(stored.scans_count, 1);
    assert_eq!(scans.len(), 1);
}

#[actix_web::test]
async fn test_malformed_slug_is_404() {
    let (_dir, storage) = create_test_storage().await;
    let app = test_app!(storage);

    let req = TestRequest::get().uri("/s/bad%21slug").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// 并发计数一致性
// =============================================================================

#[actix_web::test]
async fn test_concurrent_scans_never_lose_counts() {
    let (_dir, storage) = create_test_storage().await;
    let qr = seed_qr(&storage, "alice", "https://example.com").await;

    let event = ScanEvent::default();
    let (a, b) = tokio::join!(
        storage.record_scan(qr.id, &event),
        storage.record_scan(qr.id, &event),
    );
    a.expect("第一次扫码失败");
    b.expect("第二次扫码失败");

    let (stored, scans) = storage
        .get_qr_code_with_scans("alice", qr.id)
        .await
        .expect("查询失败")
        .expect("二维码不存在");
    assert_eq!(stored.scans_count, 2);
    assert_eq!(scans.len(), 2);
}
