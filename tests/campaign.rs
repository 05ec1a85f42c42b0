use std::net::TcpListener;
use std::sync::Arc;

use actix_web::http::StatusCode;
use awc::Client;
use chrono::{TimeZone, Utc};
use serde_json::json;
use tempfile::TempDir;

use campaignd::{
    CampaignBody, CampaignRequestBody, Database, Envelope, MemoryDatabase, SqliteDatabase,
};

fn spawn_server(db: Arc<dyn Database>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = campaignd::run(listener, db).unwrap();
    let _ = actix_rt::spawn(server);

    format!("http://127.0.0.1:{}/api/v1", port)
}

async fn campaign_lifecycle(base: &str) {
    let client = Client::default();

    let body = CampaignRequestBody {
        name: "Summer Launch".into(),
        date: Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
    };
    let mut response = client
        .post(format!("{}/campaigns", base))
        .send_json(&body)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Envelope<CampaignBody> = response.json().await.unwrap();
    let created = created.data;
    assert_eq!(created.name, "Summer Launch");
    assert_eq!(created.date, body.date);

    let mut response = client
        .get(format!("{}/campaigns/{}", base, created.campaign_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Envelope<CampaignBody> = response.json().await.unwrap();
    assert_eq!(fetched.data, created);

    let mut response = client
        .put(format!("{}/campaigns/{}", base, created.campaign_id))
        .send_json(&json!({ "name": "Summer Launch 2" }))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Envelope<CampaignBody> = response.json().await.unwrap();
    assert_eq!(updated.data.campaign_id, created.campaign_id);
    assert_eq!(updated.data.created_at, created.created_at);
    assert_eq!(updated.data.name, "Summer Launch 2");
    assert_eq!(updated.data.date, None);

    let mut response = client
        .delete(format!("{}/campaigns/{}", base, created.campaign_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.body().await.unwrap().is_empty());

    let response = client
        .get(format!("{}/campaigns/{}", base, created.campaign_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .delete(format!("{}/campaigns/{}", base, created.campaign_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn campaign_lifecycle_in_memory() {
    let base = spawn_server(Arc::new(MemoryDatabase::new()));

    campaign_lifecycle(&base).await;
}

#[actix_rt::test]
async fn campaign_lifecycle_in_sqlite() {
    let dir = TempDir::new().unwrap();
    let db = SqliteDatabase::open(dir.path().join("database.db")).unwrap();
    let base = spawn_server(Arc::new(db));

    campaign_lifecycle(&base).await;
}

#[actix_rt::test]
async fn list_campaigns_wraps_array() {
    let base = spawn_server(Arc::new(MemoryDatabase::new()));
    let client = Client::default();

    for name in &["Summer Launch", "Black Friday"] {
        let response = client
            .post(format!("{}/campaigns", base))
            .send_json(&json!({ "name": name, "date": null }))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let mut response = client
        .get(format!("{}/campaigns", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let campaigns: Envelope<Vec<CampaignBody>> = response.json().await.unwrap();
    let names: Vec<String> = campaigns.data.into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Summer Launch", "Black Friday"]);
}

#[actix_rt::test]
async fn missing_campaign_is_not_found() {
    let base = spawn_server(Arc::new(MemoryDatabase::new()));
    let client = Client::default();

    let mut response = client
        .get(format!("{}/campaigns/99999", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: serde_json::Value = response.json().await.unwrap();
    assert_eq!(error["error_code"], "E4041001");

    let response = client
        .put(format!("{}/campaigns/99999", base))
        .send_json(&json!({ "name": "Ghost" }))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn malformed_bodies_are_unprocessable() {
    let base = spawn_server(Arc::new(MemoryDatabase::new()));
    let client = Client::default();

    for body in &[
        json!({}),
        json!({ "name": 5 }),
        json!({ "name": "" }),
        json!({ "name": "Launch", "date": "not a date" }),
    ] {
        let response = client
            .post(format!("{}/campaigns", base))
            .send_json(body)
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "body: {}",
            body
        );
    }

    let mut response = client
        .get(format!("{}/campaigns", base))
        .send()
        .await
        .unwrap();
    let campaigns: Envelope<Vec<CampaignBody>> = response.json().await.unwrap();
    assert!(campaigns.data.is_empty());
}

#[actix_rt::test]
async fn dates_without_offset_are_read_as_utc() {
    let base = spawn_server(Arc::new(MemoryDatabase::new()));
    let client = Client::default();
    let midnight = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    for date in &[
        "2024-06-01T00:00:00Z",
        "2024-06-01T00:00:00",
        "2024-06-01",
    ] {
        let mut response = client
            .post(format!("{}/campaigns", base))
            .send_json(&json!({ "name": "Summer Launch", "date": date }))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED, "date: {}", date);
        let created: Envelope<CampaignBody> = response.json().await.unwrap();
        assert_eq!(created.data.date, Some(midnight), "date: {}", date);
    }
}

#[actix_rt::test]
async fn non_numeric_id_is_unprocessable() {
    let base = spawn_server(Arc::new(MemoryDatabase::new()));

    let response = Client::default()
        .get(format!("{}/campaigns/CPN-7", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_rt::test]
async fn root_says_hello() {
    let base = spawn_server(Arc::new(MemoryDatabase::new()));

    let mut response = Client::default()
        .get(format!("{}/", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Hello World!" }));
}

#[actix_rt::test]
async fn unknown_path_is_not_found() {
    let base = spawn_server(Arc::new(MemoryDatabase::new()));

    let mut response = Client::default()
        .get(format!("{}/characters", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: serde_json::Value = response.json().await.unwrap();
    assert_eq!(error["error_code"], "E4041000");
}
