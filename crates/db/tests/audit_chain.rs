//! Audit log hash chain against a real database.

use hrms_core::pagination::PageRequest;
use hrms_db::models::audit::{verify_chain, AuditQuery, CreateAuditLog};
use hrms_db::repositories::AuditLogRepo;
use serde_json::json;
use sqlx::PgPool;

fn entry(action: &str, entity_id: i64) -> CreateAuditLog {
    CreateAuditLog {
        user_id: Some(1),
        action: action.to_string(),
        entity_type: "employee".to_string(),
        entity_id: Some(entity_id),
        details_json: Some(json!({ "field": "position" })),
        ip_address: Some("127.0.0.1".to_string()),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_appended_entries_form_valid_chain(pool: PgPool) {
    let first = AuditLogRepo::append(&pool, &entry("create", 1)).await.unwrap();
    let second = AuditLogRepo::append(&pool, &entry("update", 1)).await.unwrap();
    assert_ne!(first.integrity_hash, second.integrity_hash);
    assert_eq!(
        AuditLogRepo::find_last_hash(&pool).await.unwrap(),
        second.integrity_hash
    );

    let chain = AuditLogRepo::fetch_chain(&pool).await.unwrap();
    let result = verify_chain(&chain);
    assert!(result.chain_valid);
    assert_eq!(result.verified_entries, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_appends_keep_chain_linear(pool: PgPool) {
    let mut handles = Vec::new();
    for i in 0..8 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            AuditLogRepo::append(&pool, &entry("update", i)).await.unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let chain = AuditLogRepo::fetch_chain(&pool).await.unwrap();
    assert_eq!(chain.len(), 8);
    assert!(verify_chain(&chain).chain_valid);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_tampering_is_detected(pool: PgPool) {
    AuditLogRepo::append(&pool, &entry("create", 1)).await.unwrap();
    let target = AuditLogRepo::append(&pool, &entry("update", 1)).await.unwrap();
    AuditLogRepo::append(&pool, &entry("delete", 1)).await.unwrap();

    sqlx::query("UPDATE audit_logs SET action = 'approve' WHERE id = $1")
        .bind(target.id)
        .execute(&pool)
        .await
        .unwrap();

    let result = verify_chain(&AuditLogRepo::fetch_chain(&pool).await.unwrap());
    assert!(!result.chain_valid);
    assert_eq!(result.first_break, Some(target.id));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_query_filters_by_action(pool: PgPool) {
    AuditLogRepo::append(&pool, &entry("create", 1)).await.unwrap();
    AuditLogRepo::append(&pool, &entry("update", 1)).await.unwrap();
    AuditLogRepo::append(&pool, &entry("update", 2)).await.unwrap();

    let params = AuditQuery {
        action: Some("update".to_string()),
        ..Default::default()
    };
    let rows = AuditLogRepo::query(&pool, &params, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].entity_id, Some(2));
    assert_eq!(AuditLogRepo::count(&pool, &params).await.unwrap(), 2);
}
