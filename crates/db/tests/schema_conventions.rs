use sqlx::PgPool;

/// Every `id` column is a BIGSERIAL.
#[sqlx::test(migrations = "./migrations")]
async fn test_all_pks_are_bigint(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (table, data_type) in &rows {
        assert_eq!(data_type, "bigint", "Table {table}.id should be bigint");
    }
}

/// Mutable tables carry `created_at`/`updated_at` timestamptz columns and an
/// `updated_at` trigger. `audit_logs` is append-only and has no `updated_at`.
#[sqlx::test(migrations = "./migrations")]
async fn test_mutable_tables_have_timestamps_and_trigger(pool: PgPool) {
    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT table_name
         FROM information_schema.tables
         WHERE table_schema = 'public'
           AND table_type = 'BASE TABLE'
           AND table_name NOT IN ('_sqlx_migrations', 'audit_logs')
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(tables.len(), 12);

    for (table,) in &tables {
        for col in ["created_at", "updated_at"] {
            let result: Option<(String,)> = sqlx::query_as(
                "SELECT data_type
                 FROM information_schema.columns
                 WHERE table_schema = 'public'
                   AND table_name = $1
                   AND column_name = $2",
            )
            .bind(table)
            .bind(col)
            .fetch_optional(&pool)
            .await
            .unwrap();

            let (data_type,) =
                result.unwrap_or_else(|| panic!("Table {table} is missing column {col}"));
            assert_eq!(
                data_type, "timestamp with time zone",
                "Table {table}.{col} should be timestamptz"
            );
        }

        let trigger: Option<(String,)> = sqlx::query_as(
            "SELECT trigger_name
             FROM information_schema.triggers
             WHERE event_object_table = $1
               AND trigger_name = $2
             LIMIT 1",
        )
        .bind(table)
        .bind(format!("trg_{table}_updated_at"))
        .fetch_optional(&pool)
        .await
        .unwrap();
        assert!(trigger.is_some(), "Table {table} is missing its updated_at trigger");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_check(pool: PgPool) {
    hrms_db::health_check(&pool).await.unwrap();
}
