//! Repository for the `assets` table.

use hrms_core::asset::Assignment;
use hrms_core::pagination::PageRequest;
use hrms_core::types::DbId;
use sqlx::PgPool;

use crate::filter::Filter;
use crate::models::asset::{Asset, AssetQuery, CreateAsset};

const COLUMNS: &str = "id, name, serial_number, category, status, purchase_date, \
                       purchase_cost, assigned_to, assigned_at, notes, created_at, updated_at";

pub struct AssetRepo;

impl AssetRepo {
    /// Insert an asset. The assignment fields and status come from
    /// [`hrms_core::asset::reconcile_assignment`], not from `input`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAsset,
        assignment: &Assignment,
    ) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets
                (name, serial_number, category, status, purchase_date, purchase_cost,
                 assigned_to, assigned_at, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(&input.name)
            .bind(&input.serial_number)
            .bind(&input.category)
            .bind(&assignment.status)
            .bind(input.purchase_date)
            .bind(input.purchase_cost)
            .bind(assignment.assigned_to)
            .bind(assignment.assigned_at)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &AssetQuery,
        page: PageRequest,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let filter = build_filter(params);
        let idx = filter.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM assets {} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${idx} OFFSET ${}",
            filter.where_clause(),
            idx + 1
        );
        filter
            .bind_as(sqlx::query_as::<_, Asset>(&query))
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &AssetQuery) -> Result<i64, sqlx::Error> {
        let filter = build_filter(params);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM assets {}",
            filter.where_clause()
        );
        filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CreateAsset,
        assignment: &Assignment,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET
                name = $2,
                serial_number = $3,
                category = $4,
                status = $5,
                purchase_date = $6,
                purchase_cost = $7,
                assigned_to = $8,
                assigned_at = $9,
                notes = $10
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.serial_number)
            .bind(&input.category)
            .bind(&assignment.status)
            .bind(input.purchase_date)
            .bind(input.purchase_cost)
            .bind(assignment.assigned_to)
            .bind(assignment.assigned_at)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*)::BIGINT FROM assets GROUP BY status",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn count_by_category(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT category, COUNT(*)::BIGINT FROM assets GROUP BY category",
        )
        .fetch_all(pool)
        .await
    }
}

fn build_filter(params: &AssetQuery) -> Filter {
    let mut filter = Filter::new();
    filter
        .eq_text("category", params.category.as_deref())
        .eq_text("status", params.status.as_deref())
        .eq_id("assigned_to", params.assigned_to)
        .search(&["name", "serial_number"], params.search.as_deref());
    filter
}
