//! Repository for the `documents` table.

use hrms_core::pagination::PageRequest;
use hrms_core::types::DbId;
use sqlx::PgPool;

use crate::filter::Filter;
use crate::models::document::{CreateDocument, Document, DocumentQuery, StoredFile};

const COLUMNS: &str = "id, employee_id, title, document_type, description, file_name, \
                       file_path, mime_type, size_bytes, uploaded_by, created_at, updated_at";

pub struct DocumentRepo;

impl DocumentRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateDocument,
        file: &StoredFile,
        uploaded_by: DbId,
    ) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents
                (employee_id, title, document_type, description, file_name, file_path,
                 mime_type, size_bytes, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(input.employee_id)
            .bind(&input.title)
            .bind(&input.document_type)
            .bind(&input.description)
            .bind(&file.file_name)
            .bind(&file.file_path)
            .bind(&file.mime_type)
            .bind(file.size_bytes)
            .bind(uploaded_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &DocumentQuery,
        page: PageRequest,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let filter = build_filter(params);
        let idx = filter.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM documents {} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${idx} OFFSET ${}",
            filter.where_clause(),
            idx + 1
        );
        filter
            .bind_as(sqlx::query_as::<_, Document>(&query))
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &DocumentQuery) -> Result<i64, sqlx::Error> {
        let filter = build_filter(params);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM documents {}",
            filter.where_clause()
        );
        filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Rewrite the document metadata. The stored file never changes.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CreateDocument,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "UPDATE documents SET
                title = $2,
                document_type = $3,
                description = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.document_type)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn build_filter(params: &DocumentQuery) -> Filter {
    let mut filter = Filter::new();
    filter
        .eq_id("employee_id", params.employee_id)
        .eq_text("document_type", params.document_type.as_deref())
        .search(&["title", "file_name"], params.search.as_deref());
    filter
}
