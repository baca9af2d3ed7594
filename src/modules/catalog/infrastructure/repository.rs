/// Diesel-based implementation of CatalogRepository
///
/// Dedup is enforced by the unique (external_id, media_type) index:
/// `insert` uses ON CONFLICT DO NOTHING, so any number of workers may race
/// on the same key and exactly one record survives.
use crate::modules::catalog::domain::entities::{ContentRecord, MediaType, NewContentRecord};
use crate::modules::catalog::domain::repository::CatalogRepository;
use crate::modules::catalog::infrastructure::models::{ContentRecordModel, NewContentRecordModel};
use crate::schema::content_records;
use crate::shared::database::DbPool;
use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use diesel::prelude::*;
use std::collections::HashSet;
use uuid::Uuid;

pub struct CatalogRepositoryImpl {
    pool: DbPool,
}

impl CatalogRepositoryImpl {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn get_conn(
        &self,
    ) -> AppResult<
        diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<diesel::PgConnection>>,
    > {
        self.pool
            .get()
            .map_err(|e| AppError::DatabaseError(format!("Failed to get connection: {}", e)))
    }
}

#[async_trait]
impl CatalogRepository for CatalogRepositoryImpl {
    async fn exists(&self, external_id: i32, media_type: MediaType) -> AppResult<bool> {
        let mut conn = self.get_conn()?;

        let count: i64 = content_records::table
            .filter(content_records::external_id.eq(external_id))
            .filter(content_records::media_type.eq(media_type))
            .count()
            .get_result(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to check existence: {}", e)))?;

        Ok(count > 0)
    }

    async fn insert(&self, record: NewContentRecord) -> AppResult<Uuid> {
        let external_id = record.external_id;
        let media_type = record.media_type;
        let model = NewContentRecordModel::from(record);

        let mut conn = self.get_conn()?;

        // ON CONFLICT DO NOTHING returns zero rows when the key is taken;
        // the losing side of a race sees DuplicateKey, never an error row.
        let inserted: Vec<Uuid> = diesel::insert_into(content_records::table)
            .values(&model)
            .on_conflict_do_nothing()
            .returning(content_records::id)
            .get_results(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to insert record: {}", e)))?;

        inserted.into_iter().next().ok_or_else(|| {
            AppError::DuplicateKey(format!(
                "Record already exists for {} {}",
                media_type, external_id
            ))
        })
    }

    async fn get(&self, record_id: Uuid) -> AppResult<Option<ContentRecord>> {
        let mut conn = self.get_conn()?;

        let record: Option<ContentRecordModel> = content_records::table
            .find(record_id)
            .select(ContentRecordModel::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| AppError::DatabaseError(format!("Failed to get record: {}", e)))?;

        Ok(record.map(|r| r.to_record()))
    }

    async fn filter_missing(
        &self,
        external_ids: &[i32],
        media_type: MediaType,
    ) -> AppResult<Vec<i32>> {
        if external_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.get_conn()?;

        let present: Vec<i32> = content_records::table
            .filter(content_records::external_id.eq_any(external_ids))
            .filter(content_records::media_type.eq(media_type))
            .select(content_records::external_id)
            .load(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to filter IDs: {}", e)))?;

        let present: HashSet<i32> = present.into_iter().collect();

        Ok(external_ids
            .iter()
            .copied()
            .filter(|id| !present.contains(id))
            .collect())
    }

    async fn count(&self, media_type: MediaType) -> AppResult<i64> {
        let mut conn = self.get_conn()?;

        content_records::table
            .filter(content_records::media_type.eq(media_type))
            .count()
            .get_result(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to count records: {}", e)))
    }
}
