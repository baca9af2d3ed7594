/// Diesel models for the import_jobs table
use crate::modules::jobs::domain::entities::{
    ErrorEntry, ImportJob, JobParameters, JobStatus,
};
use crate::schema::import_jobs;
use crate::shared::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = import_jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ImportJobModel {
    pub id: Uuid,
    pub owner: String,
    pub job_kind: String,
    pub status: JobStatus,
    pub total_items: i32,
    pub processed_items: i32,
    pub failed_items: i32,
    pub parameters: serde_json::Value,
    pub error_log: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ImportJobModel {
    pub fn to_job(self) -> AppResult<ImportJob> {
        let kind = self.job_kind.parse().map_err(AppError::ValidationError)?;
        let parameters: JobParameters = serde_json::from_value(self.parameters)?;
        let error_log: Vec<ErrorEntry> = serde_json::from_value(self.error_log)?;

        Ok(ImportJob {
            id: self.id,
            owner: self.owner,
            kind,
            status: self.status,
            total_items: self.total_items,
            processed_items: self.processed_items,
            failed_items: self.failed_items,
            parameters,
            error_log,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = import_jobs)]
pub struct NewImportJobModel {
    pub owner: String,
    pub job_kind: String,
    pub status: JobStatus,
    pub total_items: i32,
    pub parameters: serde_json::Value,
    pub error_log: serde_json::Value,
}
