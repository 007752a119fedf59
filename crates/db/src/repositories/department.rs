//! Department repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::departments;

/// Error types for department operations.
#[derive(Debug, thiserror::Error)]
pub enum DepartmentError {
    /// Department not found.
    #[error("Department not found: {0}")]
    NotFound(Uuid),

    /// Department name already exists.
    #[error("Department name already exists: {0}")]
    DuplicateName(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Department repository.
#[derive(Debug, Clone)]
pub struct DepartmentRepository {
    db: DatabaseConnection,
}

impl DepartmentRepository {
    /// Creates a new department repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a department.
    ///
    /// # Errors
    ///
    /// Returns `DepartmentError::DuplicateName` when the name is
    /// taken.
    pub async fn create(
        &self,
        name: String,
        head_id: Option<Uuid>,
    ) -> Result<departments::Model, DepartmentError> {
        let existing = departments::Entity::find()
            .filter(departments::Column::Name.eq(&name))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(DepartmentError::DuplicateName(name));
        }

        let now = Utc::now().into();
        let department = departments::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            head_id: Set(head_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(department.insert(&self.db).await?)
    }

    /// Finds a department by id.
    ///
    /// # Errors
    ///
    /// Returns `DepartmentError::NotFound` when the id is unknown.
    pub async fn find(&self, department_id: Uuid) -> Result<departments::Model, DepartmentError> {
        departments::Entity::find_by_id(department_id)
            .one(&self.db)
            .await?
            .ok_or(DepartmentError::NotFound(department_id))
    }

    /// Lists departments by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<departments::Model>, DepartmentError> {
        Ok(departments::Entity::find()
            .order_by_asc(departments::Column::Name)
            .all(&self.db)
            .await?)
    }
}
