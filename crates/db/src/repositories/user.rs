//! User repository for authentication lookups and account creation.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::UserRole, students, users};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// User not found.
    #[error("User not found")]
    NotFound,

    /// Email already registered.
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Full name.
    pub full_name: String,
    /// Email, unique.
    pub email: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Role.
    pub role: UserRole,
    /// Department membership, where applicable.
    pub department_id: Option<Uuid>,
}

/// User repository.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an active user by email.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` when no active user matches.
    pub async fn find_by_email(&self, email: &str) -> Result<users::Model, UserError> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .filter(users::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .ok_or(UserError::NotFound)
    }

    /// Finds a user by id.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` when the id is unknown.
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<users::Model, UserError> {
        users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(UserError::NotFound)
    }

    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns `UserError::DuplicateEmail` when the email is taken.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(&input.email))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            full_name: Set(input.full_name),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            role: Set(input.role),
            department_id: Set(input.department_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(user.insert(&self.db).await?)
    }

    /// Creates the student row backing a student user.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_student(
        &self,
        user_id: Uuid,
        enrollment_no: String,
        batch: String,
        program: String,
    ) -> Result<students::Model, UserError> {
        let student = students::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            enrollment_no: Set(enrollment_no),
            batch: Set(batch),
            program: Set(program),
            created_at: Set(Utc::now().into()),
        };
        Ok(student.insert(&self.db).await?)
    }

    /// Finds the student row for a user, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn student_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<students::Model>, UserError> {
        Ok(students::Entity::find()
            .filter(students::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?)
    }
}
