use sqlx::PgPool;
use uuid::Uuid;

use crate::core::database::is_unique_violation;
use crate::core::error::{AppError, Result};
use crate::features::users::dtos::{CreateUserDto, UpdateUserDto};
use crate::features::users::models::{name_from_email, User, UserRole, DEFAULT_PROFILE_PIC};
use crate::shared::types::PaginationQuery;

const USER_COLUMNS: &str = "id, email, role, office, name, profile_pic, created_at";

/// Service for user accounts
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a user; the display name falls back to one derived from the email
    pub async fn create(&self, dto: CreateUserDto) -> Result<User> {
        let email = dto.email.trim().to_lowercase();
        let name = dto
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| name_from_email(&email));

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, email, role, office, name, profile_pic)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(&email)
        .bind(dto.role)
        .bind(dto.office)
        .bind(&name)
        .bind(DEFAULT_PROFILE_PIC)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::Conflict("User already exists".to_string());
            }
            tracing::error!("Failed to create user: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch user by id: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user by email: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Page of users ordered by creation, plus the total count
    pub async fn list(&self, pagination: &PaginationQuery) -> Result<(Vec<User>, i64)> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {:?}", e);
            AppError::Database(e)
        })?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count users: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((users, total))
    }

    pub async fn update_by_email(&self, email: &str, dto: UpdateUserDto) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                role = COALESCE($3, role),
                office = COALESCE($4, office)
            WHERE email = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email.trim().to_lowercase())
        .bind(dto.name.map(|n| n.trim().to_string()))
        .bind(dto.role)
        .bind(dto.office)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update user: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!(user_id = %user.id, "User updated");
        Ok(user)
    }

    pub async fn update_role(&self, email: &str, role: UserRole) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET role = $2 WHERE email = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(email.trim().to_lowercase())
        .bind(role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update user role: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!(user_id = %user.id, role = %role, "User role changed");
        Ok(user)
    }

    pub async fn delete_by_email(&self, email: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(email.trim().to_lowercase())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete user: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tracing::info!(email = %email, "User deleted");
        Ok(())
    }
}
