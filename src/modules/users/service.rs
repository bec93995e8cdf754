use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use campus_erp_core::{AppError, PaginationMeta, hash_password};
use campus_erp_db::map_constraint_error;

use crate::modules::users::model::{
    CreateUserDto, PaginatedUsersResponse, UpdateUserDto, User, UserFilterParams, UserId,
};

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, role, department, \
     phone_number, is_active, created_at, updated_at";

const DUPLICATE_USER: &str = "A user with this username or email already exists";

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &UserFilterParams) {
    qb.push(" WHERE TRUE");
    if let Some(role) = filters.role {
        qb.push(" AND role = ").push_bind(role);
    }
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db, dto), fields(username = %dto.username))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO users
                   (username, email, password, first_name, last_name, role, department, phone_number, is_active)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING {}"#,
            USER_COLUMNS
        ))
        .bind(&dto.username)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(dto.role)
        .bind(&dto.department)
        .bind(&dto.phone_number)
        .bind(dto.is_active.unwrap_or(true))
        .fetch_one(db)
        .await
        .map_err(|e| map_constraint_error(e, DUPLICATE_USER))?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn get_users(
        db: &PgPool,
        filters: UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM users");
        push_filters(&mut count_query, &filters);
        let total: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut data_query = QueryBuilder::new(format!("SELECT {} FROM users", USER_COLUMNS));
        push_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY username LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let users = data_query.build_query_as::<User>().fetch_all(db).await?;

        Ok(PaginatedUsersResponse {
            data: users,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: UserId) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_user(db: &PgPool, id: UserId, dto: UpdateUserDto) -> Result<User, AppError> {
        let existing = Self::get_user(db, id).await?;

        let password = match &dto.password {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let user = sqlx::query_as::<_, User>(&format!(
            r#"UPDATE users
               SET username = $1, email = $2, first_name = $3, last_name = $4, role = $5,
                   department = $6, phone_number = $7, is_active = $8,
                   password = COALESCE($9, password), updated_at = NOW()
               WHERE id = $10
               RETURNING {}"#,
            USER_COLUMNS
        ))
        .bind(dto.username.unwrap_or(existing.username))
        .bind(dto.email.unwrap_or(existing.email))
        .bind(dto.first_name.unwrap_or(existing.first_name))
        .bind(dto.last_name.unwrap_or(existing.last_name))
        .bind(dto.role.unwrap_or(existing.role))
        .bind(dto.department.unwrap_or(existing.department))
        .bind(dto.phone_number.unwrap_or(existing.phone_number))
        .bind(dto.is_active.unwrap_or(existing.is_active))
        .bind(password)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| map_constraint_error(e, DUPLICATE_USER))?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: UserId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("User not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_erp_core::{PaginationParams, verify_password};
    use campus_erp_models::users::UserRole;

    fn dto(username: &str, role: UserRole) -> CreateUserDto {
        CreateUserDto {
            username: username.to_string(),
            email: format!("{}@uni.edu", username),
            password: "password123".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role,
            department: String::new(),
            phone_number: String::new(),
            is_active: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_user_hashes_password(pool: PgPool) {
        let user = UserService::create_user(&pool, dto("alice", UserRole::Student))
            .await
            .unwrap();
        assert!(user.is_active);

        let stored: String = sqlx::query_scalar("SELECT password FROM users WHERE id = $1")
            .bind(user.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_ne!(stored, "password123");
        assert!(verify_password("password123", &stored).unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicate_username_is_bad_request(pool: PgPool) {
        UserService::create_user(&pool, dto("bob", UserRole::Staff))
            .await
            .unwrap();
        let mut again = dto("bob", UserRole::Staff);
        again.email = "other@uni.edu".to_string();

        let err = UserService::create_user(&pool, again).await.unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
        assert_eq!(err.message(), DUPLICATE_USER);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_filter_by_role(pool: PgPool) {
        UserService::create_user(&pool, dto("s1", UserRole::Student))
            .await
            .unwrap();
        UserService::create_user(&pool, dto("f1", UserRole::Faculty))
            .await
            .unwrap();

        let page = UserService::get_users(
            &pool,
            UserFilterParams {
                role: Some(UserRole::Faculty),
                pagination: PaginationParams::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(page.meta.total, 1);
        assert_eq!(page.data[0].username, "f1");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_partial_update_keeps_other_fields(pool: PgPool) {
        let user = UserService::create_user(&pool, dto("carol", UserRole::Student))
            .await
            .unwrap();

        let update: UpdateUserDto = serde_json::from_str(r#"{"department":"Physics"}"#).unwrap();
        let updated = UserService::update_user(&pool, user.id, update).await.unwrap();
        assert_eq!(updated.department, "Physics");
        assert_eq!(updated.username, "carol");
        assert_eq!(updated.role, UserRole::Student);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_missing_user_is_not_found(pool: PgPool) {
        let err = UserService::delete_user(&pool, UserId::new())
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
    }
}
