use anyhow::anyhow;
use chrono::NaiveDate;
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};

use campus_erp_core::{AppError, PaginationMeta};
use campus_erp_db::map_constraint_error;
use campus_erp_models::ids::UserId;
use campus_erp_models::validation::{ensure_date_order, unprocessable};

use crate::modules::library::model::{
    CreateLibraryBorrowingDto, CreateLibraryResourceDto, LibraryBorrowing,
    LibraryBorrowingFilterParams, LibraryBorrowingId, LibraryResource,
    LibraryResourceFilterParams, LibraryResourceId, LibraryResourceView,
    PaginatedLibraryBorrowingsResponse, PaginatedLibraryResourcesResponse,
    UpdateLibraryBorrowingDto, UpdateLibraryResourceDto, copies_within_total,
};

const SELECT_RESOURCE: &str = r#"
    SELECT r.id, r.title, r.author, r.resource_type, r.isbn, r.location,
           r.available_copies, r.total_copies
    FROM library_resources r"#;

const SELECT_BORROWING: &str = r#"
    SELECT b.id, b.resource_id,
           r.title AS resource_title, r.author AS resource_author,
           r.resource_type AS resource_resource_type, r.isbn AS resource_isbn,
           r.location AS resource_location,
           r.available_copies AS resource_available_copies,
           r.total_copies AS resource_total_copies,
           b.user_id, TRIM(u.first_name || ' ' || u.last_name) AS user_name,
           b.borrow_date, b.due_date, b.return_date, b.renewals
    FROM library_borrowings b
    JOIN library_resources r ON r.id = b.resource_id
    JOIN users u ON u.id = b.user_id"#;

/// The stored columns of a borrowing, read under a row lock.
#[derive(FromRow)]
struct BorrowingRow {
    resource_id: LibraryResourceId,
    user_id: UserId,
    borrow_date: NaiveDate,
    due_date: NaiveDate,
    return_date: Option<NaiveDate>,
    renewals: i32,
}

const NO_COPIES: &str = "No copies of this resource are available";

fn push_resource_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    filters: &LibraryResourceFilterParams,
) {
    qb.push(" WHERE TRUE");
    if let Some(resource_type) = filters.resource_type {
        qb.push(" AND r.resource_type = ").push_bind(resource_type);
    }
    if filters.available {
        qb.push(" AND r.available_copies > 0");
    }
}

fn push_borrowing_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    filters: &LibraryBorrowingFilterParams,
) {
    qb.push(" WHERE TRUE");
    if let Some(user_id) = filters.user {
        qb.push(" AND b.user_id = ").push_bind(user_id);
    }
}

/// Takes one copy of `resource_id` off the shelf.
async fn take_copy(conn: &mut PgConnection, resource_id: LibraryResourceId) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE library_resources SET available_copies = available_copies - 1
         WHERE id = $1 AND available_copies > 0",
    )
    .bind(resource_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM library_resources WHERE id = $1)")
                .bind(resource_id)
                .fetch_one(&mut *conn)
                .await?;
        return Err(if exists {
            AppError::bad_request(anyhow!(NO_COPIES))
        } else {
            AppError::bad_request(anyhow!("Referenced record does not exist"))
        });
    }

    Ok(())
}

/// Locks two resource rows in id order so opposite moves cannot deadlock.
async fn lock_resources(
    conn: &mut PgConnection,
    a: LibraryResourceId,
    b: LibraryResourceId,
) -> Result<(), AppError> {
    sqlx::query("SELECT id FROM library_resources WHERE id = ANY($1) ORDER BY id FOR UPDATE")
        .bind(vec![a.into_inner(), b.into_inner()])
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Puts one copy of `resource_id` back, never above `total_copies`.
async fn return_copy(conn: &mut PgConnection, resource_id: LibraryResourceId) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE library_resources
         SET available_copies = LEAST(available_copies + 1, total_copies)
         WHERE id = $1",
    )
    .bind(resource_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub struct LibraryResourceService;

impl LibraryResourceService {
    #[instrument(skip(db))]
    pub async fn create_library_resource(
        db: &PgPool,
        dto: CreateLibraryResourceDto,
    ) -> Result<LibraryResourceView, AppError> {
        let resource = sqlx::query_as::<_, LibraryResource>(
            r#"INSERT INTO library_resources
                   (title, author, resource_type, isbn, location, available_copies, total_copies)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id, title, author, resource_type, isbn, location,
                         available_copies, total_copies"#,
        )
        .bind(&dto.title)
        .bind(&dto.author)
        .bind(dto.resource_type)
        .bind(&dto.isbn)
        .bind(&dto.location)
        .bind(dto.available_copies)
        .bind(dto.total_copies)
        .fetch_one(db)
        .await
        .map_err(|e| map_constraint_error(e, "Library resource already exists"))?;

        Ok(resource.into())
    }

    #[instrument(skip(db))]
    pub async fn get_library_resources(
        db: &PgPool,
        filters: LibraryResourceFilterParams,
    ) -> Result<PaginatedLibraryResourcesResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM library_resources r");
        push_resource_filters(&mut count_query, &filters);
        let total: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut data_query = QueryBuilder::new(SELECT_RESOURCE);
        push_resource_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY r.title LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let resources = data_query
            .build_query_as::<LibraryResource>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedLibraryResourcesResponse {
            data: resources.into_iter().map(LibraryResourceView::from).collect(),
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_library_resource(
        db: &PgPool,
        id: LibraryResourceId,
    ) -> Result<LibraryResourceView, AppError> {
        sqlx::query_as::<_, LibraryResource>(&format!("{} WHERE r.id = $1", SELECT_RESOURCE))
            .bind(id)
            .fetch_optional(db)
            .await?
            .map(LibraryResourceView::from)
            .ok_or_else(|| AppError::not_found(anyhow!("Library resource not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_library_resource(
        db: &PgPool,
        id: LibraryResourceId,
        dto: UpdateLibraryResourceDto,
    ) -> Result<LibraryResourceView, AppError> {
        let mut tx = db.begin().await?;

        // Borrowings change available_copies under the same row lock.
        let existing = sqlx::query_as::<_, LibraryResource>(&format!(
            "{} WHERE r.id = $1 FOR UPDATE",
            SELECT_RESOURCE
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Library resource not found")))?;

        let available_copies = dto.available_copies.unwrap_or(existing.available_copies);
        let total_copies = dto.total_copies.unwrap_or(existing.total_copies);
        copies_within_total(available_copies, total_copies).map_err(unprocessable)?;

        let resource = sqlx::query_as::<_, LibraryResource>(
            r#"UPDATE library_resources
               SET title = $1, author = $2, resource_type = $3, isbn = $4, location = $5,
                   available_copies = $6, total_copies = $7
               WHERE id = $8
               RETURNING id, title, author, resource_type, isbn, location,
                         available_copies, total_copies"#,
        )
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.author.unwrap_or(existing.author))
        .bind(dto.resource_type.unwrap_or(existing.resource_type))
        .bind(dto.isbn.unwrap_or(existing.isbn))
        .bind(dto.location.unwrap_or(existing.location))
        .bind(available_copies)
        .bind(total_copies)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_constraint_error(e, "Library resource already exists"))?;

        tx.commit().await?;

        Ok(resource.into())
    }

    #[instrument(skip(db))]
    pub async fn delete_library_resource(
        db: &PgPool,
        id: LibraryResourceId,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM library_resources WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Library resource not found")));
        }

        Ok(())
    }
}

pub struct LibraryBorrowingService;

impl LibraryBorrowingService {
    #[instrument(skip(db))]
    pub async fn create_library_borrowing(
        db: &PgPool,
        dto: CreateLibraryBorrowingDto,
    ) -> Result<LibraryBorrowing, AppError> {
        let mut tx = db.begin().await?;

        if dto.return_date.is_none() {
            take_copy(&mut tx, dto.resource_id).await?;
        }

        let id: LibraryBorrowingId = sqlx::query_scalar(
            r#"INSERT INTO library_borrowings
                   (resource_id, user_id, borrow_date, due_date, return_date, renewals)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id"#,
        )
        .bind(dto.resource_id)
        .bind(dto.user_id)
        .bind(dto.borrow_date)
        .bind(dto.due_date)
        .bind(dto.return_date)
        .bind(dto.renewals)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_constraint_error(e, "Borrowing already exists"))?;

        tx.commit().await?;

        info!(borrowing_id = %id, resource_id = %dto.resource_id, "Library item borrowed");

        Self::get_library_borrowing(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_library_borrowings(
        db: &PgPool,
        filters: LibraryBorrowingFilterParams,
    ) -> Result<PaginatedLibraryBorrowingsResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM library_borrowings b");
        push_borrowing_filters(&mut count_query, &filters);
        let total: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut data_query = QueryBuilder::new(SELECT_BORROWING);
        push_borrowing_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY b.borrow_date DESC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let borrowings = data_query
            .build_query_as::<LibraryBorrowing>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedLibraryBorrowingsResponse {
            data: borrowings,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_library_borrowing(
        db: &PgPool,
        id: LibraryBorrowingId,
    ) -> Result<LibraryBorrowing, AppError> {
        sqlx::query_as::<_, LibraryBorrowing>(&format!("{} WHERE b.id = $1", SELECT_BORROWING))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Library borrowing not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_library_borrowing(
        db: &PgPool,
        id: LibraryBorrowingId,
        dto: UpdateLibraryBorrowingDto,
    ) -> Result<LibraryBorrowing, AppError> {
        let mut tx = db.begin().await?;

        // Concurrent updates of one borrowing queue here and see each other's result.
        let existing = sqlx::query_as::<_, BorrowingRow>(
            r#"SELECT resource_id, user_id, borrow_date, due_date, return_date, renewals
               FROM library_borrowings WHERE id = $1 FOR UPDATE"#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Library borrowing not found")))?;

        let borrow_date = dto.borrow_date.unwrap_or(existing.borrow_date);
        let due_date = dto.due_date.unwrap_or(existing.due_date);
        ensure_date_order(borrow_date, due_date, ("borrow_date", "due_date"))?;

        let resource_id = dto.resource_id.unwrap_or(existing.resource_id);
        let return_date: Option<NaiveDate> = dto.return_date.unwrap_or(existing.return_date);

        let was_out = existing.return_date.is_none();
        let is_out = return_date.is_none();
        let moved = resource_id != existing.resource_id;

        if was_out && is_out && moved {
            lock_resources(&mut tx, existing.resource_id, resource_id).await?;
        }
        if was_out && (!is_out || moved) {
            return_copy(&mut tx, existing.resource_id).await?;
        }
        if is_out && (!was_out || moved) {
            take_copy(&mut tx, resource_id).await?;
        }

        sqlx::query(
            r#"UPDATE library_borrowings
               SET resource_id = $1, user_id = $2, borrow_date = $3, due_date = $4,
                   return_date = $5, renewals = $6
               WHERE id = $7"#,
        )
        .bind(resource_id)
        .bind(dto.user_id.unwrap_or(existing.user_id))
        .bind(borrow_date)
        .bind(due_date)
        .bind(return_date)
        .bind(dto.renewals.unwrap_or(existing.renewals))
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_constraint_error(e, "Borrowing already exists"))?;

        tx.commit().await?;

        Self::get_library_borrowing(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_library_borrowing(
        db: &PgPool,
        id: LibraryBorrowingId,
    ) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let deleted: Option<(LibraryResourceId, Option<NaiveDate>)> = sqlx::query_as(
            "DELETE FROM library_borrowings WHERE id = $1 RETURNING resource_id, return_date",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((resource_id, return_date)) = deleted else {
            return Err(AppError::not_found(anyhow!("Library borrowing not found")));
        };

        if return_date.is_none() {
            return_copy(&mut tx, resource_id).await?;
        }

        tx.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_erp_core::PaginationParams;
    use campus_erp_models::library::ResourceType;

    async fn reader(pool: &PgPool) -> UserId {
        sqlx::query_scalar(
            "INSERT INTO users (username, email, password, first_name, last_name, role)
             VALUES ('reader', 'reader@uni.edu', 'x', 'Rita', 'Reader', 'student') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn resource(pool: &PgPool, title: &str, copies: i32) -> LibraryResourceView {
        LibraryResourceService::create_library_resource(
            pool,
            CreateLibraryResourceDto {
                title: title.to_string(),
                author: "Author".to_string(),
                resource_type: ResourceType::Book,
                isbn: String::new(),
                location: "Shelf A".to_string(),
                available_copies: copies,
                total_copies: copies,
            },
        )
        .await
        .unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn borrow(resource_id: LibraryResourceId, user_id: UserId) -> CreateLibraryBorrowingDto {
        CreateLibraryBorrowingDto {
            resource_id,
            user_id,
            borrow_date: date(1),
            due_date: date(15),
            return_date: None,
            renewals: 0,
        }
    }

    async fn available(pool: &PgPool, id: LibraryResourceId) -> i32 {
        LibraryResourceService::get_library_resource(pool, id)
            .await
            .unwrap()
            .resource
            .available_copies
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_available_filter(pool: PgPool) {
        resource(&pool, "On shelf", 2).await;
        resource(&pool, "Gone", 0).await;

        let page = LibraryResourceService::get_library_resources(
            &pool,
            LibraryResourceFilterParams {
                resource_type: None,
                available: true,
                pagination: PaginationParams::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(page.meta.total, 1);
        assert_eq!(page.data[0].resource.title, "On shelf");
        assert_eq!(page.data[0].availability_status, "Available");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_borrowing_takes_and_return_gives_back_a_copy(pool: PgPool) {
        let user_id = reader(&pool).await;
        let book = resource(&pool, "Dune", 1).await;

        let borrowing = LibraryBorrowingService::create_library_borrowing(&pool, borrow(book.resource.id, user_id))
            .await
            .unwrap();
        assert_eq!(borrowing.user_name, "Rita Reader");
        assert_eq!(borrowing.resource_details.availability_status, "Checked Out");
        assert_eq!(available(&pool, book.resource.id).await, 0);

        let err = LibraryBorrowingService::create_library_borrowing(&pool, borrow(book.resource.id, user_id))
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
        assert_eq!(err.message(), NO_COPIES);

        let returned: UpdateLibraryBorrowingDto =
            serde_json::from_str(r#"{"return_date":"2025-03-10"}"#).unwrap();
        LibraryBorrowingService::update_library_borrowing(&pool, borrowing.id, returned)
            .await
            .unwrap();
        assert_eq!(available(&pool, book.resource.id).await, 1);

        // Updating other fields of a returned borrowing leaves the count alone.
        let renewed: UpdateLibraryBorrowingDto = serde_json::from_str(r#"{"renewals":1}"#).unwrap();
        LibraryBorrowingService::update_library_borrowing(&pool, borrowing.id, renewed)
            .await
            .unwrap();
        assert_eq!(available(&pool, book.resource.id).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_already_returned_borrowing_takes_no_copy(pool: PgPool) {
        let user_id = reader(&pool).await;
        let book = resource(&pool, "Dune", 1).await;

        let mut dto = borrow(book.resource.id, user_id);
        dto.return_date = Some(date(5));
        LibraryBorrowingService::create_library_borrowing(&pool, dto)
            .await
            .unwrap();
        assert_eq!(available(&pool, book.resource.id).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_deleting_open_borrowing_returns_copy(pool: PgPool) {
        let user_id = reader(&pool).await;
        let book = resource(&pool, "Dune", 2).await;

        let borrowing = LibraryBorrowingService::create_library_borrowing(&pool, borrow(book.resource.id, user_id))
            .await
            .unwrap();
        assert_eq!(available(&pool, book.resource.id).await, 1);

        LibraryBorrowingService::delete_library_borrowing(&pool, borrowing.id)
            .await
            .unwrap();
        assert_eq!(available(&pool, book.resource.id).await, 2);

        let err = LibraryBorrowingService::delete_library_borrowing(&pool, borrowing.id)
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_moving_open_borrowing_moves_the_copy(pool: PgPool) {
        let user_id = reader(&pool).await;
        let first = resource(&pool, "First", 1).await;
        let second = resource(&pool, "Second", 1).await;

        let borrowing = LibraryBorrowingService::create_library_borrowing(&pool, borrow(first.resource.id, user_id))
            .await
            .unwrap();

        let moved: UpdateLibraryBorrowingDto =
            serde_json::from_str(&format!(r#"{{"resource_id":"{}"}}"#, second.resource.id)).unwrap();
        let updated = LibraryBorrowingService::update_library_borrowing(&pool, borrowing.id, moved)
            .await
            .unwrap();

        assert_eq!(updated.resource_id, second.resource.id);
        assert_eq!(available(&pool, first.resource.id).await, 1);
        assert_eq!(available(&pool, second.resource.id).await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_filter_borrowings_by_user(pool: PgPool) {
        let user_id = reader(&pool).await;
        let book = resource(&pool, "Dune", 3).await;
        LibraryBorrowingService::create_library_borrowing(&pool, borrow(book.resource.id, user_id))
            .await
            .unwrap();

        let mine = LibraryBorrowingService::get_library_borrowings(
            &pool,
            LibraryBorrowingFilterParams {
                user: Some(user_id),
                pagination: PaginationParams::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(mine.meta.total, 1);

        let nobody = LibraryBorrowingService::get_library_borrowings(
            &pool,
            LibraryBorrowingFilterParams {
                user: Some(UserId::new()),
                pagination: PaginationParams::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(nobody.meta.total, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_resource_rejects_more_available_than_total(pool: PgPool) {
        let book = resource(&pool, "Dune", 2).await;
        let update: UpdateLibraryResourceDto =
            serde_json::from_str(r#"{"available_copies":5}"#).unwrap();
        let err = LibraryResourceService::update_library_resource(&pool, book.resource.id, update)
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 422);
    }
}
