use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionError, TransactionTrait,
    sea_query::OnConflict,
};
use uuid::Uuid;

use campus_accounts_schema::{uploaded_files, user_profiles, users};
use campus_core::sea_ext::is_unique_violation;
use campus_domain::user::UserRole;

use crate::domain::repository::{FileRepository, UserRepository};
use crate::domain::types::{UploadedFile, User, UserProfile, object_key};
use crate::error::AccountsServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn list(&self) -> Result<Vec<User>, AccountsServiceError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::Username)
            .all(&self.db)
            .await
            .context("list users")?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AccountsServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountsServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn email_exists(
        &self,
        email: &str,
        except: Option<Uuid>,
    ) -> Result<bool, AccountsServiceError> {
        let mut query = users::Entity::find().filter(users::Column::Email.eq(email));
        if let Some(id) = except {
            query = query.filter(users::Column::Id.ne(id));
        }
        let count = query.count(&self.db).await.context("count users by email")?;
        Ok(count > 0)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AccountsServiceError> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.db)
            .await
            .context("count users by username")?;
        Ok(count > 0)
    }

    async fn roll_number_exists(
        &self,
        roll_number: &str,
        except: Option<Uuid>,
    ) -> Result<bool, AccountsServiceError> {
        let mut query =
            user_profiles::Entity::find().filter(user_profiles::Column::RollNumber.eq(roll_number));
        if let Some(id) = except {
            query = query.filter(user_profiles::Column::UserId.ne(id));
        }
        let count = query
            .count(&self.db)
            .await
            .context("count profiles by roll number")?;
        Ok(count > 0)
    }

    async fn find_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UserProfile>, AccountsServiceError> {
        let model = user_profiles::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("find user profile")?;
        Ok(model.map(profile_from_model))
    }

    async fn create(
        &self,
        user: &User,
        profile: Option<&UserProfile>,
    ) -> Result<(), AccountsServiceError> {
        let user = user.clone();
        let profile = profile.cloned();
        let result = self
            .db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    users::ActiveModel {
                        id: Set(user.id),
                        email: Set(user.email.clone()),
                        username: Set(user.username.clone()),
                        password_hash: Set(user.password_hash.clone()),
                        role: Set(user.role.as_str().to_owned()),
                        is_active: Set(user.is_active),
                        profile_picture: Set(user.profile_picture.clone()),
                        phone: Set(user.phone.clone()),
                        date_joined: Set(user.date_joined),
                        updated_at: Set(user.updated_at),
                    }
                    .insert(txn)
                    .await?;

                    if let Some(profile) = profile {
                        profile_active_model(&profile).insert(txn).await?;
                    }
                    Ok(())
                })
            })
            .await;
        map_write_result(result, "create user")
    }

    async fn update(
        &self,
        user: &User,
        profile: Option<&UserProfile>,
    ) -> Result<(), AccountsServiceError> {
        let user = user.clone();
        let profile = profile.cloned();
        let result = self
            .db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    users::ActiveModel {
                        id: Set(user.id),
                        email: Set(user.email.clone()),
                        username: Set(user.username.clone()),
                        profile_picture: Set(user.profile_picture.clone()),
                        phone: Set(user.phone.clone()),
                        is_active: Set(user.is_active),
                        updated_at: Set(user.updated_at),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;

                    if let Some(profile) = profile {
                        user_profiles::Entity::insert(profile_active_model(&profile))
                            .on_conflict(
                                OnConflict::column(user_profiles::Column::UserId)
                                    .update_columns([
                                        user_profiles::Column::Department,
                                        user_profiles::Column::RollNumber,
                                    ])
                                    .to_owned(),
                            )
                            .exec(txn)
                            .await?;
                    }
                    Ok(())
                })
            })
            .await;
        map_write_result(result, "update user")
    }
}

/// Unique violations that slip past the pre-checks map to their 400 variants.
fn map_write_result(
    result: Result<(), TransactionError<DbErr>>,
    action: &'static str,
) -> Result<(), AccountsServiceError> {
    match result {
        Ok(()) => Ok(()),
        Err(TransactionError::Transaction(err)) if is_unique_violation(&err) => {
            if err.to_string().contains("roll_number") {
                Err(AccountsServiceError::RollNumberAlreadyExists)
            } else {
                Err(AccountsServiceError::EmailAlreadyExists)
            }
        }
        Err(err) => Err(anyhow::Error::new(err).context(action).into()),
    }
}

fn profile_active_model(profile: &UserProfile) -> user_profiles::ActiveModel {
    user_profiles::ActiveModel {
        user_id: Set(profile.user_id),
        department: Set(profile.department.clone()),
        roll_number: Set(profile.roll_number.clone()),
    }
}

fn user_from_model(model: users::Model) -> Result<User, AccountsServiceError> {
    let role: UserRole = model
        .role
        .parse()
        .with_context(|| format!("stored role of user {}", model.id))?;
    Ok(User {
        id: model.id,
        email: model.email,
        username: model.username,
        password_hash: model.password_hash,
        role,
        is_active: model.is_active,
        profile_picture: model.profile_picture,
        phone: model.phone,
        date_joined: model.date_joined,
        updated_at: model.updated_at,
    })
}

fn profile_from_model(model: user_profiles::Model) -> UserProfile {
    UserProfile {
        user_id: model.user_id,
        department: model.department,
        roll_number: model.roll_number,
    }
}

// ── File repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFileRepository {
    pub db: DatabaseConnection,
}

impl FileRepository for DbFileRepository {
    async fn create(&self, file: &UploadedFile) -> Result<(), AccountsServiceError> {
        uploaded_files::ActiveModel {
            id: Set(file.id),
            user_id: Set(file.user_id),
            filename: Set(file.filename.clone()),
            size: Set(file.size),
            uploaded_at: Set(file.uploaded_at),
            year: Set(file.year.clone()),
            storage_path: Set(file.storage_path.clone()),
        }
        .insert(&self.db)
        .await
        .context("create uploaded file")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UploadedFile>, AccountsServiceError> {
        let model = uploaded_files::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find uploaded file")?;
        Ok(model.map(file_from_model))
    }

    async fn list(&self, owner: Option<Uuid>) -> Result<Vec<UploadedFile>, AccountsServiceError> {
        let mut query = uploaded_files::Entity::find();
        if let Some(user_id) = owner {
            query = query.filter(uploaded_files::Column::UserId.eq(user_id));
        }
        let models = query
            .order_by_desc(uploaded_files::Column::UploadedAt)
            .all(&self.db)
            .await
            .context("list uploaded files")?;
        Ok(models.into_iter().map(file_from_model).collect())
    }

    async fn owns_object(&self, user_id: Uuid, key: &str) -> Result<bool, AccountsServiceError> {
        // LIKE narrows the candidates; the exact key comparison happens below.
        let candidates = uploaded_files::Entity::find()
            .filter(uploaded_files::Column::UserId.eq(user_id))
            .filter(
                Condition::any()
                    .add(uploaded_files::Column::StoragePath.eq(key))
                    .add(uploaded_files::Column::StoragePath.ends_with(format!("/{key}"))),
            )
            .all(&self.db)
            .await
            .context("find owned objects")?;
        Ok(candidates
            .iter()
            .filter_map(|m| m.storage_path.as_deref())
            .any(|path| object_key(path) == key))
    }

    async fn count_by_owner(&self, user_id: Uuid) -> Result<u64, AccountsServiceError> {
        let count = uploaded_files::Entity::find()
            .filter(uploaded_files::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .context("count uploaded files")?;
        Ok(count)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AccountsServiceError> {
        let result = uploaded_files::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete uploaded file")?;
        Ok(result.rows_affected > 0)
    }
}

fn file_from_model(model: uploaded_files::Model) -> UploadedFile {
    UploadedFile {
        id: model.id,
        user_id: model.user_id,
        filename: model.filename,
        size: model.size,
        uploaded_at: model.uploaded_at,
        year: model.year,
        storage_path: model.storage_path,
    }
}
