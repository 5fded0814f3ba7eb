use campus_session::session::SessionData;

use crate::domain::repository::TaxonomyRepository;
use crate::domain::types::{Category, MAX_NAME_LEN, SubCategory};
use crate::error::InventoryServiceError;
use crate::usecase::require_manager;

// ── Categories ───────────────────────────────────────────────────────────────

pub struct ListCategoriesUseCase<T: TaxonomyRepository> {
    pub taxonomy: T,
}

impl<T: TaxonomyRepository> ListCategoriesUseCase<T> {
    pub async fn execute(&self) -> Result<Vec<Category>, InventoryServiceError> {
        self.taxonomy.list_categories().await
    }
}

pub struct CreateCategoryUseCase<T: TaxonomyRepository> {
    pub taxonomy: T,
}

impl<T: TaxonomyRepository> CreateCategoryUseCase<T> {
    pub async fn execute(
        &self,
        caller: &SessionData,
        name: &str,
    ) -> Result<Category, InventoryServiceError> {
        require_manager(caller)?;
        let name = taxonomy_name(name)?;
        if self.taxonomy.category_name_exists(&name).await? {
            return Err(InventoryServiceError::CategoryExists);
        }
        let category = self.taxonomy.create_category(&name).await?;
        tracing::info!(category_id = category.id, name = %category.name, "category created");
        Ok(category)
    }
}

// ── Sub-categories ───────────────────────────────────────────────────────────

pub struct ListSubCategoriesUseCase<T: TaxonomyRepository> {
    pub taxonomy: T,
}

impl<T: TaxonomyRepository> ListSubCategoriesUseCase<T> {
    pub async fn execute(
        &self,
        category_id: Option<i32>,
    ) -> Result<Vec<SubCategory>, InventoryServiceError> {
        self.taxonomy.list_sub_categories(category_id).await
    }
}

pub struct CreateSubCategoryUseCase<T: TaxonomyRepository> {
    pub taxonomy: T,
}

impl<T: TaxonomyRepository> CreateSubCategoryUseCase<T> {
    pub async fn execute(
        &self,
        caller: &SessionData,
        category_id: i32,
        name: &str,
    ) -> Result<SubCategory, InventoryServiceError> {
        require_manager(caller)?;
        let name = taxonomy_name(name)?;
        if self.taxonomy.find_category(category_id).await?.is_none() {
            return Err(InventoryServiceError::InvalidCategory);
        }
        if self
            .taxonomy
            .sub_category_name_exists(category_id, &name)
            .await?
        {
            return Err(InventoryServiceError::SubCategoryExists);
        }
        let sub_category = self
            .taxonomy
            .create_sub_category(category_id, &name)
            .await?;
        tracing::info!(
            sub_category_id = sub_category.id,
            category_id,
            name = %sub_category.name,
            "sub-category created"
        );
        Ok(sub_category)
    }
}

/// Trimmed name of 1 to [`MAX_NAME_LEN`] characters.
fn taxonomy_name(raw: &str) -> Result<String, InventoryServiceError> {
    let name = raw.trim();
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(InventoryServiceError::Validation(format!(
            "Name must be between 1 and {MAX_NAME_LEN} characters."
        )));
    }
    Ok(name.to_owned())
}
