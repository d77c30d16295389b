use crate::{
    entities::{brand, category, product_category},
    errors::ServiceError,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::instrument;

/// Brand and category lookups. Nothing is cached; every call reads the store.
#[derive(Clone)]
pub struct LookupService {
    db: Arc<DatabaseConnection>,
}

impl LookupService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list_brands(&self) -> Result<Vec<brand::Model>, ServiceError> {
        Ok(brand::Entity::find()
            .order_by_asc(brand::Column::Name)
            .order_by_asc(brand::Column::Id)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<category::Model>, ServiceError> {
        Ok(category::Entity::find()
            .order_by_asc(category::Column::Name)
            .order_by_asc(category::Column::Id)
            .all(&*self.db)
            .await?)
    }

    /// Maps every requested brand id to its name, or `None` for unknown ids.
    #[instrument(skip(self))]
    pub async fn map_brand_ids_to_names(
        &self,
        brand_ids: &[i32],
    ) -> Result<BTreeMap<i32, Option<String>>, ServiceError> {
        let mut names: BTreeMap<i32, Option<String>> =
            brand_ids.iter().map(|id| (*id, None)).collect();
        if names.is_empty() {
            return Ok(names);
        }

        let found = brand::Entity::find()
            .filter(brand::Column::Id.is_in(names.keys().copied()))
            .all(&*self.db)
            .await?;
        for brand in found {
            names.insert(brand.id, Some(brand.name));
        }
        Ok(names)
    }

    /// Categories (id and name) linked to one product, ordered by name.
    #[instrument(skip(self))]
    pub async fn get_product_categories(
        &self,
        product_id: i32,
    ) -> Result<Vec<category::Model>, ServiceError> {
        Ok(category::Entity::find()
            .inner_join(product_category::Entity)
            .filter(product_category::Column::ProductId.eq(product_id))
            .order_by_asc(category::Column::Name)
            .all(&*self.db)
            .await?)
    }

    /// Category names for each requested product. Every requested id is a key
    /// of the result, with an empty list when it has no categories.
    #[instrument(skip(self))]
    pub async fn get_all_product_categories(
        &self,
        product_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<String>>, ServiceError> {
        let mut by_product: HashMap<i32, Vec<String>> = product_ids
            .iter()
            .map(|id| (*id, Vec::new()))
            .collect();
        if by_product.is_empty() {
            return Ok(by_product);
        }

        let links = product_category::Entity::find()
            .find_also_related(category::Entity)
            .filter(product_category::Column::ProductId.is_in(by_product.keys().copied()))
            .order_by_asc(category::Column::Name)
            .all(&*self.db)
            .await?;

        for (link, category) in links {
            if let (Some(names), Some(category)) =
                (by_product.get_mut(&link.product_id), category)
            {
                names.push(category.name);
            }
        }
        Ok(by_product)
    }
}
