use crate::{
    db::{
        membership::{encode_ids, encode_tags},
        transaction::with_transaction,
        Page, PageRequest,
    },
    entities::{category, comment, product, product_category, review},
    errors::ServiceError,
    services::product_filter::ProductFilter,
};
use chrono::Utc;
use metrics::counter;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::{Validate, ValidationError};

/// Product catalog service: listing, lookup and transactional writes
#[derive(Clone)]
pub struct ProductCatalogService {
    db: Arc<DatabaseConnection>,
}

impl ProductCatalogService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists products matching `filter`, one page at a time.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Page<product::Model>, ServiceError> {
        let (items, total) = filter.query().fetch_page(&*self.db, page).await?;
        debug!(total, returned = items.len(), "Listed products");
        Ok(page.page_of(items, total))
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, product_id: i32) -> Result<product::Model, ServiceError> {
        find_product(&*self.db, product_id).await
    }

    /// Creates a product and links its categories in one transaction.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn save_product(&self, input: ProductInput) -> Result<product::Model, ServiceError> {
        input.validate()?;
        let fields = ProductFields::try_from(&input)?;
        let category_ids = dedup(&input.categories);

        let product = with_transaction::<_, product::Model, ServiceError>(&self.db, move |txn| {
            Box::pin(async move {
                ensure_categories_exist(txn, &category_ids).await?;

                let product = product::ActiveModel {
                    id: NotSet,
                    name: Set(fields.name),
                    description: Set(fields.description),
                    price: Set(fields.price),
                    old_price: Set(fields.old_price),
                    discount: Set(fields.discount),
                    rating: Set(fields.rating),
                    colors: Set(fields.colors),
                    gender: Set(fields.gender),
                    image_url: Set(fields.image_url),
                    brands: Set(fields.brands),
                    occasion: Set(fields.occasion),
                    created_at: Set(Utc::now()),
                }
                .insert(txn)
                .await?;

                link_categories(txn, product.id, &category_ids).await?;
                Ok(product)
            })
        })
        .await?;

        counter!("catalog.products.created", 1);
        info!(product_id = product.id, "Created product");
        Ok(product)
    }

    /// Replaces a product's fields and its category links in one transaction.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn update_product(
        &self,
        product_id: i32,
        input: ProductInput,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;
        let fields = ProductFields::try_from(&input)?;
        let category_ids = dedup(&input.categories);

        let product = with_transaction::<_, product::Model, ServiceError>(&self.db, move |txn| {
            Box::pin(async move {
                let existing = find_product(txn, product_id).await?;
                ensure_categories_exist(txn, &category_ids).await?;

                let mut active: product::ActiveModel = existing.into();
                active.name = Set(fields.name);
                active.description = Set(fields.description);
                active.price = Set(fields.price);
                active.old_price = Set(fields.old_price);
                active.discount = Set(fields.discount);
                active.rating = Set(fields.rating);
                active.colors = Set(fields.colors);
                active.gender = Set(fields.gender);
                active.image_url = Set(fields.image_url);
                active.brands = Set(fields.brands);
                active.occasion = Set(fields.occasion);
                let product = active.update(txn).await?;

                product_category::Entity::delete_many()
                    .filter(product_category::Column::ProductId.eq(product_id))
                    .exec(txn)
                    .await?;
                link_categories(txn, product_id, &category_ids).await?;

                Ok(product)
            })
        })
        .await?;

        info!(product_id, "Updated product");
        Ok(product)
    }

    /// Deletes a product together with its category links, reviews and
    /// comments. Nothing is removed unless everything is.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, product_id: i32) -> Result<(), ServiceError> {
        with_transaction::<_, (), ServiceError>(&self.db, move |txn| {
            Box::pin(async move {
                find_product(txn, product_id).await?;

                product_category::Entity::delete_many()
                    .filter(product_category::Column::ProductId.eq(product_id))
                    .exec(txn)
                    .await?;
                review::Entity::delete_many()
                    .filter(review::Column::ProductId.eq(product_id))
                    .exec(txn)
                    .await?;
                comment::Entity::delete_many()
                    .filter(comment::Column::ProductId.eq(product_id))
                    .exec(txn)
                    .await?;
                product::Entity::delete_by_id(product_id).exec(txn).await?;

                Ok(())
            })
        })
        .await?;

        counter!("catalog.products.deleted", 1);
        info!(product_id, "Deleted product");
        Ok(())
    }
}

/// Writable product fields. `price` is not among them: it is always derived
/// from `old_price` and `discount`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductInput {
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub name: String,
    pub description: String,
    #[validate(custom = "validate_non_negative")]
    pub old_price: Decimal,
    #[validate(range(min = 0, max = 100))]
    pub discount: i32,
    #[validate(range(min = 0, max = 5))]
    pub rating: i32,
    pub colors: Vec<String>,
    pub gender: product::Gender,
    #[validate(url)]
    pub image_url: Option<String>,
    pub brands: Vec<i32>,
    pub occasion: Vec<String>,
    pub categories: Vec<i32>,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("must not be negative".into());
        return Err(err);
    }
    Ok(())
}

/// `old_price` reduced by `discount` percent, rounded to cents.
pub fn discounted_price(old_price: Decimal, discount: i32) -> Decimal {
    (old_price - old_price * Decimal::from(discount) / dec!(100)).round_dp(2)
}

/// Column values derived from a validated [`ProductInput`].
struct ProductFields {
    name: String,
    description: String,
    price: Decimal,
    old_price: Decimal,
    discount: i32,
    rating: i32,
    colors: String,
    gender: product::Gender,
    image_url: Option<String>,
    brands: String,
    occasion: String,
}

impl TryFrom<&ProductInput> for ProductFields {
    type Error = ServiceError;

    fn try_from(input: &ProductInput) -> Result<Self, Self::Error> {
        let colors = input
            .colors
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(",");

        Ok(Self {
            name: input.name.trim().to_string(),
            description: input.description.clone(),
            price: discounted_price(input.old_price, input.discount),
            old_price: input.old_price,
            discount: input.discount,
            rating: input.rating,
            colors,
            gender: input.gender,
            image_url: input.image_url.clone().filter(|url| !url.trim().is_empty()),
            brands: encode_ids(input.brands.iter().copied()),
            occasion: encode_tags(&input.occasion)?,
        })
    }
}

async fn find_product<C>(db: &C, product_id: i32) -> Result<product::Model, ServiceError>
where
    C: ConnectionTrait,
{
    product::Entity::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))
}

async fn ensure_categories_exist<C>(db: &C, category_ids: &[i32]) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    if category_ids.is_empty() {
        return Ok(());
    }
    let found = category::Entity::find()
        .filter(category::Column::Id.is_in(category_ids.iter().copied()))
        .count(db)
        .await?;
    if found != category_ids.len() as u64 {
        return Err(ServiceError::InvalidInput(format!(
            "Unknown category in {:?}",
            category_ids
        )));
    }
    Ok(())
}

async fn link_categories<C>(
    db: &C,
    product_id: i32,
    category_ids: &[i32],
) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    if category_ids.is_empty() {
        return Ok(());
    }
    let rows = category_ids
        .iter()
        .map(|category_id| product_category::ActiveModel {
            product_id: Set(product_id),
            category_id: Set(*category_id),
        });
    product_category::Entity::insert_many(rows)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

fn dedup(ids: &[i32]) -> Vec<i32> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}
