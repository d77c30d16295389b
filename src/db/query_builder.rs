use crate::db::membership::{id_patterns, tag_patterns};
use crate::db::pagination::PageRequest;
use crate::entities::{product, product_category};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Query, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};
use strum::{AsRefStr, EnumString};

/// Product columns a listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SortColumn {
    #[default]
    Id,
    Name,
    Price,
    OldPrice,
    Discount,
    Rating,
    CreatedAt,
}

impl SortColumn {
    fn column(self) -> product::Column {
        match self {
            SortColumn::Id => product::Column::Id,
            SortColumn::Name => product::Column::Name,
            SortColumn::Price => product::Column::Price,
            SortColumn::OldPrice => product::Column::OldPrice,
            SortColumn::Discount => product::Column::Discount,
            SortColumn::Rating => product::Column::Rating,
            SortColumn::CreatedAt => product::Column::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

/// Builds the filtered, ordered product query behind the catalog listing.
///
/// Every filter narrows the result (`AND`); the brand, occasion and category
/// filters each match any of their values (`OR`).
#[derive(Debug, Clone)]
pub struct ProductQueryBuilder {
    condition: Condition,
    sort: (SortColumn, SortDirection),
}

impl Default for ProductQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductQueryBuilder {
    pub fn new() -> Self {
        Self {
            condition: Condition::all(),
            sort: (SortColumn::default(), SortDirection::default()),
        }
    }

    /// Inclusive upper bound on `price`.
    pub fn max_price(mut self, ceiling: Decimal) -> Self {
        self.condition = self.condition.add(product::Column::Price.lte(ceiling));
        self
    }

    pub fn gender(mut self, gender: Option<product::Gender>) -> Self {
        if let Some(gender) = gender {
            self.condition = self.condition.add(product::Column::Gender.eq(gender));
        }
        self
    }

    /// Inclusive `[min, max]` bound on `discount`.
    pub fn discount_between(mut self, range: Option<(i32, i32)>) -> Self {
        if let Some((min, max)) = range {
            self.condition = self
                .condition
                .add(product::Column::Discount.between(min, max));
        }
        self
    }

    /// Products whose bracketed `brands` list contains any of `ids`.
    pub fn any_brand(mut self, ids: &[i32]) -> Self {
        if ids.is_empty() {
            return self;
        }
        let mut any = Condition::any();
        for id in ids {
            for pattern in id_patterns(*id) {
                any = any.add(product::Column::Brands.like(pattern.as_str()));
            }
        }
        self.condition = self.condition.add(any);
        self
    }

    /// Products whose comma-joined `occasion` list contains any of `tags` as
    /// a whole member.
    pub fn any_occasion(mut self, tags: &[String]) -> Self {
        if tags.is_empty() {
            return self;
        }
        let mut any = Condition::any();
        for tag in tags {
            any = any.add(product::Column::Occasion.eq(tag.as_str()));
            for pattern in tag_patterns(tag) {
                any = any.add(product::Column::Occasion.like(pattern.as_str()));
            }
        }
        self.condition = self.condition.add(any);
        self
    }

    /// Products linked to any of `ids` through `product_categories`.
    pub fn any_category(mut self, ids: &[i32]) -> Self {
        if ids.is_empty() {
            return self;
        }
        let linked = Query::select()
            .column(product_category::Column::ProductId)
            .from(product_category::Entity)
            .and_where(product_category::Column::CategoryId.is_in(ids.iter().copied()))
            .to_owned();
        self.condition = self
            .condition
            .add(product::Column::Id.in_subquery(linked));
        self
    }

    pub fn sort_by(mut self, column: SortColumn, direction: SortDirection) -> Self {
        self.sort = (column, direction);
        self
    }

    /// Filtered query without ordering, used for counting.
    pub fn filtered(&self) -> Select<product::Entity> {
        let query = product::Entity::find();
        if self.condition.is_empty() {
            query
        } else {
            query.filter(self.condition.clone())
        }
    }

    /// Filtered and ordered query; `id ASC` breaks ties so pages are stable.
    pub fn build(&self) -> Select<product::Entity> {
        let (column, direction) = self.sort;
        let query = self
            .filtered()
            .order_by(column.column(), Order::from(direction));
        if column == SortColumn::Id {
            query
        } else {
            query.order_by_asc(product::Column::Id)
        }
    }

    /// Returns the requested window and the total number of matches.
    pub async fn fetch_page<C>(
        &self,
        db: &C,
        page: PageRequest,
    ) -> Result<(Vec<product::Model>, u64), DbErr>
    where
        C: ConnectionTrait,
    {
        let total = self.filtered().count(db).await?;
        if page.offset() >= total {
            return Ok((Vec::new(), total));
        }
        let items = self
            .build()
            .limit(page.limit())
            .offset(page.offset())
            .all(db)
            .await?;
        Ok((items, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DbBackend, QueryTrait};
    use std::str::FromStr;

    fn sql(builder: &ProductQueryBuilder) -> String {
        builder.build().build(DbBackend::Sqlite).to_string()
    }

    #[test]
    fn sort_column_names_parse() {
        assert_eq!(SortColumn::from_str("old_price").unwrap(), SortColumn::OldPrice);
        assert_eq!(SortColumn::from_str("created_at").unwrap(), SortColumn::CreatedAt);
        assert!(SortColumn::from_str("colors").is_err());
        assert_eq!(SortDirection::from_str("DESC").unwrap(), SortDirection::Desc);
    }

    #[test]
    fn default_order_is_id_ascending() {
        let sql = sql(&ProductQueryBuilder::new());
        assert!(sql.ends_with(r#"ORDER BY "products"."id" ASC"#), "{sql}");
    }

    #[test]
    fn secondary_id_order_is_appended() {
        let sql = sql(&ProductQueryBuilder::new().sort_by(SortColumn::Price, SortDirection::Desc));
        assert!(
            sql.ends_with(r#"ORDER BY "products"."price" DESC, "products"."id" ASC"#),
            "{sql}"
        );
    }

    #[test]
    fn brand_filter_expands_to_four_patterns_per_id() {
        let sql = sql(&ProductQueryBuilder::new().any_brand(&[3, 7]));
        for pattern in ["'[3]'", "'[3,%'", "'%,3]'", "'%,3,%'", "'[7]'", "'%,7,%'"] {
            assert!(sql.contains(pattern), "missing {pattern} in {sql}");
        }
        assert_eq!(sql.matches(" LIKE ").count(), 8);
    }

    #[test]
    fn occasion_filter_uses_exact_and_anchored_patterns() {
        let sql = sql(&ProductQueryBuilder::new().any_occasion(&["party".to_string()]));
        assert!(sql.contains(r#""occasion" = 'party'"#), "{sql}");
        assert!(sql.contains("'party,%'"));
        assert!(sql.contains("'%,party'"));
        assert!(sql.contains("'%,party,%'"));
        assert!(!sql.contains("'%party,%'"));
    }

    #[test]
    fn category_filter_uses_subquery() {
        let sql = sql(&ProductQueryBuilder::new().any_category(&[2, 5]));
        assert!(sql.contains(r#""products"."id" IN (SELECT"#), "{sql}");
        assert!(sql.contains("product_categories"));
    }

    #[test]
    fn empty_filters_add_no_conditions() {
        let sql = sql(
            &ProductQueryBuilder::new()
                .any_brand(&[])
                .any_occasion(&[])
                .any_category(&[])
                .gender(None)
                .discount_between(None),
        );
        assert!(!sql.contains("WHERE"), "{sql}");
    }

    #[test]
    fn price_and_discount_bounds_are_inclusive() {
        let sql = sql(
            &ProductQueryBuilder::new()
                .max_price(dec!(2000))
                .discount_between(Some((6, 10))),
        );
        assert!(sql.contains(r#""products"."price" <= "#), "{sql}");
        assert!(sql.contains(r#""products"."discount" BETWEEN 6 AND 10"#), "{sql}");
    }
}
