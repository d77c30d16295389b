//! Turns the listing's raw query-string values into a typed filter.
//!
//! Empty strings count as absent. Malformed values are rejected with
//! `InvalidInput`, except the sort key, which falls back to `id-asc`.

use crate::db::membership::normalize_tags;
use crate::db::query_builder::{ProductQueryBuilder, SortColumn, SortDirection};
use crate::entities::product::Gender;
use crate::errors::ServiceError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// `column-direction`, e.g. `price-asc` or `created_at-desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Parses a sort key; anything unrecognised sorts by id ascending.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for SortSpec {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ServiceError::InvalidInput(format!("invalid sort key '{s}'"));
        // Column names contain underscores, never hyphens.
        let (column, direction) = s.rsplit_once('-').ok_or_else(invalid)?;
        Ok(Self {
            column: column.parse().map_err(|_| invalid())?,
            direction: direction.parse().map_err(|_| invalid())?,
        })
    }
}

/// Inclusive discount bounds parsed from `lo-hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountRange {
    pub min: i32,
    pub max: i32,
}

impl FromStr for DiscountRange {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            |why: &str| ServiceError::InvalidInput(format!("invalid discount range '{s}': {why}"));
        let (min, max) = s
            .split_once('-')
            .ok_or_else(|| invalid("expected lo-hi"))?;
        let min: i32 = min.trim().parse().map_err(|_| invalid("lower bound is not an integer"))?;
        let max: i32 = max.trim().parse().map_err(|_| invalid("upper bound is not an integer"))?;
        if !(0..=100).contains(&min) || !(0..=100).contains(&max) {
            return Err(invalid("bounds must be between 0 and 100"));
        }
        if min > max {
            return Err(invalid("lower bound exceeds upper bound"));
        }
        Ok(Self { min, max })
    }
}

/// Raw listing parameters as they arrive on the query string.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductFilterParams<'a> {
    pub sort_by: Option<&'a str>,
    pub brand: Option<&'a str>,
    pub price_range_to: Option<&'a str>,
    pub gender: Option<&'a str>,
    pub discount: Option<&'a str>,
    pub occasion: Option<&'a str>,
    pub category: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    pub price_ceiling: Decimal,
    pub gender: Option<Gender>,
    pub discount: Option<DiscountRange>,
    pub brand_ids: Vec<i32>,
    pub occasions: Vec<String>,
    pub category_ids: Vec<i32>,
    pub sort: SortSpec,
}

impl ProductFilter {
    /// No filters beyond the price ceiling; sorted by id.
    pub fn new(price_ceiling: Decimal) -> Self {
        Self {
            price_ceiling,
            gender: None,
            discount: None,
            brand_ids: Vec::new(),
            occasions: Vec::new(),
            category_ids: Vec::new(),
            sort: SortSpec::default(),
        }
    }

    pub fn parse(
        params: ProductFilterParams<'_>,
        default_ceiling: Decimal,
    ) -> Result<Self, ServiceError> {
        let price_ceiling = match present(params.price_range_to) {
            Some(raw) => parse_price(raw)?,
            None => default_ceiling,
        };

        let gender = present(params.gender)
            .map(|raw| {
                Gender::from_str(raw)
                    .map_err(|_| ServiceError::InvalidInput(format!("unknown gender '{raw}'")))
            })
            .transpose()?;

        let discount = present(params.discount)
            .map(DiscountRange::from_str)
            .transpose()?;

        let brand_ids = present(params.brand)
            .map(|raw| parse_id_list(raw, "brand"))
            .transpose()?
            .unwrap_or_default();

        let occasions = match present(params.occasion) {
            Some(raw) => normalize_tags(raw.split(','))?,
            None => Vec::new(),
        };

        let category_ids = present(params.category)
            .map(|raw| parse_id_list(raw, "category"))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            price_ceiling,
            gender,
            discount,
            brand_ids,
            occasions,
            category_ids,
            sort: SortSpec::parse_or_default(present(params.sort_by)),
        })
    }

    pub fn query(&self) -> ProductQueryBuilder {
        ProductQueryBuilder::new()
            .max_price(self.price_ceiling)
            .gender(self.gender)
            .discount_between(self.discount.map(|d| (d.min, d.max)))
            .any_brand(&self.brand_ids)
            .any_occasion(&self.occasions)
            .any_category(&self.category_ids)
            .sort_by(self.sort.column, self.sort.direction)
    }
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_price(raw: &str) -> Result<Decimal, ServiceError> {
    let price = Decimal::from_str(raw)
        .map_err(|_| ServiceError::InvalidInput(format!("invalid price '{raw}'")))?;
    if price.is_sign_negative() {
        return Err(ServiceError::InvalidInput(format!(
            "price must not be negative, got '{raw}'"
        )));
    }
    Ok(price)
}

/// Parses `1,2,3` (brackets and blank members tolerated) into ids.
pub fn parse_id_list(raw: &str, field: &str) -> Result<Vec<i32>, ServiceError> {
    let inner = raw.trim().trim_start_matches('[').trim_end_matches(']');
    let mut ids = Vec::new();
    for member in inner.split(',').map(str::trim).filter(|m| !m.is_empty()) {
        let id = member.parse::<i32>().map_err(|_| {
            ServiceError::InvalidInput(format!("{field} id '{member}' is not an integer"))
        })?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}
