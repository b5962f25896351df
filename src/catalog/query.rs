use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{PriceStatus, ProductComparison, RetailerId};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Name,
    Sku,
    Category,
    Brand,
    Price,
    Status,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// List request shared by the catalog contract and the merged product list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    /// Case-insensitive match on name, SKU, brand or category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Exact match on the English or Thai category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PriceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl ProductListQuery {
    /// `(page, page_size)` with defaults applied and bounds enforced.
    pub fn normalize(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, page_size)
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    pub fn matches(&self, product: &ProductComparison) -> bool {
        if let Some(term) = self.search_term() {
            let hit = [&product.name, &product.sku, &product.brand, &product.category]
                .iter()
                .any(|field| field.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }

        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if product.category != category && product.category_th.as_deref() != Some(category) {
                return false;
            }
        }

        if let Some(brand) = self.brand.as_deref().filter(|b| !b.is_empty()) {
            if product.brand != brand {
                return false;
            }
        }

        match self.status {
            Some(status) => product.status == status,
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u64, page_size: u64, total: u64) -> Self {
        Self {
            page,
            page_size,
            total,
            total_pages: total.div_ceil(page_size.max(1)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Facets {
    pub categories: Vec<FilterOption>,
    pub brands: Vec<FilterOption>,
}

impl Facets {
    pub fn from_products(products: &[ProductComparison]) -> Self {
        let mut facets = Facets::default();
        for product in products {
            bump(&mut facets.categories, product.display_category(), 1);
            bump(&mut facets.brands, &product.brand, 1);
        }
        facets
    }

    /// Adds `other`'s counts to this one. Values keep first-appearance order.
    pub fn merge(mut self, other: Facets) -> Self {
        for option in other.categories {
            bump(&mut self.categories, &option.value, option.count);
        }
        for option in other.brands {
            bump(&mut self.brands, &option.value, option.count);
        }
        self
    }
}

fn bump(options: &mut Vec<FilterOption>, value: &str, count: u64) {
    match options.iter_mut().find(|o| o.value == value) {
        Some(option) => option.count += count,
        None => options.push(FilterOption {
            value: value.to_string(),
            label: value.to_string(),
            count,
        }),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_products: u64,
    pub cheapest_count: u64,
    pub higher_count: u64,
    pub same_count: u64,
    pub unavailable_count: u64,
}

impl Summary {
    pub fn from_products(products: &[ProductComparison]) -> Self {
        let mut summary = Summary::default();
        for product in products {
            summary.total_products += 1;
            match product.status {
                PriceStatus::Cheapest => summary.cheapest_count += 1,
                PriceStatus::Higher => summary.higher_count += 1,
                PriceStatus::Same => summary.same_count += 1,
                PriceStatus::Unavailable => summary.unavailable_count += 1,
            }
        }
        summary
    }

    pub fn merge(self, other: Summary) -> Self {
        Self {
            total_products: self.total_products + other.total_products,
            cheapest_count: self.cheapest_count + other.cheapest_count,
            higher_count: self.higher_count + other.higher_count,
            same_count: self.same_count + other.same_count,
            unavailable_count: self.unavailable_count + other.unavailable_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<ProductComparison>,
    pub pagination: Pagination,
    pub filters: Facets,
    pub summary: Summary,
}

/// Stable sort by the requested key. Text keys compare lowercased, price
/// compares the primary retailer's price (absent counts as 0). Descending
/// reverses the comparator, so equal keys keep their incoming order.
pub fn sort_products(
    products: &mut [ProductComparison],
    sort_by: SortBy,
    order: SortOrder,
    primary: &RetailerId,
) {
    products.sort_by(|a, b| {
        let ordering = compare_by(a, b, sort_by, primary);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn compare_by(a: &ProductComparison, b: &ProductComparison, sort_by: SortBy, primary: &RetailerId) -> Ordering {
    match sort_by {
        SortBy::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortBy::Sku => a.sku.to_lowercase().cmp(&b.sku.to_lowercase()),
        SortBy::Category => a.category.to_lowercase().cmp(&b.category.to_lowercase()),
        SortBy::Brand => a.brand.to_lowercase().cmp(&b.brand.to_lowercase()),
        SortBy::Price => {
            let pa = a.price_of(primary).unwrap_or(0.0);
            let pb = b.price_of(primary).unwrap_or(0.0);
            pa.total_cmp(&pb)
        }
        SortBy::Status => a.status.cmp(&b.status),
    }
}

/// Filters, sorts and cuts one page out of `universe`. Facets and summary
/// describe the whole unfiltered universe.
pub fn list_products(
    universe: &[ProductComparison],
    query: &ProductListQuery,
    primary: &RetailerId,
) -> ProductListResponse {
    let mut matching: Vec<ProductComparison> = universe
        .iter()
        .filter(|p| query.matches(p))
        .cloned()
        .collect();
    sort_products(
        &mut matching,
        query.sort_by.unwrap_or_default(),
        query.sort_order.unwrap_or_default(),
        primary,
    );

    let (page, page_size) = query.normalize();
    let pagination = Pagination::new(page, page_size, matching.len() as u64);

    ProductListResponse {
        products: page_of(matching, page, page_size),
        pagination,
        filters: Facets::from_products(universe),
        summary: Summary::from_products(universe),
    }
}

pub fn page_of<T>(items: Vec<T>, page: u64, page_size: u64) -> Vec<T> {
    let start = (page.saturating_sub(1)).saturating_mul(page_size);
    items
        .into_iter()
        .skip(usize::try_from(start).unwrap_or(usize::MAX))
        .take(usize::try_from(page_size).unwrap_or(usize::MAX))
        .collect()
}

/// Usable prices of a product keyed by retailer.
pub fn price_map(product: &ProductComparison) -> BTreeMap<RetailerId, Option<f64>> {
    product
        .prices
        .iter()
        .map(|(id, p)| (id.clone(), p.valid_price()))
        .collect()
}
