//! Merges the remote catalog with manual products into the list and detail
//! views the dashboard shows.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::catalog::{
    CatalogError, CatalogSource, Facets, MAX_PAGE_SIZE, Pagination, ProductListQuery, Summary,
    page_of, price_map, sort_products,
};
use crate::models::{
    MatchType, MatchedProduct, PriceCategory, PriceHistoryPoint, ProductComparison, ProductId,
    RetailerId, RetailerMatch, ValidationStatus, matched_product_id,
};
use crate::retailers::RetailerRegistry;
use crate::stores::{ManualProductStore, ValidationStore};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceCell {
    pub price: Option<f64>,
    pub product_url: Option<String>,
    pub category: Option<PriceCategory>,
    /// The matched product behind this cell was judged incorrect.
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRow {
    #[serde(flatten)]
    pub product: ProductComparison,
    pub is_manual: bool,
    pub cells: BTreeMap<RetailerId, PriceCell>,
}

impl ProductRow {
    pub fn new(product: ProductComparison, statuses: Option<&BTreeMap<String, ValidationStatus>>) -> Self {
        let categories = product.price_categories();
        let cells = product
            .prices
            .iter()
            .map(|(retailer, price)| {
                let hidden = statuses
                    .and_then(|s| s.get(&matched_product_id(retailer, &product.sku)))
                    .is_some_and(|status| *status == ValidationStatus::Incorrect);
                let cell = PriceCell {
                    price: price.valid_price(),
                    product_url: price.product_url.clone(),
                    category: categories.get(retailer).copied().flatten(),
                    hidden,
                };
                (retailer.clone(), cell)
            })
            .collect();

        Self {
            is_manual: product.id.is_manual(),
            product,
            cells,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductListView {
    pub products: Vec<ProductRow>,
    pub pagination: Pagination,
    pub filters: Facets,
    pub summary: Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailView {
    pub product: ProductComparison,
    pub is_manual: bool,
    pub price_history: Vec<PriceHistoryPoint>,
    pub matched_products: Vec<RetailerMatch>,
    pub has_hidden_products: bool,
    pub hidden_count: usize,
}

/// Every product matching a query across both sources, plus the facets and
/// summary of the unfiltered universe.
#[derive(Debug, Clone)]
pub struct MergedProducts {
    pub products: Vec<ProductComparison>,
    pub filters: Facets,
    pub summary: Summary,
}

#[derive(Clone)]
pub struct Reconciler {
    catalog: Arc<dyn CatalogSource>,
    manual: ManualProductStore,
    validation: ValidationStore,
    registry: Arc<RetailerRegistry>,
}

impl Reconciler {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        manual: ManualProductStore,
        validation: ValidationStore,
        registry: Arc<RetailerRegistry>,
    ) -> Self {
        Self {
            catalog,
            manual,
            validation,
            registry,
        }
    }

    /// Filtered and sorted merge of manual products (first) and every catalog
    /// page matching the query. A catalog failure fails the whole merge.
    pub async fn merged(&self, query: &ProductListQuery) -> Result<MergedProducts, CatalogError> {
        let (catalog_products, catalog_filters, catalog_summary) = self.fetch_catalog(query).await?;
        let manual_products = self.manual.get_all().await;

        let filters = Facets::from_products(&manual_products).merge(catalog_filters);
        let summary = Summary::from_products(&manual_products).merge(catalog_summary);

        let mut products: Vec<ProductComparison> = manual_products
            .into_iter()
            .chain(catalog_products)
            .filter(|p| query.matches(p))
            .collect();
        sort_products(
            &mut products,
            query.sort_by.unwrap_or_default(),
            query.sort_order.unwrap_or_default(),
            &self.registry.primary().id,
        );

        Ok(MergedProducts {
            products,
            filters,
            summary,
        })
    }

    pub async fn list(&self, query: &ProductListQuery) -> Result<ProductListView, CatalogError> {
        let merged = self.merged(query).await?;
        let (page, page_size) = query.normalize();
        let pagination = Pagination::new(page, page_size, merged.products.len() as u64);

        let statuses = self.validation.get_all_statuses_across_products().await;
        let products = page_of(merged.products, page, page_size)
            .into_iter()
            .map(|product| {
                let product_statuses = statuses.get(&product.id);
                ProductRow::new(product, product_statuses)
            })
            .collect();

        Ok(ProductListView {
            products,
            pagination,
            filters: merged.filters,
            summary: merged.summary,
        })
    }

    /// `None` when neither source knows the id.
    pub async fn detail(&self, id: &ProductId) -> Result<Option<ProductDetailView>, CatalogError> {
        let (product, price_history, matches) = match id {
            ProductId::Manual(_) => {
                let Some(product) = self.manual.get_by_id(id).await else {
                    return Ok(None);
                };
                let history = vec![PriceHistoryPoint {
                    date: Utc::now(),
                    prices: price_map(&product),
                }];
                let matches = self.manual_matches(&product);
                (product, history, matches)
            }
            ProductId::Catalog(raw) => {
                let detail = match self.catalog.detail(raw).await {
                    Ok(detail) => detail,
                    Err(CatalogError::NotFound(_)) => return Ok(None),
                    Err(err) => return Err(err),
                };
                let matches = detail
                    .matched_products
                    .into_iter()
                    .map(|entry| entry.into_multi())
                    .collect();
                (detail.product, detail.price_history, matches)
            }
        };

        let statuses = self.validation.get_all_statuses(id).await;
        let (matched_products, hidden_count) = apply_validation(matches, &statuses);

        Ok(Some(ProductDetailView {
            is_manual: id.is_manual(),
            product,
            price_history,
            matched_products,
            has_hidden_products: hidden_count > 0,
            hidden_count,
        }))
    }

    async fn fetch_catalog(
        &self,
        query: &ProductListQuery,
    ) -> Result<(Vec<ProductComparison>, Facets, Summary), CatalogError> {
        let mut products = Vec::new();
        let mut filters = Facets::default();
        let mut summary = Summary::default();
        let mut page = 1;

        loop {
            let page_query = ProductListQuery {
                page: Some(page),
                page_size: Some(MAX_PAGE_SIZE),
                ..query.clone()
            };
            let response = self.catalog.list(&page_query).await?;
            if page == 1 {
                filters = response.filters;
                summary = response.summary;
            }

            let fetched = response.products.len();
            products.extend(response.products);
            if fetched == 0 || page >= response.pagination.total_pages {
                break;
            }
            page += 1;
        }

        tracing::debug!(count = products.len(), pages = page, "catalog fetched");
        Ok((products, filters, summary))
    }

    /// One exact, fully confident match per competitor that has a price.
    fn manual_matches(&self, product: &ProductComparison) -> Vec<RetailerMatch> {
        self.registry
            .competitors()
            .filter_map(|info| {
                let price = product.prices.get(&info.id)?;
                let amount = price.valid_price()?;
                Some(RetailerMatch {
                    retailer: info.id.clone(),
                    confidence: 100,
                    match_type: MatchType::Exact,
                    products: vec![MatchedProduct {
                        id: matched_product_id(&info.id, &product.sku),
                        name: product.name.clone(),
                        sku: product.sku.clone(),
                        image_url: product.image_url.clone(),
                        price: amount,
                        url: price.product_url.clone().unwrap_or_default(),
                        description: product.description.clone(),
                        brand: Some(product.brand.clone()),
                        category: Some(product.category.clone()),
                        validation_status: None,
                        is_manual_entry: true,
                    }],
                })
            })
            .collect()
    }
}

/// Stamps each matched product with its judgment and removes the ones judged
/// incorrect. Retailers left without products are dropped. Returns the
/// visible matches and how many products were removed.
pub fn apply_validation(
    matches: Vec<RetailerMatch>,
    statuses: &BTreeMap<String, ValidationStatus>,
) -> (Vec<RetailerMatch>, usize) {
    let mut hidden = 0;
    let visible = matches
        .into_iter()
        .filter_map(|mut group| {
            group.products = group
                .products
                .into_iter()
                .map(|mut product| {
                    product.validation_status =
                        Some(statuses.get(&product.id).copied().unwrap_or_default());
                    product
                })
                .filter(|product| {
                    let keep = product.validation_status != Some(ValidationStatus::Incorrect);
                    if !keep {
                        hidden += 1;
                    }
                    keep
                })
                .collect();
            (!group.products.is_empty()).then_some(group)
        })
        .collect();
    (visible, hidden)
}
