//! CSV rendering of a product list.

use chrono::{DateTime, Utc};

use crate::models::ProductComparison;
use crate::retailers::RetailerRegistry;

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// `price-comparison_<YYYY-MM-DDTHH-MM-SS>.csv`
pub fn export_filename(at: DateTime<Utc>) -> String {
    format!("price-comparison_{}.csv", at.format("%Y-%m-%dT%H-%M-%S"))
}

/// One header row, then one row per product. Every field is quoted.
pub fn products_to_csv(products: &[ProductComparison], registry: &RetailerRegistry) -> String {
    let mut header: Vec<String> = ["No.", "Category", "SKU", "Product Name", "Brand"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for retailer in registry.all() {
        header.push(retailer.name.clone());
        header.push(format!("{} URL", retailer.name));
    }
    header.extend(
        ["Status", "Lowest Price", "Highest Price", "Price Difference %"]
            .iter()
            .map(|s| s.to_string()),
    );

    let mut out = String::new();
    push_row(&mut out, &header);

    for (index, product) in products.iter().enumerate() {
        let mut row = vec![
            (index + 1).to_string(),
            product.display_category().to_string(),
            product.sku.clone(),
            product.display_name().to_string(),
            product.brand.clone(),
        ];
        for retailer in registry.all() {
            let price = product.prices.get(&retailer.id);
            row.push(format_amount(price.and_then(|p| p.valid_price())));
            row.push(
                price
                    .and_then(|p| p.product_url.clone())
                    .unwrap_or_default(),
            );
        }
        row.push(product.status.label().to_string());
        row.push(format_amount(product.lowest_price));
        row.push(format_amount(product.highest_price));
        row.push(
            product
                .price_difference_percent
                .map(|d| format!("{d:.2}"))
                .unwrap_or_default(),
        );
        push_row(&mut out, &row);
    }

    out
}

fn push_row(out: &mut String, fields: &[String]) {
    let line = fields
        .iter()
        .map(|field| format!("\"{}\"", field.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&line);
    out.push_str("\r\n");
}

/// Thousands separators, at most two decimals, `-` when absent.
pub fn format_amount(amount: Option<f64>) -> String {
    let Some(amount) = amount.filter(|a| a.is_finite()) else {
        return "-".to_string();
    };

    let cents = (amount.abs() * 100.0).round() as u64;
    let (whole, fraction) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    match fraction {
        0 => format!("{sign}{grouped}"),
        f if f % 10 == 0 => format!("{sign}{grouped}.{}", f / 10),
        f => format!("{sign}{grouped}.{f:02}"),
    }
}
