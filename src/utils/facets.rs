use std::collections::BTreeSet;

use crate::models::Product;

/// Distinct non-empty brands, sorted ascending.
pub fn brand_facets(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .map(|p| p.brand.as_str())
        .filter(|b| !b.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn filter_brands(products: Vec<Product>, allowed: &[String]) -> Vec<Product> {
    products
        .into_iter()
        .filter(|p| allowed.iter().any(|b| b == &p.brand))
        .collect()
}
