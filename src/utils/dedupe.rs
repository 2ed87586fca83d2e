use std::collections::HashSet;

use crate::models::Product;

pub fn dedupe_key(product: &Product) -> String {
    format!(
        "{}|{}|{}",
        product.title.to_lowercase(),
        product.brand.to_lowercase(),
        product.price.amount.round() as i64
    )
}

/// Keeps the first product seen for each title/brand/rounded-price key.
pub fn dedupe_products(products: Vec<Product>) -> Vec<Product> {
    let mut seen = HashSet::with_capacity(products.len());
    products
        .into_iter()
        .filter(|p| seen.insert(dedupe_key(p)))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::test_support::product;
    use super::*;

    #[test]
    fn collapses_case_insensitive_title_and_brand_with_same_rounded_price() {
        let list = vec![
            product("a", "ThinkPad E14", "Lenovo", 649.4),
            product("b", "thinkpad e14", "LENOVO", 648.6),
        ];
        let out = dedupe_products(list);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "a");
    }

    #[test]
    fn different_rounded_prices_are_distinct() {
        let list = vec![
            product("a", "ThinkPad E14", "Lenovo", 649.4),
            product("b", "ThinkPad E14", "Lenovo", 650.6),
        ];
        assert_eq!(dedupe_products(list).len(), 2);
    }

    #[test]
    fn preserves_first_seen_order_and_is_idempotent() {
        let list = vec![
            product("a", "Hub", "Anker", 30.0),
            product("b", "Monitor", "Dell", 129.0),
            product("c", "hub", "anker", 30.2),
            product("d", "Backpack", "", 49.0),
            product("e", "Monitor", "Dell", 129.0),
        ];
        let once = dedupe_products(list);
        let ids: Vec<&str> = once.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "d"]);

        let twice = dedupe_products(once.clone());
        assert_eq!(twice, once);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(dedupe_products(Vec::new()).is_empty());
    }
}
