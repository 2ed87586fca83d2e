use crate::models::Product;

pub const DIGEST_SUBJECT: &str = "Student Tech: weekly picks";
pub const PRICE_DROP_SUBJECT: &str = "Price dropped";

pub fn digest_body(picks: &[Product]) -> String {
    let mut lines = vec!["Top picks this week:".to_string()];
    for p in picks {
        let brand = if p.brand.is_empty() {
            String::new()
        } else {
            format!(" ({})", p.brand)
        };
        lines.push(format!(
            "- {}: {} {:.2}{}\n  {}",
            p.title, p.price.currency, p.price.amount, brand, p.url
        ));
    }
    lines.join("\n")
}

pub fn price_drop_body(title: &str, price: f64, currency: &str, link: &str) -> String {
    let name = if title.is_empty() {
        "Your watched item"
    } else {
        title
    };
    let mut body = format!("{} dropped to {} {:.2}.", name, currency, price);
    if !link.is_empty() {
        body.push_str(&format!("\nOpen product: {}", link));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::dedupe::test_support::product;

    #[test]
    fn digest_lists_every_pick() {
        let picks = vec![
            product("a", "ThinkPad E14", "Lenovo", 649.0),
            product("b", "Generic hub", "", 19.5),
        ];
        let body = digest_body(&picks);
        assert!(body.starts_with("Top picks this week:"));
        assert!(body.contains("- ThinkPad E14: USD 649.00 (Lenovo)"));
        assert!(body.contains("- Generic hub: USD 19.50\n"));
    }

    #[test]
    fn price_drop_mentions_price_and_link() {
        let body = price_drop_body("", 399.0, "USD", "https://shop.test/p");
        assert_eq!(
            body,
            "Your watched item dropped to USD 399.00.\nOpen product: https://shop.test/p"
        );
    }
}
