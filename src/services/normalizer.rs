use serde_json::Value;

use crate::models::{Price, Product, Specs};
use crate::utils::{WhyFn, MAX_WHY};

/// Turns untrusted provider records into [`Product`]s. Every field lookup
/// tries the provider-specific name first, then a generic alias, then a
/// safe default.
#[derive(Clone)]
pub struct Normalizer {
    default_currency: String,
    why: WhyFn,
}

impl Normalizer {
    pub fn new(default_currency: impl Into<String>, why: WhyFn) -> Self {
        Self {
            default_currency: default_currency.into(),
            why,
        }
    }

    pub fn normalize(&self, raw: &Value) -> Product {
        let title = text_field(raw, &["title", "name"]);
        let description = text_field(raw, &["description"]);

        let currency = raw
            .get("price")
            .and_then(|p| p.get("currency"))
            .and_then(Value::as_str)
            .filter(|c| !c.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.default_currency.clone());

        let mut why = key_features(raw);
        if why.is_empty() {
            why = (self.why)(&title, &description);
        }
        why.truncate(MAX_WHY);

        let specs = raw.get("specs");
        Product {
            id: text_field(raw, &["id", "product_id"]),
            brand: text_field(raw, &["brand_name", "brand"]),
            price: Price {
                currency,
                amount: extract_price(raw).unwrap_or(0.0),
            },
            image: text_field(raw, &["image_url", "image"]),
            url: text_field(raw, &["deeplink_url", "url"]),
            specs: Specs {
                screen: specs.map(|s| text_field(s, &["screen"])).unwrap_or_default(),
                os: specs.map(|s| text_field(s, &["os"])).unwrap_or_default(),
                weight_kg: specs
                    .and_then(|s| s.get("weightKg").or_else(|| s.get("weight_kg")))
                    .and_then(coerce_number)
                    .filter(|w| *w > 0.0),
            },
            why,
            description: Some(description).filter(|d| !d.is_empty()),
            title,
        }
    }
}

/// Current price of a raw record: `price.price`, `price.amount`, or a bare
/// number/numeric string. Negative or non-finite values count as missing.
pub fn extract_price(raw: &Value) -> Option<f64> {
    let amount = match raw.get("price")? {
        Value::Object(obj) => obj
            .get("price")
            .or_else(|| obj.get("amount"))
            .and_then(coerce_number),
        other => coerce_number(other),
    };
    amount.filter(|a| a.is_finite() && *a >= 0.0)
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_amount(s),
        _ => None,
    }
}

/// Parses a formatted price such as `$1,299.00` or `1.299,00 €`. The last
/// separator is the decimal mark when both kinds appear. A lone separator
/// followed by exactly three digits, or a repeated one, groups thousands.
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    let decimal = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) => Some(if dot > comma { '.' } else { ',' }),
        (Some(at), None) => single_decimal(&cleaned, '.', at),
        (None, Some(at)) => single_decimal(&cleaned, ',', at),
        (None, None) => None,
    };
    cleaned
        .chars()
        .filter_map(|c| match c {
            '.' | ',' if Some(c) == decimal => Some('.'),
            '.' | ',' => None,
            other => Some(other),
        })
        .collect::<String>()
        .parse()
        .ok()
}

fn single_decimal(cleaned: &str, sep: char, at: usize) -> Option<char> {
    let fraction_digits = cleaned.len() - at - 1;
    (cleaned.matches(sep).count() == 1 && fraction_digits != 3).then_some(sep)
}

/// First non-empty string (or number rendered as text) among `keys`.
fn text_field(raw: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| match raw.get(*key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .next()
        .unwrap_or_default()
}

fn key_features(raw: &Value) -> Vec<String> {
    raw.get("key_features")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
