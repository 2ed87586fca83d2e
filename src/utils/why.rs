use regex::Regex;
use std::sync::LazyLock;

pub const MAX_WHY: usize = 6;

/// Signature of the "why this pick" inference used by the search pipeline.
pub type WhyFn = fn(&str, &str) -> Vec<String>;

static WHY_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\b(16|32|64)\s?gb\b", "16GB+ RAM"),
        (r"\b(ssd|nvme)\b", "Fast SSD storage"),
        (r"\bbattery\b", "Long battery life"),
        (r"\b(lightweight|ultralight|thin and light)\b", "Lightweight"),
        (r"\b(noise[- ]cancel\w*|anc)\b", "Active noise cancelling"),
        (r"\b(usb[- ]?c|thunderbolt)\b", "USB-C connectivity"),
        (r"\b(power delivery|pass[- ]?through)\b", "Power delivery pass-through"),
        (r"\bbacklit\b", "Backlit keyboard"),
        (r"\b(ips|oled)\b", "IPS/OLED display"),
        (r"\b(120|144|165)\s?hz\b", "High refresh rate"),
        (r"\b4k\b", "4K resolution"),
        (r"\b(water[- ]?resistant|waterproof)\b", "Water resistant"),
        (r"\bwarranty\b", "Includes warranty"),
    ]
    .into_iter()
    .filter_map(|(pattern, tag)| {
        Regex::new(&format!("(?i){pattern}"))
            .ok()
            .map(|re| (re, tag))
    })
    .collect()
});

/// Keyword sniffing over title and description. Approximate by nature; the
/// result is ordered by rule and capped at [`MAX_WHY`].
pub fn infer_why(title: &str, description: &str) -> Vec<String> {
    let haystack = format!("{title} {description}");
    WHY_RULES
        .iter()
        .filter(|(re, _)| re.is_match(&haystack))
        .map(|(_, tag)| (*tag).to_string())
        .take(MAX_WHY)
        .collect()
}
