use regex::Regex;
use std::sync::LazyLock;

use crate::models::Product;
use crate::services::Topic;

/// Include/exclude pair for one topic. Both are case-insensitive and run
/// against `title + " " + description`.
#[derive(Debug)]
pub struct RelevanceRule {
    include: Regex,
    exclude: Regex,
}

impl RelevanceRule {
    fn new(include: &str, exclude: &str) -> Self {
        Self {
            include: Regex::new(&format!("(?i){include}")).expect("static include pattern"),
            exclude: Regex::new(&format!("(?i){exclude}")).expect("static exclude pattern"),
        }
    }

    /// Broadened searches skip the exclusion pattern.
    pub fn accepts(&self, text: &str, broaden: bool) -> bool {
        self.include.is_match(text) && (broaden || !self.exclude.is_match(text))
    }
}

struct RuleTable {
    laptop: RelevanceRule,
    headphones: RelevanceRule,
    hubs: RelevanceRule,
    backpacks: RelevanceRule,
    monitors: RelevanceRule,
}

static RULES: LazyLock<RuleTable> = LazyLock::new(|| RuleTable {
    laptop: RelevanceRule::new(
        r"\b(laptops?|notebooks?|chromebooks?|ultrabooks?|macbook|thinkpad|ideapad|zenbook|vivobook|inspiron|pavilion|2-in-1)\b",
        r"\b(sleeves?|cases?|skins?|stickers?|decals?|chargers?|screen protectors?|keyboard covers?|t-?shirts?|hoodies?|shirts?|costumes?|mugs?|posters?)\b",
    ),
    headphones: RelevanceRule::new(
        r"\b(headphones?|headsets?|earbuds?|earphones?|buds)\b",
        r"\b(t-?shirts?|hoodies?|shirts?|cases?|covers?|stands?|hangers?|ear ?pads?|cushions?|stickers?)\b",
    ),
    hubs: RelevanceRule::new(
        r"\b(hubs?|docks?|docking stations?|dongles?|multiport adapters?)\b",
        r"\b(t-?shirts?|hoodies?|shirts?|bikes?|bicycles?|wheels?|hubcaps?|smart home)\b",
    ),
    backpacks: RelevanceRule::new(
        r"\b(backpacks?|rucksacks?|daypacks?|laptop bags?)\b",
        r"\b(keychains?|charms?|t-?shirts?|hoodies?|toys?|plush|lunch ?box(es)?|pencil cases?)\b",
    ),
    monitors: RelevanceRule::new(
        r"\b(monitors?|displays?)\b",
        r"\b(baby monitors?|heart rate|blood pressure|tire pressure|monitor arms?|monitor mounts?|t-?shirts?|hoodies?)\b",
    ),
});

pub fn rule_for(topic: Topic) -> &'static RelevanceRule {
    let table = &*RULES;
    match topic {
        Topic::Laptop => &table.laptop,
        Topic::Headphones => &table.headphones,
        Topic::Hubs => &table.hubs,
        Topic::Backpacks => &table.backpacks,
        Topic::Monitors => &table.monitors,
    }
}

pub fn is_relevant(topic: Topic, product: &Product, broaden: bool) -> bool {
    let text = format!(
        "{} {}",
        product.title,
        product.description.as_deref().unwrap_or("")
    );
    rule_for(topic).accepts(&text, broaden)
}
