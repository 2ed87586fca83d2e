pub const ANY_SCREEN: &str = "Any";
pub const ANY_OS: &str = "Any OS";
pub const LAPTOP_SPEC_SUFFIX: &str = ">=16GB RAM preferred, SSD, long battery, 2023+";
pub const BROADEN_SUFFIX: &str = "best value";
pub const OPEN_MAX_PRICE: f64 = 99999.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Topic {
    Laptop,
    Headphones,
    Hubs,
    Backpacks,
    Monitors,
}

impl Topic {
    /// Unknown or empty tags fall back to [`Topic::Laptop`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "headphones" => Topic::Headphones,
            "hubs" => Topic::Hubs,
            "backpacks" => Topic::Backpacks,
            "monitors" => Topic::Monitors,
            _ => Topic::Laptop,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Laptop => "laptop",
            Topic::Headphones => "headphones",
            Topic::Hubs => "hubs",
            Topic::Backpacks => "backpacks",
            Topic::Monitors => "monitors",
        }
    }

    pub fn phrase(&self) -> &'static str {
        match self {
            Topic::Laptop => "student laptop",
            Topic::Headphones => "noise-canceling headphones",
            Topic::Hubs => "USB-C hub",
            Topic::Backpacks => "student laptop backpack",
            Topic::Monitors => "budget 24-inch monitor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBand {
    pub min: f64,
    pub max: f64,
}

impl PriceBand {
    pub const OPEN: PriceBand = PriceBand {
        min: 0.0,
        max: OPEN_MAX_PRICE,
    };

    /// Finite explicit bounds replace the label-derived ones.
    pub fn with_overrides(self, min: Option<f64>, max: Option<f64>) -> Self {
        PriceBand {
            min: min.filter(|v| v.is_finite()).unwrap_or(self.min),
            max: max.filter(|v| v.is_finite()).unwrap_or(self.max),
        }
    }

    /// Band as sent upstream: `min >= 0` and `max >= min`.
    pub fn sanitized(self) -> Self {
        let min = self.min.max(0.0);
        PriceBand {
            min,
            max: self.max.max(min),
        }
    }
}

/// Maps a budget label to its price band. Dollar and euro spellings and an
/// ASCII hyphen in place of the en dash are treated alike.
pub fn budget_band(label: &str) -> PriceBand {
    let normalized = label
        .trim()
        .replace('€', "$")
        .replace('-', "–")
        .replace(" – ", "–")
        .to_lowercase();
    match normalized.as_str() {
        "under $500" => PriceBand { min: 0.0, max: 500.0 },
        "$500–$900" => PriceBand {
            min: 500.0,
            max: 900.0,
        },
        "$900–$1400" => PriceBand {
            min: 900.0,
            max: 1400.0,
        },
        _ => PriceBand::OPEN,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub topic: Topic,
    pub query: String,
    pub band: PriceBand,
}

#[derive(Debug, Clone, Copy)]
pub struct QueryInputs<'a> {
    pub topic: Topic,
    pub budget: &'a str,
    pub screen: &'a str,
    pub os: &'a str,
    pub broaden: bool,
}

/// Derives the free-text query and the label price band. No I/O.
pub fn build_query(inputs: QueryInputs<'_>) -> QueryPlan {
    let mut parts = vec![inputs.topic.phrase().to_string()];

    if inputs.broaden {
        parts.push(BROADEN_SUFFIX.to_string());
    } else if inputs.topic == Topic::Laptop {
        let os = inputs.os.trim();
        if !os.is_empty() && os != ANY_OS {
            parts.push(os.to_string());
        }
        let screen = inputs.screen.trim();
        if !screen.is_empty() && screen != ANY_SCREEN {
            parts.push(format!("{screen} inch"));
        }
        parts.push(LAPTOP_SPEC_SUFFIX.to_string());
    }

    QueryPlan {
        topic: inputs.topic,
        query: parts.join(" "),
        band: budget_band(inputs.budget),
    }
}
