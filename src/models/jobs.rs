use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestSummary {
    pub ok: bool,
    pub groups: usize,
    pub emails_sent: usize,
    pub failures: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchCheckSummary {
    pub ok: bool,
    pub checked: usize,
    pub alerts: usize,
    pub failures: usize,
}
