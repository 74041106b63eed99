//! Event category model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A category events can be filed under (Music, Tech, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// Bootstrap icon class (e.g. bi-music-note).
    pub icon: Option<String>,
}
