pub mod filter;
pub mod swipe;

pub use filter::{filter_and_sort, FeedFilter, FeedView};
pub use swipe::{
    neighbours, slot_offset, CardSlot, FeedCursor, GestureState, SlotOffset, SwipeController,
    SwipeOutcome, WrapPolicy, DEFAULT_SWIPE_THRESHOLD,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tags an employer can attach to a vacancy, in the order the filter bar shows them.
pub const TAG_CATALOG: [&str; 6] = [
    "Rotational",
    "Part-time",
    "Daily pay",
    "No experience",
    "Experienced",
    "For students",
];

/// Employer subscription tier. Only used for ordering and the card badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EmployerTier {
    Free,
    Econom,
    Vip,
    Premium,
}

impl EmployerTier {
    /// Feed ordering rank, higher first
    pub fn rank(self) -> u8 {
        match self {
            EmployerTier::Premium => 3,
            EmployerTier::Vip => 2,
            EmployerTier::Econom => 1,
            EmployerTier::Free => 0,
        }
    }

    pub fn badge(self) -> Option<&'static str> {
        match self {
            EmployerTier::Premium => Some("👑"),
            EmployerTier::Vip => Some("⭐"),
            EmployerTier::Econom | EmployerTier::Free => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EmployerTier::Free => "FREE",
            EmployerTier::Econom => "ECONOM",
            EmployerTier::Vip => "VIP",
            EmployerTier::Premium => "PREMIUM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VacancyStatus {
    Pending,
    Published,
    Rejected,
}

/// Where a vacancy came from. Decides how refreshes merge into the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// Entered locally and kept in the cache file
    #[default]
    #[serde(rename = "manual")]
    Manual,
    /// Imported from the external job board feed
    #[serde(rename = "avito")]
    ExternalFeed,
    /// Published through the listing service
    #[serde(rename = "database")]
    Database,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacancyItem {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Always written, as `null` when absent; cache files without the key
    /// are from the older layout
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub employer_name: String,
    pub employer_tier: EmployerTier,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: VacancyStatus,
    #[serde(default)]
    pub source: Provenance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl VacancyItem {
    pub fn is_published(&self) -> bool {
        self.status == VacancyStatus::Published
    }

    /// Text fields the search box looks at; missing ones read as empty
    pub fn searchable_fields(&self) -> [&str; 6] {
        [
            self.title.as_str(),
            self.description.as_deref().unwrap_or(""),
            self.requirements.as_deref().unwrap_or(""),
            self.responsibilities.as_deref().unwrap_or(""),
            self.experience.as_deref().unwrap_or(""),
            self.schedule.as_deref().unwrap_or(""),
        ]
    }

    pub fn has_any_tag<'a, I>(&self, wanted: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        wanted.into_iter().any(|tag| self.tags.contains(tag))
    }
}
