//! Vacancy sources: the raw, unfiltered collection the feed is built from
//!
//! Locally entered vacancies live in a JSON cache file. Remote batches are
//! merged in by provenance and kept for the session only.

use crate::domain::{EmployerTier, Provenance, VacancyItem, VacancyStatus};
use crate::error::{JobswpError, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Repository of vacancies the feed reads from.
///
/// `revision` changes whenever the contents change, so consumers can tell a
/// new list from the one they already derived state from.
pub trait VacancySource {
    fn list(&self) -> &[VacancyItem];

    fn revision(&self) -> u64;

    /// Adds an item; ids must be unique
    fn append(&mut self, item: VacancyItem) -> Result<()>;

    /// Removes by id, returning whether anything was removed
    fn remove(&mut self, id: &str) -> Result<bool>;

    /// Drops every item of `provenance` and puts `items` in their place
    fn replace_provenance(&mut self, provenance: Provenance, items: Vec<VacancyItem>)
        -> Result<()>;

    /// Appends the items whose id is not present yet, returning how many
    fn merge_new(&mut self, items: Vec<VacancyItem>) -> Result<usize>;
}

/// Ordered list with the merge rules shared by every source
#[derive(Debug, Default, Clone)]
struct VacancyList {
    items: Vec<VacancyItem>,
    revision: u64,
}

impl VacancyList {
    fn new(items: Vec<VacancyItem>) -> Self {
        Self { items, revision: 0 }
    }

    fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|v| v.id == id)
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    fn append(&mut self, item: VacancyItem) -> Result<()> {
        if self.contains(&item.id) {
            return Err(JobswpError::DuplicateVacancy(item.id));
        }
        self.items.push(item);
        self.bump();
        Ok(())
    }

    fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|v| v.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.bump();
        }
        removed
    }

    fn replace_provenance(&mut self, provenance: Provenance, items: Vec<VacancyItem>) {
        let mut merged: Vec<VacancyItem> = self
            .items
            .iter()
            .filter(|v| v.source != provenance)
            .cloned()
            .collect();

        let mut seen: HashSet<String> = merged.iter().map(|v| v.id.clone()).collect();
        for mut item in items {
            if !seen.insert(item.id.clone()) {
                tracing::warn!(id = %item.id, ?provenance, "skipping vacancy with duplicate id");
                continue;
            }
            item.source = provenance;
            merged.push(item);
        }

        if merged != self.items {
            self.items = merged;
            self.bump();
        }
    }

    fn merge_new(&mut self, items: Vec<VacancyItem>) -> usize {
        let mut seen: HashSet<String> = self.items.iter().map(|v| v.id.clone()).collect();
        let mut added = 0;
        for item in items {
            if seen.insert(item.id.clone()) {
                self.items.push(item);
                added += 1;
            }
        }
        if added > 0 {
            self.bump();
        }
        added
    }
}

/// Source held entirely in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    list: VacancyList,
}

impl MemorySource {
    pub fn new(items: Vec<VacancyItem>) -> Self {
        Self {
            list: VacancyList::new(items),
        }
    }
}

impl VacancySource for MemorySource {
    fn list(&self) -> &[VacancyItem] {
        &self.list.items
    }

    fn revision(&self) -> u64 {
        self.list.revision
    }

    fn append(&mut self, item: VacancyItem) -> Result<()> {
        self.list.append(item)
    }

    fn remove(&mut self, id: &str) -> Result<bool> {
        Ok(self.list.remove(id))
    }

    fn replace_provenance(
        &mut self,
        provenance: Provenance,
        items: Vec<VacancyItem>,
    ) -> Result<()> {
        self.list.replace_provenance(provenance, items);
        Ok(())
    }

    fn merge_new(&mut self, items: Vec<VacancyItem>) -> Result<usize> {
        Ok(self.list.merge_new(items))
    }
}

/// Vacancies cached in a JSON file.
///
/// Only manually entered vacancies are written to disk. If the file cannot be
/// written the cache keeps working from memory for the rest of the session.
#[derive(Debug)]
pub struct LocalCache {
    path: PathBuf,
    list: VacancyList,
    memory_only: bool,
}

impl LocalCache {
    /// Default cache location (~/.local/share/jobswp/vacancies.json on Linux)
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("jobswp").join("vacancies.json"))
    }

    /// Opens the cache, seeding it with the default vacancies when the file is
    /// missing, unreadable, or written by an older version.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let (items, needs_seed) = match read_cache_file(&path) {
            Ok(CacheContents::Current(items)) => {
                tracing::info!(path = %path.display(), count = items.len(), "loaded vacancy cache");
                (items, false)
            }
            Ok(CacheContents::Missing) => {
                tracing::info!(path = %path.display(), "no vacancy cache yet, seeding defaults");
                (seed_vacancies(), true)
            }
            Ok(CacheContents::Legacy) => {
                tracing::info!(path = %path.display(), "vacancy cache uses an old format, reseeding");
                (seed_vacancies(), true)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "vacancy cache unreadable, reseeding");
                (seed_vacancies(), true)
            }
        };

        let mut cache = Self {
            path,
            list: VacancyList::new(items),
            memory_only: false,
        };
        if needs_seed {
            cache.persist();
        }
        cache
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether writes have been abandoned for this session
    pub fn is_memory_only(&self) -> bool {
        self.memory_only
    }

    fn persist(&mut self) {
        if self.memory_only {
            return;
        }
        if let Err(e) = self.write_manual_items() {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "vacancy cache not writable, keeping changes in memory"
            );
            self.memory_only = true;
        }
    }

    fn write_manual_items(&self) -> Result<()> {
        let manual: Vec<&VacancyItem> = self
            .list
            .items
            .iter()
            .filter(|v| v.source == Provenance::Manual)
            .collect();

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&manual)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl VacancySource for LocalCache {
    fn list(&self) -> &[VacancyItem] {
        &self.list.items
    }

    fn revision(&self) -> u64 {
        self.list.revision
    }

    fn append(&mut self, item: VacancyItem) -> Result<()> {
        let manual = item.source == Provenance::Manual;
        self.list.append(item)?;
        if manual {
            self.persist();
        }
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<bool> {
        let manual = self
            .list
            .items
            .iter()
            .any(|v| v.id == id && v.source == Provenance::Manual);
        let removed = self.list.remove(id);
        if removed && manual {
            self.persist();
        }
        Ok(removed)
    }

    fn replace_provenance(
        &mut self,
        provenance: Provenance,
        items: Vec<VacancyItem>,
    ) -> Result<()> {
        self.list.replace_provenance(provenance, items);
        if provenance == Provenance::Manual {
            self.persist();
        }
        Ok(())
    }

    fn merge_new(&mut self, items: Vec<VacancyItem>) -> Result<usize> {
        let any_manual = items.iter().any(|v| v.source == Provenance::Manual);
        let added = self.list.merge_new(items);
        if added > 0 && any_manual {
            self.persist();
        }
        Ok(added)
    }
}

enum CacheContents {
    Missing,
    Legacy,
    Current(Vec<VacancyItem>),
}

fn read_cache_file(path: &Path) -> Result<CacheContents> {
    if !path.exists() {
        return Ok(CacheContents::Missing);
    }

    let contents = fs::read_to_string(path)?;
    let records: Vec<serde_json::Value> = serde_json::from_str(&contents)?;

    // Records from before the detail fields were introduced
    if records
        .first()
        .is_some_and(|first| first.get("requirements").is_none())
    {
        return Ok(CacheContents::Legacy);
    }

    let mut items = Vec::with_capacity(records.len());
    for record in records {
        match serde_json::from_value::<VacancyItem>(record) {
            Ok(item) => items.push(item),
            Err(e) => tracing::warn!(error = %e, "skipping malformed cached vacancy"),
        }
    }
    Ok(CacheContents::Current(items))
}

/// Vacancies a fresh cache starts with
pub fn seed_vacancies() -> Vec<VacancyItem> {
    vec![
        VacancyItem {
            id: "1".to_string(),
            title: "Sales manager".to_string(),
            description: Some("An active manager wanted to work with clients.".to_string()),
            requirements: Some(
                "Higher education, at least 1 year of sales experience, active sales techniques"
                    .to_string(),
            ),
            responsibilities: Some(
                "Finding new clients, negotiating, closing contracts, working in the CRM"
                    .to_string(),
            ),
            experience: Some("From 1 year".to_string()),
            schedule: Some("Full time".to_string()),
            salary: "60 000 - 80 000 ₽".to_string(),
            city: "Moscow".to_string(),
            phone: "+7 (999) 123-45-67".to_string(),
            employer_name: "Sales Plus LLC".to_string(),
            employer_tier: EmployerTier::Vip,
            tags: vec!["Experienced".to_string(), "Daily pay".to_string()],
            status: VacancyStatus::Published,
            source: Provenance::Manual,
            published_at: None,
        },
        VacancyItem {
            id: "2".to_string(),
            title: "Warehouse loader".to_string(),
            description: Some("Work at a large warehouse. 2/2 shifts.".to_string()),
            requirements: Some("Physical endurance, responsibility".to_string()),
            responsibilities: Some(
                "Loading and unloading goods, sorting, keeping the warehouse tidy".to_string(),
            ),
            experience: Some("No experience".to_string()),
            schedule: Some("Full time".to_string()),
            salary: "45 000 ₽".to_string(),
            city: "Saint Petersburg".to_string(),
            phone: "+7 (999) 987-65-43".to_string(),
            employer_name: "Warehouse No. 1".to_string(),
            employer_tier: EmployerTier::Premium,
            tags: vec!["No experience".to_string(), "Rotational".to_string()],
            status: VacancyStatus::Published,
            source: Provenance::Manual,
            published_at: None,
        },
        VacancyItem {
            id: "3".to_string(),
            title: "Courier".to_string(),
            description: Some(
                "Delivering orders around the city. Flexible hours, daily payouts.".to_string(),
            ),
            requirements: Some("Own transport (bicycle or scooter), knowing the city".to_string()),
            responsibilities: Some(
                "Delivering orders to clients, working with the courier app".to_string(),
            ),
            experience: Some("No experience".to_string()),
            schedule: Some("Part time".to_string()),
            salary: "from 50 000 ₽".to_string(),
            city: "Kirov".to_string(),
            phone: "+7 (999) 555-44-33".to_string(),
            employer_name: "Fast Delivery".to_string(),
            employer_tier: EmployerTier::Econom,
            tags: vec![
                "Part-time".to_string(),
                "Daily pay".to_string(),
                "For students".to_string(),
            ],
            status: VacancyStatus::Published,
            source: Provenance::Manual,
            published_at: None,
        },
    ]
}
