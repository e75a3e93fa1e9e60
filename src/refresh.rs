// Background refresh of remote vacancies for the synchronous TUI loop

use crate::domain::{EmployerTier, Provenance, VacancyItem, VacancyStatus};
use crate::error::{JobswpError, Result};
use crate::source::VacancySource;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Per-request timeout for remote feeds
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Page size asked from the listing service
const LISTING_LIMIT: u32 = 100;

/// Vacancies returned by one fetch of one feed
#[derive(Debug, Clone, PartialEq)]
pub struct FeedBatch {
    pub provenance: Provenance,
    pub items: Vec<VacancyItem>,
    /// False when the remote answered with `success: false`
    pub success: bool,
}

impl FeedBatch {
    pub fn new(provenance: Provenance, items: Vec<VacancyItem>) -> Self {
        Self {
            provenance,
            items,
            success: true,
        }
    }

    pub fn unsuccessful(provenance: Provenance) -> Self {
        Self {
            provenance,
            items: Vec::new(),
            success: false,
        }
    }

    /// Merges the batch into `source`.
    ///
    /// Listing batches replace every item of their provenance; external feed
    /// batches only contribute ids the source does not have yet.
    pub fn apply(self, source: &mut dyn VacancySource) -> Result<()> {
        if !self.success {
            return Ok(());
        }
        match self.provenance {
            Provenance::Database => {
                let count = self.items.len();
                source.replace_provenance(Provenance::Database, self.items)?;
                tracing::info!(count, "listing refresh applied");
            }
            Provenance::ExternalFeed | Provenance::Manual => {
                let added = source.merge_new(self.items)?;
                tracing::info!(added, provenance = ?self.provenance, "feed refresh applied");
            }
        }
        Ok(())
    }
}

/// A remote endpoint vacancies can be fetched from
#[async_trait]
pub trait VacancyFeed: Send + Sync {
    /// Short name used in logs and status messages
    fn name(&self) -> &str;

    async fn fetch(&self) -> Result<FeedBatch>;
}

fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

async fn get_text(http: &reqwest::Client, url: &str) -> Result<String> {
    let body = http
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(body)
}

/// Published vacancies from the listing service
pub struct ListingClient {
    http: reqwest::Client,
    url: String,
}

impl ListingClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let separator = if base_url.contains('?') { '&' } else { '?' };
        Ok(Self {
            http: http_client()?,
            url: format!(
                "{}{}path=vacancies&status=published&limit={}",
                base_url, separator, LISTING_LIMIT
            ),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl VacancyFeed for ListingClient {
    fn name(&self) -> &str {
        "listing"
    }

    async fn fetch(&self) -> Result<FeedBatch> {
        tracing::debug!(url = %self.url, "fetching listing");
        let body = get_text(&self.http, &self.url).await?;
        parse_listing(&body)
    }
}

/// Vacancies imported from the external job board
pub struct ExternalFeedClient {
    http: reqwest::Client,
    url: String,
}

impl ExternalFeedClient {
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl VacancyFeed for ExternalFeedClient {
    fn name(&self) -> &str {
        "external"
    }

    async fn fetch(&self) -> Result<FeedBatch> {
        tracing::debug!(url = %self.url, "fetching external feed");
        let body = get_text(&self.http, &self.url).await?;
        parse_external(&body)
    }
}

#[derive(Debug, Deserialize)]
struct FeedEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    vacancies: Option<Vec<serde_json::Value>>,
}

/// Record shape of the listing service
#[derive(Debug, Deserialize)]
struct ListingRecord {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    title: String,
    description: Option<String>,
    requirements: Option<String>,
    responsibilities: Option<String>,
    experience: Option<String>,
    schedule: Option<String>,
    salary: Option<String>,
    city: Option<String>,
    phone: Option<String>,
    employer_name: Option<String>,
    employer_tier: EmployerTier,
    tags: Option<Vec<String>>,
    created_at: Option<String>,
}

impl From<ListingRecord> for VacancyItem {
    fn from(record: ListingRecord) -> Self {
        VacancyItem {
            id: record.id,
            title: record.title,
            description: record.description,
            requirements: record.requirements,
            responsibilities: record.responsibilities,
            experience: record.experience,
            schedule: record.schedule,
            salary: record.salary.unwrap_or_default(),
            city: record.city.unwrap_or_default(),
            phone: record.phone.unwrap_or_default(),
            employer_name: record.employer_name.unwrap_or_default(),
            employer_tier: record.employer_tier,
            tags: record.tags.unwrap_or_default(),
            status: VacancyStatus::Published,
            source: Provenance::Database,
            published_at: record.created_at.as_deref().and_then(parse_timestamp),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

/// Accepts RFC 3339 as well as the naive `YYYY-MM-DD HH:MM:SS[.f]` form
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Decodes each record separately so one bad record does not sink the batch
fn decode_records<T, F>(values: Vec<serde_json::Value>, feed: &str, mut map: F) -> Vec<VacancyItem>
where
    T: serde::de::DeserializeOwned,
    F: FnMut(T) -> VacancyItem,
{
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<T>(value) {
            Ok(record) => Some(map(record)),
            Err(e) => {
                tracing::warn!(feed, error = %e, "skipping malformed vacancy record");
                None
            }
        })
        .collect()
}

/// Parses a listing response body
pub fn parse_listing(body: &str) -> Result<FeedBatch> {
    let envelope: FeedEnvelope = serde_json::from_str(body)?;
    let records = match envelope.vacancies {
        Some(records) if envelope.success => records,
        _ => return Ok(FeedBatch::unsuccessful(Provenance::Database)),
    };

    let items = decode_records::<ListingRecord, _>(records, "listing", VacancyItem::from);
    Ok(FeedBatch::new(Provenance::Database, items))
}

/// Parses an external feed response body
pub fn parse_external(body: &str) -> Result<FeedBatch> {
    let envelope: FeedEnvelope = serde_json::from_str(body)?;
    let records = match envelope.vacancies {
        Some(records) if envelope.success => records,
        _ => return Ok(FeedBatch::unsuccessful(Provenance::ExternalFeed)),
    };

    let items = decode_records::<VacancyItem, _>(records, "external", |mut item| {
        item.source = Provenance::ExternalFeed;
        item
    });
    Ok(FeedBatch::new(Provenance::ExternalFeed, items))
}

/// Result of one feed fetch as seen by the UI thread
#[derive(Debug)]
pub enum RefreshOutcome {
    Loaded(FeedBatch),
    Failed { feed: String, message: String },
}

enum RefreshRequest {
    /// Fetch every configured feed
    Refresh,
    Shutdown,
}

/// Handle for sending requests to the refresh worker
#[derive(Clone)]
pub struct RefreshLoader {
    request_tx: mpsc::Sender<RefreshRequest>,
    feed_count: usize,
}

impl RefreshLoader {
    /// Spawns the worker on the current runtime. Outcomes arrive on `outcome_tx`.
    pub fn spawn(
        feeds: Vec<Arc<dyn VacancyFeed>>,
        outcome_tx: mpsc::UnboundedSender<RefreshOutcome>,
    ) -> Self {
        let (request_tx, request_rx) = mpsc::channel(8);
        let feed_count = feeds.len();

        tokio::spawn(async move {
            Self::worker(request_rx, feeds, outcome_tx).await;
        });

        Self {
            request_tx,
            feed_count,
        }
    }

    async fn worker(
        mut request_rx: mpsc::Receiver<RefreshRequest>,
        feeds: Vec<Arc<dyn VacancyFeed>>,
        outcome_tx: mpsc::UnboundedSender<RefreshOutcome>,
    ) {
        while let Some(request) = request_rx.recv().await {
            match request {
                RefreshRequest::Refresh => {
                    // Each feed is fetched on its own task
                    for feed in &feeds {
                        let feed = Arc::clone(feed);
                        let outcome_tx = outcome_tx.clone();
                        tokio::spawn(async move {
                            let outcome = match feed.fetch().await {
                                Ok(batch) => {
                                    tracing::debug!(
                                        feed = feed.name(),
                                        count = batch.items.len(),
                                        success = batch.success,
                                        "feed fetched"
                                    );
                                    RefreshOutcome::Loaded(batch)
                                }
                                Err(e) => RefreshOutcome::Failed {
                                    feed: feed.name().to_string(),
                                    message: e.to_string(),
                                },
                            };
                            if outcome_tx.send(outcome).is_err() {
                                tracing::debug!("refresh outcome dropped, receiver gone");
                            }
                        });
                    }
                }
                RefreshRequest::Shutdown => break,
            }
        }
        tracing::debug!("refresh worker stopped");
    }

    pub fn feed_count(&self) -> usize {
        self.feed_count
    }

    pub async fn refresh(&self) -> Result<()> {
        self.request_tx
            .send(RefreshRequest::Refresh)
            .await
            .map_err(|_| JobswpError::Refresh("refresh worker stopped".to_string()))
    }

    pub async fn shutdown(&self) {
        let _ = self.request_tx.send(RefreshRequest::Shutdown).await;
    }
}

/// What the status line shows about remote refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshStatus {
    Idle,
    Loading,
    Failed(String),
}

/// Synchronous wrapper for refreshing from a polling TUI loop
pub struct SyncRefreshManager {
    loader: RefreshLoader,
    runtime: tokio::runtime::Runtime,
    outcome_rx: mpsc::UnboundedReceiver<RefreshOutcome>,
    /// Fetches requested but not reported back yet
    pending: usize,
    status: RefreshStatus,
}

impl SyncRefreshManager {
    pub fn new(feeds: Vec<Arc<dyn VacancyFeed>>) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let loader = runtime.block_on(async { RefreshLoader::spawn(feeds, outcome_tx) });

        Ok(Self {
            loader,
            runtime,
            outcome_rx,
            pending: 0,
            status: RefreshStatus::Idle,
        })
    }

    /// Queues a fetch of every feed without waiting for it
    pub fn request_refresh(&mut self) {
        if self.loader.feed_count() == 0 {
            return;
        }
        match self.runtime.block_on(self.loader.refresh()) {
            Ok(()) => {
                self.pending += self.loader.feed_count();
                self.status = RefreshStatus::Loading;
                tracing::info!(feeds = self.loader.feed_count(), "refresh requested");
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not request refresh");
                self.status = RefreshStatus::Failed(e.to_string());
            }
        }
    }

    /// Drains finished fetches (non-blocking)
    pub fn poll(&mut self) -> Vec<FeedBatch> {
        let mut batches = Vec::new();
        let mut failure = None;

        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            match outcome {
                RefreshOutcome::Loaded(batch) => batches.push(batch),
                RefreshOutcome::Failed { feed, message } => {
                    tracing::warn!(feed = %feed, error = %message, "refresh failed");
                    failure = Some(format!("{}: {}", feed, message));
                }
            }
        }

        if let Some(message) = failure {
            self.status = RefreshStatus::Failed(message);
        } else if self.pending == 0 && self.status == RefreshStatus::Loading {
            self.status = RefreshStatus::Idle;
        }

        batches
    }

    pub fn status(&self) -> &RefreshStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    pub fn shutdown(&self) {
        self.runtime.block_on(self.loader.shutdown());
    }
}
