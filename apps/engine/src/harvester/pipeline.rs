//! Query pipeline: `Idle → Fetching → Parsing → Validating → Deduplicating
//! → Persisting → Done`, with `Failed` reachable from any non-terminal
//! state. A failed query reports metrics and persists nothing.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::harvester::dedup::Deduplicator;
use crate::harvester::listing::{parse_detail, parse_listing};
use crate::harvester::persistence::JobPersister;
use crate::harvester::session::{FetchError, PageFetcher};
use crate::harvester::urls::{is_source_url, search_url};
use crate::harvester::validator::{retain_valid, validate};
use crate::harvester::{HarvestError, HarvesterConfig, JobRecord};
use crate::models::job::JobRow;
use crate::store::StoreError;

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;
/// Listing pages walked per query at most.
pub const MAX_PAGES: usize = 10;
pub const DEFAULT_CONCURRENT_TASKS: usize = 3;
pub const MAX_CONCURRENT_TASKS: usize = 10;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub keyword: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub skip: usize,
}

impl SearchQuery {
    /// `python` or `python @ monterrey`, used in logs and metrics.
    pub fn label(&self) -> String {
        match self.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            Some(location) => format!("{} @ {}", self.keyword.trim(), location),
            None => self.keyword.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryState {
    #[default]
    Idle,
    Fetching,
    Parsing,
    Validating,
    Deduplicating,
    Persisting,
    Done,
    Failed,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryMetrics {
    pub query: String,
    pub total_found: usize,
    pub unique: usize,
    pub duplicates_removed: usize,
    pub invalid: usize,
    pub execution_time_ms: u64,
    pub state: QueryState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub metrics: QueryMetrics,
    /// Records persisted by this query. Contact fields are never serialized.
    pub jobs: Vec<JobRecord>,
}

/// Tracks one query's state and metrics.
struct QueryRun {
    metrics: QueryMetrics,
    started: Instant,
}

impl QueryRun {
    fn new(query: &SearchQuery) -> Self {
        Self {
            metrics: QueryMetrics {
                query: query.label(),
                ..QueryMetrics::default()
            },
            started: Instant::now(),
        }
    }

    fn enter(&mut self, next: QueryState) {
        debug!(
            query = %self.metrics.query,
            from = ?self.metrics.state,
            to = ?next,
            "query state transition"
        );
        self.metrics.state = next;
    }

    fn finish(mut self, jobs: Vec<JobRecord>) -> BatchResult {
        self.enter(QueryState::Done);
        self.close(jobs)
    }

    fn fail(mut self, err: &HarvestError) -> BatchResult {
        warn!(query = %self.metrics.query, error = %err, "query failed");
        self.metrics.error = Some(err.to_string());
        self.enter(QueryState::Failed);
        self.close(Vec::new())
    }

    fn close(mut self, jobs: Vec<JobRecord>) -> BatchResult {
        self.metrics.execution_time_ms = self.started.elapsed().as_millis() as u64;
        info!(
            query = %self.metrics.query,
            state = ?self.metrics.state,
            total_found = self.metrics.total_found,
            unique = self.metrics.unique,
            duplicates_removed = self.metrics.duplicates_removed,
            invalid = self.metrics.invalid,
            execution_time_ms = self.metrics.execution_time_ms,
            "query finished"
        );
        BatchResult {
            metrics: self.metrics,
            jobs,
        }
    }
}

pub struct Harvester {
    fetcher: Arc<dyn PageFetcher>,
    persister: JobPersister,
    dedup: Deduplicator,
    base_url: String,
    max_retries: u32,
}

impl std::fmt::Debug for Harvester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harvester")
            .field("base_url", &self.base_url)
            .field("source", &self.persister.source())
            .field("max_retries", &self.max_retries)
            .field("seen", &self.dedup.len())
            .finish()
    }
}

impl Harvester {
    pub fn new(fetcher: Arc<dyn PageFetcher>, persister: JobPersister, config: &HarvesterConfig) -> Self {
        Self {
            fetcher,
            persister,
            dedup: Deduplicator::new(),
            base_url: config.base_url.clone(),
            max_retries: config.max_retries,
        }
    }

    pub fn persister(&self) -> &JobPersister {
        &self.persister
    }

    pub fn deduplicator(&self) -> &Deduplicator {
        &self.dedup
    }

    /// Loads the seen-id set persisted by earlier runs.
    pub async fn restore_seen(&self) -> Result<usize, StoreError> {
        let loaded = self
            .dedup
            .load(self.persister.store(), self.persister.source())
            .await?;
        info!(loaded, source = %self.persister.source(), "duplicate cache restored");
        Ok(loaded)
    }

    async fn save_seen(&self) {
        if let Err(err) = self
            .dedup
            .persist(self.persister.store(), self.persister.source())
            .await
        {
            warn!(error = %err, "failed to persist duplicate cache");
        }
    }

    /// Clears the duplicate cache in memory and in the store.
    pub async fn reset_cache(&self) -> Result<(), StoreError> {
        let cleared = self.dedup.len();
        self.dedup.reset();
        self.persister
            .store()
            .delete(&Deduplicator::store_key(self.persister.source()))
            .await?;
        info!(cleared, "duplicate cache reset");
        Ok(())
    }

    /// One attempt plus `max_retries` retries. 429/503 is never retried.
    pub async fn fetch_with_retry(&self, url: &str) -> Result<String, HarvestError> {
        let attempts = self.max_retries + 1;
        for attempt in 1..=attempts {
            match self.fetcher.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(FetchError::RateLimited { status }) => {
                    warn!(url, status, "rate limited by upstream, skipping url");
                    return Err(HarvestError::RateLimited {
                        url: url.to_string(),
                        status,
                    });
                }
                Err(err) if attempt < attempts => {
                    warn!(url, attempt, error = %err, "fetch failed, retrying");
                }
                Err(err) => {
                    warn!(url, attempts, error = %err, "fetch failed, giving up on url");
                }
            }
        }
        Err(HarvestError::UpstreamUnavailable {
            url: url.to_string(),
            attempts,
        })
    }

    /// Walks listing pages until `skip + limit` records are collected, a
    /// page comes back empty, or `MAX_PAGES` is reached, then processes the
    /// `[skip, skip + limit)` window.
    pub async fn scrape_by_keyword(&self, query: &SearchQuery) -> BatchResult {
        let mut run = QueryRun::new(query);
        let limit = query.limit.clamp(1, MAX_LIMIT);
        let wanted = query.skip.saturating_add(limit);

        let mut collected: Vec<JobRecord> = Vec::new();
        for page in 1..=MAX_PAGES {
            let url = search_url(&self.base_url, &query.keyword, query.location.as_deref(), page);

            run.enter(QueryState::Fetching);
            let html = match self.fetch_with_retry(&url).await {
                Ok(html) => html,
                Err(err) => {
                    run.metrics.failed_urls.push(url);
                    if page == 1 {
                        return run.fail(&err);
                    }
                    break;
                }
            };

            run.enter(QueryState::Parsing);
            let records = parse_listing(&html, &self.base_url, Utc::now());
            debug!(query = %run.metrics.query, page, found = records.len(), "listing page parsed");
            if records.is_empty() {
                break;
            }
            collected.extend(records);
            if collected.len() >= wanted {
                break;
            }
        }

        let window: Vec<JobRecord> = collected.into_iter().skip(query.skip).take(limit).collect();
        run.metrics.total_found = window.len();

        run.enter(QueryState::Validating);
        let (valid, invalid) = retain_valid(window);
        run.metrics.invalid = invalid;

        run.enter(QueryState::Deduplicating);
        let (unique, duplicates) = self.dedup.deduplicate(valid);
        run.metrics.duplicates_removed = duplicates;

        run.enter(QueryState::Persisting);
        if let Err(err) = self.persister.upsert_all(&unique).await {
            self.dedup.forget(unique.iter().map(|r| r.external_job_id.as_str()));
            return run.fail(&err);
        }
        run.metrics.unique = unique.len();
        self.save_seen().await;

        run.finish(unique)
    }

    /// Runs up to `concurrent_tasks` queries at once over the shared
    /// fetcher. Results come back in input order.
    pub async fn scrape_batch(&self, queries: &[SearchQuery], concurrent_tasks: usize) -> Vec<BatchResult> {
        let concurrency = concurrent_tasks.clamp(1, MAX_CONCURRENT_TASKS);
        info!(queries = queries.len(), concurrency, "starting batch");
        stream::iter(queries.iter().cloned())
            .map(|query| async move { self.scrape_by_keyword(&query).await })
            .buffered(concurrency)
            .collect::<Vec<_>>()
            .await
    }

    /// Fetches, validates and persists a single posting from its detail page.
    pub async fn scrape_detail(&self, url: &str) -> Result<JobRow, HarvestError> {
        let url = url.trim();
        if !is_source_url(&self.base_url, url) {
            return Err(HarvestError::Validation(format!(
                "url must belong to {}",
                self.base_url
            )));
        }

        let html = self.fetch_with_retry(url).await?;
        let record = parse_detail(&html, url, &self.base_url, Utc::now())
            .ok_or_else(|| HarvestError::Validation("page has no job content".to_string()))?;
        validate(&record).map_err(|issue| HarvestError::Validation(issue.to_string()))?;

        self.persister.upsert_all(std::slice::from_ref(&record)).await?;
        self.dedup.deduplicate(vec![record.clone()]);
        self.save_seen().await;

        self.persister
            .get(&record.external_job_id)
            .await?
            .ok_or_else(|| HarvestError::Validation("job vanished after upsert".to_string()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::harvester::listing::tests::{listing_html, BASE};
    use crate::harvester::persistence::tests::{crypto, FlakyStore};
    use crate::models::job::{JobType, WorkMode};
    use crate::store::{KvStore, MemoryStore};

    pub(crate) fn record(id: &str) -> JobRecord {
        JobRecord {
            external_job_id: id.to_string(),
            title: "Desarrollador Backend".to_string(),
            company: "Acme Software".to_string(),
            location: "Ciudad de México".to_string(),
            description: "Buscamos desarrollador con Python y SQL".to_string(),
            url: None,
            work_mode: WorkMode::Remote,
            job_type: JobType::FullTime,
            skills: vec!["Python".to_string(), "SQL".to_string()],
            salary_min: None,
            salary_max: None,
            contact_email: None,
            contact_phone: None,
            published_at: Utc::now(),
        }
    }

    pub(crate) enum Reply {
        Page(String),
        Status(u16),
    }

    /// Replies scripted per URL, consumed in order; the last reply repeats.
    /// Unknown URLs get an empty page.
    #[derive(Default)]
    pub(crate) struct ScriptedFetcher {
        replies: Mutex<HashMap<String, VecDeque<Reply>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        pub(crate) fn on(self, url: &str, replies: Vec<Reply>) -> Self {
            self.replies
                .lock()
                .unwrap()
                .insert(url.to_string(), replies.into());
            self
        }

        pub(crate) fn calls_to(&self, url: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            let mut replies = self.replies.lock().unwrap();
            let reply = match replies.get_mut(url) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().map(|r| match r {
                    Reply::Page(p) => Reply::Page(p.clone()),
                    Reply::Status(s) => Reply::Status(*s),
                }),
                None => None,
            };
            match reply {
                Some(Reply::Page(html)) => Ok(html),
                Some(Reply::Status(status)) => {
                    Err(FetchError::from_status(reqwest::StatusCode::from_u16(status).unwrap()).unwrap())
                }
                None => Ok("<html><body></body></html>".to_string()),
            }
        }
    }

    pub(crate) fn harvester_with(fetcher: Arc<ScriptedFetcher>, store: Arc<dyn KvStore>) -> Harvester {
        let config = HarvesterConfig {
            base_url: BASE.to_string(),
            ..HarvesterConfig::default()
        };
        let persister = JobPersister::new(store, crypto(), &config.source, &config.contact_placeholder);
        Harvester::new(fetcher, persister, &config)
    }

    fn query(keyword: &str) -> SearchQuery {
        SearchQuery {
            keyword: keyword.to_string(),
            location: None,
            limit: DEFAULT_LIMIT,
            skip: 0,
        }
    }

    fn seen(harvester: &Harvester, id: &str) -> bool {
        harvester.deduplicator().snapshot().iter().any(|s| s == id)
    }

    fn url(keyword: &str, page: usize) -> String {
        search_url(BASE, keyword, None, page)
    }

    fn ids(result: &BatchResult) -> Vec<&str> {
        result.jobs.iter().map(|r| r.external_job_id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_dedup_across_batches() {
        let fetcher = Arc::new(
            ScriptedFetcher::default()
                .on(&url("python", 1), vec![Reply::Page(listing_html(&[("1", "Dev Python"), ("2", "Dev Python")]))])
                .on(&url("sql", 1), vec![Reply::Page(listing_html(&[("2", "Analista SQL"), ("3", "Analista SQL")]))]),
        );
        let store = Arc::new(MemoryStore::new());
        let harvester = harvester_with(fetcher, store.clone());

        let a = harvester.scrape_by_keyword(&query("python")).await;
        assert_eq!(a.metrics.state, QueryState::Done);
        assert_eq!(a.metrics.unique, 2);
        assert_eq!(a.metrics.duplicates_removed, 0);

        let b = harvester.scrape_by_keyword(&query("sql")).await;
        assert_eq!(ids(&b), vec!["3"]);
        assert_eq!(b.metrics.total_found, 2);
        assert_eq!(b.metrics.duplicates_removed, 1);

        assert_eq!(harvester.deduplicator().snapshot(), vec!["1", "2", "3"]);
        assert_eq!(harvester.persister().list().await.unwrap().len(), 3);

        let persisted: Vec<String> = crate::store::get_json(store.as_ref(), "harvester:seen:occ.com.mx")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(persisted, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_repeat_query_is_all_duplicates() {
        let fetcher = Arc::new(ScriptedFetcher::default().on(
            &url("python", 1),
            vec![Reply::Page(listing_html(&[("10", "Dev Python"), ("11", "Dev Python")]))],
        ));
        let harvester = harvester_with(fetcher, Arc::new(MemoryStore::new()));

        harvester.scrape_by_keyword(&query("python")).await;
        let again = harvester.scrape_by_keyword(&query("python")).await;
        assert_eq!(again.metrics.duplicates_removed, 2);
        assert_eq!(again.metrics.unique, 0);
        assert_eq!(again.metrics.state, QueryState::Done);
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let target = url("rust", 1);
        let fetcher = Arc::new(ScriptedFetcher::default().on(
            &target,
            vec![
                Reply::Status(500),
                Reply::Status(502),
                Reply::Page(listing_html(&[("20", "Dev Rust")])),
            ],
        ));
        let harvester = harvester_with(fetcher.clone(), Arc::new(MemoryStore::new()));

        let result = harvester.scrape_by_keyword(&query("rust")).await;
        assert_eq!(result.metrics.state, QueryState::Done);
        assert_eq!(fetcher.calls_to(&target), 3);
        assert_eq!(ids(&result), vec!["20"]);
    }

    #[tokio::test]
    async fn test_exhausted_retries_fail_query() {
        let target = url("rust", 1);
        let fetcher = Arc::new(ScriptedFetcher::default().on(&target, vec![Reply::Status(500)]));
        let harvester = harvester_with(fetcher.clone(), Arc::new(MemoryStore::new()));

        let result = harvester.scrape_by_keyword(&query("rust")).await;
        assert_eq!(fetcher.calls_to(&target), 3);
        assert_eq!(result.metrics.state, QueryState::Failed);
        assert_eq!(result.metrics.failed_urls, vec![target]);
        assert!(result.metrics.error.unwrap().contains("3 attempts"));
    }

    #[tokio::test]
    async fn test_rate_limit_is_hard_skip() {
        let target = url("java", 1);
        let fetcher = Arc::new(ScriptedFetcher::default().on(&target, vec![Reply::Status(429)]));
        let harvester = harvester_with(fetcher.clone(), Arc::new(MemoryStore::new()));

        let err = harvester.fetch_with_retry(&target).await.unwrap_err();
        assert!(matches!(err, HarvestError::RateLimited { status: 429, .. }));
        assert_eq!(fetcher.calls_to(&target), 1);
    }

    #[tokio::test]
    async fn test_later_page_failure_keeps_earlier_pages() {
        let fetcher = Arc::new(
            ScriptedFetcher::default()
                .on(&url("go", 1), vec![Reply::Page(listing_html(&[("30", "Dev Golang"), ("31", "Dev Golang")]))])
                .on(&url("go", 2), vec![Reply::Status(503)]),
        );
        let harvester = harvester_with(fetcher, Arc::new(MemoryStore::new()));

        let mut go = query("go");
        go.limit = 5;
        let result = harvester.scrape_by_keyword(&go).await;
        assert_eq!(result.metrics.state, QueryState::Done);
        assert_eq!(result.metrics.unique, 2);
        assert_eq!(result.metrics.failed_urls, vec![url("go", 2)]);
    }

    #[tokio::test]
    async fn test_pagination_window() {
        let fetcher = Arc::new(
            ScriptedFetcher::default()
                .on(&url("data", 1), vec![Reply::Page(listing_html(&[("40", "Analista Datos"), ("41", "Analista Datos")]))])
                .on(&url("data", 2), vec![Reply::Page(listing_html(&[("42", "Analista Datos"), ("43", "Analista Datos")]))]),
        );
        let harvester = harvester_with(fetcher.clone(), Arc::new(MemoryStore::new()));

        let query = SearchQuery {
            keyword: "data".into(),
            location: None,
            limit: 2,
            skip: 1,
        };
        let result = harvester.scrape_by_keyword(&query).await;
        assert_eq!(ids(&result), vec!["41", "42"]);
        assert_eq!(fetcher.calls_to(&url("data", 3)), 0);
    }

    #[tokio::test]
    async fn test_invalid_records_dropped_not_fatal() {
        let html = r#"<html><body>
            <article data-job-id="50"><h2>Dev</h2><span class="company">Acme</span>
              <span class="location">CDMX</span><p class="description">Buscamos desarrollador Python</p></article>
            <article data-job-id="51"><h2>Desarrollador Python</h2><span class="company">Acme</span>
              <span class="location">CDMX</span><p class="description">Buscamos desarrollador Python</p></article>
        </body></html>"#;
        let fetcher = Arc::new(ScriptedFetcher::default().on(&url("python", 1), vec![Reply::Page(html.into())]));
        let harvester = harvester_with(fetcher, Arc::new(MemoryStore::new()));

        let result = harvester.scrape_by_keyword(&query("python")).await;
        assert_eq!(result.metrics.total_found, 2);
        assert_eq!(result.metrics.invalid, 1);
        assert_eq!(ids(&result), vec!["51"]);
    }

    #[tokio::test]
    async fn test_persistence_failure_marks_failed_and_forgets_ids() {
        let fetcher = Arc::new(ScriptedFetcher::default().on(
            &url("python", 1),
            vec![Reply::Page(listing_html(&[("60", "Dev Python"), ("61", "Dev Python")]))],
        ));
        let store = Arc::new(FlakyStore {
            inner: MemoryStore::new(),
            poison: ":61",
        });
        let harvester = harvester_with(fetcher, store.clone());

        let result = harvester.scrape_by_keyword(&query("python")).await;
        assert_eq!(result.metrics.state, QueryState::Failed);
        assert!(result.jobs.is_empty());
        assert!(!seen(&harvester, "60"));
        assert!(store.inner.scan_prefix("job:").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let fetcher = Arc::new(
            ScriptedFetcher::default()
                .on(&url("a", 1), vec![Reply::Page(listing_html(&[("70", "Puesto Alfa")]))])
                .on(&url("b", 1), vec![Reply::Status(429)])
                .on(&url("c", 1), vec![Reply::Page(listing_html(&[("71", "Puesto Gamma")]))]),
        );
        let harvester = harvester_with(fetcher, Arc::new(MemoryStore::new()));

        let queries = vec![query("a"), query("b"), query("c")];
        let results = harvester.scrape_batch(&queries, 3).await;
        let labels: Vec<&str> = results.iter().map(|r| r.metrics.query.as_str()).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
        assert_eq!(results[0].metrics.state, QueryState::Done);
        assert_eq!(results[1].metrics.state, QueryState::Failed);
        assert_eq!(ids(&results[2]), vec!["71"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_batch_overlapping_ids_kept_once() {
        let fetcher = Arc::new(
            ScriptedFetcher::default()
                .on(
                    &url("a", 1),
                    vec![Reply::Page(listing_html(&[("80", "Puesto Compartido"), ("81", "Puesto Alfa")]))],
                )
                .on(
                    &url("b", 1),
                    vec![Reply::Page(listing_html(&[("80", "Puesto Compartido"), ("82", "Puesto Beta")]))],
                ),
        );
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let harvester = harvester_with(fetcher, store.clone());

        let results = harvester.scrape_batch(&[query("a"), query("b")], 2).await;
        let mut kept: Vec<String> = results.iter().flat_map(ids).map(String::from).collect();
        kept.sort();
        assert_eq!(kept, vec!["80", "81", "82"]);

        let duplicates: usize = results.iter().map(|r| r.metrics.duplicates_removed).sum();
        assert_eq!(duplicates, 1);
        assert!(results.iter().all(|r| r.metrics.state == QueryState::Done));
        assert_eq!(store.scan_prefix("job:").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_scrape_detail() {
        let detail = format!("{BASE}/empleo/oferta/20931845-desarrollador-rust/");
        let html = r#"<html><body><main>
            <h1>Desarrollador Rust</h1><span class="company">Ferris SA</span>
            <span class="location">Guadalajara</span>
            <div class="description">Rust, Docker y Linux. Trabajo remoto. Contacto: rh@ferris.mx</div>
        </main></body></html>"#;
        let fetcher = Arc::new(ScriptedFetcher::default().on(&detail, vec![Reply::Page(html.into())]));
        let harvester = harvester_with(fetcher, Arc::new(MemoryStore::new()));

        let row = harvester.scrape_detail(&detail).await.unwrap();
        assert_eq!(row.external_job_id, "20931845");
        assert_eq!(row.work_mode, WorkMode::Remote);
        assert_ne!(row.contact_email, "rh@ferris.mx");
        assert!(seen(&harvester, "20931845"));

        let err = harvester.scrape_detail("https://evil.example/job/1").await.unwrap_err();
        assert!(matches!(err, HarvestError::Validation(_)));
    }

    #[tokio::test]
    async fn test_reset_and_restore_cache() {
        let fetcher = Arc::new(ScriptedFetcher::default().on(
            &url("python", 1),
            vec![Reply::Page(listing_html(&[("80", "Dev Python")]))],
        ));
        let store = Arc::new(MemoryStore::new());
        let harvester = harvester_with(fetcher.clone(), store.clone());
        harvester.scrape_by_keyword(&query("python")).await;

        let restarted = harvester_with(fetcher.clone(), store.clone());
        assert_eq!(restarted.restore_seen().await.unwrap(), 1);
        assert!(seen(&restarted, "80"));

        restarted.reset_cache().await.unwrap();
        assert_eq!(restarted.deduplicator().len(), 0);
        assert_eq!(store.get("harvester:seen:occ.com.mx").await.unwrap(), None);
    }

    #[test]
    fn test_search_query_defaults() {
        let q: SearchQuery = serde_json::from_str(r#"{"keyword":"python"}"#).unwrap();
        assert_eq!(q.limit, DEFAULT_LIMIT);
        assert_eq!(q.skip, 0);
        assert_eq!(q.location, None);
        assert_eq!(q.label(), "python");

        let q = SearchQuery {
            location: Some("Monterrey".into()),
            ..q
        };
        assert_eq!(q.label(), "python @ Monterrey");
    }
}
