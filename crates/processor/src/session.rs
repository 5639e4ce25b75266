//! Per-caller dashboard state with a stale-load guard
//!
//! Each dashboard load takes a ticket before it starts. Only the holder of the
//! newest ticket may replace the visible dashboard, so a slow load that
//! finishes after a newer one started is discarded.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::loader::Dashboard;

/// Proof that a load was started, carrying its generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// The dashboard currently visible to a caller
#[derive(Debug, Clone)]
pub struct CommittedDashboard {
    pub generation: u64,
    pub dashboard: Arc<Dashboard>,
}

#[derive(Default)]
pub struct DashboardSession {
    generation: AtomicU64,
    current: RwLock<Option<CommittedDashboard>>,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load, invalidating every ticket issued before it
    pub fn begin(&self) -> LoadTicket {
        LoadTicket {
            generation: self.generation.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Replace the visible dashboard if `ticket` is still the newest.
    /// Returns whether the dashboard was committed.
    pub async fn commit(&self, ticket: LoadTicket, dashboard: Dashboard) -> bool {
        let mut current = self.current.write().await;
        if !self.is_current(ticket) {
            debug!(
                "Dropping stale dashboard load (generation {}, latest {})",
                ticket.generation,
                self.generation.load(Ordering::SeqCst)
            );
            return false;
        }
        *current = Some(CommittedDashboard {
            generation: ticket.generation,
            dashboard: Arc::new(dashboard),
        });
        true
    }

    pub async fn current(&self) -> Option<CommittedDashboard> {
        self.current.read().await.clone()
    }
}

struct Entry {
    session: Arc<DashboardSession>,
    last_begun: u64,
}

#[derive(Default)]
struct Sessions {
    entries: HashMap<String, Entry>,
    tick: u64,
}

/// Sessions keyed by caller token, bounded to `capacity` entries
pub struct SessionRegistry {
    sessions: RwLock<Sessions>,
    capacity: usize,
}

impl SessionRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(Sessions::default()),
            capacity: capacity.max(1),
        }
    }

    pub async fn get(&self, token: &str) -> Option<Arc<DashboardSession>> {
        self.sessions
            .read()
            .await
            .entries
            .get(token)
            .map(|e| e.session.clone())
    }

    /// Start a load for `token`, creating its session if needed.
    /// When full, the least recently begun session is evicted first.
    pub async fn begin(&self, token: &str) -> (Arc<DashboardSession>, LoadTicket) {
        let mut sessions = self.sessions.write().await;
        sessions.tick += 1;
        let tick = sessions.tick;

        if !sessions.entries.contains_key(token) && sessions.entries.len() >= self.capacity {
            let oldest = sessions
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_begun)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                debug!("Evicting dashboard session, registry full ({})", self.capacity);
                sessions.entries.remove(&oldest);
            }
        }

        let entry = sessions
            .entries
            .entry(token.to_string())
            .or_insert_with(|| Entry {
                session: Arc::new(DashboardSession::new()),
                last_begun: tick,
            });
        entry.last_begun = tick;
        let ticket = entry.session.begin();
        (entry.session.clone(), ticket)
    }

    /// Forget the session of a failed load, unless it already shows a
    /// dashboard or a newer load has started
    pub async fn abandon(&self, token: &str, ticket: LoadTicket) {
        let mut sessions = self.sessions.write().await;
        let Some(entry) = sessions.entries.get(token) else {
            return;
        };
        if entry.session.is_current(ticket) && entry.session.current().await.is_none() {
            sessions.entries.remove(token);
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::models::{DateRange, PrAnalytics};

    fn dashboard(repository: &str) -> Dashboard {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        Dashboard {
            repository: repository.to_string(),
            range: DateRange::last_days(30, now).unwrap(),
            loaded_at: now,
            prs: vec![],
            reviews: Default::default(),
            analytics: PrAnalytics::default(),
            users: vec![],
            review_failures: vec![],
        }
    }

    #[tokio::test]
    async fn test_latest_load_commits() {
        let session = DashboardSession::new();
        let ticket = session.begin();
        assert!(session.commit(ticket, dashboard("o/a")).await);
        let committed = session.current().await.unwrap();
        assert_eq!(committed.dashboard.repository, "o/a");
        assert_eq!(committed.generation, ticket.generation());
    }

    #[tokio::test]
    async fn test_stale_load_is_dropped() {
        let session = DashboardSession::new();
        let slow = session.begin();
        let fast = session.begin();

        assert!(session.commit(fast, dashboard("o/new")).await);
        assert!(!session.commit(slow, dashboard("o/old")).await);
        assert_eq!(session.current().await.unwrap().dashboard.repository, "o/new");
    }

    #[tokio::test]
    async fn test_newer_ticket_blocks_older_commit_even_before_it_finishes() {
        let session = DashboardSession::new();
        let first = session.begin();
        let _second = session.begin();

        assert!(!session.is_current(first));
        assert!(!session.commit(first, dashboard("o/a")).await);
        assert!(session.current().await.is_none());
    }

    #[tokio::test]
    async fn test_registry_reuses_sessions() {
        let registry = SessionRegistry::new(10);
        assert!(registry.get("t").await.is_none());
        let (a, first) = registry.begin("t").await;
        let (b, second) = registry.begin("t").await;
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(first.generation(), 1);
        assert_eq!(second.generation(), 2);
        assert!(registry.get("t").await.is_some());
    }

    #[tokio::test]
    async fn test_abandon_removes_failed_first_load() {
        let registry = SessionRegistry::new(10);
        let (_, ticket) = registry.begin("garbage").await;
        registry.abandon("garbage", ticket).await;
        assert!(registry.get("garbage").await.is_none());
        assert_eq!(registry.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_abandon_keeps_committed_session() {
        let registry = SessionRegistry::new(10);
        let (session, ok) = registry.begin("t").await;
        assert!(session.commit(ok, dashboard("o/a")).await);

        let (_, failed) = registry.begin("t").await;
        registry.abandon("t", failed).await;
        let kept = registry.get("t").await.unwrap();
        assert_eq!(kept.current().await.unwrap().dashboard.repository, "o/a");
    }

    #[tokio::test]
    async fn test_abandon_keeps_session_with_newer_load() {
        let registry = SessionRegistry::new(10);
        let (_, failed) = registry.begin("t").await;
        let (_, _newer) = registry.begin("t").await;
        registry.abandon("t", failed).await;
        assert!(registry.get("t").await.is_some());
    }

    #[tokio::test]
    async fn test_registry_evicts_least_recently_begun() {
        let registry = SessionRegistry::new(2);
        registry.begin("a").await;
        registry.begin("b").await;
        registry.begin("a").await;
        registry.begin("c").await;

        assert_eq!(registry.session_count().await, 2);
        assert!(registry.get("a").await.is_some());
        assert!(registry.get("b").await.is_none());
        assert!(registry.get("c").await.is_some());
    }
}
