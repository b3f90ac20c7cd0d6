use std::{
    collections::{hash_map::DefaultHasher, HashMap, VecDeque},
    hash::{Hash, Hasher},
    sync::Arc,
    time::Instant,
};

use chrono::{NaiveDateTime, Utc};
use parking_lot::Mutex;
use tennis_schema::Match;

use crate::{
    config::{CacheConfig, CacheKeyStrategy},
    instant::{calculate_instant_stats, InstantStats},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    player_id: String,
    fingerprint: u64,
}

#[derive(Debug)]
struct CacheEntry {
    stats: Arc<InstantStats>,
    stored_at: Instant,
}

/// TTL cache over [`calculate_instant_stats`].
///
/// Entries are evicted oldest-insertion-first once `max_entries` is exceeded.
/// Recomputing an expired key keeps its first insertion slot.
#[derive(Debug)]
pub struct InstantStatsCache {
    config: CacheConfig,
    entries: HashMap<CacheKey, CacheEntry>,
    order: VecDeque<CacheKey>,
}

impl Default for InstantStatsCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl InstantStatsCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_or_compute(&mut self, matches: &[Match], player_id: Option<&str>) -> Arc<InstantStats> {
        self.get_or_compute_at(matches, player_id, Instant::now(), Utc::now().naive_utc())
    }

    /// `now` drives expiry; `today` is handed to the month windows of a fresh computation.
    pub fn get_or_compute_at(
        &mut self,
        matches: &[Match],
        player_id: Option<&str>,
        now: Instant,
        today: NaiveDateTime,
    ) -> Arc<InstantStats> {
        let Some(player_id) = player_id else {
            return Arc::new(InstantStats::empty());
        };

        let key = self.key_for(matches, player_id);
        if let Some(entry) = self.entries.get(&key) {
            if now.saturating_duration_since(entry.stored_at) < self.config.ttl() {
                tracing::trace!(player_id, "instant stats cache hit");
                return Arc::clone(&entry.stats);
            }
        }

        tracing::debug!(player_id, matches = matches.len(), "instant stats cache miss");
        let stats = Arc::new(calculate_instant_stats(matches, Some(player_id), today));
        self.insert(key, Arc::clone(&stats), now);
        stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Drops every entry for `player_id`. Returns how many were removed.
    pub fn evict(&mut self, player_id: &str) -> usize {
        self.remove_where(|key, _| key.player_id == player_id)
    }

    pub fn evict_expired(&mut self, now: Instant) -> usize {
        let ttl = self.config.ttl();
        self.remove_where(|_, entry| now.saturating_duration_since(entry.stored_at) >= ttl)
    }

    fn insert(&mut self, key: CacheKey, stats: Arc<InstantStats>, stored_at: Instant) {
        let entry = CacheEntry { stats, stored_at };
        if self.entries.insert(key.clone(), entry).is_none() {
            self.order.push_back(key);
        }
        while self.entries.len() > self.config.max_entries {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            tracing::trace!(player_id = %oldest.player_id, "evicted oldest instant stats entry");
        }
    }

    fn remove_where(&mut self, mut pred: impl FnMut(&CacheKey, &CacheEntry) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, entry| !pred(key, entry));
        let entries = &self.entries;
        self.order.retain(|key| entries.contains_key(key));
        before - self.entries.len()
    }

    fn key_for(&self, matches: &[Match], player_id: &str) -> CacheKey {
        let fingerprint = match self.config.key_strategy {
            CacheKeyStrategy::MatchCount => matches.len() as u64,
            CacheKeyStrategy::ContentHash => {
                let mut hasher = DefaultHasher::new();
                matches.hash(&mut hasher);
                hasher.finish()
            }
        };
        CacheKey {
            player_id: player_id.to_string(),
            fingerprint,
        }
    }
}

/// [`InstantStatsCache`] behind a mutex, for hosts that read stats from
/// several threads.
#[derive(Debug, Clone, Default)]
pub struct SharedInstantStatsCache {
    inner: Arc<Mutex<InstantStatsCache>>,
}

impl SharedInstantStatsCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(InstantStatsCache::new(config))),
        }
    }

    pub fn get_or_compute(&self, matches: &[Match], player_id: Option<&str>) -> Arc<InstantStats> {
        self.inner.lock().get_or_compute(matches, player_id)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn evict(&self, player_id: &str) -> usize {
        self.inner.lock().evict(player_id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
