//! Glucose fetch and per-range caching.
//!
//! The feed owns the API client and an explicit per-range cache: no global
//! state, one [`RangeCacheEntry`] per lookback window, replaced wholesale on
//! each successful fetch. Range switches hit the cache first, so prefetching
//! all four windows at startup makes them feel instant.
//!
//! Overlapping fetches for the *same* range are ordered by a per-range
//! sequence number: each request takes the next number when it starts, and a
//! response older than the last applied one is discarded on arrival. Fetches
//! for different ranges stay independent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

use glucodash_types::{DataSource, GlucoseReading, Range};

use crate::client::ApiClient;
use crate::error::Result;

/// How long a cached entry counts as fresh. Stale entries are still shown
/// while a background refresh runs.
pub const FRESH_FOR: Duration = Duration::from_secs(2 * 60);

/// Fixed max-age. Entries older than this are treated as absent for
/// freshness decisions; they are never evicted mid-session, only overwritten.
pub const MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// One cached glucose payload for a single range.
#[derive(Debug, Clone)]
pub struct RangeCacheEntry {
    /// The range this entry answers.
    pub range: Range,
    /// Provenance of the readings.
    pub source: DataSource,
    /// Readings ordered by timestamp ascending.
    pub readings: Vec<GlucoseReading>,
    /// Optional note from the backend about source selection.
    pub message: Option<String>,
    /// When this entry was stored.
    pub fetched_at: Instant,
}

impl RangeCacheEntry {
    /// Age of the entry.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    /// Whether the entry is within the freshness window.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.age() <= FRESH_FOR
    }

    /// Whether the entry has outlived the fixed max-age.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.age() > MAX_AGE
    }
}

/// Per-range bookkeeping: the cached entry plus fetch sequencing.
#[derive(Debug, Default)]
struct Slot {
    entry: Option<RangeCacheEntry>,
    /// Sequence number handed to the most recently started fetch.
    next_seq: u64,
    /// Sequence number of the most recently applied response.
    last_applied: u64,
}

/// Explicit per-range cache, owned by the feed.
#[derive(Debug, Default)]
pub struct RangeCache {
    slots: HashMap<Range, Slot>,
}

impl RangeCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached entry for a range, if any.
    pub fn get(&self, range: Range) -> Option<&RangeCacheEntry> {
        self.slots.get(&range).and_then(|slot| slot.entry.as_ref())
    }

    /// Store an entry unconditionally, bypassing sequencing.
    pub fn put(&mut self, entry: RangeCacheEntry) {
        let slot = self.slots.entry(entry.range).or_default();
        slot.entry = Some(entry);
    }

    /// Take the sequence number for a fetch that is about to start.
    pub fn begin_fetch(&mut self, range: Range) -> u64 {
        let slot = self.slots.entry(range).or_default();
        slot.next_seq += 1;
        slot.next_seq
    }

    /// Apply a fetched entry if it is not older than the last applied one.
    ///
    /// Returns `false` when the response was discarded as stale.
    pub fn apply(&mut self, seq: u64, entry: RangeCacheEntry) -> bool {
        let slot = self.slots.entry(entry.range).or_default();
        if seq <= slot.last_applied {
            debug!(
                range = %entry.range,
                seq,
                last_applied = slot.last_applied,
                "Discarding stale fetch response"
            );
            return false;
        }
        slot.last_applied = seq;
        slot.entry = Some(entry);
        true
    }
}

/// The data fetch/cache layer.
///
/// Cloning is cheap: clones share the same cache.
#[derive(Debug, Clone)]
pub struct GlucoseFeed {
    client: ApiClient,
    cache: Arc<Mutex<RangeCache>>,
}

impl GlucoseFeed {
    /// Create a feed over the given client with an empty cache.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            cache: Arc::new(Mutex::new(RangeCache::new())),
        }
    }

    /// The underlying API client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Fetch readings for a range and cache the result.
    ///
    /// Returns the entry that is current after this fetch resolves: normally
    /// the one just fetched, or the newer cached one when this response lost
    /// the per-range sequencing race.
    ///
    /// # Errors
    ///
    /// Propagates client errors; on failure the caller should fall back to
    /// [`cached`](Self::cached) if an entry exists.
    pub async fn fetch(&self, range: Range) -> Result<RangeCacheEntry> {
        let seq = self.cache.lock().expect("cache poisoned").begin_fetch(range);

        let payload = self.client.readings(range).await?;
        let entry = RangeCacheEntry {
            range,
            source: payload.source,
            readings: payload.data,
            message: payload.message,
            fetched_at: Instant::now(),
        };

        let mut cache = self.cache.lock().expect("cache poisoned");
        if cache.apply(seq, entry.clone()) {
            Ok(entry)
        } else {
            // A newer response was applied while this one was in flight.
            Ok(cache.get(range).cloned().unwrap_or(entry))
        }
    }

    /// The cached entry for a range, if any.
    pub fn cached(&self, range: Range) -> Option<RangeCacheEntry> {
        self.cache.lock().expect("cache poisoned").get(range).cloned()
    }

    /// Whether the cached entry for a range is within the freshness window.
    pub fn is_fresh(&self, range: Range) -> bool {
        self.cached(range).is_some_and(|entry| entry.is_fresh())
    }

    /// Warm the cache for every known range without blocking the caller.
    ///
    /// Ranges with a fresh entry are skipped. Best-effort: failures are
    /// logged at debug level and swallowed. Must be called from within a
    /// tokio runtime.
    pub fn prefetch_all(&self) {
        for range in Range::ALL {
            if self.is_fresh(range) {
                continue;
            }
            let feed = self.clone();
            tokio::spawn(async move {
                if let Err(e) = feed.fetch(range).await {
                    debug!(range = %range, error = %e, "Prefetch failed");
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn entry(range: Range, mgdl: u16) -> RangeCacheEntry {
        RangeCacheEntry {
            range,
            source: DataSource::Synthetic,
            readings: vec![GlucoseReading::new(OffsetDateTime::UNIX_EPOCH, mgdl)],
            message: None,
            fetched_at: Instant::now(),
        }
    }

    #[test]
    fn test_cache_starts_empty() {
        let cache = RangeCache::new();
        assert!(cache.get(Range::H3).is_none());
    }

    #[test]
    fn test_put_and_get() {
        let mut cache = RangeCache::new();
        cache.put(entry(Range::H6, 120));
        assert_eq!(cache.get(Range::H6).unwrap().readings[0].mgdl, 120);
        assert!(cache.get(Range::H24).is_none());
    }

    #[test]
    fn test_put_replaces_wholesale() {
        let mut cache = RangeCache::new();
        cache.put(entry(Range::H6, 120));
        cache.put(entry(Range::H6, 140));
        let cached = cache.get(Range::H6).unwrap();
        assert_eq!(cached.readings.len(), 1);
        assert_eq!(cached.readings[0].mgdl, 140);
    }

    #[test]
    fn test_sequencing_discards_stale_response() {
        let mut cache = RangeCache::new();
        let first = cache.begin_fetch(Range::H12);
        let second = cache.begin_fetch(Range::H12);

        // The second (newer) request resolves first.
        assert!(cache.apply(second, entry(Range::H12, 200)));
        // The first request arrives late and must be discarded.
        assert!(!cache.apply(first, entry(Range::H12, 100)));

        assert_eq!(cache.get(Range::H12).unwrap().readings[0].mgdl, 200);
    }

    #[test]
    fn test_sequencing_in_order_applies() {
        let mut cache = RangeCache::new();
        let first = cache.begin_fetch(Range::H12);
        let second = cache.begin_fetch(Range::H12);

        assert!(cache.apply(first, entry(Range::H12, 100)));
        assert!(cache.apply(second, entry(Range::H12, 200)));
        assert_eq!(cache.get(Range::H12).unwrap().readings[0].mgdl, 200);
    }

    #[test]
    fn test_sequencing_is_per_range() {
        let mut cache = RangeCache::new();
        let h3 = cache.begin_fetch(Range::H3);
        let _h24_newer = cache.begin_fetch(Range::H24);

        // A later fetch on another range does not invalidate this one.
        assert!(cache.apply(h3, entry(Range::H3, 90)));
    }

    #[test]
    fn test_freshness_windows() {
        let fresh = entry(Range::H3, 100);
        assert!(fresh.is_fresh());
        assert!(!fresh.is_expired());

        let stale = RangeCacheEntry {
            fetched_at: Instant::now() - (FRESH_FOR + Duration::from_secs(1)),
            ..entry(Range::H3, 100)
        };
        assert!(!stale.is_fresh());
        assert!(!stale.is_expired());

        let expired = RangeCacheEntry {
            fetched_at: Instant::now() - (MAX_AGE + Duration::from_secs(1)),
            ..entry(Range::H3, 100)
        };
        assert!(expired.is_expired());
    }
}
