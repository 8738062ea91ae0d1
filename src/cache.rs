//! Cache keys and the bounded pixmap cache.

use std::fmt;

use log::{debug, trace};
use lru::LruCache;

use crate::icon::{IconImage, SizePx};

// ============================================================================
// CacheKey
// ============================================================================

/// Identifies one rendered output.
///
/// The string form (via [`Display`](fmt::Display)) is
/// `unread_{w}x{h}_{normal}_{pms}` for single sizes,
/// `unread_-1x-1_{normal}_{pms}` for a whole multi-resolution icon, and
/// `win_unread_{count}` for window badges. Distinct keys always have
/// distinct string forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// One rasterized size of the tray icon.
    Sized {
        size: SizePx,
        unread_normal: i32,
        unread_pms: i32,
    },

    /// The tray icon at every default size.
    AllSizes { unread_normal: i32, unread_pms: i32 },

    /// The 48x48 window badge.
    WinBadge { unread_count: i32 },
}

impl CacheKey {
    pub fn sized(size: SizePx, unread_normal: i32, unread_pms: i32) -> Self {
        Self::Sized {
            size,
            unread_normal,
            unread_pms,
        }
    }

    pub fn all_sizes(unread_normal: i32, unread_pms: i32) -> Self {
        Self::AllSizes {
            unread_normal,
            unread_pms,
        }
    }

    pub fn win_badge(unread_count: i32) -> Self {
        Self::WinBadge { unread_count }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sized {
                size,
                unread_normal,
                unread_pms,
            } => write!(
                f,
                "unread_{}x{}_{}_{}",
                size.width, size.height, unread_normal, unread_pms
            ),
            Self::AllSizes {
                unread_normal,
                unread_pms,
            } => write!(f, "unread_-1x-1_{}_{}", unread_normal, unread_pms),
            Self::WinBadge { unread_count } => write!(f, "win_unread_{}", unread_count),
        }
    }
}

// ============================================================================
// PixmapCache
// ============================================================================

/// Snapshot of pixmap cache usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Number of stored images.
    pub entries: usize,
    /// Total cost of stored images, in KiB.
    pub cost_kb: usize,
    /// Budget in KiB.
    pub limit_kb: usize,
    pub hits: u64,
    pub misses: u64,
    /// Inserts dropped because the image alone exceeds the budget.
    pub rejected: u64,
    /// Entries pushed out to make room.
    pub evictions: u64,
}

/// Cost-bounded LRU store of rasterized images.
///
/// Each entry costs its pixel data size in KiB, rounded up and at least 1.
/// Inserting evicts least-recently-used entries until the total fits the
/// budget. An image larger than the whole budget is not stored at all.
pub struct PixmapCache {
    entries: LruCache<CacheKey, (IconImage, usize)>,
    limit_kb: usize,
    cost_kb: usize,
    stats: CacheStats,
}

impl PixmapCache {
    /// Creates an empty cache with a budget of `limit_kb` KiB.
    pub fn new(limit_kb: usize) -> Self {
        Self {
            entries: LruCache::unbounded(),
            limit_kb,
            cost_kb: 0,
            stats: CacheStats::default(),
        }
    }

    /// Cost of an image in KiB.
    pub fn cost_of(image: &IconImage) -> usize {
        image.data.as_raw().len().div_ceil(1024).max(1)
    }

    /// Looks up an image, marking it most recently used.
    pub fn get(&mut self, key: &CacheKey) -> Option<IconImage> {
        match self.entries.get(key) {
            Some((image, _)) => {
                self.stats.hits += 1;
                trace!("pixmap cache hit for {key}");
                Some(image.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Returns true if `key` is stored, without touching recency or stats.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains(key)
    }

    /// Stores an image. Returns false if it was too large to keep.
    pub fn insert(&mut self, key: CacheKey, image: IconImage) -> bool {
        let cost = Self::cost_of(&image);
        if cost > self.limit_kb {
            self.stats.rejected += 1;
            debug!(
                "not caching {key}: {cost} KiB exceeds the {} KiB budget",
                self.limit_kb
            );
            return false;
        }

        if let Some((_, old_cost)) = self.entries.put(key, (image, cost)) {
            self.cost_kb -= old_cost;
        }
        self.cost_kb += cost;

        while self.cost_kb > self.limit_kb {
            let Some((evicted, (_, evicted_cost))) = self.entries.pop_lru() else {
                break;
            };
            self.cost_kb -= evicted_cost;
            self.stats.evictions += 1;
            trace!("evicted {evicted} from pixmap cache");
        }
        true
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cost_kb = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit_kb(&self) -> usize {
        self.limit_kb
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            cost_kb: self.cost_kb,
            limit_kb: self.limit_kb,
            ..self.stats
        }
    }
}

impl Default for PixmapCache {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PIXMAP_CACHE_LIMIT_KB)
    }
}
