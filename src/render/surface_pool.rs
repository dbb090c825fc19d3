use std::collections::HashMap;

use crate::foundation::error::RasterfitResult;
use crate::render::surface::Surface;

/// Retention limits for a [`SurfacePool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PoolOpts {
    /// Maximum bytes retained across all buckets.
    pub max_pool_bytes: usize,
    /// Maximum number of idle surfaces per `(width, height)` bucket.
    pub max_surfaces_per_bucket: usize,
}

impl Default for PoolOpts {
    fn default() -> Self {
        Self {
            max_pool_bytes: 256 * 1024 * 1024,
            max_surfaces_per_bucket: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SurfaceKey {
    w: u32,
    h: u32,
}

impl SurfaceKey {
    fn byte_len(self) -> usize {
        (self.w as usize)
            .saturating_mul(self.h as usize)
            .saturating_mul(4)
    }
}

/// Counters describing pool activity.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PoolStats {
    /// Idle surfaces currently held.
    pub retained_surfaces: usize,
    /// Bytes held by idle surfaces.
    pub retained_bytes: usize,
    /// Surfaces handed out and not yet released.
    pub outstanding: usize,
    /// Acquisitions served by a fresh allocation.
    pub alloc_surfaces: u64,
    /// Bytes allocated by fresh allocations.
    pub alloc_bytes: u64,
    /// Acquisitions served from an idle surface.
    pub reused: u64,
    /// Total `release` calls.
    pub released: u64,
    /// Releases that dropped the surface instead of retaining it.
    pub dropped_on_release: u64,
}

/// Bounded pool of reusable surfaces keyed by `(width, height)`.
///
/// The holder of a surface owns it exclusively. [`SurfacePool::release`] clears the pixels before
/// the surface becomes idle. A surface kept as a final result is simply never released.
#[derive(Debug)]
pub struct SurfacePool {
    opts: PoolOpts,
    stats: PoolStats,
    buckets: HashMap<SurfaceKey, Vec<Surface>>,
}

impl Default for SurfacePool {
    fn default() -> Self {
        Self::new(PoolOpts::default())
    }
}

impl SurfacePool {
    /// Empty pool with the given limits.
    pub fn new(opts: PoolOpts) -> Self {
        Self {
            opts,
            stats: PoolStats::default(),
            buckets: HashMap::new(),
        }
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> PoolStats {
        self.stats.clone()
    }

    /// Retention limits.
    pub fn opts(&self) -> PoolOpts {
        self.opts
    }

    /// Take an idle `width x height` surface or allocate a new one.
    ///
    /// Returned surfaces are always fully transparent.
    pub fn acquire(&mut self, width: u32, height: u32) -> RasterfitResult<Surface> {
        let key = SurfaceKey {
            w: width,
            h: height,
        };
        if let Some(s) = self.buckets.get_mut(&key).and_then(Vec::pop) {
            self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_sub(1);
            self.stats.retained_bytes = self.stats.retained_bytes.saturating_sub(key.byte_len());
            self.stats.reused = self.stats.reused.saturating_add(1);
            self.stats.outstanding = self.stats.outstanding.saturating_add(1);
            tracing::debug!(width, height, "surface pool reuse");
            return Ok(s);
        }

        let s = Surface::new(width, height)?;
        self.stats.alloc_surfaces = self.stats.alloc_surfaces.saturating_add(1);
        self.stats.alloc_bytes = self.stats.alloc_bytes.saturating_add(key.byte_len() as u64);
        self.stats.outstanding = self.stats.outstanding.saturating_add(1);
        tracing::debug!(width, height, "surface pool miss, allocated");
        Ok(s)
    }

    /// Return a surface. Its content is cleared; it is retained if the limits allow.
    pub fn release(&mut self, mut surface: Surface) {
        self.stats.released = self.stats.released.saturating_add(1);
        self.stats.outstanding = self.stats.outstanding.saturating_sub(1);

        let key = SurfaceKey {
            w: surface.width(),
            h: surface.height(),
        };
        let bytes = key.byte_len();
        let bucket_len = self.buckets.get(&key).map_or(0, Vec::len);
        if bucket_len >= self.opts.max_surfaces_per_bucket
            || self.stats.retained_bytes.saturating_add(bytes) > self.opts.max_pool_bytes
        {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        surface.clear();
        self.buckets.entry(key).or_default().push(surface);
        self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_add(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_add(bytes);
    }

    /// Drop every idle surface.
    pub fn trim(&mut self) {
        self.buckets.clear();
        self.stats.retained_surfaces = 0;
        self.stats.retained_bytes = 0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface_pool.rs"]
mod tests;
