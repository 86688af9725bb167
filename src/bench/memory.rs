//! Heap accounting for the benchmark harness.
//!
//! `TrackingAllocator` wraps another global allocator and keeps process-wide
//! counters of live and peak bytes. The binary installs it around jemalloc;
//! library code only reads the counters. When no tracking allocator is
//! installed the counters stay at zero and every peak reads as `0`.

use std::alloc::{GlobalAlloc, Layout};
use std::sync::atomic::{AtomicUsize, Ordering};

static CURRENT: AtomicUsize = AtomicUsize::new(0);
static PEAK: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Default)]
pub struct TrackingAllocator<A> {
    inner: A,
}

impl<A> TrackingAllocator<A> {
    pub const fn new(inner: A) -> Self {
        Self { inner }
    }
}

fn grow(bytes: usize) {
    let now = CURRENT.fetch_add(bytes, Ordering::Relaxed) + bytes;
    PEAK.fetch_max(now, Ordering::Relaxed);
}

fn shrink(bytes: usize) {
    CURRENT.fetch_sub(bytes, Ordering::Relaxed);
}

// SAFETY: every call is forwarded unchanged to `inner`; the counters are
// updated only after the inner allocator succeeded.
unsafe impl<A: GlobalAlloc> GlobalAlloc for TrackingAllocator<A> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { self.inner.alloc(layout) };
        if !ptr.is_null() {
            grow(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { self.inner.alloc_zeroed(layout) };
        if !ptr.is_null() {
            grow(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { self.inner.dealloc(ptr, layout) };
        shrink(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { self.inner.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            let old_size = layout.size();
            if new_size > old_size {
                grow(new_size - old_size);
            } else {
                shrink(old_size - new_size);
            }
        }
        new_ptr
    }
}

/// Live heap bytes.
pub fn current_bytes() -> usize {
    CURRENT.load(Ordering::Relaxed)
}

/// True once a `TrackingAllocator` has served at least one allocation.
pub fn is_tracking() -> bool {
    PEAK.load(Ordering::Relaxed) > 0
}

/// Measures the heap high-water mark above the level at creation.
#[derive(Debug)]
pub struct PeakScope {
    baseline: usize,
}

impl PeakScope {
    /// Resets the process peak to the current level and remembers it.
    pub fn start() -> Self {
        let baseline = current_bytes();
        PEAK.store(baseline, Ordering::Relaxed);
        Self { baseline }
    }

    /// Peak growth in bytes since `start`.
    pub fn peak_bytes(&self) -> usize {
        PEAK.load(Ordering::Relaxed).saturating_sub(self.baseline)
    }

    /// Peak growth in KiB, the unit used by the reports.
    #[allow(clippy::cast_precision_loss)]
    pub fn peak_kb(&self) -> f64 {
        self.peak_bytes() as f64 / 1024.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_follow_growth() {
        grow(8192);
        assert!(current_bytes() >= 8192);
        shrink(8192);
    }

    #[test]
    fn test_peak_scope_never_negative() {
        let scope = PeakScope::start();
        assert!(scope.peak_kb() >= 0.0);
    }
}
