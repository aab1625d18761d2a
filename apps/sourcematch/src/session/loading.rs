use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Request categories that carry their own "loading" flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadCategory {
    Jobs,
    History,
    Scoring,
    Applications,
    Users,
    Settings,
}

impl LoadCategory {
    const COUNT: usize = 6;

    const fn index(self) -> usize {
        match self {
            LoadCategory::Jobs => 0,
            LoadCategory::History => 1,
            LoadCategory::Scoring => 2,
            LoadCategory::Applications => 3,
            LoadCategory::Users => 4,
            LoadCategory::Settings => 5,
        }
    }
}

/// Shared per-category in-flight counters.
///
/// Clones observe the same counters, so a UI can hold one handle while a
/// controller awaits a request. A category stays loading until its last
/// overlapping request finishes.
#[derive(Clone, Default)]
pub struct LoadingFlags {
    in_flight: Arc<[AtomicUsize; LoadCategory::COUNT]>,
}

impl LoadingFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self, category: LoadCategory) -> bool {
        self.in_flight[category.index()].load(Ordering::Acquire) > 0
    }

    /// Marks one request in flight until the returned guard is dropped.
    pub fn begin(&self, category: LoadCategory) -> LoadingGuard {
        self.in_flight[category.index()].fetch_add(1, Ordering::AcqRel);
        LoadingGuard {
            flags: self.clone(),
            category,
        }
    }

    /// Like [`begin`](Self::begin) but returns `None` when a request of this
    /// category is already in flight.
    pub fn try_begin(&self, category: LoadCategory) -> Option<LoadingGuard> {
        self.in_flight[category.index()]
            .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LoadingGuard {
                flags: self.clone(),
                category,
            })
    }
}

impl fmt::Debug for LoadingFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("LoadingFlags");
        for category in [
            LoadCategory::Jobs,
            LoadCategory::History,
            LoadCategory::Scoring,
            LoadCategory::Applications,
            LoadCategory::Users,
            LoadCategory::Settings,
        ] {
            dbg.field(&format!("{category:?}"), &self.is_loading(category));
        }
        dbg.finish()
    }
}

#[must_use = "the loading flag clears as soon as the guard is dropped"]
pub struct LoadingGuard {
    flags: LoadingFlags,
    category: LoadCategory,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.flags.in_flight[self.category.index()].fetch_sub(1, Ordering::AcqRel);
    }
}
