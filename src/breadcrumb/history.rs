use std::collections::VecDeque;

use parking_lot::Mutex;

use super::types::BreadcrumbEntry;
use crate::config::BeforePushBreadcrumb;
use crate::utils::{DEFAULT_MAX_BREADCRUMBS, now_millis};

/// Ring buffer of recent actions ordered by time ascending
pub struct Breadcrumb {
    max_breadcrumbs: usize,
    before_push: Option<BeforePushBreadcrumb>,
    stack: Mutex<VecDeque<BreadcrumbEntry>>,
}

impl Breadcrumb {
    #[must_use]
    pub fn new(max_breadcrumbs: usize, before_push: Option<BeforePushBreadcrumb>) -> Self {
        let max_breadcrumbs = max_breadcrumbs.max(1);
        Self {
            max_breadcrumbs,
            before_push,
            stack: Mutex::new(VecDeque::with_capacity(max_breadcrumbs)),
        }
    }

    /// Record an action and return the resulting history.
    ///
    /// The pre-push hook runs first and may replace the entry or drop it,
    /// in which case the history is returned unchanged.
    pub fn push(&self, entry: BreadcrumbEntry) -> Vec<BreadcrumbEntry> {
        let entry = match &self.before_push {
            Some(hook) => match hook(entry) {
                Some(entry) => entry,
                None => return self.get_stack(),
            },
            None => entry,
        };
        self.immediate_push(entry)
    }

    /// Store `entry` without running the pre-push hook
    pub fn immediate_push(&self, mut entry: BreadcrumbEntry) -> Vec<BreadcrumbEntry> {
        if entry.time.is_none() {
            entry.time = Some(now_millis());
        }

        let mut stack = self.stack.lock();
        if stack.len() >= self.max_breadcrumbs {
            stack.pop_front();
        }
        stack.push_back(entry);
        // async completions can land after later actions
        stack
            .make_contiguous()
            .sort_by_key(|e| e.time.unwrap_or_default());
        stack.iter().cloned().collect()
    }

    /// Snapshot of the current history, oldest first
    #[must_use]
    pub fn get_stack(&self) -> Vec<BreadcrumbEntry> {
        self.stack.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.stack.lock().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.lock().is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_breadcrumbs
    }
}

impl Default for Breadcrumb {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BREADCRUMBS, None)
    }
}

impl std::fmt::Debug for Breadcrumb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Breadcrumb")
            .field("max_breadcrumbs", &self.max_breadcrumbs)
            .field("len", &self.len())
            .field("has_before_push", &self.before_push.is_some())
            .finish()
    }
}
