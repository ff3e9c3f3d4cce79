use std::collections::HashSet;

use parking_lot::Mutex;

/// `errorUid`s already sent during this session
#[derive(Debug, Default)]
pub struct SubmittedUids {
    uids: Mutex<HashSet<String>>,
}

impl SubmittedUids {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `uid`; returns `false` when it was already submitted
    pub fn insert(&self, uid: &str) -> bool {
        let mut uids = self.uids.lock();
        if uids.contains(uid) {
            return false;
        }
        uids.insert(uid.to_string())
    }

    #[must_use]
    pub fn contains(&self, uid: &str) -> bool {
        self.uids.lock().contains(uid)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.uids.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uids.lock().is_empty()
    }
}
