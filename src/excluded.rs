use arc_swap::ArcSwap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A shared set of request paths that bypass decompression.
///
/// Clones share the same underlying set, so paths added through any handle
/// are seen by every service built from it. Lookups read a lock-free
/// snapshot; updates swap in a new snapshot.
///
/// Matching is exact: `/upload` does not exclude `/upload/` or `/upload/raw`,
/// and the query string is never part of the path.
#[derive(Clone)]
pub struct ExcludedPaths {
    paths: Arc<ArcSwap<HashSet<String>>>,
}

impl ExcludedPaths {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            paths: Arc::new(ArcSwap::from_pointee(HashSet::new())),
        }
    }

    /// Adds a path. Returns `true` if it was not already present.
    pub fn add(&self, path: impl Into<String>) -> bool {
        let path = path.into();
        let previous = self.paths.rcu(|current| {
            let mut next = HashSet::clone(current);
            next.insert(path.clone());
            next
        });
        !previous.contains(&path)
    }

    /// Removes a path. Returns `true` if it was present.
    pub fn remove(&self, path: &str) -> bool {
        let previous = self.paths.rcu(|current| {
            let mut next = HashSet::clone(current);
            next.remove(path);
            next
        });
        previous.contains(path)
    }

    /// Returns `true` if `path` is excluded.
    pub fn contains(&self, path: &str) -> bool {
        self.paths.load().contains(path)
    }

    /// Returns the number of excluded paths.
    pub fn len(&self) -> usize {
        self.paths.load().len()
    }

    /// Returns `true` if no paths are excluded.
    pub fn is_empty(&self) -> bool {
        self.paths.load().is_empty()
    }
}

impl Default for ExcludedPaths {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExcludedPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.paths.load().iter()).finish()
    }
}

impl<P: Into<String>> Extend<P> for ExcludedPaths {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        let added: Vec<String> = iter.into_iter().map(Into::into).collect();
        self.paths.rcu(|current| {
            let mut next = HashSet::clone(current);
            next.extend(added.iter().cloned());
            next
        });
    }
}

impl<P: Into<String>> FromIterator<P> for ExcludedPaths {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let paths: HashSet<String> = iter.into_iter().map(Into::into).collect();
        Self {
            paths: Arc::new(ArcSwap::from_pointee(paths)),
        }
    }
}
