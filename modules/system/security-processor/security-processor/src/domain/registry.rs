//! Concurrent registry of authenticated subjects.

use std::sync::Arc;

use dashmap::DashMap;
use security_processor_sdk::{SecuritySubject, SubjectId};

/// Subject id to subject, for every session that authenticated and has not
/// expired yet.
///
/// Safe for concurrent insert, remove, lookup and snapshot without external
/// locking. Re-inserting an id replaces the previous subject.
#[derive(Debug, Default)]
pub struct SubjectRegistry {
    subjects: DashMap<SubjectId, Arc<SecuritySubject>>,
}

impl SubjectRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `subject` under its own id, returning the subject it replaced.
    #[must_use]
    pub fn insert(&self, subject: Arc<SecuritySubject>) -> Option<Arc<SecuritySubject>> {
        self.subjects.insert(subject.id().clone(), subject)
    }

    #[must_use]
    pub fn get(&self, id: &SubjectId) -> Option<Arc<SecuritySubject>> {
        self.subjects.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove the subject if present.
    #[must_use]
    pub fn remove(&self, id: &SubjectId) -> Option<Arc<SecuritySubject>> {
        self.subjects.remove(id).map(|(_, subject)| subject)
    }

    /// Point-in-time copy of every registered subject.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<SecuritySubject>> {
        self.subjects
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Drop every subject, returning how many were removed.
    ///
    /// Each removed entry is counted as it goes, so subjects inserted while
    /// the clear runs are either counted or left in place.
    #[must_use]
    pub fn clear(&self) -> usize {
        let mut removed = 0;
        self.subjects.retain(|_, _| {
            removed += 1;
            false
        });
        removed
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::thread;

    use security_processor_sdk::{PermissionSet, SubjectType};

    use super::*;

    fn subject(id: &str, subject_type: SubjectType) -> Arc<SecuritySubject> {
        Arc::new(SecuritySubject::new(
            SubjectId::from(id),
            subject_type,
            None,
            None,
            PermissionSet::allow_all(),
        ))
    }

    #[test]
    fn insert_replaces_previous_subject() {
        let registry = SubjectRegistry::new();

        assert!(
            registry
                .insert(subject("node-1", SubjectType::ClusterNode))
                .is_none()
        );
        let replaced = registry.insert(subject("node-1", SubjectType::RemoteClient));

        assert_eq!(
            replaced.map(|s| s.subject_type()),
            Some(SubjectType::ClusterNode)
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry
                .get(&SubjectId::from("node-1"))
                .map(|s| s.subject_type()),
            Some(SubjectType::RemoteClient)
        );
    }

    #[test]
    fn remove_is_idempotent() {
        let registry = SubjectRegistry::new();
        assert!(
            registry
                .insert(subject("node-1", SubjectType::ClusterNode))
                .is_none()
        );

        assert!(registry.remove(&SubjectId::from("node-1")).is_some());
        assert!(registry.remove(&SubjectId::from("node-1")).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn snapshot_is_detached_from_later_changes() {
        let registry = SubjectRegistry::new();
        for id in ["node-1", "node-2"] {
            assert!(registry.insert(subject(id, SubjectType::ClusterNode)).is_none());
        }

        let snapshot = registry.snapshot();
        assert!(registry.remove(&SubjectId::from("node-1")).is_some());
        assert!(
            registry
                .insert(subject("node-3", SubjectType::ClusterNode))
                .is_none()
        );

        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn clear_reports_removed_count() {
        let registry = SubjectRegistry::new();
        assert!(
            registry
                .insert(subject("node-1", SubjectType::ClusterNode))
                .is_none()
        );
        assert!(
            registry
                .insert(subject("client-1", SubjectType::RemoteClient))
                .is_none()
        );

        assert_eq!(registry.clear(), 2);
        assert!(registry.is_empty());
        assert_eq!(registry.clear(), 0);
    }

    #[test]
    fn concurrent_inserts_and_removes() {
        let registry = Arc::new(SubjectRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for i in 0..100 {
                        let id = format!("w{worker}-s{i}");
                        assert!(
                            registry
                                .insert(subject(&id, SubjectType::RemoteClient))
                                .is_none()
                        );
                        if i % 2 == 0 {
                            assert!(registry.remove(&SubjectId::from(id)).is_some());
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 8 * 50);
    }

    #[test]
    fn clear_counts_every_subject_it_drops() {
        let registry = Arc::new(SubjectRegistry::new());

        let writers: Vec<_> = (0..4)
            .map(|worker| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for i in 0..250 {
                        let id = format!("w{worker}-s{i}");
                        assert!(
                            registry
                                .insert(subject(&id, SubjectType::RemoteClient))
                                .is_none()
                        );
                    }
                })
            })
            .collect();

        let mut cleared = 0;
        while writers.iter().any(|w| !w.is_finished()) {
            cleared += registry.clear();
        }
        for writer in writers {
            writer.join().unwrap();
        }
        cleared += registry.clear();

        assert_eq!(cleared, 4 * 250);
        assert!(registry.is_empty());
    }
}
