// src/infrastructure/repositories/in_memory_paper.rs
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::paper::{NewPaper, Paper, PaperId, PaperRepository};

#[derive(Default)]
struct Store {
    last_id: i64,
    papers: HashMap<PaperId, Paper>,
}

/// Process-local paper store with compare-and-swap updates on `version`.
#[derive(Default)]
pub struct InMemoryPaperRepository {
    inner: Mutex<Store>,
}

impl InMemoryPaperRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing documents, keeping their ids.
    pub fn with_papers(papers: impl IntoIterator<Item = Paper>) -> Self {
        let mut store = Store::default();
        for paper in papers {
            store.last_id = store.last_id.max(i64::from(paper.id));
            store.papers.insert(paper.id, paper);
        }
        Self {
            inner: Mutex::new(store),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|s| s.papers.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn store(&self) -> DomainResult<MutexGuard<'_, Store>> {
        self.inner
            .lock()
            .map_err(|_| DomainError::Persistence("paper store lock poisoned".into()))
    }
}

#[async_trait]
impl PaperRepository for InMemoryPaperRepository {
    async fn insert(&self, paper: NewPaper) -> DomainResult<Paper> {
        let mut store = self.store()?;
        let id = PaperId::new(store.last_id + 1)?;
        store.last_id += 1;
        let paper = Paper::from_new(id, paper);
        store.papers.insert(id, paper.clone());
        Ok(paper)
    }

    async fn find_by_id(&self, id: PaperId) -> DomainResult<Option<Paper>> {
        Ok(self.store()?.papers.get(&id).cloned())
    }

    async fn update(&self, mut paper: Paper) -> DomainResult<Paper> {
        let mut store = self.store()?;
        let stored = store
            .papers
            .get_mut(&paper.id)
            .ok_or_else(|| DomainError::NotFound(format!("paper {}", paper.id)))?;
        if stored.version != paper.version {
            return Err(DomainError::Conflict(format!(
                "paper {} was modified concurrently (stored version {}, given {})",
                paper.id, stored.version, paper.version
            )));
        }
        paper.version += 1;
        *stored = paper.clone();
        Ok(paper)
    }

    async fn delete(&self, id: PaperId) -> DomainResult<()> {
        self.store()?
            .papers
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound(format!("paper {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::distribution::DistributionTargets;
    use crate::domain::paper::ExamMetadata;
    use crate::domain::user::UserId;
    use chrono::Utc;

    fn new_paper() -> NewPaper {
        let metadata = ExamMetadata {
            subject_code: "CS3401".into(),
            max_marks: 100,
            ..ExamMetadata::default()
        };
        NewPaper::new(
            metadata,
            DistributionTargets::new(100, 20),
            Vec::new(),
            UserId::new(1).unwrap(),
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn stale_version_is_rejected() {
        let repo = InMemoryPaperRepository::new();
        let created = repo.insert(new_paper()).await.unwrap();

        let first = repo.update(created.clone()).await.unwrap();
        assert_eq!(first.version, 1);

        let err = repo.update(created).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        let stored = repo.find_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn ids_are_sequential_and_delete_is_checked() {
        let repo = InMemoryPaperRepository::new();
        let a = repo.insert(new_paper()).await.unwrap();
        let b = repo.insert(new_paper()).await.unwrap();
        assert_eq!(i64::from(a.id), 1);
        assert_eq!(i64::from(b.id), 2);

        repo.delete(a.id).await.unwrap();
        assert!(matches!(
            repo.delete(a.id).await,
            Err(DomainError::NotFound(_))
        ));
        assert_eq!(repo.len(), 1);
    }
}
