//! In-process store used by the handler tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use super::{AttendanceStore, StoreError};
use crate::model::attendance::{AttendanceEvent, EventFilter, NewScan};
use crate::model::tag::{NewTag, Tag};

#[derive(Default)]
pub struct MemoryStore {
    tags: Mutex<Vec<Tag>>,
    events: Mutex<Vec<AttendanceEvent>>,
    unreachable: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn with_tags(tag_ids: &[&str]) -> Self {
        let store = Self::default();
        {
            let mut tags = store.tags.lock().unwrap();
            for (i, tag_id) in tag_ids.iter().enumerate() {
                tags.push(Tag {
                    id: i as u64 + 1,
                    tag_id: tag_id.to_string(),
                    holder_name: format!("Holder {tag_id}"),
                    external_id: None,
                    created_at: Utc::now(),
                });
            }
        }
        store
    }

    /// Every following call fails as if MySQL were down.
    pub fn set_unreachable(&self, down: bool) {
        self.unreachable.store(down, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<AttendanceEvent> {
        self.events.lock().unwrap().clone()
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn record_scan(&self, scan: NewScan) -> Result<AttendanceEvent, StoreError> {
        self.enter()?;

        if !self.tags.lock().unwrap().iter().any(|t| t.tag_id == scan.tag_id) {
            return Err(StoreError::UnknownTag(scan.tag_id));
        }

        let mut events = self.events.lock().unwrap();
        let event = AttendanceEvent {
            id: events.len() as u64 + 1,
            tag_id: scan.tag_id,
            scanned_at: scan.scanned_at,
            recorded_at: scan.recorded_at,
        };
        events.push(event.clone());
        Ok(event)
    }

    async fn list_events(
        &self,
        filter: &EventFilter,
    ) -> Result<(Vec<AttendanceEvent>, i64), StoreError> {
        self.enter()?;

        let mut matching: Vec<AttendanceEvent> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| filter.tag_id.as_ref().is_none_or(|t| &e.tag_id == t))
            .filter(|e| filter.from.is_none_or(|from| e.scanned_at >= from))
            .filter(|e| filter.to.is_none_or(|to| e.scanned_at < to))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.scanned_at.cmp(&a.scanned_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn enroll_tag(&self, tag: NewTag) -> Result<Tag, StoreError> {
        self.enter()?;

        let mut tags = self.tags.lock().unwrap();
        if tags.iter().any(|t| t.tag_id == tag.tag_id) {
            return Err(StoreError::DuplicateTag(tag.tag_id));
        }
        let created = Tag {
            id: tags.len() as u64 + 1,
            tag_id: tag.tag_id,
            holder_name: tag.holder_name,
            external_id: tag.external_id,
            created_at: Utc::now(),
        };
        tags.push(created.clone());
        Ok(created)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, StoreError> {
        self.enter()?;

        let mut tags = self.tags.lock().unwrap().clone();
        tags.sort_by(|a, b| a.tag_id.cmp(&b.tag_id));
        Ok(tags)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.enter()
    }
}
