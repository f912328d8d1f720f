use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use tracing::debug;

use super::{AttendanceStore, StoreError};
use crate::model::attendance::{AttendanceEvent, EventFilter, NewScan};
use crate::model::tag::{NewTag, Tag};

#[derive(Clone)]
pub struct MySqlAttendanceStore {
    pool: MySqlPool,
}

impl MySqlAttendanceStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn push_event_filters<'a>(qb: &mut QueryBuilder<'a, MySql>, filter: &EventFilter) {
    qb.push(" WHERE 1 = 1");

    if let Some(tag_id) = &filter.tag_id {
        qb.push(" AND tag_id = ").push_bind(tag_id.clone());
    }
    if let Some(from) = filter.from {
        qb.push(" AND scanned_at >= ").push_bind(from);
    }
    if let Some(to) = filter.to {
        qb.push(" AND scanned_at < ").push_bind(to);
    }
}

#[async_trait]
impl AttendanceStore for MySqlAttendanceStore {
    async fn record_scan(&self, scan: NewScan) -> Result<AttendanceEvent, StoreError> {
        // Resolving the tag and inserting in one statement keeps the write atomic
        let result = sqlx::query(
            r#"
            INSERT INTO attendance_events (tag_id, scanned_at, recorded_at)
            SELECT tag_id, ?, ?
            FROM tags
            WHERE tag_id = ?
            "#,
        )
        .bind(scan.scanned_at)
        .bind(scan.recorded_at)
        .bind(&scan.tag_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UnknownTag(scan.tag_id));
        }

        let id = result.last_insert_id();
        debug!(event_id = id, tag_id = %scan.tag_id, "Attendance event inserted");

        Ok(AttendanceEvent {
            id,
            tag_id: scan.tag_id,
            scanned_at: scan.scanned_at,
            recorded_at: scan.recorded_at,
        })
    }

    async fn list_events(
        &self,
        filter: &EventFilter,
    ) -> Result<(Vec<AttendanceEvent>, i64), StoreError> {
        let mut count = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM attendance_events");
        push_event_filters(&mut count, filter);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut select = QueryBuilder::<MySql>::new(
            "SELECT id, tag_id, scanned_at, recorded_at FROM attendance_events",
        );
        push_event_filters(&mut select, filter);
        select
            .push(" ORDER BY scanned_at DESC, id DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let events = select
            .build_query_as::<AttendanceEvent>()
            .fetch_all(&self.pool)
            .await?;

        Ok((events, total))
    }

    async fn enroll_tag(&self, tag: NewTag) -> Result<Tag, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO tags (tag_id, holder_name, external_id)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&tag.tag_id)
        .bind(&tag.holder_name)
        .bind(&tag.external_id)
        .execute(&self.pool)
        .await;

        let id = match result {
            Ok(done) => done.last_insert_id(),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(StoreError::DuplicateTag(tag.tag_id));
            }
            Err(e) => return Err(e.into()),
        };

        let created = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, tag_id, holder_name, external_id, created_at
            FROM tags
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, StoreError> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, tag_id, holder_name, external_id, created_at
            FROM tags
            ORDER BY tag_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
