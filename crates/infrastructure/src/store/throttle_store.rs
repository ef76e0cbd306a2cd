//! `ThrottleStorePort` over SQLite.
//!
//! Raw `sqlx::query()` calls, no compile-time macros. Every write is a
//! single conditional `UPDATE ... WHERE` statement; the guard clause lives
//! in the WHERE, not in application code, so repeated application is a
//! no-op even under overlapping runs — last committed writer wins.

use async_trait::async_trait;
use dnsbl_reconciler_application::{ThrottleStorePort, WriteOutcome};
use dnsbl_reconciler_domain::{canonical_zone_list, DomainError, IpRecord, ZoneName};
use sqlx::{Row, SqlitePool};

pub struct SqliteThrottleStore {
    pool: SqlitePool,
}

impl SqliteThrottleStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn fatal(err: sqlx::Error) -> DomainError {
    DomainError::StoreFatal(err.to_string())
}

#[async_trait]
impl ThrottleStorePort for SqliteThrottleStore {
    async fn fetch_ip_records(&self) -> Result<Vec<IpRecord>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, ip, priority, old_priority, blocking_lists, last_event FROM throttle",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(fatal)?;

        rows.into_iter()
            .map(|row| {
                let ip_text: String = row.get("ip");
                let ip = ip_text
                    .parse()
                    .map_err(|_| DomainError::InvalidIpAddress(ip_text.clone()))?;
                Ok(IpRecord {
                    id: row.get("id"),
                    ip,
                    priority: row.get("priority"),
                    old_priority: row.get("old_priority"),
                    blocking_lists: row.get::<Option<String>, _>("blocking_lists").unwrap_or_default(),
                    last_event: row.get("last_event"),
                })
            })
            .collect()
    }

    async fn apply_new_listing(
        &self,
        id: i64,
        zones: &[ZoneName],
        listed_priority: i64,
    ) -> Result<WriteOutcome, DomainError> {
        let canonical = canonical_zone_list(zones);
        let last_event = format!("new block from list(s) {canonical}");

        let result = sqlx::query(
            "UPDATE throttle
             SET priority = ?1,
                 old_priority = COALESCE(old_priority, priority),
                 blocking_lists = ?2,
                 last_event = ?3
             WHERE id = ?4 AND COALESCE(blocking_lists, '') != ?2",
        )
        .bind(listed_priority)
        .bind(&canonical)
        .bind(&last_event)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(fatal)?;

        Ok(WriteOutcome {
            rows_affected: result.rows_affected(),
        })
    }

    async fn apply_zone_change(&self, id: i64, zones: &[ZoneName]) -> Result<WriteOutcome, DomainError> {
        let canonical = canonical_zone_list(zones);
        let last_event = format!("blocking list change: {canonical}");

        let result = sqlx::query(
            "UPDATE throttle
             SET blocking_lists = ?1,
                 last_event = ?2
             WHERE id = ?3 AND COALESCE(blocking_lists, '') != ?1",
        )
        .bind(&canonical)
        .bind(&last_event)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(fatal)?;

        Ok(WriteOutcome {
            rows_affected: result.rows_affected(),
        })
    }

    async fn apply_cleared(&self, id: i64, fallback_priority: i64) -> Result<WriteOutcome, DomainError> {
        let result = sqlx::query(
            "UPDATE throttle
             SET priority = COALESCE(old_priority, ?1),
                 old_priority = NULL,
                 blocking_lists = '',
                 last_event = 'block removed'
             WHERE id = ?2 AND COALESCE(blocking_lists, '') != ''",
        )
        .bind(fallback_priority)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(fatal)?;

        Ok(WriteOutcome {
            rows_affected: result.rows_affected(),
        })
    }
}
