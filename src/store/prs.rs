//! Per-PR bookkeeping rows.
//!
//! One row per PR key (`owner/repo#number`), created on first contact
//! and mutated in place. Rows are never deleted here.

use rusqlite::params;

use super::{now_secs, Store, StoreError};

/// Persistent review state for one PR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PRState {
    pub id: String,
    pub repo: String,
    pub number: u64,
    pub last_seen_head_sha: String,
    pub last_reviewed_head_sha: Option<String>,
    pub last_reviewed_at: Option<i64>,
    pub last_submitted_at: Option<i64>,
    pub snoozed_until: Option<i64>,
    pub notes: Option<String>,
}

impl Store {
    /// Insert or refresh the row for `id`, updating the last-seen head.
    pub fn upsert_pr(
        &self,
        id: &str,
        repo: &str,
        number: u64,
        head_sha: &str,
    ) -> Result<(), StoreError> {
        self.conn().execute(
            "INSERT INTO prs (id, repo, number, last_seen_head_sha)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                 repo = excluded.repo,
                 number = excluded.number,
                 last_seen_head_sha = excluded.last_seen_head_sha",
            params![id, repo, number, head_sha],
        )?;
        Ok(())
    }

    /// Fetch the row for `id`.
    pub fn get_pr(&self, id: &str) -> Result<PRState, StoreError> {
        self.conn()
            .query_row(
                "SELECT id, repo, number, last_seen_head_sha, last_reviewed_head_sha,
                        last_reviewed_at, last_submitted_at, snoozed_until, notes
                 FROM prs
                 WHERE id = ?1",
                params![id],
                |r| {
                    Ok(PRState {
                        id: r.get(0)?,
                        repo: r.get(1)?,
                        number: r.get(2)?,
                        last_seen_head_sha: r.get(3)?,
                        last_reviewed_head_sha: r.get(4)?,
                        last_reviewed_at: r.get(5)?,
                        last_submitted_at: r.get(6)?,
                        snoozed_until: r.get(7)?,
                        notes: r.get(8)?,
                    })
                },
            )
            .map_err(not_found_or)
    }

    /// Record that a review (draft or posted) was generated for `head_sha`.
    pub fn mark_reviewed(&self, id: &str, head_sha: &str) -> Result<(), StoreError> {
        if id.is_empty() {
            return Err(StoreError::MissingField("id"));
        }
        if head_sha.is_empty() {
            return Err(StoreError::MissingField("head_sha"));
        }
        let rows = self.conn().execute(
            "UPDATE prs
             SET last_reviewed_head_sha = ?1, last_reviewed_at = ?2
             WHERE id = ?3",
            params![head_sha, now_secs(), id],
        )?;
        if rows == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Record a successful submission.
    pub fn mark_submitted(&self, id: &str) -> Result<(), StoreError> {
        if id.is_empty() {
            return Err(StoreError::MissingField("id"));
        }
        let rows = self.conn().execute(
            "UPDATE prs SET last_submitted_at = ?1 WHERE id = ?2",
            params![now_secs(), id],
        )?;
        if rows == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub(super) fn not_found_or(err: rusqlite::Error) -> StoreError {
    match err {
        rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
        other => StoreError::Sqlite(other),
    }
}
