//! Draft review rows: at most one per PR key.
//!
//! The draft id is the PR key today; lookup and delete also match on
//! `pr_id` so rows written under a surrogate id remain reachable.

use rusqlite::{params, OptionalExtension};

use super::prs::not_found_or;
use super::{now_secs, Store, StoreError};

/// A locally saved, not-yet-posted review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftReview {
    pub id: String,
    pub pr_id: String,
    pub created_at: i64,
    pub payload_json: String,
    pub rendered_preview: String,
}

impl Store {
    /// Insert or fully replace the draft for `pr_id`.
    ///
    /// A replacement gets a fresh `created_at`. All arguments must be
    /// non-empty.
    pub fn upsert_draft_review(
        &self,
        pr_id: &str,
        payload_json: &str,
        rendered_preview: &str,
    ) -> Result<(), StoreError> {
        if pr_id.is_empty() {
            return Err(StoreError::MissingField("pr_id"));
        }
        if payload_json.is_empty() {
            return Err(StoreError::MissingField("payload_json"));
        }
        if rendered_preview.is_empty() {
            return Err(StoreError::MissingField("rendered_preview"));
        }
        self.conn().execute(
            "INSERT INTO draft_reviews (id, pr_id, created_at, payload_json, rendered_preview)
             VALUES (?1, ?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                 pr_id = excluded.pr_id,
                 created_at = excluded.created_at,
                 payload_json = excluded.payload_json,
                 rendered_preview = excluded.rendered_preview",
            params![pr_id, now_secs(), payload_json, rendered_preview],
        )?;
        Ok(())
    }

    /// Fetch the draft for `pr_id`.
    ///
    /// Tries an exact id match first, then falls back to the most recent
    /// row whose `pr_id` matches.
    pub fn get_draft_review(&self, pr_id: &str) -> Result<DraftReview, StoreError> {
        let conn = self.conn();
        let exact = conn
            .query_row(
                "SELECT id, pr_id, created_at, payload_json, rendered_preview
                 FROM draft_reviews
                 WHERE id = ?1",
                params![pr_id],
                scan_draft,
            )
            .optional()?;
        if let Some(draft) = exact {
            return Ok(draft);
        }
        conn.query_row(
            "SELECT id, pr_id, created_at, payload_json, rendered_preview
             FROM draft_reviews
             WHERE pr_id = ?1
             ORDER BY created_at DESC
             LIMIT 1",
            params![pr_id],
            scan_draft,
        )
        .map_err(not_found_or)
    }

    /// Remove the draft for `pr_id`. Idempotent.
    pub fn delete_draft_review(&self, pr_id: &str) -> Result<(), StoreError> {
        self.conn().execute(
            "DELETE FROM draft_reviews WHERE id = ?1 OR pr_id = ?1",
            params![pr_id],
        )?;
        Ok(())
    }
}

fn scan_draft(r: &rusqlite::Row<'_>) -> rusqlite::Result<DraftReview> {
    Ok(DraftReview {
        id: r.get(0)?,
        pr_id: r.get(1)?,
        created_at: r.get(2)?,
        payload_json: r.get(3)?,
        rendered_preview: r.get(4)?,
    })
}
