//! The color board: member count plus one color per member.
//!
//! Storage layout:
//! - `numOfMember`: member count as a decimal string
//! - `0`, `1`, ... `numOfMember - 1`: color name for each member
//!
//! The keys are written one at a time with no transaction. A submission that
//! fails halfway leaves the earlier keys updated and the later ones as they
//! were; concurrent submissions interleave per key.

use std::sync::Arc;

use crewcolor_storage::StorageBackend;
use tracing::{debug, info};

use crate::error::BoardError;
use crate::palette;

/// Storage key holding the member count.
pub const MEMBER_COUNT_KEY: &str = "numOfMember";

/// Storage key holding the color of the member at `index` (0-based).
#[must_use]
pub fn color_key(index: usize) -> String {
    index.to_string()
}

/// A full color assignment as submitted by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Submission {
    /// How many members are playing this round.
    pub member_count: usize,
    /// Color per member, indexed from 0. May be shorter than `member_count`,
    /// in which case the first missing member is reported as not selected.
    pub colors: Vec<String>,
}

/// Reads and writes the color assignment through a storage backend.
#[derive(Clone)]
pub struct ColorBoard {
    storage: Arc<dyn StorageBackend>,
}

impl std::fmt::Debug for ColorBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorBoard").finish_non_exhaustive()
    }
}

impl ColorBoard {
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Read the stored member count.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CorruptCount`] if the stored value does not parse
    /// and [`BoardError::Storage`] if the backend fails. An absent key is
    /// `Ok(None)`.
    pub async fn member_count(&self) -> Result<Option<usize>, BoardError> {
        let Some(raw) = self.storage.get(MEMBER_COUNT_KEY).await? else {
            return Ok(None);
        };

        raw.parse()
            .map(Some)
            .map_err(|_| BoardError::CorruptCount { value: raw })
    }

    /// Read the colors of the first `slots` members, whatever the stored
    /// count is. Absent keys come back as empty strings.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Storage`] if any read fails.
    pub async fn saved_colors(&self, slots: usize) -> Result<Vec<String>, BoardError> {
        let mut colors = Vec::with_capacity(slots);
        for index in 0..slots {
            let color = self.storage.get(&color_key(index)).await?;
            colors.push(color.unwrap_or_default());
        }
        Ok(colors)
    }

    /// Read the current assignment: exactly one color per member, in order.
    ///
    /// # Errors
    ///
    /// - [`BoardError::CountNotSet`] if nothing has been submitted yet
    /// - [`BoardError::ColorNotSet`] if a member inside the count has no
    ///   color (absent or empty)
    /// - [`BoardError::CorruptCount`] / [`BoardError::Storage`] as for
    ///   [`member_count`](Self::member_count)
    pub async fn assigned_colors(&self) -> Result<Vec<String>, BoardError> {
        let count = self.member_count().await?.ok_or(BoardError::CountNotSet)?;

        // The stored count is whatever the last submit wrote; it may be far
        // larger than the keys that actually exist.
        let mut colors = Vec::with_capacity(count.min(palette::MAX_MEMBERS));
        for index in 0..count {
            match self.storage.get(&color_key(index)).await? {
                Some(color) if !color.is_empty() => colors.push(color),
                _ => return Err(BoardError::ColorNotSet { position: index + 1 }),
            }
        }
        Ok(colors)
    }

    /// Persist a submission.
    ///
    /// The count is written first and unconditionally. Colors follow in index
    /// order; the first empty or missing color stops the loop, leaving every
    /// earlier index written and every later index untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ColorNotSelected`] for the first empty color and
    /// [`BoardError::Storage`] if a write fails.
    pub async fn submit(&self, submission: &Submission) -> Result<(), BoardError> {
        self.storage
            .set(MEMBER_COUNT_KEY, &submission.member_count.to_string())
            .await?;

        for index in 0..submission.member_count {
            let color = submission
                .colors
                .get(index)
                .map(String::as_str)
                .unwrap_or_default();
            if color.is_empty() {
                debug!(position = index + 1, "submission stopped at unselected color");
                return Err(BoardError::ColorNotSelected { position: index + 1 });
            }

            self.storage.set(&color_key(index), color).await?;
        }

        info!(members = submission.member_count, "color assignment saved");
        Ok(())
    }
}
