//! Spacer Encoding
//!
//! The space taken by unrendered rows above and below the visible range.
//! Layout engines with limited numeric precision cannot take one huge length,
//! so large extents are expressed as a sum of bounded chunks.

use crate::constants::{SPACER_CEILING, SPACER_CHUNK_ROWS};

/// `rows * row_height` units of vertical space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacerChunk {
    pub rows: u64,
    pub row_height: f64,
}

impl SpacerChunk {
    pub fn extent(&self) -> f64 {
        self.rows as f64 * self.row_height
    }
}

/// Vertical space standing in for a run of unrendered rows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spacer {
    chunks: Vec<SpacerChunk>,
}

impl Spacer {
    pub const NONE: Spacer = Spacer { chunks: Vec::new() };

    /// Encode the space of `rows` rows of `row_height` each
    ///
    /// Products below the ceiling stay one chunk; larger ones are split into
    /// chunks of at most [`SPACER_CHUNK_ROWS`] rows.
    pub fn new(rows: u64, row_height: f64) -> Self {
        if rows == 0 {
            return Self::NONE;
        }
        if (rows as f64) * row_height < SPACER_CEILING {
            return Self {
                chunks: vec![SpacerChunk { rows, row_height }],
            };
        }

        let mut remaining = rows;
        let mut chunks = Vec::with_capacity((rows / SPACER_CHUNK_ROWS + 1) as usize);
        while remaining > SPACER_CHUNK_ROWS {
            chunks.push(SpacerChunk {
                rows: SPACER_CHUNK_ROWS,
                row_height,
            });
            remaining -= SPACER_CHUNK_ROWS;
        }
        chunks.push(SpacerChunk {
            rows: remaining,
            row_height,
        });
        Self { chunks }
    }

    pub fn chunks(&self) -> &[SpacerChunk] {
        &self.chunks
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of rows represented
    pub fn rows(&self) -> u64 {
        self.chunks.iter().map(|c| c.rows).sum()
    }

    /// Total extent in layout units
    pub fn extent(&self) -> f64 {
        self.chunks.iter().map(SpacerChunk::extent).sum()
    }
}
