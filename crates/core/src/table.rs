//! Precomputed ranges for every display in the operating range
//!
//! A dashboard showing many stations looks up the same few hundred displays
//! over and over. [`RangeTable`] inverts each whole-degree display once, in
//! parallel, and keeps the results as an immutable sorted table.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::DomainBounds;
use crate::error::{Result, RoundingError};
use crate::pipeline::Pipeline;
use crate::range_finder::{RangeFinder, UncertaintyRange};

/// One row of a [`RangeTable`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeTableEntry {
    /// Whole-degree Fahrenheit display
    pub displayed_f: i64,
    /// Readings behind it, or `None` if the chain never publishes it
    pub range: Option<UncertaintyRange>,
}

/// Inverted ranges for one chain over a whole operating range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeTable {
    /// Chain the table was built for
    pub pipeline: Pipeline,
    /// Operating range covered
    pub bounds: DomainBounds,
    entries: Vec<RangeTableEntry>,
}

impl RangeTable {
    /// Invert every whole-degree display inside `bounds`
    ///
    /// # Errors
    /// [`RoundingError::Inconsistent`] if any display fails verification;
    /// unreachable displays are recorded, not errors.
    pub fn build(pipeline: Pipeline, bounds: &DomainBounds) -> Result<Self> {
        let finder = RangeFinder::new(*bounds);
        let lo = bounds.min_f.ceil() as i64;
        let hi = bounds.max_f.floor() as i64;

        let entries = (lo..=hi)
            .into_par_iter()
            .map(|displayed_f| match finder.find_range(displayed_f, pipeline) {
                Ok(range) => Ok(RangeTableEntry {
                    displayed_f,
                    range: Some(range),
                }),
                Err(RoundingError::Unreachable { .. }) => Ok(RangeTableEntry {
                    displayed_f,
                    range: None,
                }),
                Err(e) => Err(e),
            })
            .collect::<Result<Vec<_>>>()?;

        let table = Self {
            pipeline,
            bounds: *bounds,
            entries,
        };
        info!(
            %pipeline,
            displays = table.entries.len(),
            unreachable = table.unreachable().len(),
            "built range table"
        );
        Ok(table)
    }

    /// All rows, ascending by display
    pub fn entries(&self) -> &[RangeTableEntry] {
        &self.entries
    }

    /// Range for a display, if it is covered and reachable
    pub fn get(&self, displayed_f: i64) -> Option<&UncertaintyRange> {
        self.entries
            .binary_search_by_key(&displayed_f, |e| e.displayed_f)
            .ok()
            .and_then(|i| self.entries[i].range.as_ref())
    }

    /// Ranges of every display the chain can publish
    pub fn reachable(&self) -> impl Iterator<Item = &UncertaintyRange> {
        self.entries.iter().filter_map(|e| e.range.as_ref())
    }

    /// Displays the chain never publishes
    pub fn unreachable(&self) -> Vec<i64> {
        self.entries
            .iter()
            .filter(|e| e.range.is_none())
            .map(|e| e.displayed_f)
            .collect()
    }
}
