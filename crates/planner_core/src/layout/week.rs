//! Five-day week grid of lesson and break blocks.
//!
//! # Responsibility
//! - Build per-day block sequences from lesson/break counts.
//! - Number lesson slots contiguously across the week.
//! - Place blocks vertically through the proportional allocator.
//!
//! # Invariants
//! - Slots start at 1 and follow day order, then top-to-bottom order.
//! - A break follows lesson `i` only when `i < breaks`.

use super::allocator::{allocate, LayoutError, Span, Weighted};
use chrono::Weekday;

/// Relative height of a lesson block.
pub const LESSON_WEIGHT: u32 = 4;
/// Relative height of a break block.
pub const BREAK_WEIGHT: u32 = 1;

/// School days in display order.
pub const SCHOOL_DAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// Lesson and break counts for one day column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayConfig {
    pub lessons: u32,
    pub breaks: u32,
}

impl DayConfig {
    pub const fn new(lessons: u32, breaks: u32) -> Self {
        Self { lessons, breaks }
    }
}

const STANDARD_WEEK: [DayConfig; 5] = [
    DayConfig::new(4, 3),
    DayConfig::new(3, 2),
    DayConfig::new(4, 3),
    DayConfig::new(3, 2),
    DayConfig::new(4, 3),
];

/// One visual block inside a day column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    Lesson { slot: u32 },
    Break,
}

impl Weighted for Block {
    fn weight(&self) -> u32 {
        match self {
            Self::Lesson { .. } => LESSON_WEIGHT,
            Self::Break => BREAK_WEIGHT,
        }
    }
}

/// Block paired with its allocated vertical span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedBlock {
    pub block: Block,
    pub span: Span,
}

/// Ordered blocks for a single weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayColumn {
    pub day: Weekday,
    pub blocks: Vec<Block>,
}

impl DayColumn {
    /// Lesson slots in this column, top to bottom.
    pub fn slots(&self) -> impl Iterator<Item = u32> + '_ {
        self.blocks.iter().filter_map(|block| match block {
            Block::Lesson { slot } => Some(*slot),
            Block::Break => None,
        })
    }

    /// Places every block inside a column of `height` pixels.
    ///
    /// Must be called again whenever the column height changes.
    pub fn layout(&self, height: u32) -> Result<Vec<PlacedBlock>, LayoutError> {
        let spans = allocate(&self.blocks, height)?;
        Ok(self
            .blocks
            .iter()
            .zip(spans)
            .map(|(block, span)| PlacedBlock {
                block: *block,
                span,
            })
            .collect())
    }
}

/// Week of day columns with globally numbered lesson slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekGrid {
    days: Vec<DayColumn>,
    slot_count: u32,
}

impl WeekGrid {
    /// Builds the default timetable: Mon/Wed/Fri 4+3, Tue/Thu 3+2.
    pub fn standard() -> Self {
        Self::new(STANDARD_WEEK)
    }

    /// Builds a grid from one config per school day.
    pub fn new(configs: [DayConfig; 5]) -> Self {
        let mut next_slot = 1;
        let mut days = Vec::with_capacity(SCHOOL_DAYS.len());

        for (day, config) in SCHOOL_DAYS.into_iter().zip(configs) {
            let mut blocks = Vec::new();
            for index in 0..config.lessons {
                blocks.push(Block::Lesson { slot: next_slot });
                next_slot += 1;
                if index < config.breaks {
                    blocks.push(Block::Break);
                }
            }
            days.push(DayColumn { day, blocks });
        }

        Self {
            days,
            slot_count: next_slot - 1,
        }
    }

    pub fn days(&self) -> &[DayColumn] {
        &self.days
    }

    pub fn day(&self, day: Weekday) -> Option<&DayColumn> {
        self.days.iter().find(|column| column.day == day)
    }

    /// Total number of lesson slots across the week.
    pub fn slot_count(&self) -> u32 {
        self.slot_count
    }

    pub fn contains_slot(&self, slot: u32) -> bool {
        (1..=self.slot_count).contains(&slot)
    }
}
