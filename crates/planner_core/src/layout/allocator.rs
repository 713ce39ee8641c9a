//! Weighted proportional space allocator.
//!
//! # Responsibility
//! - Split one pixel extent into contiguous spans proportional to weights.
//! - Stay a pure function so callers can re-run it on every resize.
//!
//! # Invariants
//! - Output has the same length and order as the input.
//! - Spans are contiguous: `offset[i + 1] == offset[i] + extent[i]`.
//! - Extents never sum past `total_extent`; with `Truncate` the shortfall is
//!   bounded by the item count.
//! - A non-empty sequence with zero total weight is an error, never a
//!   division by zero.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Something that claims a relative share of layout space.
pub trait Weighted {
    fn weight(&self) -> u32;
}

impl Weighted for u32 {
    fn weight(&self) -> u32 {
        *self
    }
}

impl<T: Weighted + ?Sized> Weighted for &T {
    fn weight(&self) -> u32 {
        (**self).weight()
    }
}

/// One allocated `(offset, extent)` pair along the layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub offset: u32,
    pub extent: u32,
}

impl Span {
    /// Trailing edge (exclusive) of this span.
    pub fn end(&self) -> u32 {
        self.offset + self.extent
    }
}

/// How the floor-rounding remainder is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemainderPolicy {
    /// Drop the remainder; the last span may end short of the total extent.
    #[default]
    Truncate,
    /// Add the remainder to the last span so the full extent is covered.
    FillLast,
}

/// Errors from layout allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Items were supplied but their weights sum to zero.
    DegenerateLayout { item_count: usize },
}

impl Display for LayoutError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DegenerateLayout { item_count } => write!(
                f,
                "cannot lay out {item_count} item(s) with a total weight of zero"
            ),
        }
    }
}

impl Error for LayoutError {}

/// Allocates `total_extent` across `items` using [`RemainderPolicy::Truncate`].
///
/// # Errors
/// - [`LayoutError::DegenerateLayout`] when `items` is non-empty and every
///   weight is zero.
pub fn allocate<T: Weighted>(items: &[T], total_extent: u32) -> Result<Vec<Span>, LayoutError> {
    allocate_with(items, total_extent, RemainderPolicy::Truncate)
}

/// Allocates `total_extent` across `items` with an explicit remainder policy.
///
/// Each extent is `floor(weight * total_extent / total_weight)`, computed in
/// 64-bit integers so large weights cannot overflow.
pub fn allocate_with<T: Weighted>(
    items: &[T],
    total_extent: u32,
    policy: RemainderPolicy,
) -> Result<Vec<Span>, LayoutError> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let total_weight: u64 = items.iter().map(|item| u64::from(item.weight())).sum();
    if total_weight == 0 {
        return Err(LayoutError::DegenerateLayout {
            item_count: items.len(),
        });
    }

    let mut spans = Vec::with_capacity(items.len());
    let mut offset: u32 = 0;
    for item in items {
        let scaled = u64::from(item.weight()) * u64::from(total_extent) / total_weight;
        // scaled <= total_extent because weight <= total_weight.
        let extent = scaled as u32;
        spans.push(Span { offset, extent });
        offset += extent;
    }

    if policy == RemainderPolicy::FillLast {
        if let Some(last) = spans.last_mut() {
            last.extent += total_extent - offset;
        }
    }

    Ok(spans)
}
