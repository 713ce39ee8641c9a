//! Weekly lesson plan use-case service.
//!
//! # Responsibility
//! - Combine the week grid with a tenant's stored slot assignments.
//! - Reject assignments to slots the grid does not have.
//!
//! # Invariants
//! - Every slot of the grid reads as some lesson; unassigned slots are
//!   `Lesson::None`.
//! - Service APIs never bypass repository persistence contracts.

use crate::layout::week::WeekGrid;
use crate::model::lesson::Lesson;
use crate::model::tenant::TenantId;
use crate::repo::lesson_plan_repo::{LessonMap, LessonPlanRepository, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from lesson plan operations.
#[derive(Debug)]
pub enum WeekPlanError {
    /// Slot is not part of the week grid.
    SlotOutOfRange { slot: u32, slot_count: u32 },
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for WeekPlanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SlotOutOfRange { slot, slot_count } => {
                write!(f, "slot {slot} is outside the week grid (1..={slot_count})")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WeekPlanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SlotOutOfRange { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for WeekPlanError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// A tenant's lessons laid over the week grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekPlan {
    lessons: LessonMap,
}

impl WeekPlan {
    /// Lesson in `slot`, `Lesson::None` when unassigned.
    pub fn lesson_at(&self, slot: u32) -> Lesson {
        self.lessons.get(&slot).copied().unwrap_or_default()
    }

    /// Assigned (non-empty) slots in slot order.
    pub fn assigned(&self) -> impl Iterator<Item = (u32, Lesson)> + '_ {
        self.lessons
            .iter()
            .filter(|(_, lesson)| !lesson.is_placeholder())
            .map(|(slot, lesson)| (*slot, *lesson))
    }
}

/// Use-case service for loading, editing and saving week plans.
pub struct WeekPlanService<R: LessonPlanRepository> {
    repo: R,
    grid: WeekGrid,
}

impl<R: LessonPlanRepository> WeekPlanService<R> {
    /// Creates a service over the standard week grid.
    pub fn new(repo: R) -> Self {
        Self::with_grid(repo, WeekGrid::standard())
    }

    pub fn with_grid(repo: R, grid: WeekGrid) -> Self {
        Self { repo, grid }
    }

    pub fn grid(&self) -> &WeekGrid {
        &self.grid
    }

    /// Loads `tenant`'s plan. Stored slots outside the grid are ignored.
    pub fn load(&self, tenant: &TenantId) -> Result<WeekPlan, WeekPlanError> {
        let mut lessons = self.repo.load_lessons(tenant)?;
        lessons.retain(|slot, _| self.grid.contains_slot(*slot));
        Ok(WeekPlan { lessons })
    }

    /// Sets `slot` to `lesson`; `Lesson::None` clears the slot.
    pub fn assign(
        &self,
        plan: &mut WeekPlan,
        slot: u32,
        lesson: Lesson,
    ) -> Result<(), WeekPlanError> {
        if !self.grid.contains_slot(slot) {
            return Err(WeekPlanError::SlotOutOfRange {
                slot,
                slot_count: self.grid.slot_count(),
            });
        }
        if lesson.is_placeholder() {
            plan.lessons.remove(&slot);
        } else {
            plan.lessons.insert(slot, lesson);
        }
        Ok(())
    }

    /// Replaces `tenant`'s stored plan with `plan`.
    pub fn save(&self, tenant: &TenantId, plan: &WeekPlan) -> Result<(), WeekPlanError> {
        self.repo.save_lessons(tenant, &plan.lessons)?;
        info!(
            "event=week_plan_save module=service status=ok assigned={}",
            plan.lessons.len()
        );
        Ok(())
    }
}
