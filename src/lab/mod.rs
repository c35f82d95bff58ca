//! Laboratory equipment scheduling.
//!
//! Assigns analyses to instrument time slots over a working week. Each
//! analysis needs one or more instruments at the same time; instruments
//! have a daily hour cap and can serve one analysis per hour.
//!
//! [`EquipmentPlan`] is the GA individual, [`LabProblem`] seeds random
//! plans, and [`Catalog`] describes the laboratory.

mod catalog;
mod plan;

pub use catalog::{Analysis, AnalysisId, Catalog, CatalogBuilder, Equipment, EquipmentId, Slot};
pub use plan::{
    Allocation, Booking, EquipmentPlan, LabProblem, PenaltyWeights, Violations,
    DAILY_LIMIT_PENALTY, DESYNC_PENALTY, SLOT_CONFLICT_PENALTY,
};
