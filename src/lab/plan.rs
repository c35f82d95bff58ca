//! Equipment usage plan: the scheduling individual.

use super::catalog::{AnalysisId, Catalog, EquipmentId, Slot};
use crate::error::{EvolveError, Result};
use crate::ga::{penalty_to_fitness, GaProblem, Individual};
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Penalty for every booked hour beyond an instrument's daily limit.
pub const DAILY_LIMIT_PENALTY: f64 = 100.0;

/// Penalty for every instrument hour booked by more than one analysis.
pub const SLOT_CONFLICT_PENALTY: f64 = 200.0;

/// Penalty for every instrument of a multi-instrument analysis that does not
/// start together with the first one.
pub const DESYNC_PENALTY: f64 = 300.0;

/// Weights turning constraint violations into a penalty.
///
/// The defaults are hand-tuned values, not derived ones.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PenaltyWeights {
    pub daily_limit: f64,
    pub slot_conflict: f64,
    pub desync: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            daily_limit: DAILY_LIMIT_PENALTY,
            slot_conflict: SLOT_CONFLICT_PENALTY,
            desync: DESYNC_PENALTY,
        }
    }
}

/// Violation counts found by one scan of a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Violations {
    /// Instrument hours booked past the daily limit.
    pub over_limit: usize,
    /// Instrument hours already taken by an earlier booking.
    pub conflicts: usize,
    /// Instruments not starting with the rest of their analysis.
    pub desynced: usize,
}

impl Violations {
    pub fn penalty(&self, weights: &PenaltyWeights) -> f64 {
        self.over_limit as f64 * weights.daily_limit
            + self.conflicts as f64 * weights.slot_conflict
            + self.desynced as f64 * weights.desync
    }

    pub fn is_feasible(&self) -> bool {
        *self == Violations::default()
    }
}

/// One instrument booked at one start slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Booking {
    pub equipment: EquipmentId,
    pub slot: Slot,
}

/// The bookings of one analysis, one per required instrument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Allocation {
    pub analysis: AnalysisId,
    pub bookings: Vec<Booking>,
}

impl Allocation {
    /// Books every instrument in `equipment` at the same `slot`.
    pub fn synchronized(analysis: AnalysisId, equipment: &[EquipmentId], slot: Slot) -> Self {
        Self {
            analysis,
            bookings: equipment
                .iter()
                .map(|&equipment| Booking { equipment, slot })
                .collect(),
        }
    }

    /// Start slot of the first instrument.
    pub fn slot(&self) -> Option<Slot> {
        self.bookings.first().map(|b| b.slot)
    }

    pub fn is_synchronized(&self) -> bool {
        match self.slot() {
            Some(first) => self.bookings.iter().all(|b| b.slot == first),
            None => true,
        }
    }
}

/// A complete assignment of analyses to instrument slots.
///
/// Holds one [`Allocation`] per catalog analysis, in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentPlan {
    catalog: Arc<Catalog>,
    weights: PenaltyWeights,
    allocations: Vec<Allocation>,
}

impl EquipmentPlan {
    /// Draws a random plan: every analysis at a random slot, all of its
    /// instruments together.
    pub fn random<R: Rng>(catalog: Arc<Catalog>, weights: PenaltyWeights, rng: &mut R) -> Self {
        let allocations = catalog
            .analyses()
            .iter()
            .enumerate()
            .map(|(i, analysis)| {
                let slot = catalog.random_slot(analysis.duration, rng);
                Allocation::synchronized(AnalysisId(i), &analysis.equipment, slot)
            })
            .collect();
        Self {
            catalog,
            weights,
            allocations,
        }
    }

    /// Builds a plan from explicit allocations.
    ///
    /// Bookings do not have to be synchronized; desynchronized analyses are
    /// penalized by [`fitness`](Individual::fitness).
    ///
    /// # Errors
    /// - [`EvolveError::ShapeMismatch`] if the allocations do not cover the
    ///   catalog analyses in order with their exact instrument lists
    /// - [`EvolveError::InvalidConfiguration`] if a booking falls outside
    ///   the working week or the opening hours
    pub fn from_allocations(
        catalog: Arc<Catalog>,
        weights: PenaltyWeights,
        allocations: Vec<Allocation>,
    ) -> Result<Self> {
        let analyses = catalog.analyses();
        if allocations.len() != analyses.len() {
            return Err(EvolveError::ShapeMismatch(format!(
                "{} allocations for {} analyses",
                allocations.len(),
                analyses.len()
            )));
        }
        for (i, (alloc, analysis)) in allocations.iter().zip(analyses).enumerate() {
            if alloc.analysis != AnalysisId(i) {
                return Err(EvolveError::ShapeMismatch(format!(
                    "allocation #{i} belongs to analysis #{}",
                    alloc.analysis.0
                )));
            }
            let booked: Vec<EquipmentId> = alloc.bookings.iter().map(|b| b.equipment).collect();
            if booked != analysis.equipment {
                return Err(EvolveError::ShapeMismatch(format!(
                    "'{}' must book exactly its required instruments",
                    analysis.name
                )));
            }
            for booking in &alloc.bookings {
                if !catalog.fits(booking.slot, analysis.duration) {
                    return Err(EvolveError::invalid(format!(
                        "'{}' is booked outside the working week",
                        analysis.name
                    )));
                }
            }
        }
        Ok(Self {
            catalog,
            weights,
            allocations,
        })
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn weights(&self) -> &PenaltyWeights {
        &self.weights
    }

    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    /// Scans the allocations once, in catalog order, hour by hour.
    ///
    /// An instrument hour counts against the daily limit only while the
    /// limit is not yet reached; every hour is checked for a clash with the
    /// bookings scanned before it.
    pub fn violations(&self) -> Violations {
        let mut violations = Violations::default();
        let mut daily_use: HashMap<(EquipmentId, usize), u32> = HashMap::new();
        let mut occupied: HashSet<(EquipmentId, usize, u32)> = HashSet::new();

        for alloc in &self.allocations {
            let duration = self
                .catalog
                .analysis_by_id(alloc.analysis)
                .map_or(1, |a| a.duration);

            for booking in &alloc.bookings {
                let limit = self
                    .catalog
                    .equipment_by_id(booking.equipment)
                    .map_or(0, |e| e.daily_limit);
                let Slot { day, hour: start } = booking.slot;

                for hour in start..start.saturating_add(duration) {
                    let used = daily_use.entry((booking.equipment, day)).or_insert(0);
                    if *used >= limit {
                        violations.over_limit += 1;
                    } else {
                        *used += 1;
                    }

                    if !occupied.insert((booking.equipment, day, hour)) {
                        violations.conflicts += 1;
                    }
                }
            }

            if let Some(first) = alloc.slot() {
                violations.desynced += alloc.bookings.iter().filter(|b| b.slot != first).count();
            }
        }
        violations
    }

    /// Weighted penalty of [`violations`](Self::violations).
    pub fn penalty(&self) -> f64 {
        self.violations().penalty(&self.weights)
    }

    fn check_shape(&self, other: &Self) -> Result<()> {
        if !Arc::ptr_eq(&self.catalog, &other.catalog) && self.catalog != other.catalog {
            return Err(EvolveError::ShapeMismatch(
                "plans were built from different catalogs".into(),
            ));
        }
        if self.allocations.len() != other.allocations.len() {
            return Err(EvolveError::ShapeMismatch(format!(
                "{} allocations vs {}",
                self.allocations.len(),
                other.allocations.len()
            )));
        }
        Ok(())
    }
}

impl Individual for EquipmentPlan {
    fn fitness(&self) -> f64 {
        penalty_to_fitness(self.penalty())
    }

    /// Moves one random analysis, all of its instruments together, to a
    /// different start slot.
    fn mutate<R: Rng>(&self, rng: &mut R) -> Self {
        let mut allocations = self.allocations.clone();
        if allocations.is_empty() {
            return self.clone();
        }
        let idx = rng.random_range(0..allocations.len());
        let alloc = &mut allocations[idx];

        if let Some(analysis) = self.catalog.analysis_by_id(alloc.analysis) {
            let new_slot = match alloc.slot() {
                Some(current) => self.catalog.random_other_slot(current, analysis.duration, rng),
                None => self.catalog.random_slot(analysis.duration, rng),
            };
            *alloc = Allocation::synchronized(alloc.analysis, &analysis.equipment, new_slot);
        }

        Self {
            catalog: Arc::clone(&self.catalog),
            weights: self.weights,
            allocations,
        }
    }

    /// Uniform crossover: each analysis keeps the allocation of either
    /// parent with equal probability.
    fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> Result<Self> {
        self.check_shape(other)?;

        let allocations = self
            .allocations
            .iter()
            .zip(&other.allocations)
            .map(|(mine, theirs)| {
                if rng.random_bool(0.5) {
                    mine.clone()
                } else {
                    theirs.clone()
                }
            })
            .collect();

        Ok(Self {
            catalog: Arc::clone(&self.catalog),
            weights: self.weights,
            allocations,
        })
    }
}

impl fmt::Display for EquipmentPlan {
    /// One line per analysis, then the fitness rounded to 3 decimals.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for alloc in &self.allocations {
            let Some(analysis) = self.catalog.analysis_by_id(alloc.analysis) else {
                continue;
            };
            let duration = analysis.duration;
            let name_of = |id: EquipmentId| {
                self.catalog
                    .equipment_by_id(id)
                    .map_or("?", |e| e.name.as_str())
            };

            write!(f, "{}: ", analysis.name)?;
            match alloc.slot() {
                Some(slot) if alloc.is_synchronized() => {
                    let names: Vec<&str> = alloc.bookings.iter().map(|b| name_of(b.equipment)).collect();
                    write!(
                        f,
                        "{} | {}",
                        names.join(", "),
                        self.catalog.describe_slot(slot, duration)
                    )?;
                }
                _ => {
                    let parts: Vec<String> = alloc
                        .bookings
                        .iter()
                        .map(|b| {
                            format!(
                                "{} @ {}",
                                name_of(b.equipment),
                                self.catalog.describe_slot(b.slot, duration)
                            )
                        })
                        .collect();
                    write!(f, "{}", parts.join(", "))?;
                }
            }
            writeln!(f, " ({duration}h)")?;
        }
        write!(f, "fitness: {:.3}", self.fitness())
    }
}

/// Random equipment plans over a shared catalog.
#[derive(Debug, Clone)]
pub struct LabProblem {
    catalog: Arc<Catalog>,
    weights: PenaltyWeights,
}

impl LabProblem {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            weights: PenaltyWeights::default(),
        }
    }

    /// The reference laboratory with default weights.
    pub fn standard() -> Self {
        Self::new(Catalog::standard())
    }

    pub fn with_weights(mut self, weights: PenaltyWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }
}

impl GaProblem for LabProblem {
    type Individual = EquipmentPlan;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> EquipmentPlan {
        EquipmentPlan::random(Arc::clone(&self.catalog), self.weights, rng)
    }
}
