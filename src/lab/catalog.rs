//! Laboratory data: instruments, analyses and the working week.

use crate::error::{EvolveError, Result};
use rand::Rng;
use std::collections::HashMap;

/// Index of an instrument in its [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentId(pub usize);

/// Index of an analysis in its [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisId(pub usize);

/// A laboratory instrument.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    pub name: String,
    /// Maximum number of booked hours per day.
    pub daily_limit: u32,
}

/// An analysis task and the instruments it occupies simultaneously.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Analysis {
    pub name: String,
    pub equipment: Vec<EquipmentId>,
    /// Length of the analysis in whole hours.
    pub duration: u32,
}

/// Start time of a booking: a day of the working week and an hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot {
    /// Index into [`Catalog::days`].
    pub day: usize,
    /// Start hour, within the opening hours.
    pub hour: u32,
}

/// Everything a plan is scheduled against.
///
/// Analyses are kept in declaration order; plans store one allocation per
/// analysis in the same order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "CatalogParts")
)]
pub struct Catalog {
    equipment: Vec<Equipment>,
    analyses: Vec<Analysis>,
    days: Vec<String>,
    open_hour: u32,
    close_hour: u32,
}

/// Unchecked catalog contents, validated on the way into a [`Catalog`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct CatalogParts {
    equipment: Vec<Equipment>,
    analyses: Vec<Analysis>,
    days: Vec<String>,
    open_hour: u32,
    close_hour: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<CatalogParts> for Catalog {
    type Error = EvolveError;

    fn try_from(parts: CatalogParts) -> Result<Self> {
        let catalog = Self {
            equipment: parts.equipment,
            analyses: parts.analyses,
            days: parts.days,
            open_hour: parts.open_hour,
            close_hour: parts.close_hour,
        };
        catalog.validate()?;
        Ok(catalog)
    }
}

const STANDARD_DAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

const STANDARD_EQUIPMENT: [(&str, u32); 8] = [
    ("Analytical Balance", 6),
    ("Magnetic Stirrer", 4),
    ("Liquid Chromatograph", 8),
    ("Gas Chromatograph", 6),
    ("UV-VIS Spectrophotometer", 4),
    ("Infrared Spectrometer", 6),
    ("Mass Spectrometer", 4),
    ("Microscope", 6),
];

const STANDARD_ANALYSES: [(&str, &[usize]); 10] = [
    ("Analysis 1", &[4, 3]),
    ("Analysis 2", &[2, 5]),
    ("Analysis 3", &[7, 0]),
    ("Analysis 4", &[6]),
    ("Analysis 5", &[1, 5]),
    ("Analysis 6", &[2, 4]),
    ("Analysis 7", &[4, 7]),
    ("Analysis 8", &[3]),
    ("Analysis 9", &[5, 0]),
    ("Analysis 10", &[6, 3]),
];

impl Catalog {
    /// The reference laboratory: eight instruments, ten one-hour analyses,
    /// Monday to Friday from 08:00 to 18:00.
    pub fn standard() -> Self {
        Self {
            equipment: STANDARD_EQUIPMENT
                .iter()
                .map(|&(name, daily_limit)| Equipment {
                    name: name.to_string(),
                    daily_limit,
                })
                .collect(),
            analyses: STANDARD_ANALYSES
                .iter()
                .map(|&(name, equipment)| Analysis {
                    name: name.to_string(),
                    equipment: equipment.iter().map(|&i| EquipmentId(i)).collect(),
                    duration: 1,
                })
                .collect(),
            days: STANDARD_DAYS.iter().map(|d| d.to_string()).collect(),
            open_hour: 8,
            close_hour: 18,
        }
    }

    /// Starts an empty [`CatalogBuilder`].
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn equipment(&self) -> &[Equipment] {
        &self.equipment
    }

    pub fn analyses(&self) -> &[Analysis] {
        &self.analyses
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }

    /// Opening hours as `(open, close)`; bookings must end by `close`.
    pub fn opening_hours(&self) -> (u32, u32) {
        (self.open_hour, self.close_hour)
    }

    pub fn equipment_by_id(&self, id: EquipmentId) -> Option<&Equipment> {
        self.equipment.get(id.0)
    }

    pub fn analysis_by_id(&self, id: AnalysisId) -> Option<&Analysis> {
        self.analyses.get(id.0)
    }

    /// Number of distinct start slots for an analysis of `duration` hours.
    pub fn slot_count(&self, duration: u32) -> usize {
        self.starts_per_day(duration) * self.days.len()
    }

    fn starts_per_day(&self, duration: u32) -> usize {
        self.close_hour
            .saturating_add(1)
            .saturating_sub(self.open_hour.saturating_add(duration)) as usize
    }

    /// The `index`-th start slot for `duration`, ordered by day then hour.
    pub fn slot_at(&self, index: usize, duration: u32) -> Option<Slot> {
        let per_day = self.starts_per_day(duration);
        if per_day == 0 || index >= self.slot_count(duration) {
            return None;
        }
        Some(Slot {
            day: index / per_day,
            hour: self.open_hour + (index % per_day) as u32,
        })
    }

    /// Inverse of [`slot_at`](Self::slot_at).
    pub fn slot_index(&self, slot: Slot, duration: u32) -> Option<usize> {
        if !self.fits(slot, duration) {
            return None;
        }
        Some(slot.day * self.starts_per_day(duration) + (slot.hour - self.open_hour) as usize)
    }

    /// Whether a booking of `duration` hours starting at `slot` lies within
    /// the working week and the opening hours.
    pub fn fits(&self, slot: Slot, duration: u32) -> bool {
        slot.day < self.days.len()
            && slot.hour >= self.open_hour
            && slot
                .hour
                .checked_add(duration)
                .is_some_and(|end| end <= self.close_hour)
    }

    /// Draws a uniformly random start slot for `duration`.
    pub fn random_slot<R: Rng>(&self, duration: u32, rng: &mut R) -> Slot {
        let day = rng.random_range(0..self.days.len());
        let hour = rng.random_range(self.open_hour..=self.close_hour - duration);
        Slot { day, hour }
    }

    /// Draws a uniformly random start slot for `duration` other than `current`.
    ///
    /// Returns `current` when it is the only slot available.
    pub fn random_other_slot<R: Rng>(&self, current: Slot, duration: u32, rng: &mut R) -> Slot {
        let count = self.slot_count(duration);
        let Some(current_idx) = self.slot_index(current, duration) else {
            return self.random_slot(duration, rng);
        };
        if count < 2 {
            return current;
        }
        let mut idx = rng.random_range(0..count - 1);
        if idx >= current_idx {
            idx += 1;
        }
        self.slot_at(idx, duration).unwrap_or(current)
    }

    /// Renders the hour range of a booking, e.g. `Monday 08:00-09:00`.
    pub fn describe_slot(&self, slot: Slot, duration: u32) -> String {
        let day = self.days.get(slot.day).map(String::as_str).unwrap_or("?");
        format!(
            "{day} {:02}:00-{:02}:00",
            slot.hour,
            slot.hour.saturating_add(duration)
        )
    }

    /// Checks internal consistency.
    ///
    /// # Errors
    /// [`EvolveError::InvalidConfiguration`] naming the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.days.is_empty() {
            return Err(EvolveError::invalid("catalog needs at least one working day"));
        }
        if self.open_hour >= self.close_hour || self.close_hour > 24 {
            return Err(EvolveError::invalid(format!(
                "opening hours {}..{} are not a valid range",
                self.open_hour, self.close_hour
            )));
        }
        if self.equipment.is_empty() {
            return Err(EvolveError::invalid("catalog needs at least one instrument"));
        }
        if self.analyses.is_empty() {
            return Err(EvolveError::invalid("catalog needs at least one analysis"));
        }
        let mut names = HashMap::new();
        for (i, eq) in self.equipment.iter().enumerate() {
            if eq.daily_limit == 0 {
                return Err(EvolveError::invalid(format!(
                    "instrument '{}' has a zero daily limit",
                    eq.name
                )));
            }
            if names.insert(eq.name.as_str(), i).is_some() {
                return Err(EvolveError::invalid(format!(
                    "instrument '{}' declared twice",
                    eq.name
                )));
            }
        }
        let open_hours = self.close_hour - self.open_hour;
        for analysis in &self.analyses {
            if analysis.equipment.is_empty() {
                return Err(EvolveError::invalid(format!(
                    "analysis '{}' requires no instrument",
                    analysis.name
                )));
            }
            if analysis.duration == 0 || analysis.duration > open_hours {
                return Err(EvolveError::invalid(format!(
                    "analysis '{}' lasts {}h, must be within 1..={open_hours}",
                    analysis.name, analysis.duration
                )));
            }
            for (pos, id) in analysis.equipment.iter().enumerate() {
                if id.0 >= self.equipment.len() {
                    return Err(EvolveError::invalid(format!(
                        "analysis '{}' references unknown instrument #{}",
                        analysis.name, id.0
                    )));
                }
                if analysis.equipment[..pos].contains(id) {
                    return Err(EvolveError::invalid(format!(
                        "analysis '{}' lists instrument '{}' twice",
                        analysis.name, self.equipment[id.0].name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Builds a [`Catalog`] by name, resolving instrument references on
/// [`build`](CatalogBuilder::build).
///
/// ```
/// use u_evoplan::lab::Catalog;
///
/// let catalog = Catalog::builder()
///     .days(["Mon", "Tue"])
///     .opening_hours(9, 17)
///     .equipment("Centrifuge", 4)
///     .equipment("Microscope", 6)
///     .analysis("Blood panel", &["Centrifuge", "Microscope"], 2)
///     .build()
///     .unwrap();
/// assert_eq!(catalog.analyses().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    equipment: Vec<Equipment>,
    analyses: Vec<(String, Vec<String>, u32)>,
    days: Vec<String>,
    open_hour: u32,
    close_hour: u32,
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self {
            equipment: Vec::new(),
            analyses: Vec::new(),
            days: STANDARD_DAYS.iter().map(|d| d.to_string()).collect(),
            open_hour: 8,
            close_hour: 18,
        }
    }
}

impl CatalogBuilder {
    /// Replaces the working days (Monday to Friday by default).
    pub fn days<S, D>(mut self, days: D) -> Self
    where
        S: Into<String>,
        D: IntoIterator<Item = S>,
    {
        self.days = days.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the opening hours (08:00 to 18:00 by default).
    pub fn opening_hours(mut self, open: u32, close: u32) -> Self {
        self.open_hour = open;
        self.close_hour = close;
        self
    }

    /// Adds an instrument with its daily hour cap.
    pub fn equipment(mut self, name: impl Into<String>, daily_limit: u32) -> Self {
        self.equipment.push(Equipment {
            name: name.into(),
            daily_limit,
        });
        self
    }

    /// Adds an analysis occupying the named instruments for `duration` hours.
    pub fn analysis(mut self, name: impl Into<String>, equipment: &[&str], duration: u32) -> Self {
        self.analyses.push((
            name.into(),
            equipment.iter().map(|s| s.to_string()).collect(),
            duration,
        ));
        self
    }

    /// Resolves references and validates the result.
    ///
    /// # Errors
    /// [`EvolveError::InvalidConfiguration`] for unknown instrument names or
    /// any problem reported by [`Catalog::validate`].
    pub fn build(self) -> Result<Catalog> {
        let index: HashMap<&str, usize> = self
            .equipment
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.as_str(), i))
            .collect();

        let mut analyses = Vec::with_capacity(self.analyses.len());
        for (name, equipment, duration) in &self.analyses {
            let ids = equipment
                .iter()
                .map(|eq| {
                    index.get(eq.as_str()).map(|&i| EquipmentId(i)).ok_or_else(|| {
                        EvolveError::invalid(format!(
                            "analysis '{name}' references unknown instrument '{eq}'"
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            analyses.push(Analysis {
                name: name.clone(),
                equipment: ids,
                duration: *duration,
            });
        }

        let catalog = Catalog {
            equipment: self.equipment,
            analyses,
            days: self.days,
            open_hour: self.open_hour,
            close_hour: self.close_hour,
        };
        catalog.validate()?;
        Ok(catalog)
    }
}
