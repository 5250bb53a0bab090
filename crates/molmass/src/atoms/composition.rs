use crate::{AtomicDatabase, ELEMENT_COUNT, ElementComposition, ElementId, ElementTally};

impl Default for ElementComposition {
    fn default() -> Self {
        Self {
            tallies: vec![ElementTally::default(); ELEMENT_COUNT],
        }
    }
}

impl ElementComposition {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn tally(&self, id: ElementId) -> &ElementTally {
        &self.tallies[id.index()]
    }

    pub(crate) fn tally_mut(&mut self, id: ElementId) -> &mut ElementTally {
        &mut self.tallies[id.index()]
    }

    /// Atom count for a single element (explicitly specified isotopes included)
    pub fn count(&self, id: ElementId) -> f64 {
        self.tally(id).count
    }

    /// Every element with a non-empty tally, in atomic-number order
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &ElementTally)> {
        self.tallies
            .iter()
            .enumerate()
            .filter(|(_, tally)| !tally.is_empty())
            .map(|(index, tally)| (ElementId::from_index(index), tally))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// `Σ count · element mass + Σ isotopic correction`
    pub fn total_mass(&self, db: &AtomicDatabase) -> f64 {
        self.iter()
            .map(|(id, tally)| tally.count * db.element(id).mass() + tally.isotopic_correction)
            .sum()
    }

    /// Variance of the total mass: `Σ count · uncertainty²` per element, where
    /// atoms pinned to an explicit isotope contribute no intrinsic uncertainty
    pub(crate) fn mass_variance(&self, db: &AtomicDatabase) -> f64 {
        self.iter()
            .map(|(id, tally)| {
                let plain = (tally.count - tally.explicit_count()).max(0.0);
                let uncertainty = db.element(id).uncertainty();
                plain * uncertainty * uncertainty
            })
            .sum()
    }

    /// Percent of the total mass contributed by each present element. All
    /// zeros when the total mass is zero — no division is attempted.
    pub fn percent_composition(&self, db: &AtomicDatabase) -> Vec<(ElementId, f64)> {
        let total = self.total_mass(db);
        self.iter()
            .map(|(id, tally)| {
                let element_mass = tally.count * db.element(id).mass() + tally.isotopic_correction;
                let percent = if total == 0.0 {
                    0.0
                } else {
                    element_mass / total * 100.0
                };
                (id, percent)
            })
            .collect()
    }

    /// Empirical-formula text: carbon first, then hydrogen, then the remaining
    /// elements alphabetically by symbol
    pub fn to_empirical(&self, db: &AtomicDatabase) -> String {
        let mut present: Vec<(ElementId, f64)> = self
            .iter()
            .filter(|(_, tally)| tally.count != 0.0)
            .map(|(id, tally)| (id, tally.count))
            .collect();
        present.sort_by(|&(a, _), &(b, _)| {
            empirical_rank(db, a)
                .cmp(&empirical_rank(db, b))
                .then_with(|| db.element(a).symbol().cmp(db.element(b).symbol()))
        });

        let mut formula = String::new();
        for (id, count) in present {
            formula.push_str(db.element(id).symbol());
            if count != 1.0 {
                formula.push_str(&format_count(count));
            }
        }
        formula
    }

    /// Fold `scale` copies of `other` into this composition — used when an
    /// abbreviation's single-unit expansion is multiplied in
    pub(crate) fn merge_scaled(&mut self, other: &Self, scale: f64) {
        if scale == 0.0 {
            return;
        }
        for (ours, theirs) in self.tallies.iter_mut().zip(&other.tallies) {
            ours.count += theirs.count * scale;
            ours.isotopic_correction += theirs.isotopic_correction * scale;
            for explicit in &theirs.explicit_isotopes {
                ours.explicit_isotopes.push(crate::ExplicitIsotope {
                    mass: explicit.mass,
                    count: explicit.count * scale,
                });
            }
        }
    }

    /// Per-element subtraction for the `>` operator. Fails with the first
    /// element whose count would go negative — never a silent clamp.
    pub(crate) fn subtract(&mut self, other: &Self) -> Result<(), ElementId> {
        // Tolerance for float accumulation across nested multipliers
        const EPSILON: f64 = 1e-9;

        for (index, (ours, theirs)) in self.tallies.iter_mut().zip(&other.tallies).enumerate() {
            if theirs.is_empty() {
                continue;
            }
            ours.count -= theirs.count;
            ours.isotopic_correction -= theirs.isotopic_correction;
            if ours.count < -EPSILON {
                return Err(ElementId::from_index(index));
            }
            ours.count = ours.count.max(0.0);

            for explicit in &theirs.explicit_isotopes {
                let matched = ours
                    .explicit_isotopes
                    .iter_mut()
                    .find(|e| e.mass == explicit.mass);
                match matched {
                    Some(e) if e.count + EPSILON >= explicit.count => {
                        e.count -= explicit.count;
                    }
                    _ => return Err(ElementId::from_index(index)),
                }
            }
            ours.explicit_isotopes.retain(|e| e.count > EPSILON);
        }
        Ok(())
    }
}

impl ElementTally {
    pub(crate) fn is_empty(&self) -> bool {
        self.count == 0.0 && self.isotopic_correction == 0.0 && self.explicit_isotopes.is_empty()
    }

    /// Atoms covered by explicit isotope specifiers
    pub fn explicit_count(&self) -> f64 {
        self.explicit_isotopes.iter().map(|e| e.count).sum()
    }
}

fn empirical_rank(db: &AtomicDatabase, id: ElementId) -> u8 {
    match db.element(id).symbol() {
        "C" => 0,
        "H" => 1,
        _ => 2,
    }
}

/// Render an atom count, dropping the fraction when it is integral
pub(crate) fn format_count(count: f64) -> String {
    if (count - count.round()).abs() < 1e-9 {
        format!("{}", count.round() as i64)
    } else {
        format!("{count}")
    }
}
