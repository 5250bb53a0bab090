use std::fmt::{self, Display, Formatter};

use crate::{ElementDefinition, ElementId, Isotope, Mass, Massive};

use super::periodic_table::ElementRecord;

/// Atomic numbers of the hydride-forming metals: a trailing hydrogen bonded to
/// one of these contributes a charge of −1 (hydride) instead of its usual +1.
/// Alkali and alkaline-earth metals, the transition blocks, lanthanides,
/// actinides, and the post-transition metals.
const HYDRIDE_METALS: &[u8] = &[
    3, 4, // Li, Be
    11, 12, 13, // Na, Mg, Al
    19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, // K through Ga
    37, 38, 39, 40, 41, 42, 43, 44, 45, 46, 47, 48, 49, 50, // Rb through Sn
    55, 56, // Cs, Ba
    57, 58, 59, 60, 61, 62, 63, 64, 65, 66, 67, 68, 69, 70, 71, // lanthanides
    72, 73, 74, 75, 76, 77, 78, 79, 80, 81, 82, 83, // Hf through Bi
    87, 88, // Fr, Ra
    89, 90, 91, 92, 93, 94, 95, 96, 97, 98, 99, 100, 101, 102, 103, // actinides
];

impl ElementId {
    pub const HYDROGEN: Self = match Self::new(1) {
        Some(id) => id,
        None => unreachable!(),
    };
    pub const CARBON: Self = match Self::new(6) {
        Some(id) => id,
        None => unreachable!(),
    };
    pub const SILICON: Self = match Self::new(14) {
        Some(id) => id,
        None => unreachable!(),
    };

    /// Whether a hydrogen directly following this element is counted as a hydride
    pub fn is_hydride_metal(self) -> bool {
        HYDRIDE_METALS.contains(&self.atomic_number())
    }

    /// Whether bare runs of this element get the covalent charge correction of
    /// −2 per atom beyond the first (carbon chains, silicon chains)
    pub fn takes_covalent_run_correction(self) -> bool {
        self == Self::CARBON || self == Self::SILICON
    }
}

impl ElementDefinition {
    pub(crate) fn from_record(record: &ElementRecord) -> Self {
        Self {
            symbol: record.symbol,
            name: record.name,
            mass: record.mass,
            uncertainty: record.uncertainty,
            charge: record.charge,
            isotopes: record
                .isotopes
                .iter()
                .map(|&(mass, abundance)| Isotope { mass, abundance })
                .collect(),
        }
    }

    pub const fn symbol(&self) -> &'static str {
        self.symbol
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Standard (abundance-weighted) atomic mass in Da
    pub const fn mass(&self) -> f64 {
        self.mass
    }

    /// One-standard-deviation uncertainty of [`Self::mass`]
    pub const fn uncertainty(&self) -> f64 {
        self.uncertainty
    }

    /// Default ionic charge assumed during net-charge accumulation
    pub const fn charge(&self) -> f64 {
        self.charge
    }

    /// Isotopes ordered by ascending mass; abundances sum to 1 within rounding
    pub fn isotopes(&self) -> &[Isotope] {
        &self.isotopes
    }

    pub(crate) fn set_mass(&mut self, mass: f64, uncertainty: f64) {
        self.mass = mass;
        self.uncertainty = uncertainty;
    }

    pub(crate) fn set_charge(&mut self, charge: f64) {
        self.charge = charge;
    }
}

impl Massive for ElementDefinition {
    fn average_mass(&self) -> Mass {
        Mass::new(self.mass)
    }
}

impl Display for ElementDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

impl Isotope {
    /// Integer mass obtained by rounding the exact isotopic mass
    pub fn nominal_mass(&self) -> i64 {
        self.mass.round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_group_predicates() {
        let na = ElementId::new(11).unwrap();
        let fe = ElementId::new(26).unwrap();
        let o = ElementId::new(8).unwrap();
        let h = ElementId::HYDROGEN;
        assert!(na.is_hydride_metal());
        assert!(fe.is_hydride_metal());
        assert!(!o.is_hydride_metal());
        assert!(!h.is_hydride_metal());
        assert!(ElementId::CARBON.takes_covalent_run_correction());
        assert!(ElementId::SILICON.takes_covalent_run_correction());
        assert!(!na.takes_covalent_run_correction());
    }

    #[test]
    fn element_id_range() {
        assert!(ElementId::new(0).is_none());
        assert!(ElementId::new(1).is_some());
        assert!(ElementId::new(103).is_some());
        assert!(ElementId::new(104).is_none());
        assert_eq!(ElementId::HYDROGEN.index(), 0);
        assert_eq!(ElementId::from_index(5), ElementId::CARBON);
    }
}
