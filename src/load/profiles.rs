//! Per-application traffic rates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Regular and peak rate of one application, in kbps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRates {
    pub regular: u64,
    pub peak: u64,
}

impl ProfileRates {
    pub const fn new(regular: u64, peak: u64) -> Self {
        Self { regular, peak }
    }

    pub fn rate(&self, mode: RateMode) -> u64 {
        match mode {
            RateMode::Regular => self.regular,
            RateMode::Peak => self.peak,
        }
    }
}

/// Which of the two rates to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateMode {
    Regular,
    #[default]
    Peak,
}

/// Rates used for profiles missing from the table
pub const DEFAULT_RATES: ProfileRates = ProfileRates::new(500, 1500);

const BUILTIN: [(&str, ProfileRates); 4] = [
    ("HTTP", ProfileRates::new(500, 1500)),
    ("VoIP", ProfileRates::new(100, 200)),
    ("Video", ProfileRates::new(2000, 5000)),
    ("DB", ProfileRates::new(1000, 3000)),
];

/// Lookup table from application profile tag to rates
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileTable {
    profiles: BTreeMap<String, ProfileRates>,
    fallback: ProfileRates,
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self {
            profiles: BUILTIN
                .iter()
                .map(|(name, rates)| (name.to_string(), *rates))
                .collect(),
            fallback: DEFAULT_RATES,
        }
    }
}

impl ProfileTable {
    /// Built-in table extended or overridden by `overrides`
    pub fn with_overrides(overrides: &BTreeMap<String, ProfileRates>) -> Self {
        let mut table = Self::default();
        table
            .profiles
            .extend(overrides.iter().map(|(name, rates)| (name.clone(), *rates)));
        table
    }

    /// Rates for `profile`, or the fallback for unknown tags
    pub fn lookup(&self, profile: &str) -> ProfileRates {
        self.profiles.get(profile).copied().unwrap_or(self.fallback)
    }

    pub fn rate(&self, profile: &str, mode: RateMode) -> u64 {
        self.lookup(profile).rate(mode)
    }
}
