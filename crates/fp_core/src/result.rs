//! Published per-season output

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::features::Attribute;

/// One season's corrected, publishable output.
///
/// Serialises as a flat JSON object of scalars plus `year`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeasonResult {
    /// 1..=9
    pub year: u8,
    /// Player age during this season
    pub age: u32,

    pub pace: u8,
    pub shooting: u8,
    pub passing: u8,
    pub dribbling: u8,
    pub defending: u8,
    pub physic: u8,

    pub overall: u8,
    pub rating_change: i32,
    pub potential: u8,
    pub value_eur: f64,

    pub goals: f64,
    pub assists: f64,
    pub tackles: f64,
    pub interceptions: f64,
    pub key_passes: f64,
    /// Effective minutes the season totals were computed from
    pub minutes: f64,
}

impl SeasonResult {
    pub fn attribute(&self, attribute: Attribute) -> u8 {
        match attribute {
            Attribute::Pace => self.pace,
            Attribute::Shooting => self.shooting,
            Attribute::Passing => self.passing,
            Attribute::Dribbling => self.dribbling,
            Attribute::Defending => self.defending,
            Attribute::Physic => self.physic,
        }
    }

    pub fn set_attribute(&mut self, attribute: Attribute, value: u8) {
        let slot = match attribute {
            Attribute::Pace => &mut self.pace,
            Attribute::Shooting => &mut self.shooting,
            Attribute::Passing => &mut self.passing,
            Attribute::Dribbling => &mut self.dribbling,
            Attribute::Defending => &mut self.defending,
            Attribute::Physic => &mut self.physic,
        };
        *slot = value;
    }

    pub fn attributes_at_or_above_overall(&self) -> usize {
        Attribute::ALL.iter().filter(|a| self.attribute(**a) >= self.overall).count()
    }

    /// Flat key/value view, handy for storage layers that want a map.
    pub fn to_flat_map(&self) -> BTreeMap<&'static str, f64> {
        let mut map = BTreeMap::new();
        map.insert("year", f64::from(self.year));
        map.insert("age", f64::from(self.age));
        for attribute in Attribute::ALL {
            map.insert(attribute.key(), f64::from(self.attribute(attribute)));
        }
        map.insert("overall", f64::from(self.overall));
        map.insert("rating_change", f64::from(self.rating_change));
        map.insert("potential", f64::from(self.potential));
        map.insert("value_eur", self.value_eur);
        map.insert("goals", self.goals);
        map.insert("assists", self.assists);
        map.insert("tackles", self.tackles);
        map.insert("interceptions", self.interceptions);
        map.insert("key_passes", self.key_passes);
        map.insert("minutes", self.minutes);
        map
    }
}
