//! Static disease catalog with per-country recommendation categories.

use serde::{Deserialize, Serialize};

/// Country context for catalog relevance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "RU")]
    Ru,
    #[serde(rename = "DE")]
    De,
    /// Explicit "no country": every disease is relevant, none categorized.
    #[serde(rename = "NONE")]
    None,
}

impl Country {
    /// Parse a stored country tag.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "RU" => Some(Self::Ru),
            "DE" => Some(Self::De),
            "NONE" => Some(Self::None),
            _ => None,
        }
    }
}

/// National-calendar category of a disease within a country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiseaseCategory {
    Recommended,
    Optional,
}

/// A single disease in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disease {
    /// Stable identifier used as the record key.
    pub id: String,
    /// English display name; label localization happens outside this crate.
    pub name: String,
    /// Category on the Russian national calendar, if listed.
    pub ru: Option<DiseaseCategory>,
    /// Category on the German (STIKO) calendar, if listed.
    pub de: Option<DiseaseCategory>,
}

impl Disease {
    /// Category of this disease for a country context.
    pub fn category_for(&self, country: Country) -> Option<DiseaseCategory> {
        match country {
            Country::Ru => self.ru,
            Country::De => self.de,
            Country::None => None,
        }
    }

    /// Whether this disease appears at all for a country context.
    pub fn is_relevant_for(&self, country: Country) -> bool {
        match country {
            Country::None => true,
            _ => self.category_for(country).is_some(),
        }
    }
}

/// The static disease catalog.
///
/// Built-in entries cover the RU and DE national calendars; hosts can
/// supply their own table via [`DiseaseCatalog::from_entries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiseaseCatalog {
    entries: Vec<Disease>,
}

impl Default for DiseaseCatalog {
    fn default() -> Self {
        Self {
            entries: Self::default_entries(),
        }
    }
}

impl DiseaseCatalog {
    /// Catalog with a caller-supplied entry table.
    pub fn from_entries(entries: Vec<Disease>) -> Self {
        Self { entries }
    }

    /// All catalog entries, in catalog order.
    pub fn entries(&self) -> &[Disease] {
        &self.entries
    }

    /// Look up a disease by id.
    pub fn get(&self, id: &str) -> Option<&Disease> {
        self.entries.iter().find(|d| d.id == id)
    }

    fn default_entries() -> Vec<Disease> {
        use DiseaseCategory::{Optional, Recommended};

        fn entry(
            id: &str,
            name: &str,
            ru: Option<DiseaseCategory>,
            de: Option<DiseaseCategory>,
        ) -> Disease {
            Disease {
                id: id.into(),
                name: name.into(),
                ru,
                de,
            }
        }

        vec![
            entry("measles", "Measles", Some(Recommended), Some(Recommended)),
            entry("mumps", "Mumps", Some(Recommended), Some(Recommended)),
            entry("rubella", "Rubella", Some(Recommended), Some(Recommended)),
            entry("diphtheria", "Diphtheria", Some(Recommended), Some(Recommended)),
            entry("tetanus", "Tetanus", Some(Recommended), Some(Recommended)),
            entry("pertussis", "Pertussis", Some(Recommended), Some(Recommended)),
            entry("polio", "Poliomyelitis", Some(Recommended), Some(Recommended)),
            entry("hepatitis_b", "Hepatitis B", Some(Recommended), Some(Recommended)),
            entry("hepatitis_a", "Hepatitis A", Some(Optional), Some(Optional)),
            entry("influenza", "Influenza", Some(Recommended), Some(Recommended)),
            entry("covid19", "COVID-19", Some(Recommended), Some(Recommended)),
            entry("tbe", "Tick-borne encephalitis", Some(Optional), Some(Optional)),
            entry("hpv", "Human papillomavirus", Some(Optional), Some(Recommended)),
            entry("pneumococcus", "Pneumococcal disease", Some(Optional), Some(Recommended)),
            entry("meningococcus", "Meningococcal disease", Some(Optional), Some(Recommended)),
            entry("varicella", "Chickenpox", Some(Optional), Some(Recommended)),
            entry("rotavirus", "Rotavirus", Some(Optional), Some(Recommended)),
            entry("shingles", "Shingles", None, Some(Optional)),
            entry("rabies", "Rabies", Some(Optional), None),
            entry("yellow_fever", "Yellow fever", Some(Optional), None),
        ]
    }
}
