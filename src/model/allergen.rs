use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::search::simplify;

/// Display names of the allergens a recipe may declare, in catalog order.
pub const ALLERGENE_LIST: [&str; 14] = [
    "Gluten",
    "Oeufs",
    "Lactose",
    "Fruits à coque",
    "Arachides",
    "Moutarde",
    "Soja",
    "Sulfites",
    "Sésame",
    "Poissons",
    "Crustacés",
    "Mollusques",
    "Céleri",
    "Lupins",
];

/// Simplified form of every entry of [`ALLERGENE_LIST`], index aligned.
pub static SIMPLE_ALLERGENE_LIST: Lazy<Vec<String>> =
    Lazy::new(|| ALLERGENE_LIST.iter().map(|name| simplify(name)).collect());

/// One of the fourteen regulated allergens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Allergen {
    Gluten,
    Oeufs,
    Lactose,
    FruitsACoque,
    Arachides,
    Moutarde,
    Soja,
    Sulfites,
    Sesame,
    Poissons,
    Crustaces,
    Mollusques,
    Celeri,
    Lupins,
}

impl Allergen {
    pub const ALL: [Allergen; 14] = [
        Allergen::Gluten,
        Allergen::Oeufs,
        Allergen::Lactose,
        Allergen::FruitsACoque,
        Allergen::Arachides,
        Allergen::Moutarde,
        Allergen::Soja,
        Allergen::Sulfites,
        Allergen::Sesame,
        Allergen::Poissons,
        Allergen::Crustaces,
        Allergen::Mollusques,
        Allergen::Celeri,
        Allergen::Lupins,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn display_name(self) -> &'static str {
        ALLERGENE_LIST[self.index()]
    }

    pub fn simple_name(self) -> &'static str {
        SIMPLE_ALLERGENE_LIST[self.index()].as_str()
    }

    /// Look up an allergen by name, ignoring case, accents and surrounding
    /// whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = simplify(name.trim());
        SIMPLE_ALLERGENE_LIST
            .iter()
            .position(|simple| *simple == wanted)
            .map(|idx| Self::ALL[idx])
    }
}

impl fmt::Display for Allergen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl TryFrom<String> for Allergen {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_name(&value).ok_or_else(|| format!("unknown allergen: {}", value))
    }
}

impl From<Allergen> for String {
    fn from(value: Allergen) -> Self {
        value.display_name().to_string()
    }
}
