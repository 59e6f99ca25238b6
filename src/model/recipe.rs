use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::allergen::Allergen;
use super::record::Record;
use super::search::simplify;
use crate::error::CatalogError;

/// Catalog section a recipe belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Categorie {
    #[serde(rename = "Food truck")]
    FoodTruck,
    #[default]
    #[serde(rename = "Autres")]
    Autres,
}

impl Categorie {
    pub const ALL: [Categorie; 2] = [Categorie::FoodTruck, Categorie::Autres];

    pub fn as_str(&self) -> &'static str {
        match self {
            Categorie::FoodTruck => "Food truck",
            Categorie::Autres => "Autres",
        }
    }
}

impl fmt::Display for Categorie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Categorie {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|categorie| categorie.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownCategorie(s.to_string()))
    }
}

/// A recipe of the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Recipe {
    /// Primary key, assigned by the persistence layer
    pub id: Option<i64>,
    pub name: String,
    /// Drive id of the recipe spreadsheet
    pub file_id: String,
    /// Drive id of the recipe picture
    pub img_id: String,
    /// Local path of the downloaded picture
    pub img_path: String,
    /// Allergens as written in the recipe sheet
    pub allergene: String,
    pub categorie: Categorie,

    // search fields, stored simplified
    pub search_name: String,
    pub search_ingredients: String,
    pub search_etapes: String,
    pub search_allergene: String,
}

impl Record for Recipe {}

impl Recipe {
    pub fn new(
        name: impl Into<String>,
        file_id: impl Into<String>,
        img_id: impl Into<String>,
        img_path: impl Into<String>,
        allergene: impl Into<String>,
        categorie: Categorie,
    ) -> Self {
        let name = name.into();
        let allergene = allergene.into();
        Recipe {
            id: None,
            search_name: simplify(&name),
            search_allergene: simplify(&allergene),
            name,
            file_id: file_id.into(),
            img_id: img_id.into(),
            img_path: img_path.into(),
            allergene,
            categorie,
            search_ingredients: String::new(),
            search_etapes: String::new(),
        }
    }

    /// Fill the ingredient and step search fields from their raw text.
    pub fn with_search_text(mut self, ingredients: &str, etapes: &str) -> Self {
        self.search_ingredients = simplify(ingredients);
        self.search_etapes = simplify(etapes);
        self
    }

    /// Known allergens declared in the raw `allergene` field.
    ///
    /// Entries are separated by `,` or `;`. Entries outside the allergen
    /// list are skipped.
    pub fn allergenes(&self) -> Vec<Allergen> {
        let mut found = Vec::new();
        for entry in self.allergene.split([',', ';']) {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            match Allergen::from_name(entry) {
                Some(allergen) if !found.contains(&allergen) => found.push(allergen),
                Some(_) => {}
                None => debug!("Ignoring unknown allergene '{}' in {}", entry, self.name),
            }
        }
        found
    }

    /// Whether `allergen` is one of the declared entries. "Sans gluten"
    /// does not declare gluten.
    pub fn contains_allergene(&self, allergen: Allergen) -> bool {
        self.allergenes().contains(&allergen)
    }

    /// Whether the simplified query appears in any search field.
    pub fn matches(&self, query: &str) -> bool {
        let query = simplify(query.trim());
        [
            &self.search_name,
            &self.search_ingredients,
            &self.search_etapes,
            &self.search_allergene,
        ]
        .iter()
        .any(|field| field.contains(&query))
    }
}
