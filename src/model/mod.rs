mod allergen;
mod recipe;
mod record;
mod search;

pub use allergen::{Allergen, ALLERGENE_LIST, SIMPLE_ALLERGENE_LIST};
pub use recipe::{Categorie, Recipe};
pub use record::{serialize_fields, FieldMap, Record};
pub use search::simplify;
