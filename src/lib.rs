pub mod config;
pub mod error;
pub mod google;
pub mod model;

pub use crate::config::{CatalogConfig, GoogleConfig};
pub use crate::error::{CatalogError, Result};
pub use google::{GoogleSheetsApi, ReadOptions, Sheet, WriteOptions};
pub use model::{Allergen, Categorie, Recipe, Record};

/// Folder listed by the command line tool when nothing else is configured.
pub const DEFAULT_FOLDER_ID: &str = "1xZzpaRoEBS8Tetvb-fFGowtuKNqv8E8d";

/// Connect with the given configuration and list the files of a folder.
pub fn list_folder(config: &CatalogConfig, folder_id: &str) -> Result<Vec<google::DriveFile>> {
    let api = GoogleSheetsApi::connect(&config.google)?;
    api.list_files(folder_id)
}
