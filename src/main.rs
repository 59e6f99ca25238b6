use log::{debug, error};
use std::env;
use std::process::ExitCode;

use recipe_sheets::{list_folder, CatalogConfig, DEFAULT_FOLDER_ID};

fn main() -> ExitCode {
    env_logger::init();

    let config = match CatalogConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Folder from the command line, then configuration, then the built-in one
    let folder_id = env::args()
        .nth(1)
        .or_else(|| config.drive.folder_id.clone())
        .unwrap_or_else(|| DEFAULT_FOLDER_ID.to_string());
    debug!("Listing folder {}", folder_id);

    match list_folder(&config, &folder_id) {
        Ok(files) => {
            for file in files {
                println!("{} {} {}", file.id, file.name, file.mime_type);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
