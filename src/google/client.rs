use chrono::Utc;
use log::{debug, info, warn};
use reqwest::blocking::Client;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;

use super::credentials::{ClientSecrets, Credentials, SCOPES};
use super::drive::{DriveFile, DriveService};
use super::flow::{AuthorizationFlow, InstalledAppFlow};
use super::options::{Grid, ReadOptions, Sheet, WriteOptions};
use super::service::ServiceHandle;
use super::sheets::{SheetsService, ValueRange};
use crate::config::GoogleConfig;
use crate::error::{CatalogError, Result};

/// Connected client for Google Sheets and Google Drive.
///
/// Only obtainable through [`GoogleSheetsApi::connect`], so every operation
/// runs with authenticated service handles. Handles are not shared between
/// threads.
#[derive(Debug)]
pub struct GoogleSheetsApi {
    sheets: SheetsService,
    drive: DriveService,
}

impl GoogleSheetsApi {
    /// Connect using the cached token, refreshing it or running the
    /// interactive installed-app flow when needed.
    pub fn connect(config: &GoogleConfig) -> Result<Self> {
        Self::connect_with_flow(config, &InstalledAppFlow::default())
    }

    /// Connect with a custom interactive authorization step.
    ///
    /// A rejected refresh deletes the token cache and restarts the
    /// connection once; a second rejection is returned to the caller.
    pub fn connect_with_flow(config: &GoogleConfig, flow: &dyn AuthorizationFlow) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        let token_path = Path::new(&config.token_path);

        let mut retried = false;
        let credentials = loop {
            match obtain_credentials(&http, config, flow) {
                Ok(credentials) => break credentials,
                Err(CatalogError::Refresh(msg)) if !retried => {
                    warn!("You need to reconnect to Google API ({})", msg);
                    if token_path.exists() {
                        fs::remove_file(token_path)?;
                    }
                    retried = true;
                }
                Err(e) => return Err(e),
            }
        };

        let access_token = credentials.token.ok_or_else(|| {
            CatalogError::Authorization("credentials carry no access token".to_string())
        })?;
        let sheets = SheetsService::new(ServiceHandle::new(
            http.clone(),
            &config.sheets_base_url,
            access_token.clone(),
        )?);
        let drive = DriveService::new(
            ServiceHandle::new(http, &config.drive_base_url, access_token)?,
            config.page_size,
            config.download_chunk_size,
        );
        info!("Connected to Google Sheets and Drive");

        Ok(GoogleSheetsApi { sheets, drive })
    }

    /// Read several ranges of a sheet, one grid per range in input order.
    ///
    /// Ranges holding no values come back as empty grids.
    pub fn batch_get_range(
        &self,
        ranges: &[&str],
        sheet: &Sheet,
        options: &ReadOptions,
    ) -> Result<Vec<Grid>> {
        let qualified: Vec<String> = ranges.iter().map(|r| sheet.qualify(r)).collect();
        let value_ranges = self
            .sheets
            .batch_get(&sheet.spreadsheet_id, &qualified, options)?;
        Ok(value_ranges.into_iter().map(|vr| vr.values).collect())
    }

    /// Read the top-left value of several ranges.
    pub fn batch_get_cell(
        &self,
        cells: &[&str],
        sheet: &Sheet,
        options: &ReadOptions,
    ) -> Result<Vec<Value>> {
        let grids = self.batch_get_range(cells, sheet, options)?;
        grids
            .into_iter()
            .enumerate()
            .map(|(idx, grid)| {
                let cell = cells.get(idx).copied().unwrap_or_default();
                top_left(grid, || sheet.qualify(cell))
            })
            .collect()
    }

    /// Read one range. Empty when the range holds no values.
    pub fn get_range(&self, range: &str, sheet: &Sheet, options: &ReadOptions) -> Result<Grid> {
        self.sheets
            .get(&sheet.spreadsheet_id, &sheet.qualify(range), options)
    }

    /// Read a single cell.
    pub fn get_cell(&self, cell: &str, sheet: &Sheet, options: &ReadOptions) -> Result<Value> {
        let grid = self.get_range(cell, sheet, options)?;
        top_left(grid, || sheet.qualify(cell))
    }

    /// Write a grid into a range, returning the number of updated cells.
    pub fn update_range(
        &self,
        range: &str,
        values: &Grid,
        sheet: &Sheet,
        options: &WriteOptions,
    ) -> Result<u64> {
        let updated = self.sheets.update(
            &sheet.spreadsheet_id,
            &sheet.qualify(range),
            values,
            options.value_input_option,
        )?;
        debug!("Updated {} cells in {}", updated, sheet.qualify(range));
        Ok(updated)
    }

    /// Write a single value, same as `update_range(cell, [[value]])`.
    pub fn update_cell(
        &self,
        cell: &str,
        value: Value,
        sheet: &Sheet,
        options: &WriteOptions,
    ) -> Result<u64> {
        self.update_range(cell, &vec![vec![value]], sheet, options)
    }

    /// Alias of [`GoogleSheetsApi::update_cell`].
    pub fn update_value(
        &self,
        cell: &str,
        value: Value,
        sheet: &Sheet,
        options: &WriteOptions,
    ) -> Result<u64> {
        self.update_cell(cell, value, sheet, options)
    }

    /// Write one grid per range in a single request.
    pub fn batch_update_range(
        &self,
        ranges: &[&str],
        values: Vec<Grid>,
        sheet: &Sheet,
        options: &WriteOptions,
    ) -> Result<u64> {
        if ranges.len() != values.len() {
            return Err(CatalogError::InvalidArgument(format!(
                "{} ranges but {} value grids",
                ranges.len(),
                values.len()
            )));
        }

        let data: Vec<ValueRange> = ranges
            .iter()
            .zip(values)
            .map(|(range, values)| ValueRange {
                range: sheet.qualify(range),
                major_dimension: options.major_dimension,
                values,
            })
            .collect();
        self.sheets
            .batch_update(&sheet.spreadsheet_id, &data, options.value_input_option)
    }

    /// Write one value per cell in a single request.
    pub fn batch_update_cell(
        &self,
        cells: &[&str],
        values: Vec<Value>,
        sheet: &Sheet,
        options: &WriteOptions,
    ) -> Result<u64> {
        let grids = values.into_iter().map(|v| vec![vec![v]]).collect();
        self.batch_update_range(cells, grids, sheet, options)
    }

    /// Every non-trashed file of a Drive folder.
    pub fn list_files(&self, folder_id: &str) -> Result<Vec<DriveFile>> {
        self.drive.list_folder(folder_id)
    }

    /// Download a Drive file to `dest`.
    pub fn download_file(&self, file_id: &str, dest: impl AsRef<Path>) -> Result<()> {
        self.drive.download(file_id, dest.as_ref())
    }
}

fn top_left(grid: Grid, range: impl FnOnce() -> String) -> Result<Value> {
    grid.into_iter()
        .next()
        .and_then(|row| row.into_iter().next())
        .ok_or_else(|| CatalogError::EmptyRange(range()))
}

/// One pass of the credential lookup: cache, then refresh, then the
/// interactive flow. New credentials are written back to the cache.
fn obtain_credentials(
    http: &Client,
    config: &GoogleConfig,
    flow: &dyn AuthorizationFlow,
) -> Result<Credentials> {
    let token_path = Path::new(&config.token_path);
    let cached = if token_path.exists() {
        Some(Credentials::from_file(token_path)?)
    } else {
        None
    };

    let now = Utc::now();
    let credentials = match cached {
        Some(cached) if cached.is_valid(now) => {
            debug!("Using cached credentials from {}", token_path.display());
            return Ok(cached);
        }
        Some(cached) if cached.is_expired(now) && cached.refresh_token.is_some() => {
            info!("Refreshing expired credentials");
            cached.refresh(http)?
        }
        _ => {
            info!("No usable credentials, starting authorization flow");
            let secrets = ClientSecrets::from_file(Path::new(&config.credentials_path))?;
            flow.authorize(http, &secrets, &SCOPES)?
        }
    };

    credentials.save(token_path)?;
    Ok(credentials)
}
