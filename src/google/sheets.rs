use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::options::{Grid, MajorDimension, ReadOptions, ValueInputOption};
use super::service::{read_json, ServiceHandle};
use crate::error::{CatalogError, Result};

/// A range and its values, as exchanged with `spreadsheets.values`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    pub range: String,
    #[serde(default)]
    pub major_dimension: MajorDimension,
    /// Missing when the range holds no values
    #[serde(default)]
    pub values: Grid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchGetResponse {
    #[serde(default)]
    value_ranges: Vec<ValueRange>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetResponse {
    #[serde(default)]
    values: Grid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateResponse {
    #[serde(default)]
    updated_cells: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateResponse {
    #[serde(default)]
    total_updated_cells: u64,
}

/// Sheets v4 `spreadsheets.values` endpoints
#[derive(Debug, Clone)]
pub(crate) struct SheetsService {
    handle: ServiceHandle,
}

impl SheetsService {
    pub(crate) fn new(handle: ServiceHandle) -> Self {
        SheetsService { handle }
    }

    /// `values:batchGet`; ranges must already be qualified.
    pub(crate) fn batch_get(
        &self,
        spreadsheet_id: &str,
        ranges: &[String],
        options: &ReadOptions,
    ) -> Result<Vec<ValueRange>> {
        let url = self.handle.endpoint(&[
            "v4",
            "spreadsheets",
            spreadsheet_id,
            "values:batchGet",
        ]);
        let mut query: Vec<(&str, &str)> = ranges.iter().map(|r| ("ranges", r.as_str())).collect();
        query.extend(options.query());

        let response = self.handle.request(Method::GET, url).query(&query).send()?;
        let body: BatchGetResponse = read_json(response)?;
        if body.value_ranges.len() != ranges.len() {
            return Err(CatalogError::UnexpectedResponse(format!(
                "asked for {} ranges of {}, got {}",
                ranges.len(),
                spreadsheet_id,
                body.value_ranges.len()
            )));
        }
        Ok(body.value_ranges)
    }

    /// `values.get`
    pub(crate) fn get(&self, spreadsheet_id: &str, range: &str, options: &ReadOptions) -> Result<Grid> {
        let url = self
            .handle
            .endpoint(&["v4", "spreadsheets", spreadsheet_id, "values", range]);
        let response = self
            .handle
            .request(Method::GET, url)
            .query(&options.query())
            .send()?;
        let body: GetResponse = read_json(response)?;
        Ok(body.values)
    }

    /// `values.update`, returns the number of updated cells
    pub(crate) fn update(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &Grid,
        value_input_option: ValueInputOption,
    ) -> Result<u64> {
        let url = self
            .handle
            .endpoint(&["v4", "spreadsheets", spreadsheet_id, "values", range]);
        let response = self
            .handle
            .request(Method::PUT, url)
            .query(&[("valueInputOption", value_input_option.as_str())])
            .json(&json!({ "values": values }))
            .send()?;
        let body: UpdateResponse = read_json(response)?;
        Ok(body.updated_cells)
    }

    /// `values:batchUpdate`, returns the total number of updated cells
    pub(crate) fn batch_update(
        &self,
        spreadsheet_id: &str,
        data: &[ValueRange],
        value_input_option: ValueInputOption,
    ) -> Result<u64> {
        let url = self.handle.endpoint(&[
            "v4",
            "spreadsheets",
            spreadsheet_id,
            "values:batchUpdate",
        ]);
        let response = self
            .handle
            .request(Method::POST, url)
            .json(&json!({
                "valueInputOption": value_input_option,
                "data": data,
            }))
            .send()?;
        let body: BatchUpdateResponse = read_json(response)?;
        Ok(body.total_updated_cells)
    }
}
