//! Request options passed through to the Sheets API.
//!
//! Each enum mirrors one of the API's enumerated string parameters and has a
//! single default matching the API's own default.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A 2-D block of cell values, as returned in a `ValueRange`.
pub type Grid = Vec<Vec<Value>>;

/// How input data should be interpreted on writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueInputOption {
    /// Stored as-is, without parsing
    Raw,
    /// Parsed as if typed into the UI (formulas are evaluated)
    #[default]
    UserEntered,
}

impl ValueInputOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueInputOption::Raw => "RAW",
            ValueInputOption::UserEntered => "USER_ENTERED",
        }
    }
}

/// Whether a grid is organised by rows or by columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MajorDimension {
    #[default]
    Rows,
    Columns,
}

impl MajorDimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            MajorDimension::Rows => "ROWS",
            MajorDimension::Columns => "COLUMNS",
        }
    }
}

/// How cell values are represented in read responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueRenderOption {
    /// Calculated and formatted according to the cell's format
    #[default]
    FormattedValue,
    /// Calculated but not formatted
    UnformattedValue,
    /// Not calculated, formulas are returned
    Formula,
}

impl ValueRenderOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueRenderOption::FormattedValue => "FORMATTED_VALUE",
            ValueRenderOption::UnformattedValue => "UNFORMATTED_VALUE",
            ValueRenderOption::Formula => "FORMULA",
        }
    }
}

/// How dates, times and durations are represented in read responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateTimeRenderOption {
    SerialNumber,
    #[default]
    FormattedString,
}

impl DateTimeRenderOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateTimeRenderOption::SerialNumber => "SERIAL_NUMBER",
            DateTimeRenderOption::FormattedString => "FORMATTED_STRING",
        }
    }
}

/// Options shared by every read operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    pub major_dimension: MajorDimension,
    pub value_render_option: ValueRenderOption,
    pub date_time_render_option: DateTimeRenderOption,
}

impl ReadOptions {
    pub fn major_dimension(mut self, major_dimension: MajorDimension) -> Self {
        self.major_dimension = major_dimension;
        self
    }

    pub fn value_render_option(mut self, value_render_option: ValueRenderOption) -> Self {
        self.value_render_option = value_render_option;
        self
    }

    pub fn date_time_render_option(mut self, option: DateTimeRenderOption) -> Self {
        self.date_time_render_option = option;
        self
    }

    pub(crate) fn query(&self) -> [(&'static str, &'static str); 3] {
        [
            ("majorDimension", self.major_dimension.as_str()),
            ("valueRenderOption", self.value_render_option.as_str()),
            ("dateTimeRenderOption", self.date_time_render_option.as_str()),
        ]
    }
}

/// Options shared by every write operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub value_input_option: ValueInputOption,
    pub major_dimension: MajorDimension,
}

impl WriteOptions {
    pub fn value_input_option(mut self, value_input_option: ValueInputOption) -> Self {
        self.value_input_option = value_input_option;
        self
    }

    pub fn major_dimension(mut self, major_dimension: MajorDimension) -> Self {
        self.major_dimension = major_dimension;
        self
    }
}

/// A named sheet inside a spreadsheet: the target of range operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub spreadsheet_id: String,
    pub sheet_name: String,
}

impl Sheet {
    pub fn new(spreadsheet_id: impl Into<String>, sheet_name: impl Into<String>) -> Self {
        Sheet {
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.into(),
        }
    }

    /// Qualify a range with the sheet name (`A1:B2` → `Sheet1!A1:B2`).
    pub fn qualify(&self, range: &str) -> String {
        format!("{}!{}", self.sheet_name, range)
    }
}
