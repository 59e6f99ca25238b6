//! Google Sheets and Drive access used to import recipe data.

mod client;
mod credentials;
mod drive;
mod flow;
mod options;
mod service;
mod sheets;

pub use client::GoogleSheetsApi;
pub use credentials::{ClientSecrets, Credentials, SCOPES};
pub use drive::DriveFile;
pub use flow::{AuthorizationFlow, InstalledAppFlow};
pub use options::{
    DateTimeRenderOption, Grid, MajorDimension, ReadOptions, Sheet, ValueInputOption,
    ValueRenderOption, WriteOptions,
};
pub use sheets::ValueRange;
