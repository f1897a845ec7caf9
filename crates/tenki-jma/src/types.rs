use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::JmaError;

/// Area code to display name, ordered by code
pub type AreaDirectory = BTreeMap<String, String>;

/// Administrative area from the JMA directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub code: String,
    pub name: String,
}

/// One (date, weather description) pair for an area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub date: String,
    pub weather: String,
}

/// Forecast row read back from the local store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredForecast {
    pub area_code: String,
    pub date: String,
    pub weather: String,
    pub fetched_at: DateTime<Utc>,
}

impl From<StoredForecast> for ForecastEntry {
    fn from(row: StoredForecast) -> Self {
        Self {
            date: row.date,
            weather: row.weather,
        }
    }
}

// Wire formats. Only the fields the app consumes are declared; serde skips the rest.

#[derive(Debug, Deserialize)]
struct AreaDirectoryResponse {
    offices: HashMap<String, AreaDirectoryEntry>,
}

#[derive(Debug, Deserialize)]
struct AreaDirectoryEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ForecastReport {
    #[serde(rename = "timeSeries")]
    time_series: Vec<serde_json::Value>,
}

/// First time series of a report. Later series carry other shapes
/// (precipitation, temperatures) and are never decoded.
#[derive(Debug, Deserialize)]
struct WeatherSeries {
    areas: Vec<WeatherArea>,
}

#[derive(Debug, Deserialize)]
struct WeatherArea {
    date: String,
    weathers: Vec<String>,
}

/// Decode an area directory payload into a code -> name mapping.
pub fn parse_area_directory(body: &str) -> Result<AreaDirectory, JmaError> {
    let response: AreaDirectoryResponse = serde_json::from_str(body)
        .map_err(|e| JmaError::format(format!("area directory: {}", e)))?;

    Ok(response
        .offices
        .into_iter()
        .map(|(code, entry)| (code, entry.name))
        .collect())
}

/// Decode a forecast payload: first report, first time series, first
/// weather string for each date.
pub fn parse_forecast(body: &str) -> Result<Vec<ForecastEntry>, JmaError> {
    let reports: Vec<ForecastReport> = serde_json::from_str(body)
        .map_err(|e| JmaError::format(format!("forecast: {}", e)))?;

    let report = reports
        .into_iter()
        .next()
        .ok_or_else(|| JmaError::format("forecast: empty report list"))?;

    let series = report
        .time_series
        .into_iter()
        .next()
        .ok_or_else(|| JmaError::format("forecast: report has no timeSeries"))?;

    let series: WeatherSeries = serde_json::from_value(series)
        .map_err(|e| JmaError::format(format!("forecast: timeSeries[0]: {}", e)))?;

    series
        .areas
        .into_iter()
        .map(|area| -> Result<ForecastEntry, JmaError> {
            let weather = area.weathers.into_iter().next().ok_or_else(|| {
                JmaError::format(format!("forecast: no weather description for {}", area.date))
            })?;
            Ok(ForecastEntry {
                date: area.date,
                weather,
            })
        })
        .collect()
}
