//! JMA area directory and forecast client.

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tenki_core::config::AREA_CODE_PLACEHOLDER;
use tracing::instrument;

use crate::error::JmaError;
use crate::types::{parse_area_directory, parse_forecast, AreaDirectory, ForecastEntry};

const USER_AGENT: &str = concat!("Tenki/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct JmaClient {
    client: Arc<Client>,
    area_list_url: String,
    forecast_url_template: String,
}

impl JmaClient {
    /// Client for explicit endpoints. `forecast_url_template` must contain `{code}`.
    ///
    /// Without a `timeout`, requests use reqwest's default (none).
    pub fn with_endpoints(
        area_list_url: impl Into<String>,
        forecast_url_template: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, JmaError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client: Arc::new(client),
            area_list_url: area_list_url.into(),
            forecast_url_template: forecast_url_template.into(),
        })
    }

    /// Fetch the area directory as a code -> name mapping.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_areas(&self) -> Result<AreaDirectory, JmaError> {
        let body = self.get_text(&self.area_list_url).await?;
        let areas = parse_area_directory(&body)?;
        tracing::info!("Fetched {} areas", areas.len());
        Ok(areas)
    }

    /// Fetch the forecast for one area.
    ///
    /// A blank code is a no-op and yields no entries without touching the network.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(&self, area_code: &str) -> Result<Vec<ForecastEntry>, JmaError> {
        let area_code = area_code.trim();
        if area_code.is_empty() {
            tracing::debug!("Blank area code, skipping forecast fetch");
            return Ok(Vec::new());
        }

        let body = self.get_text(&self.forecast_url(area_code)).await?;
        let entries = parse_forecast(&body)?;
        tracing::info!("Fetched {} forecast entries for {}", entries.len(), area_code);
        Ok(entries)
    }

    fn forecast_url(&self, area_code: &str) -> String {
        self.forecast_url_template
            .replace(AREA_CODE_PLACEHOLDER, &urlencoding::encode(area_code))
    }

    async fn get_text(&self, url: &str) -> Result<String, JmaError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}
