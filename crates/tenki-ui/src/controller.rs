//! Forecast controller: owns the view state and drives the JMA client and
//! the optional local store one user action at a time.
//!
//! Every public operation handles its own failures. Errors replace the
//! display text with a phase-labelled message and leave the controller
//! usable; the next successful operation clears the error state.

use std::path::PathBuf;
use std::time::Duration;

use tenki_core::{AppError, Config, ConfigError};
use tenki_jma::{AreaDirectory, ForecastEntry, ForecastStore, JmaClient};

use crate::error_mapping::JmaErrorExt;
use crate::render::{
    render_areas_loaded, render_error, render_forecast, render_store_disabled,
    AREA_LIST_ERROR_LABEL, FORECAST_ERROR_LABEL,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    AreasLoaded,
    ForecastDisplayed,
    /// Carries the message shown in the display.
    Error(String),
}

pub struct ForecastController {
    client: JmaClient,
    store: Option<ForecastStore>,
    state: ViewState,
    areas: AreaDirectory,
    selected_area: Option<String>,
    selected_date: Option<String>,
    display: String,
}

impl ForecastController {
    /// `store` of `None` renders fetched forecasts directly without persisting them.
    pub fn new(client: JmaClient, store: Option<ForecastStore>) -> Self {
        Self {
            client,
            store,
            state: ViewState::Idle,
            areas: AreaDirectory::new(),
            selected_area: None,
            selected_date: None,
            display: String::new(),
        }
    }

    pub fn from_config(config: &Config, store_path: Option<PathBuf>) -> Result<Self, AppError> {
        let validation = config.validate();
        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        let client = JmaClient::with_endpoints(
            &config.jma.area_list_url,
            &config.jma.forecast_url_template,
            config.jma.timeout_secs.map(Duration::from_secs),
        )
        .map_err(JmaErrorExt::into_app_error)?;

        Ok(Self::new(client, store_path.map(ForecastStore::new)))
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn display_text(&self) -> &str {
        &self.display
    }

    pub fn area_options(&self) -> &AreaDirectory {
        &self.areas
    }

    pub fn selected_area(&self) -> Option<&str> {
        self.selected_area.as_deref()
    }

    pub fn selected_date(&self) -> Option<&str> {
        self.selected_date.as_deref()
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Fetch the area directory and replace the area options.
    ///
    /// With a store, areas are upserted first; on any failure the previous
    /// options are kept.
    pub async fn load_areas(&mut self) {
        match self.try_load_areas().await {
            Ok(areas) => {
                self.display = render_areas_loaded(areas.len());
                self.areas = areas;
                self.state = ViewState::AreasLoaded;
            }
            Err(e) => self.fail(AREA_LIST_ERROR_LABEL, &e),
        }
    }

    async fn try_load_areas(&self) -> Result<AreaDirectory, AppError> {
        let areas = self
            .client
            .fetch_areas()
            .await
            .map_err(JmaErrorExt::into_app_error)?;

        if let Some(store) = &self.store {
            store
                .upsert_areas(&areas)
                .map_err(JmaErrorExt::into_app_error)?;
        }

        Ok(areas)
    }

    /// Populate the area options from the store without touching the network.
    ///
    /// Without a store, the display says so and the state is left unchanged.
    pub fn load_cached_areas(&mut self) {
        let Some(store) = &self.store else {
            tracing::debug!("No store configured, cached areas unavailable");
            self.display = render_store_disabled();
            return;
        };

        match store.list_areas() {
            Ok(areas) => {
                let areas: AreaDirectory = areas.into_iter().map(|a| (a.code, a.name)).collect();
                self.display = render_areas_loaded(areas.len());
                self.areas = areas;
                self.state = ViewState::AreasLoaded;
            }
            Err(e) => self.fail(AREA_LIST_ERROR_LABEL, &e.into_app_error()),
        }
    }

    /// Select an area and fetch its forecast. A blank code is ignored.
    pub async fn select_area(&mut self, area_code: &str) {
        let area_code = area_code.trim();
        if area_code.is_empty() {
            tracing::debug!("Blank area selection ignored");
            return;
        }

        self.selected_area = Some(area_code.to_string());
        self.fetch_forecast().await;
    }

    /// Fetch the forecast for the selected area and render it.
    ///
    /// With a store, the fetched entries are appended and the stored rows
    /// for the area (and current date filter) are rendered instead.
    pub async fn fetch_forecast(&mut self) {
        let Some(area_code) = self.selected_area.clone() else {
            tracing::debug!("No area selected, skipping forecast fetch");
            return;
        };

        match self.try_fetch_forecast(&area_code).await {
            Ok(entries) => {
                self.display = render_forecast(&entries);
                self.state = ViewState::ForecastDisplayed;
            }
            Err(e) => self.fail(FORECAST_ERROR_LABEL, &e),
        }
    }

    async fn try_fetch_forecast(&self, area_code: &str) -> Result<Vec<ForecastEntry>, AppError> {
        let entries = self
            .client
            .fetch_forecast(area_code)
            .await
            .map_err(JmaErrorExt::into_app_error)?;

        let Some(store) = &self.store else {
            return Ok(entries);
        };

        if let Some(name) = self.areas.get(area_code) {
            let area = AreaDirectory::from([(area_code.to_string(), name.clone())]);
            store
                .upsert_areas(&area)
                .map_err(JmaErrorExt::into_app_error)?;
        }

        store
            .append_forecasts(area_code, &entries)
            .map_err(JmaErrorExt::into_app_error)?;

        self.read_stored(store, area_code)
    }

    /// Set the date filter and re-query the store. `None` or a blank date clears it.
    ///
    /// Without a store or a selected area only the filter is remembered.
    pub fn select_date(&mut self, date: Option<&str>) {
        self.selected_date = date
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let (Some(store), Some(area_code)) = (&self.store, self.selected_area.as_deref()) else {
            tracing::debug!("Date filter stored; nothing to query");
            return;
        };

        match self.read_stored(store, area_code) {
            Ok(entries) => {
                self.display = render_forecast(&entries);
                self.state = ViewState::ForecastDisplayed;
            }
            Err(e) => self.fail(FORECAST_ERROR_LABEL, &e),
        }
    }

    /// Distinct stored dates for the selected area, for the date picker.
    pub fn stored_dates(&mut self) -> Vec<String> {
        let (Some(store), Some(area_code)) = (&self.store, self.selected_area.as_deref()) else {
            return Vec::new();
        };

        match store.stored_dates(area_code) {
            Ok(dates) => dates,
            Err(e) => {
                self.fail(FORECAST_ERROR_LABEL, &e.into_app_error());
                Vec::new()
            }
        }
    }

    fn read_stored(
        &self,
        store: &ForecastStore,
        area_code: &str,
    ) -> Result<Vec<ForecastEntry>, AppError> {
        let rows = store
            .query_forecasts(area_code, self.selected_date.as_deref())
            .map_err(JmaErrorExt::into_app_error)?;
        Ok(rows.into_iter().map(ForecastEntry::from).collect())
    }

    fn fail(&mut self, label: &str, err: &AppError) {
        tracing::error!("{}: {}", label, err);
        let message = render_error(label, err);
        self.display = message.clone();
        self.state = ViewState::Error(message);
    }
}
