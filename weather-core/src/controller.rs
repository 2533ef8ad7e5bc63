//! The view controller: reads the city input, runs the current → forecast →
//! history sequence against a [`WeatherBackend`] and renders into a
//! [`WeatherView`].

use std::{
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tracing::{debug, info, warn};

use crate::{
    Config,
    backend::WeatherBackend,
    display::{CurrentWeatherCard, ForecastCard, HistoryRow, SAVED_CITIES_FAILED, SavedCityCard},
    error::WeatherError,
    model::{CurrentWeather, ForecastEntry, HistoryEntry, SavedCitySummary, sample_daily_forecast},
    view::WeatherView,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerOptions {
    pub icon_base: String,
    pub history_days: u32,
    pub error_dismiss_after: Duration,
}

impl ControllerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            icon_base: config.icon_base.clone(),
            history_days: config.history_days,
            error_dismiss_after: config.error_dismiss_after(),
        }
    }
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// How a search that got past validation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Completed {
        forecast_shown: bool,
        history_shown: bool,
    },
    /// A newer search started before this one finished; nothing more of it
    /// was rendered.
    Superseded,
}

pub struct WeatherController<V: WeatherView> {
    backend: Box<dyn WeatherBackend>,
    view: Arc<Mutex<V>>,
    options: ControllerOptions,
    input: Mutex<String>,
    /// Bumped by every search; renders from older searches are dropped.
    generation: AtomicU64,
    /// Bumped by every error shown; a dismiss timer only hides its own error.
    error_epoch: Arc<AtomicU64>,
}

impl<V: WeatherView> WeatherController<V> {
    pub fn new(backend: Box<dyn WeatherBackend>, view: V, options: ControllerOptions) -> Self {
        Self {
            backend,
            view: Arc::new(Mutex::new(view)),
            options,
            input: Mutex::new(String::new()),
            generation: AtomicU64::new(0),
            error_epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn view(&self) -> Arc<Mutex<V>> {
        Arc::clone(&self.view)
    }

    pub fn input(&self) -> String {
        lock(&self.input).clone()
    }

    pub fn set_input(&self, city: &str) {
        *lock(&self.input) = city.to_string();
    }

    /// Search for whatever is in the input.
    pub async fn search(&self) -> Result<SearchOutcome, WeatherError> {
        let city = self.input();
        self.search_weather(&city).await
    }

    /// Fetch and render current weather, forecast and history for `city`, in
    /// that order. Only a current-weather failure is reported; forecast and
    /// history failures leave their sections hidden.
    pub async fn search_weather(&self, city: &str) -> Result<SearchOutcome, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            let err = WeatherError::EmptyCity;
            self.show_error(&err.to_string());
            return Err(err);
        }

        let generation = self.begin_search();
        let _loading = LoadingGuard {
            controller: self,
            generation,
        };
        info!(city, generation, "searching weather");

        if let Err(err) = self.current_stage(generation, city).await {
            warn!(city, error = %err, "current weather failed");
            if self.is_latest(generation) {
                self.show_error(&err.to_string());
            }
            return Err(err);
        }
        if !self.is_latest(generation) {
            return Ok(SearchOutcome::Superseded);
        }

        let forecast_shown = !self.forecast_stage(generation, city).await.is_empty();
        if !self.is_latest(generation) {
            return Ok(SearchOutcome::Superseded);
        }

        let history_shown = !self.history_stage(generation, city).await.is_empty();
        if !self.is_latest(generation) {
            return Ok(SearchOutcome::Superseded);
        }

        Ok(SearchOutcome::Completed {
            forecast_shown,
            history_shown,
        })
    }

    /// Fetch current weather and render it. Errors are returned, not shown.
    pub async fn fetch_current(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        self.current_stage(self.latest_generation(), city).await
    }

    /// Fetch the forecast and render one card per sampled day. Returns the
    /// entries shown; failures and short series yield an empty list.
    pub async fn fetch_forecast(&self, city: &str) -> Vec<ForecastEntry> {
        self.forecast_stage(self.latest_generation(), city).await
    }

    /// Fetch history and render it as a table. Returns the rows shown;
    /// failures and empty history yield an empty list.
    pub async fn fetch_history(&self, city: &str) -> Vec<HistoryEntry> {
        self.history_stage(self.latest_generation(), city).await
    }

    /// Fetch and render the saved cities, or the placeholder when there are
    /// none. A failure shows a generic banner.
    pub async fn load_saved_cities(&self) -> Result<Vec<SavedCitySummary>, WeatherError> {
        let cities = match self.backend.saved_cities().await {
            Ok(cities) => cities,
            Err(err) => {
                warn!(error = %err, "loading saved cities failed");
                self.show_error(SAVED_CITIES_FAILED);
                return Err(err);
            }
        };

        let mut view = self.lock_view();
        if cities.is_empty() {
            view.show_no_saved_cities();
        } else {
            let cards: Vec<_> = cities.iter().map(SavedCityCard::new).collect();
            view.render_saved_cities(&cards);
        }
        drop(view);

        debug!(count = cities.len(), "saved cities loaded");
        Ok(cities)
    }

    /// A saved city was picked: put it in the input, search it, scroll up.
    pub async fn select_saved_city(&self, city: &str) -> Result<SearchOutcome, WeatherError> {
        self.set_input(city);
        self.lock_view().set_city_input(city);

        let outcome = self.search().await;
        self.lock_view().scroll_to_top();
        outcome
    }

    async fn current_stage(
        &self,
        generation: u64,
        city: &str,
    ) -> Result<CurrentWeather, WeatherError> {
        let current = self.backend.current_weather(city).await?;

        let card = CurrentWeatherCard::new(&current, &self.options.icon_base);
        self.render_if_latest(generation, |view| view.render_current(&card));

        Ok(current)
    }

    async fn forecast_stage(&self, generation: u64, city: &str) -> Vec<ForecastEntry> {
        let entries = match self.backend.forecast(city).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(city, error = %err, "forecast skipped");
                return Vec::new();
            }
        };

        let daily: Vec<ForecastEntry> = sample_daily_forecast(&entries)
            .into_iter()
            .cloned()
            .collect();
        if daily.is_empty() {
            debug!(city, entries = entries.len(), "forecast too short to sample");
            return daily;
        }

        let cards: Vec<_> = daily
            .iter()
            .map(|e| ForecastCard::new(e, &self.options.icon_base))
            .collect();

        if self.render_if_latest(generation, |view| view.render_forecast(&cards)) {
            daily
        } else {
            Vec::new()
        }
    }

    async fn history_stage(&self, generation: u64, city: &str) -> Vec<HistoryEntry> {
        let entries = match self.backend.history(city, self.options.history_days).await {
            Ok(entries) if !entries.is_empty() => entries,
            Ok(_) => {
                debug!(city, "no history");
                return Vec::new();
            }
            Err(err) => {
                warn!(city, error = %err, "history skipped");
                return Vec::new();
            }
        };

        let rows: Vec<_> = entries.iter().map(HistoryRow::new).collect();

        if self.render_if_latest(generation, |view| view.render_history(&rows)) {
            entries
        } else {
            Vec::new()
        }
    }

    fn begin_search(&self) -> u64 {
        let mut view = self.lock_view();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        view.hide_error();
        view.show_loading();
        view.hide_all_sections();

        generation
    }

    fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.latest_generation() == generation
    }

    /// Runs `render` under the view lock unless a newer search has started.
    fn render_if_latest(&self, generation: u64, render: impl FnOnce(&mut V)) -> bool {
        let mut view = self.lock_view();
        if !self.is_latest(generation) {
            debug!(generation, "dropping stale render");
            return false;
        }
        render(&mut *view);
        true
    }

    /// Show `message` in the banner and hide it again after the dismiss delay.
    fn show_error(&self, message: &str) {
        let epoch = self.error_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.lock_view().show_error(message);

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let view = Arc::clone(&self.view);
        let error_epoch = Arc::clone(&self.error_epoch);
        let delay = self.options.error_dismiss_after;

        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if error_epoch.load(Ordering::SeqCst) == epoch {
                lock(&view).hide_error();
            }
        });
    }

    fn lock_view(&self) -> MutexGuard<'_, V> {
        lock(&self.view)
    }
}

/// Hides the loading indicator when a search ends, however it ends.
struct LoadingGuard<'a, V: WeatherView> {
    controller: &'a WeatherController<V>,
    generation: u64,
}

impl<V: WeatherView> Drop for LoadingGuard<'_, V> {
    fn drop(&mut self) {
        self.controller
            .render_if_latest(self.generation, |view| view.hide_loading());
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
