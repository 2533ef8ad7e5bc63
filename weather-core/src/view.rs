use crate::display::{CurrentWeatherCard, ForecastCard, HistoryRow, SavedCityCard};

/// The named regions a [`WeatherController`](crate::controller::WeatherController)
/// draws into. Each `render_*` call replaces its section wholesale and makes
/// it visible.
pub trait WeatherView: Send + 'static {
    fn show_loading(&mut self);
    fn hide_loading(&mut self);

    fn show_error(&mut self, message: &str);
    fn hide_error(&mut self);

    /// Hide the current, forecast and history sections.
    fn hide_all_sections(&mut self);

    fn render_current(&mut self, card: &CurrentWeatherCard);
    fn render_forecast(&mut self, cards: &[ForecastCard]);
    fn render_history(&mut self, rows: &[HistoryRow]);

    fn render_saved_cities(&mut self, cards: &[SavedCityCard]);
    fn show_no_saved_cities(&mut self);

    /// Mirror a value written into the city input.
    fn set_city_input(&mut self, city: &str);
    fn scroll_to_top(&mut self);
}
