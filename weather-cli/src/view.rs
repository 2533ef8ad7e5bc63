use weather_core::{
    WeatherView,
    display::{
        CurrentWeatherCard, ForecastCard, HISTORY_HEADERS, HistoryRow, NO_SAVED_CITIES,
        SavedCityCard,
    },
};

/// Prints each section as it is rendered. Printed output can't be taken back,
/// so hiding sections and dismissing errors do nothing here.
#[derive(Debug, Default)]
pub struct TerminalView {
    loading: bool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    fn heading(title: &str) {
        println!();
        println!("== {title} ==");
    }
}

impl WeatherView for TerminalView {
    fn show_loading(&mut self) {
        if !self.loading {
            eprintln!("Loading weather data...");
        }
        self.loading = true;
    }

    fn hide_loading(&mut self) {
        self.loading = false;
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("Error: {message}");
    }

    fn hide_error(&mut self) {}

    fn hide_all_sections(&mut self) {}

    fn render_current(&mut self, card: &CurrentWeatherCard) {
        Self::heading("Current weather");
        println!("{card}");
    }

    fn render_forecast(&mut self, cards: &[ForecastCard]) {
        Self::heading("Forecast");
        for card in cards {
            println!("  {card}");
        }
    }

    fn render_history(&mut self, rows: &[HistoryRow]) {
        Self::heading("History");

        let mut widths = HISTORY_HEADERS.map(|h| h.chars().count());
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        print_row(&HISTORY_HEADERS, &widths);
        for row in rows {
            print_row(&row.cells(), &widths);
        }
    }

    fn render_saved_cities(&mut self, cards: &[SavedCityCard]) {
        Self::heading("Saved cities");
        for card in cards {
            println!("  {card}");
        }
    }

    fn show_no_saved_cities(&mut self) {
        Self::heading("Saved cities");
        println!("  {NO_SAVED_CITIES}");
    }

    fn set_city_input(&mut self, city: &str) {
        println!();
        println!("> {city}");
    }

    fn scroll_to_top(&mut self) {}
}

fn print_row(cells: &[&str; 5], widths: &[usize; 5]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    println!("  {}", line.join("  ").trim_end());
}
