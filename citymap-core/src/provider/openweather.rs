use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{config::Units, model::CityWeather};

use super::WeatherProvider;

const CURRENT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    units: Units,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, units: Units) -> Self {
        Self {
            api_key,
            units,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

/// Decode a current-weather body. A body without a `main` block carries no
/// observation and maps to `None`.
fn parse_current(city_name: &str, units: Units, body: &str) -> Result<Option<CityWeather>> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).context("Failed to parse OpenWeather current JSON")?;

    let Some(main) = parsed.main else {
        return Ok(None);
    };

    let condition = parsed
        .weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_else(|| "unknown".to_string());

    Ok(Some(CityWeather {
        city: city_name.to_string(),
        temperature: main.temp,
        units,
        condition,
    }))
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city_name: &str) -> Result<Option<CityWeather>> {
        tracing::debug!(
            city = city_name,
            units = self.units.as_str(),
            "requesting current weather"
        );

        let res = self
            .http
            .get(CURRENT_WEATHER_URL)
            .query(&[
                ("q", city_name),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(city = city_name, "OpenWeather does not know this city");
            return Ok(None);
        }

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        parse_current(city_name, self.units, &body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_temperature_and_description() {
        let body = r#"{
            "name": "Tokyo",
            "main": {"temp": 21.4, "feels_like": 20.9, "humidity": 60},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky"}]
        }"#;

        let weather = parse_current("Tokyo", Units::Metric, body)
            .expect("valid body")
            .expect("observation present");

        assert_eq!(weather.city, "Tokyo");
        assert_eq!(weather.condition, "clear sky");
        assert_eq!(weather.summary(), "21.4°C, clear sky");
    }

    #[test]
    fn missing_main_block_means_no_data() {
        let body = r#"{"cod": "404", "message": "city not found"}"#;
        assert!(parse_current("Atlantis", Units::Metric, body).unwrap().is_none());
    }

    #[test]
    fn missing_weather_list_falls_back_to_unknown() {
        let body = r#"{"main": {"temp": -3.0}}"#;
        let weather = parse_current("Oslo", Units::Metric, body).unwrap().unwrap();
        assert_eq!(weather.summary(), "-3°C, unknown");
    }

    #[test]
    fn malformed_body_is_an_error() {
        let err = parse_current("Paris", Units::Metric, "<html>").unwrap_err();
        assert!(err.to_string().contains("Failed to parse OpenWeather current JSON"));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
