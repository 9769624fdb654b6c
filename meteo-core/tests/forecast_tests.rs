//! Integration tests for the weather lookup component using wiremock.

use meteo_core::forecast::FETCH_FAILED_MSG;
use meteo_core::{Config, LookupError, LookupState, WeatherLookup};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> Config {
    Config {
        forecast_url: format!("{}/v1/forecast", server.uri()),
        ..Config::default()
    }
}

fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "timezone": "Europe/Berlin",
        "current": {
            "temperature_2m": 17.3,
            "relative_humidity_2m": 58.0,
            "is_day": 1,
            "weather_code": 2,
            "wind_speed_10m": 11.4
        },
        "daily": {
            "time": ["2024-06-01", "2024-06-02", "2024-06-03"],
            "weather_code": [2, 61, 95],
            "temperature_2m_max": [21.0, 18.5, 16.2],
            "temperature_2m_min": [11.2, 10.0, 9.4]
        }
    })
}

#[tokio::test]
async fn successful_fetch_stores_a_normalized_snapshot() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "52.52437"))
        .and(query_param("longitude", "13.41053"))
        .and(query_param(
            "current",
            "temperature_2m,relative_humidity_2m,is_day,weather_code,wind_speed_10m",
        ))
        .and(query_param("daily", "weather_code,temperature_2m_max,temperature_2m_min"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut lookup = WeatherLookup::from_config(&test_config(&mock_server));
    lookup.fetch(52.52437, 13.41053).await;

    let snapshot = lookup.snapshot().expect("successful fetch must store a snapshot");
    assert_eq!(snapshot.timezone, "Europe/Berlin");
    assert_eq!(snapshot.current.temperature, 17.3);
    assert_eq!(snapshot.current.humidity, 58.0);
    assert_eq!(snapshot.current.wind_speed, 11.4);
    assert_eq!(snapshot.current.weather_code, 2);
    assert_eq!(snapshot.current.is_day, 1);
    assert_eq!(snapshot.daily.len(), 3);
    assert!(snapshot.daily.is_aligned());
    assert!(matches!(lookup.state(), LookupState::Success));
    assert!(lookup.error_message().is_none());
}

#[tokio::test]
async fn failed_fetch_keeps_prior_snapshot_and_sets_fixed_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&mock_server)
        .await;

    let mut lookup = WeatherLookup::from_config(&test_config(&mock_server));
    lookup.fetch(52.52437, 13.41053).await;
    let before = lookup.snapshot().cloned().expect("first fetch must succeed");

    lookup.fetch(52.52437, 13.41053).await;

    assert_eq!(lookup.snapshot(), Some(&before), "failed fetch must not touch the snapshot");
    assert_eq!(lookup.error_message(), Some(FETCH_FAILED_MSG));
    assert!(!lookup.is_loading());
    assert!(matches!(lookup.error(), Some(LookupError::Status { .. })));
}

#[tokio::test]
async fn missing_current_object_is_a_decode_failure() {
    let mock_server = MockServer::start().await;

    let mut body = forecast_body();
    body.as_object_mut().expect("fixture is an object").remove("current");

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let mut lookup = WeatherLookup::from_config(&test_config(&mock_server));
    lookup.fetch(52.52437, 13.41053).await;

    assert!(lookup.snapshot().is_none());
    assert!(matches!(lookup.error(), Some(LookupError::Decode(_))));
    assert_eq!(lookup.error_message(), Some(FETCH_FAILED_MSG));
}

#[tokio::test]
async fn misaligned_daily_arrays_are_a_shape_failure() {
    let mock_server = MockServer::start().await;

    let mut body = forecast_body();
    body["daily"]["temperature_2m_min"] = serde_json::json!([11.2]);

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let mut lookup = WeatherLookup::from_config(&test_config(&mock_server));
    lookup.fetch(52.52437, 13.41053).await;

    assert!(lookup.snapshot().is_none());
    assert!(matches!(lookup.error(), Some(LookupError::Shape(_))));
    assert_eq!(lookup.error_message(), Some(FETCH_FAILED_MSG));
}

#[tokio::test]
async fn repeated_fetch_with_identical_response_is_idempotent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut lookup = WeatherLookup::from_config(&test_config(&mock_server));

    lookup.fetch(52.52437, 13.41053).await;
    let first = lookup.snapshot().cloned().expect("first fetch must succeed");

    lookup.fetch(52.52437, 13.41053).await;
    let second = lookup.snapshot().cloned().expect("second fetch must succeed");

    assert_eq!(first, second);
}
