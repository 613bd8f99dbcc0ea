//! HTTP handlers
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | POST | `/predict` | Predict traffic for a city junction and hour |
//! | GET | `/api/traffic` | First 50 historical records of a city junction |
//! | GET | `/api/cities` | Served cities |
//! | GET | `/` | Status and help |
//! | GET | `/favicon.ico` | Empty response |

use crate::error::ApiError;
use crate::state::SharedState;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use traffic_data::TrafficRecord;
use traffic_model::features::{round_to, FeatureInput};

/// Most records returned by `/api/traffic`
pub const TRAFFIC_RECORD_LIMIT: usize = 50;

/// Body of `POST /predict`
///
/// Every field is optional and kept as raw JSON until it is cast, so numbers
/// sent as strings (`"8"`) or floats (`8.0`) are accepted like integers.
#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub hour: Option<Value>,
    #[serde(default)]
    pub weekday: Option<Value>,
    #[serde(default)]
    pub junction: Option<Value>,
    #[serde(default)]
    pub temperature: Option<Value>,
    #[serde(default)]
    pub city: Option<Value>,
}

impl PredictRequest {
    /// Parse a request body, treating an empty body as `{}`
    ///
    /// Anything other than a JSON object is rejected; arrays would otherwise
    /// bind to the fields by position.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value =
            serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
        if !value.is_object() {
            return Err(ApiError::InvalidBody(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }
        serde_json::from_value(value).map_err(|e| ApiError::InvalidBody(e.to_string()))
    }

    /// The city to echo back: the value as sent, or the default name
    pub fn city_echo(&self) -> Value {
        match &self.city {
            None | Some(Value::Null) => Value::String(FeatureInput::default().city),
            Some(city) => city.clone(),
        }
    }

    /// Cast the raw fields into model input, filling in defaults
    ///
    /// A non-string city is encoded and looked up by its JSON text.
    pub fn into_input(self) -> Result<FeatureInput, ApiError> {
        let defaults = FeatureInput::default();

        Ok(FeatureInput {
            hour: cast_int("hour", self.hour, defaults.hour)?,
            weekday: cast_int("weekday", self.weekday, defaults.weekday)?,
            junction: cast_int("junction", self.junction, defaults.junction)?,
            temperature: cast_float("temperature", self.temperature, defaults.temperature)?,
            city: match self.city {
                None | Some(Value::Null) => defaults.city,
                Some(Value::String(city)) => city,
                Some(other) => other.to_string(),
            },
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn invalid(field: &'static str, value: &Value) -> ApiError {
    ApiError::InvalidField {
        field,
        value: value.to_string(),
    }
}

/// Integer cast: floats truncate toward zero, strings must hold an integer
fn cast_int(field: &'static str, value: Option<Value>, default: i64) -> Result<i64, ApiError> {
    let value = match value {
        None | Some(Value::Null) => return Ok(default),
        Some(value) => value,
    };

    let cast = match &value {
        Value::Bool(flag) => Some(i64::from(*flag)),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };

    cast.ok_or_else(|| invalid(field, &value))
}

/// Float cast: numbers as-is, strings parsed
fn cast_float(field: &'static str, value: Option<Value>, default: f64) -> Result<f64, ApiError> {
    let value = match value {
        None | Some(Value::Null) => return Ok(default),
        Some(value) => value,
    };

    let cast = match &value {
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    cast.ok_or_else(|| invalid(field, &value))
}

/// Body of a successful prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predicted_traffic: f64,
    pub actual_traffic: Option<f64>,
    /// City exactly as the request sent it
    pub city: Value,
}

/// `POST /predict`
pub async fn predict(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<PredictResponse>, ApiError> {
    let predictor = state
        .predictor
        .as_ref()
        .ok_or(ApiError::ModelUnavailable)?;

    let request = PredictRequest::from_body(&body)?;
    let city = request.city_echo();
    let input = request.into_input()?;
    let predicted = predictor.predict(&input)?;

    let actual = state
        .datasets
        .lookup_flow(
            &input.city,
            &input.junction.to_string(),
            input.hour,
            input.weekday,
        )
        .map(|flow| round_to(f64::from(flow), 2));

    Ok(Json(PredictResponse {
        predicted_traffic: predicted,
        actual_traffic: actual,
        city,
    }))
}

/// Query of `GET /api/traffic`
#[derive(Debug, Default, PartialEq)]
pub struct TrafficQuery {
    pub city: Option<String>,
    pub junction: Option<String>,
}

impl TrafficQuery {
    /// Build from raw query pairs; a repeated key keeps its first value
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "city" => &mut query.city,
                "junction" => &mut query.junction,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

/// `GET /api/traffic`
pub async fn traffic(
    State(state): State<SharedState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<TrafficRecord>>, ApiError> {
    let query = TrafficQuery::from_pairs(pairs);
    let city = query.city.unwrap_or_else(|| "Bangalore".to_string());
    let junction = query.junction.unwrap_or_else(|| "1".to_string());

    match state.datasets.head(&city, &junction, TRAFFIC_RECORD_LIMIT) {
        Some(records) => Ok(Json(records.to_vec())),
        None => Err(ApiError::DatasetNotFound { city, junction }),
    }
}

/// Body of `GET /api/cities`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitiesResponse {
    pub cities: Vec<String>,
}

/// `GET /api/cities`
pub async fn cities(State(state): State<SharedState>) -> Json<CitiesResponse> {
    Json(CitiesResponse {
        cities: state.cities.iter().map(|city| city.to_string()).collect(),
    })
}

/// `GET /`
pub async fn index(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "running",
        "message": "Traffic Flow Prediction API",
        "endpoints": {
            "/predict": "POST - Make traffic predictions",
            "/api/traffic": "GET - Get historical traffic data",
            "/api/cities": "GET - Get list of cities"
        },
        "model_loaded": state.model_loaded(),
        "datasets_loaded": state.datasets.len(),
        "started_at": state.started_at.to_rfc3339()
    }))
}

/// `GET /favicon.ico`
pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<FeatureInput, ApiError> {
        PredictRequest::from_body(body.as_bytes())?.into_input()
    }

    #[test]
    fn test_empty_body_uses_defaults() {
        assert_eq!(parse("").unwrap(), FeatureInput::default());
        assert_eq!(parse("  \n").unwrap(), FeatureInput::default());
        assert_eq!(parse("{}").unwrap(), FeatureInput::default());
    }

    #[test]
    fn test_permissive_casts() {
        let input = parse(
            r#"{"hour": "9", "weekday": 4.7, "junction": true, "temperature": "31.5", "city": "Bidar"}"#,
        )
        .unwrap();

        assert_eq!(input.hour, 9);
        assert_eq!(input.weekday, 4);
        assert_eq!(input.junction, 1);
        assert_eq!(input.temperature, 31.5);
        assert_eq!(input.city, "Bidar");
    }

    #[test]
    fn test_nulls_fall_back_to_defaults() {
        let input = parse(r#"{"hour": null, "city": null, "temperature": 18}"#).unwrap();
        assert_eq!(input.hour, 8);
        assert_eq!(input.city, "Bangalore");
        assert_eq!(input.temperature, 18.0);
    }

    #[test]
    fn test_no_range_validation() {
        let input = parse(r#"{"hour": 99, "weekday": -2, "junction": 17}"#).unwrap();
        assert_eq!((input.hour, input.weekday, input.junction), (99, -2, 17));
    }

    #[test]
    fn test_non_string_city_is_kept_as_text() {
        let request = PredictRequest::from_body(br#"{"city": 42}"#).unwrap();
        assert_eq!(request.city_echo(), json!(42));
        assert_eq!(request.into_input().unwrap().city, "42");

        let request = PredictRequest::from_body(br#"{"city": null}"#).unwrap();
        assert_eq!(request.city_echo(), json!("Bangalore"));
    }

    #[test]
    fn test_non_finite_temperature_strings_are_accepted() {
        let input = parse(r#"{"temperature": "NaN"}"#).unwrap();
        assert!(input.temperature.is_nan());
        let input = parse(r#"{"temperature": "inf"}"#).unwrap();
        assert_eq!(input.temperature, f64::INFINITY);
    }

    #[test]
    fn test_traffic_query_keeps_first_value() {
        let pairs = vec![
            ("city".to_string(), "Bidar".to_string()),
            ("junction".to_string(), "3".to_string()),
            ("city".to_string(), "Bangalore".to_string()),
            ("limit".to_string(), "10".to_string()),
        ];
        assert_eq!(
            TrafficQuery::from_pairs(pairs),
            TrafficQuery {
                city: Some("Bidar".to_string()),
                junction: Some("3".to_string()),
            }
        );
        assert_eq!(TrafficQuery::from_pairs(Vec::new()), TrafficQuery::default());
    }

    #[test]
    fn test_uncastable_values() {
        assert!(matches!(
            parse(r#"{"hour": "eight"}"#),
            Err(ApiError::InvalidField { field: "hour", .. })
        ));
        assert!(matches!(
            parse(r#"{"hour": "8.5"}"#),
            Err(ApiError::InvalidField { field: "hour", .. })
        ));
        assert!(matches!(
            parse(r#"{"temperature": [25]}"#),
            Err(ApiError::InvalidField {
                field: "temperature",
                ..
            })
        ));
        assert!(matches!(parse("{not json"), Err(ApiError::InvalidBody(_))));
        assert!(matches!(parse("[1, 2]"), Err(ApiError::InvalidBody(_))));
        assert!(matches!(
            parse(r#"[3, 6, 2, 30.0, "Bidar"]"#),
            Err(ApiError::InvalidBody(_))
        ));
        assert!(matches!(parse("null"), Err(ApiError::InvalidBody(_))));
        assert!(matches!(parse("\"Bidar\""), Err(ApiError::InvalidBody(_))));
    }
}
