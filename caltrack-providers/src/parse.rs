use crate::runtime::HttpResponse;
use caltrack_core::error::ServiceError;
use caltrack_core::types::{FoodItem, Meal, RecognizedFood, SavedMeal};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: Option<String>,
}

/// Extracts the `error` field of a failure body, if it has one.
pub fn parse_error_message(body: &[u8]) -> Option<String> {
    let payload: ErrorPayload = serde_json::from_slice(body).ok()?;
    payload.error.filter(|m| !m.trim().is_empty())
}

/// Maps a non-2xx response to the matching `ServiceError`.
pub fn check_status(resp: &HttpResponse) -> Result<(), ServiceError> {
    if resp.is_success() {
        return Ok(());
    }
    Err(match parse_error_message(&resp.body) {
        Some(message) => ServiceError::Status {
            status: resp.status,
            message,
        },
        None => ServiceError::StatusWithoutPayload {
            status: resp.status,
        },
    })
}

fn decode<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T, ServiceError> {
    serde_json::from_slice(body).map_err(|e| ServiceError::Decode(format!("{what}: {e}")))
}

pub fn parse_recognized_food(body: &[u8]) -> Result<RecognizedFood, ServiceError> {
    decode(body, "recognition result")
}

pub fn parse_food_items(body: &[u8]) -> Result<Vec<FoodItem>, ServiceError> {
    decode(body, "search results")
}

pub fn parse_meals(body: &[u8]) -> Result<Vec<Meal>, ServiceError> {
    decode(body, "meal list")
}

/// The created record from a successful save. Any 2xx counts as success, so an empty or
/// unrecognized body is `None` rather than an error.
pub fn parse_saved_meal(body: &[u8]) -> Option<SavedMeal> {
    serde_json::from_slice(body).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resp(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn structured_error_keeps_server_message() {
        let e = check_status(&resp(400, r#"{"error":"bad image"}"#)).unwrap_err();
        assert_eq!(
            e,
            ServiceError::Status {
                status: 400,
                message: "bad image".into()
            }
        );
    }

    #[test]
    fn error_without_payload() {
        assert_eq!(
            check_status(&resp(502, "<html>bad gateway</html>")).unwrap_err(),
            ServiceError::StatusWithoutPayload { status: 502 }
        );
        assert_eq!(
            check_status(&resp(500, r#"{"error":""}"#)).unwrap_err(),
            ServiceError::StatusWithoutPayload { status: 500 }
        );
        assert!(check_status(&resp(201, "")).is_ok());
    }

    #[test]
    fn parses_search_results_in_order() {
        let body = br#"[
            {"id":2,"name":"Banana","calories":89,"protein":1.1,"carbs":22.8,"fat":0.3,"category":"Fruit","serving_size":"100 g"},
            {"id":1,"name":"Apple","calories":52,"protein":0.3,"carbs":14,"fat":0.2,"category":"Fruit","serving_size":"100 g"}
        ]"#;
        let items = parse_food_items(body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Banana");
        assert_eq!(items[1].id, 1);
    }

    #[test]
    fn malformed_success_body_is_decode_error() {
        assert!(matches!(
            parse_meals(b"not json"),
            Err(ServiceError::Decode(_))
        ));
    }

    #[test]
    fn saved_meal_is_optional() {
        assert!(parse_saved_meal(b"").is_none());
        let saved = parse_saved_meal(
            br#"{"id":5,"custom_name":"Salad","calories":200,"protein":5,"carbs":10,"fat":8,"meal_time":"2024-05-01T12:00:00"}"#,
        )
        .unwrap();
        assert_eq!(saved.id.as_str(), "5");
    }
}
