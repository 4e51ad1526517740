use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque meal identifier assigned by the storage endpoint.
///
/// The backend emits integer ids today; they are kept as strings so the client never
/// depends on the representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MealId(pub String);

impl MealId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for MealId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Int(i64),
            Text(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Int(n) => MealId(n.to_string()),
            Repr::Text(s) => MealId(s),
        })
    }
}

// Recognition output is model-generated and sometimes carries fractional calories.
fn de_calories<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    Ok(raw.round() as i64)
}

fn de_opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Calories and macronutrients shared by every food shape.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(deserialize_with = "de_calories")]
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// A persisted food-intake record as returned by `GET /meals`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: MealId,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub name: String,
    #[serde(flatten)]
    pub nutrition: Nutrition,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub time: String,
}

/// Nutrition estimate produced by the recognition endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedFood {
    pub name: String,
    #[serde(flatten)]
    pub nutrition: Nutrition,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// A row of the food database returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub nutrition: Nutrition,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub category: String,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub serving_size: String,
}

/// An unsaved nutrition estimate awaiting confirmation.
#[derive(Debug, Clone, PartialEq)]
pub enum FoodCandidate {
    Recognized(RecognizedFood),
    Searched(FoodItem),
}

impl FoodCandidate {
    pub fn name(&self) -> &str {
        match self {
            FoodCandidate::Recognized(f) => &f.name,
            FoodCandidate::Searched(f) => &f.name,
        }
    }

    pub fn nutrition(&self) -> Nutrition {
        match self {
            FoodCandidate::Recognized(f) => f.nutrition,
            FoodCandidate::Searched(f) => f.nutrition,
        }
    }

    /// Database id, only known for search results.
    pub fn food_id(&self) -> Option<i64> {
        match self {
            FoodCandidate::Recognized(_) => None,
            FoodCandidate::Searched(f) => Some(f.id),
        }
    }
}

impl From<RecognizedFood> for FoodCandidate {
    fn from(value: RecognizedFood) -> Self {
        FoodCandidate::Recognized(value)
    }
}

impl From<FoodItem> for FoodCandidate {
    fn from(value: FoodItem) -> Self {
        FoodCandidate::Searched(value)
    }
}

/// Body of `POST /meals`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealDraft {
    pub name: String,
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub meal_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl MealDraft {
    pub fn from_candidate(candidate: &FoodCandidate, at: DateTime<Utc>) -> Self {
        let n = candidate.nutrition();
        Self {
            name: candidate.name().to_string(),
            calories: n.calories,
            protein: n.protein,
            carbs: n.carbs,
            fat: n.fat,
            meal_time: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            food_id: candidate.food_id(),
            photo_url: None,
        }
    }
}

/// The created row echoed back by `POST /meals` (status 201).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SavedMeal {
    pub id: MealId,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub custom_name: String,
    #[serde(flatten)]
    pub nutrition: Nutrition,
    #[serde(default)]
    pub meal_time: Option<String>,
}

impl SavedMeal {
    pub fn into_meal(self) -> Meal {
        let time = self
            .meal_time
            .as_deref()
            .and_then(display_time)
            .unwrap_or_default();
        Meal {
            id: self.id,
            name: self.custom_name,
            nutrition: self.nutrition,
            time,
        }
    }
}

/// Formats an ISO-8601 timestamp as `HH:MM`, the way the meal list renders times.
///
/// Accepts both offset-qualified and naive timestamps; the storage backend emits the latter.
pub fn display_time(raw: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.format("%H:%M").to_string());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn meal_id_accepts_numbers_and_strings() {
        let a: Meal = serde_json::from_str(
            r#"{"id":7,"name":"Soup","calories":120,"protein":4.0,"carbs":10.5,"fat":2,"time":"12:30"}"#,
        )
        .unwrap();
        let b: Meal = serde_json::from_str(
            r#"{"id":"m-7","name":"Soup","calories":120,"protein":4,"carbs":10.5,"fat":2,"time":"12:30"}"#,
        )
        .unwrap();
        assert_eq!(a.id.as_str(), "7");
        assert_eq!(b.id.as_str(), "m-7");
        assert_eq!(a.nutrition.carbs, 10.5);
    }

    #[test]
    fn null_meal_name_becomes_empty() {
        let m: Meal = serde_json::from_str(
            r#"{"id":1,"name":null,"calories":1,"protein":0,"carbs":0,"fat":0,"time":null}"#,
        )
        .unwrap();
        assert_eq!(m.name, "");
        assert_eq!(m.time, "");
    }

    #[test]
    fn recognized_calories_are_rounded() {
        let f: RecognizedFood = serde_json::from_str(
            r#"{"name":"Borscht","calories":349.6,"protein":12,"carbs":30,"fat":9,"confidence":0.8}"#,
        )
        .unwrap();
        assert_eq!(f.nutrition.calories, 350);
        assert_eq!(f.confidence, Some(0.8));
    }

    #[test]
    fn draft_from_search_candidate_carries_food_id() {
        let item = FoodItem {
            id: 42,
            name: "Apple".into(),
            nutrition: Nutrition {
                calories: 52,
                protein: 0.3,
                carbs: 14.0,
                fat: 0.2,
            },
            category: "Fruit".into(),
            serving_size: "100 g".into(),
        };
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 15, 0).unwrap();
        let draft = MealDraft::from_candidate(&FoodCandidate::from(item), at);

        assert_eq!(draft.food_id, Some(42));
        assert_eq!(draft.meal_time, "2024-05-01T08:15:00.000Z");

        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["calories"], 52);
        assert!(json.get("photo_url").is_none());
    }

    #[test]
    fn saved_meal_converts_to_display_meal() {
        let saved: SavedMeal = serde_json::from_str(
            r#"{"id":9,"custom_name":"Salad","calories":200,"protein":5.0,"carbs":10.0,"fat":8.0,"meal_time":"2024-05-01T13:05:42.120000"}"#,
        )
        .unwrap();
        let meal = saved.into_meal();
        assert_eq!(meal.id.as_str(), "9");
        assert_eq!(meal.name, "Salad");
        assert_eq!(meal.time, "13:05");
    }

    #[test]
    fn display_time_handles_offsets() {
        assert_eq!(
            display_time("2024-05-01T07:45:00+03:00").as_deref(),
            Some("07:45")
        );
        assert_eq!(display_time("yesterday"), None);
    }
}
