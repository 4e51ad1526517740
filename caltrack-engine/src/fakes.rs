use crate::traits::FoodService;
use async_trait::async_trait;
use caltrack_core::error::ServiceError;
use caltrack_core::types::{FoodItem, Meal, MealDraft, MealId, Nutrition, RecognizedFood, SavedMeal};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Recognize(String),
    Search(String),
    ListMeals,
    SaveMeal(MealDraft),
}

pub fn recognized(name: &str, calories: i64) -> RecognizedFood {
    RecognizedFood {
        name: name.into(),
        nutrition: Nutrition {
            calories,
            protein: 5.0,
            carbs: 10.0,
            fat: 8.0,
        },
        confidence: Some(0.9),
    }
}

pub fn food(id: i64, name: &str, calories: i64) -> FoodItem {
    FoodItem {
        id,
        name: name.into(),
        nutrition: Nutrition {
            calories,
            protein: 1.0,
            carbs: 2.0,
            fat: 3.0,
        },
        category: "Test".into(),
        serving_size: "100 g".into(),
    }
}

/// In-memory backend that records every call.
#[derive(Default)]
pub struct FakeService {
    calls: Mutex<Vec<Call>>,
    latency: Duration,
    search_latency: HashMap<String, Duration>,
    recognize: Mutex<Option<Result<RecognizedFood, ServiceError>>>,
    search_results: Mutex<HashMap<String, Vec<FoodItem>>>,
    fail_search: Mutex<bool>,
    fail_save: Mutex<Option<ServiceError>>,
    fail_list: Mutex<bool>,
    echo_saved: Mutex<bool>,
    meals: Mutex<Vec<Meal>>,
}

impl FakeService {
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_search_latency(mut self, query: &str, latency: Duration) -> Self {
        self.search_latency.insert(query.to_string(), latency);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_recognize(&self, result: Result<RecognizedFood, ServiceError>) {
        *self.recognize.lock().unwrap() = Some(result);
    }

    pub fn set_search_results(&self, query: &str, items: Vec<FoodItem>) {
        self.search_results
            .lock()
            .unwrap()
            .insert(query.to_string(), items);
    }

    pub fn set_fail_search(&self, fail: bool) {
        *self.fail_search.lock().unwrap() = fail;
    }

    pub fn set_fail_save(&self, err: Option<ServiceError>) {
        *self.fail_save.lock().unwrap() = err;
    }

    pub fn set_fail_list(&self, fail: bool) {
        *self.fail_list.lock().unwrap() = fail;
    }

    pub fn set_echo_saved(&self, echo: bool) {
        *self.echo_saved.lock().unwrap() = echo;
    }

    pub fn seed_meals(&self, meals: Vec<Meal>) {
        *self.meals.lock().unwrap() = meals;
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn wait(&self, latency: Duration) {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl FoodService for FakeService {
    async fn recognize(&self, image_data_url: &str) -> Result<RecognizedFood, ServiceError> {
        self.record(Call::Recognize(image_data_url.to_string()));
        self.wait(self.latency).await;
        self.recognize
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(ServiceError::StatusWithoutPayload { status: 500 }))
    }

    async fn search(&self, query: &str) -> Result<Vec<FoodItem>, ServiceError> {
        self.record(Call::Search(query.to_string()));
        let latency = self
            .search_latency
            .get(query)
            .copied()
            .unwrap_or(self.latency);
        self.wait(latency).await;
        if *self.fail_search.lock().unwrap() {
            return Err(ServiceError::Status {
                status: 500,
                message: "Search failed: db down".into(),
            });
        }
        Ok(self
            .search_results
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_meals(&self) -> Result<Vec<Meal>, ServiceError> {
        self.record(Call::ListMeals);
        self.wait(self.latency).await;
        if *self.fail_list.lock().unwrap() {
            return Err(ServiceError::Transport("connection reset".into()));
        }
        Ok(self.meals.lock().unwrap().clone())
    }

    async fn save_meal(&self, draft: &MealDraft) -> Result<Option<SavedMeal>, ServiceError> {
        self.record(Call::SaveMeal(draft.clone()));
        self.wait(self.latency).await;
        if let Some(err) = self.fail_save.lock().unwrap().clone() {
            return Err(err);
        }

        let mut meals = self.meals.lock().unwrap();
        let id = MealId::new((meals.len() + 1).to_string());
        let nutrition = Nutrition {
            calories: draft.calories,
            protein: draft.protein,
            carbs: draft.carbs,
            fat: draft.fat,
        };
        meals.insert(
            0,
            Meal {
                id: id.clone(),
                name: draft.name.clone(),
                nutrition,
                time: "12:00".into(),
            },
        );

        if !*self.echo_saved.lock().unwrap() {
            return Ok(None);
        }
        Ok(Some(SavedMeal {
            id,
            custom_name: draft.name.clone(),
            nutrition,
            meal_time: Some(draft.meal_time.clone()),
        }))
    }
}
