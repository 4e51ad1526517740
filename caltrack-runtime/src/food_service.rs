use async_trait::async_trait;
use caltrack_core::config::{ClientConfig, Endpoints};
use caltrack_core::error::ServiceError;
use caltrack_core::types::{FoodItem, Meal, MealDraft, RecognizedFood, SavedMeal};
use caltrack_engine::traits::FoodService;
use caltrack_providers::food_api;
use caltrack_providers::parse;
use caltrack_providers::request::HttpRequest;
use caltrack_providers::runtime::{HttpClient, HttpResponse};
use chrono::NaiveDate;

/// `FoodService` backed by the hosted HTTP endpoints.
#[derive(Debug, Clone)]
pub struct HttpFoodService {
    endpoints: Endpoints,
    client: HttpClient,
}

fn transport(e: anyhow::Error) -> ServiceError {
    ServiceError::Transport(format!("{e:#}"))
}

impl HttpFoodService {
    pub fn new(endpoints: Endpoints, client: HttpClient) -> Self {
        Self { endpoints, client }
    }

    pub fn from_config(cfg: &ClientConfig) -> anyhow::Result<Self> {
        Ok(Self::new(cfg.endpoints.clone(), HttpClient::new(cfg.http)?))
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn send(&self, req: &HttpRequest) -> Result<HttpResponse, ServiceError> {
        let resp = self.client.execute(req).await.map_err(transport)?;
        parse::check_status(&resp)?;
        Ok(resp)
    }

    /// Meals for a single day. The diary itself lists without a date.
    pub async fn list_meals_on(&self, date: Option<NaiveDate>) -> Result<Vec<Meal>, ServiceError> {
        let req = food_api::build_list_meals_request(&self.endpoints, date).map_err(transport)?;
        let resp = self.send(&req).await?;
        parse::parse_meals(&resp.body)
    }
}

#[async_trait]
impl FoodService for HttpFoodService {
    async fn recognize(&self, image_data_url: &str) -> Result<RecognizedFood, ServiceError> {
        let req = food_api::build_recognize_request(&self.endpoints, image_data_url);
        let resp = self.send(&req).await?;
        parse::parse_recognized_food(&resp.body)
    }

    async fn search(&self, query: &str) -> Result<Vec<FoodItem>, ServiceError> {
        let req = food_api::build_search_request(&self.endpoints, query).map_err(transport)?;
        let resp = self.send(&req).await?;
        parse::parse_food_items(&resp.body)
    }

    async fn list_meals(&self) -> Result<Vec<Meal>, ServiceError> {
        self.list_meals_on(None).await
    }

    async fn save_meal(&self, draft: &MealDraft) -> Result<Option<SavedMeal>, ServiceError> {
        let req = food_api::build_save_meal_request(&self.endpoints, draft).map_err(transport)?;
        let resp = self.send(&req).await?;
        let saved = parse::parse_saved_meal(&resp.body);
        if saved.is_none() {
            log::debug!("save returned {} without a readable record", resp.status);
        }
        Ok(saved)
    }
}
