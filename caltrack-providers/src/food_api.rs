use crate::request::HttpRequest;
use anyhow::Context;
use caltrack_core::config::Endpoints;
use caltrack_core::types::MealDraft;
use chrono::NaiveDate;
use serde_json::json;
use url::Url;

/// `POST /recognize` with the image as a data URL.
pub fn build_recognize_request(endpoints: &Endpoints, image_data_url: &str) -> HttpRequest {
    let payload = json!({ "image": image_data_url });
    HttpRequest::post_json(endpoints.recognize_url.clone(), payload.to_string())
}

/// `GET /search[?q=...]`. An empty query sends no `q` parameter at all.
pub fn build_search_request(endpoints: &Endpoints, query: &str) -> anyhow::Result<HttpRequest> {
    let mut url = Url::parse(&endpoints.search_url)
        .with_context(|| format!("invalid search url: {}", endpoints.search_url))?;
    if !query.is_empty() {
        url.query_pairs_mut().append_pair("q", query);
    }
    Ok(HttpRequest::get(url.to_string()))
}

/// `GET /meals[?date=YYYY-MM-DD]`.
pub fn build_list_meals_request(
    endpoints: &Endpoints,
    date: Option<NaiveDate>,
) -> anyhow::Result<HttpRequest> {
    let mut url = Url::parse(&endpoints.meals_url)
        .with_context(|| format!("invalid meals url: {}", endpoints.meals_url))?;
    if let Some(d) = date {
        url.query_pairs_mut()
            .append_pair("date", &d.format("%Y-%m-%d").to_string());
    }
    Ok(HttpRequest::get(url.to_string()))
}

/// `POST /meals`.
pub fn build_save_meal_request(
    endpoints: &Endpoints,
    draft: &MealDraft,
) -> anyhow::Result<HttpRequest> {
    let body = serde_json::to_string(draft).context("encode meal JSON")?;
    Ok(HttpRequest::post_json(endpoints.meals_url.clone(), body))
}
