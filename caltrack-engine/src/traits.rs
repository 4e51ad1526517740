use async_trait::async_trait;
use caltrack_core::error::ServiceError;
use caltrack_core::toast::{Toast, ToastCenter};
use caltrack_core::types::{FoodItem, Meal, MealDraft, RecognizedFood, SavedMeal};

/// The remote food backend: recognition, search and meal storage.
///
/// Every call is independent; implementations hold no session state.
#[async_trait]
pub trait FoodService: Send + Sync {
    async fn recognize(&self, image_data_url: &str) -> Result<RecognizedFood, ServiceError>;

    /// An empty query asks the backend for its default listing.
    async fn search(&self, query: &str) -> Result<Vec<FoodItem>, ServiceError>;

    async fn list_meals(&self) -> Result<Vec<Meal>, ServiceError>;

    /// Returns the created record when the backend echoes it back.
    async fn save_meal(&self, draft: &MealDraft) -> Result<Option<SavedMeal>, ServiceError>;
}

/// Sink for transient user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

impl Notifier for ToastCenter {
    fn notify(&self, toast: Toast) {
        self.push(toast);
    }
}
