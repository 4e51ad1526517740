pub mod capture;
pub mod diary;
pub mod search;
pub mod traits;

#[cfg(test)]
mod fakes;

pub use capture::{CaptureError, CaptureFlow};
pub use diary::{AddMealDialog, AddMealMode, DiaryTab, DiaryView};
pub use search::{SearchFlow, SearchSnapshot, SearchStatus};
pub use traits::{FoodService, Notifier};
