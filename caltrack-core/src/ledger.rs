use crate::types::Meal;
use serde::{Deserialize, Serialize};

/// Fixed daily calorie budget used as the progress denominator.
pub const DAILY_LIMIT_KCAL: i64 = 2000;

/// Sums across the current meal list. Always recomputed from the list, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Totals {
    pub fn of(meals: &[Meal]) -> Self {
        meals.iter().fold(Totals::default(), |acc, m| Totals {
            calories: acc.calories + m.nutrition.calories,
            protein: acc.protein + m.nutrition.protein,
            carbs: acc.carbs + m.nutrition.carbs,
            fat: acc.fat + m.nutrition.fat,
        })
    }

    /// Fraction of the daily limit consumed. Not clamped: 2500 kcal yields 1.25.
    pub fn progress_fraction(&self) -> f64 {
        self.calories as f64 / DAILY_LIMIT_KCAL as f64
    }

    /// Calories left for the day; negative once the limit is exceeded.
    pub fn remaining(&self) -> i64 {
        DAILY_LIMIT_KCAL - self.calories
    }

    /// Width of the progress bar in percent. Clamping happens only here.
    pub fn progress_bar_percent(&self) -> f64 {
        (self.progress_fraction() * 100.0).clamp(0.0, 100.0)
    }
}
