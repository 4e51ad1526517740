use chrono::Weekday;
use serde::{Deserialize, Serialize};

// Placeholder history for Monday..Saturday; Sunday is the live total.
const PLACEHOLDER_DAYS: [(Weekday, i64); 6] = [
    (Weekday::Mon, 1850),
    (Weekday::Tue, 2100),
    (Weekday::Wed, 1920),
    (Weekday::Thu, 1780),
    (Weekday::Fri, 2050),
    (Weekday::Sat, 1650),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTotal {
    pub day: Weekday,
    pub calories: i64,
}

impl DayTotal {
    pub fn label(&self) -> &'static str {
        match self.day {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }
}

/// Seven daily totals for the stats tab. Not a real historical record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekData {
    pub days: Vec<DayTotal>,
}

impl WeekData {
    pub fn with_today(today_calories: i64) -> Self {
        let mut days: Vec<DayTotal> = PLACEHOLDER_DAYS
            .iter()
            .map(|&(day, calories)| DayTotal { day, calories })
            .collect();
        days.push(DayTotal {
            day: Weekday::Sun,
            calories: today_calories,
        });
        Self { days }
    }

    pub fn from_days(days: Vec<DayTotal>) -> Self {
        Self { days }
    }

    pub fn max_calories(&self) -> i64 {
        self.days.iter().map(|d| d.calories).max().unwrap_or(0)
    }

    /// Bar width relative to the week's maximum, in percent.
    ///
    /// A week whose maximum is zero (or negative) has no bar data; every bar is 0%.
    pub fn bar_width_percent(&self, day: &DayTotal) -> f64 {
        let max = self.max_calories();
        if max <= 0 {
            return 0.0;
        }
        day.calories as f64 / max as f64 * 100.0
    }

    /// Rounded mean over all days.
    pub fn average(&self) -> i64 {
        if self.days.is_empty() {
            return 0;
        }
        let sum: i64 = self.days.iter().map(|d| d.calories).sum();
        (sum as f64 / self.days.len() as f64).round() as i64
    }
}
