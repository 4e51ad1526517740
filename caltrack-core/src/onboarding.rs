use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const STEP_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
    Iron,
    Calcium,
}

impl Goal {
    pub const ALL: [Goal; 5] = [
        Goal::Lose,
        Goal::Maintain,
        Goal::Gain,
        Goal::Iron,
        Goal::Calcium,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Goal::Lose => "Lose weight",
            Goal::Maintain => "Maintain weight",
            Goal::Gain => "Gain mass",
            Goal::Iron => "More iron",
            Goal::Calcium => "More calcium",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "lose" => Some(Goal::Lose),
            "maintain" => Some(Goal::Maintain),
            "gain" => Some(Goal::Gain),
            "iron" => Some(Goal::Iron),
            "calcium" => Some(Goal::Calcium),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Low,
    Medium,
    High,
}

impl ActivityLevel {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "low" => Some(ActivityLevel::Low),
            "medium" => Some(ActivityLevel::Medium),
            "high" => Some(ActivityLevel::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cuisine {
    European,
    Asian,
    Mediterranean,
    Vegan,
}

impl Cuisine {
    pub const ALL: [Cuisine; 4] = [
        Cuisine::European,
        Cuisine::Asian,
        Cuisine::Mediterranean,
        Cuisine::Vegan,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Cuisine::European => "European",
            Cuisine::Asian => "Asian",
            Cuisine::Mediterranean => "Mediterranean",
            Cuisine::Vegan => "Vegan",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Cuisine::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(key))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Biometrics {
    pub age: Option<u32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub activity: Option<ActivityLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    pub cuisines: BTreeSet<Cuisine>,
    pub dislikes: String,
    pub allergies: String,
}

impl Preferences {
    pub fn toggle_cuisine(&mut self, cuisine: Cuisine) {
        if !self.cuisines.remove(&cuisine) {
            self.cuisines.insert(cuisine);
        }
    }
}

/// What survives onboarding. Biometrics and preferences are dropped on completion and
/// the goal is not sent to any backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OnboardingOutcome {
    pub goal: Option<Goal>,
}

#[derive(Debug)]
pub enum Advance {
    Step(OnboardingWizard),
    Done(OnboardingOutcome),
}

/// Linear three-step wizard: goal, biometrics, preferences.
///
/// `next` consumes the wizard so that leaving the last step cannot be undone.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OnboardingWizard {
    step: usize,
    pub goal: Option<Goal>,
    pub biometrics: Biometrics,
    pub preferences: Preferences,
}

impl OnboardingWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn is_last_step(&self) -> bool {
        self.step + 1 == STEP_COUNT
    }

    pub fn can_go_back(&self) -> bool {
        self.step > 0
    }

    pub fn title(&self) -> &'static str {
        match self.step {
            0 => "Choose your goal",
            1 => "Tell us about yourself",
            _ => "Food preferences",
        }
    }

    /// Label for the forward button.
    pub fn next_label(&self) -> &'static str {
        if self.is_last_step() { "Start" } else { "Next" }
    }

    pub fn progress_fraction(&self) -> f64 {
        (self.step + 1) as f64 / STEP_COUNT as f64
    }

    pub fn select_goal(&mut self, goal: Goal) {
        self.goal = Some(goal);
    }

    pub fn next(mut self) -> Advance {
        if self.is_last_step() {
            return Advance::Done(OnboardingOutcome { goal: self.goal });
        }
        self.step += 1;
        Advance::Step(self)
    }

    /// Returns `false` (and does nothing) on the first step.
    pub fn back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.step -= 1;
        true
    }
}
