use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuSuggestion {
    pub meal: &'static str,
    pub dish: &'static str,
    pub calories: i64,
    pub time: &'static str,
}

// Static recommendations shown on the menu tab.
const SUGGESTIONS: [MenuSuggestion; 2] = [
    MenuSuggestion {
        meal: "Dinner",
        dish: "Baked fish with vegetables",
        calories: 380,
        time: "19:00",
    },
    MenuSuggestion {
        meal: "Snack",
        dish: "Greek yogurt",
        calories: 150,
        time: "16:30",
    },
];

pub fn todays_suggestions() -> &'static [MenuSuggestion] {
    &SUGGESTIONS
}
