use crate::capture::CaptureFlow;
use crate::search::SearchFlow;
use crate::traits::{FoodService, Notifier};
use caltrack_core::ledger::Totals;
use caltrack_core::menu::{MenuSuggestion, todays_suggestions};
use caltrack_core::toast::Toast;
use caltrack_core::types::{FoodCandidate, Meal, MealDraft};
use caltrack_core::week::WeekData;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const SAVE_FAILED: &str = "Could not save the meal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiaryTab {
    #[default]
    Diary,
    Stats,
    Menu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddMealMode {
    Camera,
    Search,
}

/// The add-meal dialog. Open exactly when it is not `Closed`.
pub enum AddMealDialog {
    Closed,
    Choosing,
    Capture(CaptureFlow),
    Search(SearchFlow),
}

impl AddMealDialog {
    pub fn mode(&self) -> Option<AddMealMode> {
        match self {
            AddMealDialog::Capture(_) => Some(AddMealMode::Camera),
            AddMealDialog::Search(_) => Some(AddMealMode::Search),
            AddMealDialog::Closed | AddMealDialog::Choosing => None,
        }
    }
}

/// The main screen: today's meal list, its aggregates, and the add-meal dialog.
pub struct DiaryView {
    service: Arc<dyn FoodService>,
    notifier: Arc<dyn Notifier>,
    search_debounce: Duration,
    meals: Vec<Meal>,
    tab: DiaryTab,
    dialog: AddMealDialog,
}

impl DiaryView {
    pub fn new(
        service: Arc<dyn FoodService>,
        notifier: Arc<dyn Notifier>,
        search_debounce: Duration,
    ) -> Self {
        Self {
            service,
            notifier,
            search_debounce,
            meals: Vec::new(),
            tab: DiaryTab::default(),
            dialog: AddMealDialog::Closed,
        }
    }

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn totals(&self) -> Totals {
        Totals::of(&self.meals)
    }

    pub fn week(&self) -> WeekData {
        WeekData::with_today(self.totals().calories)
    }

    pub fn menu(&self) -> &'static [MenuSuggestion] {
        todays_suggestions()
    }

    pub fn tab(&self) -> DiaryTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: DiaryTab) {
        self.tab = tab;
    }

    /// Replaces the meal list with the backend's. On failure the current list is kept.
    pub async fn load_meals(&mut self) -> bool {
        match self.service.list_meals().await {
            Ok(meals) => {
                log::debug!("loaded {} meals", meals.len());
                self.meals = meals;
                true
            }
            Err(e) => {
                log::error!("failed to load meals: {e}");
                false
            }
        }
    }

    /// Persists a candidate timestamped now, then reloads the list once.
    ///
    /// The echoed record (if any) is shown immediately so a failed reload does not hide it.
    pub async fn save_meal(&mut self, candidate: &FoodCandidate) -> bool {
        let draft = MealDraft::from_candidate(candidate, Utc::now());
        match self.service.save_meal(&draft).await {
            Ok(saved) => {
                log::info!("saved meal {:?} ({} kcal)", draft.name, draft.calories);
                self.notifier.notify(Toast::info(
                    "Added!",
                    format!("{} - {} kcal", draft.name, draft.calories),
                ));
                if let Some(saved) = saved {
                    let meal = saved.into_meal();
                    if !self.meals.iter().any(|m| m.id == meal.id) {
                        self.meals.push(meal);
                    }
                }
                self.load_meals().await;
                true
            }
            Err(e) => {
                log::warn!(
                    "failed to save meal {:?} (status {:?}): {e}",
                    draft.name,
                    e.status()
                );
                self.notifier.notify(Toast::error(SAVE_FAILED));
                false
            }
        }
    }

    pub fn dialog(&self) -> &AddMealDialog {
        &self.dialog
    }

    pub fn is_dialog_open(&self) -> bool {
        !matches!(self.dialog, AddMealDialog::Closed)
    }

    pub fn mode(&self) -> Option<AddMealMode> {
        self.dialog.mode()
    }

    pub fn dialog_title(&self) -> Option<&'static str> {
        match self.dialog {
            AddMealDialog::Closed => None,
            AddMealDialog::Choosing => Some("New meal"),
            AddMealDialog::Capture(_) => Some("Photo analysis"),
            AddMealDialog::Search(_) => Some("Food search"),
        }
    }

    pub fn open_add_meal(&mut self) {
        if !self.is_dialog_open() {
            self.dialog = AddMealDialog::Choosing;
        }
    }

    /// Mounts the child flow for `mode`, replacing whichever one was open.
    ///
    /// Search mode starts its initial listing, so this must run inside a tokio runtime.
    pub fn choose_mode(&mut self, mode: AddMealMode) {
        if self.mode() == Some(mode) {
            return;
        }
        self.dialog = match mode {
            AddMealMode::Camera => AddMealDialog::Capture(CaptureFlow::new(
                self.service.clone(),
                self.notifier.clone(),
            )),
            AddMealMode::Search => AddMealDialog::Search(SearchFlow::mount(
                self.service.clone(),
                self.notifier.clone(),
                self.search_debounce,
            )),
        };
    }

    /// Closes the dialog and drops its child flow.
    pub fn close_dialog(&mut self) {
        self.dialog = AddMealDialog::Closed;
    }

    pub fn capture_mut(&mut self) -> Option<&mut CaptureFlow> {
        match &mut self.dialog {
            AddMealDialog::Capture(flow) => Some(flow),
            _ => None,
        }
    }

    pub fn search_mut(&mut self) -> Option<&mut SearchFlow> {
        match &mut self.dialog {
            AddMealDialog::Search(flow) => Some(flow),
            _ => None,
        }
    }

    /// Analyzes the captured photo; on success closes the dialog and saves the result.
    pub async fn confirm_capture(&mut self) -> bool {
        let Some(flow) = self.capture_mut() else {
            return false;
        };
        let Some(food) = flow.analyze().await else {
            return false;
        };
        self.close_dialog();
        self.save_meal(&FoodCandidate::from(food)).await
    }

    /// Saves the search result at `index` and closes the dialog.
    pub async fn select_search_result(&mut self, index: usize) -> bool {
        let Some(item) = self.search_mut().and_then(|flow| flow.select(index)) else {
            return false;
        };
        self.close_dialog();
        self.save_meal(&FoodCandidate::from(item)).await
    }
}
