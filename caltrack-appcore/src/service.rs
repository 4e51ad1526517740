use std::path::PathBuf;
use std::sync::Arc;

use caltrack_core::config::ClientConfig;
use caltrack_core::onboarding::{Advance, Goal, OnboardingWizard};
use caltrack_core::toast::ToastCenter;
use caltrack_engine::diary::DiaryView;
use caltrack_engine::traits::FoodService;
use caltrack_runtime::config_store::ConfigStore;
use caltrack_runtime::food_service::HttpFoodService;

/// Top-level screen.
pub enum AppPhase {
    Onboarding(OnboardingWizard),
    Main(MainScreen),
}

pub struct MainScreen {
    /// Chosen during onboarding. Only kept locally.
    pub goal: Option<Goal>,
    pub diary: DiaryView,
}

/// Application state container: owns the current phase and hands the shared service and
/// notifier to the views it creates.
pub struct AppService {
    config: ClientConfig,
    service: Arc<dyn FoodService>,
    toasts: Arc<ToastCenter>,
    phase: AppPhase,
}

impl AppService {
    /// Starts at the first onboarding step.
    pub fn new(config: ClientConfig, service: Arc<dyn FoodService>) -> Self {
        let toasts = Arc::new(ToastCenter::new(config.toast_ttl()));
        Self {
            config,
            service,
            toasts,
            phase: AppPhase::Onboarding(OnboardingWizard::new()),
        }
    }

    /// Loads the config at `config_path` (defaults when absent), applies the base-URL
    /// override, and connects to the HTTP backend.
    pub fn open(config_path: PathBuf, base_url: Option<&str>) -> anyhow::Result<Self> {
        let store = ConfigStore::at_path(config_path);
        let env = std::env::var(caltrack_runtime::defaults::BASE_URL_ENV).ok();
        let cfg = caltrack_runtime::defaults::apply_base_url_override(
            store.load_or_default()?,
            base_url,
            env.as_deref(),
        );
        let service = HttpFoodService::from_config(&cfg)?;
        log::debug!("endpoints: {:?}", service.endpoints());
        Ok(Self::new(cfg, Arc::new(service)))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn toasts(&self) -> &Arc<ToastCenter> {
        &self.toasts
    }

    pub fn phase(&self) -> &AppPhase {
        &self.phase
    }

    pub fn is_onboarding(&self) -> bool {
        matches!(self.phase, AppPhase::Onboarding(_))
    }

    pub fn wizard(&self) -> Option<&OnboardingWizard> {
        match &self.phase {
            AppPhase::Onboarding(w) => Some(w),
            AppPhase::Main(_) => None,
        }
    }

    pub fn wizard_mut(&mut self) -> Option<&mut OnboardingWizard> {
        match &mut self.phase {
            AppPhase::Onboarding(w) => Some(w),
            AppPhase::Main(_) => None,
        }
    }

    /// Moves the wizard forward; after the last step the main screen is entered and its
    /// meals are loaded. Returns `true` once in the main phase.
    pub async fn next_step(&mut self) -> bool {
        let wizard = match &mut self.phase {
            AppPhase::Onboarding(w) => std::mem::take(w),
            AppPhase::Main(_) => return true,
        };
        match wizard.next() {
            Advance::Step(w) => {
                self.phase = AppPhase::Onboarding(w);
                false
            }
            Advance::Done(outcome) => {
                log::info!("onboarding finished, goal {:?}", outcome.goal);
                self.enter_main(outcome.goal).await;
                true
            }
        }
    }

    pub fn back_step(&mut self) -> bool {
        self.wizard_mut().is_some_and(|w| w.back())
    }

    /// Goes straight to the main screen without a goal.
    pub async fn skip_onboarding(&mut self) {
        if self.is_onboarding() {
            self.enter_main(None).await;
        }
    }

    // The phase switches before the first await; a dropped load leaves an empty diary.
    async fn enter_main(&mut self, goal: Option<Goal>) {
        let diary = DiaryView::new(
            self.service.clone(),
            self.toasts.clone(),
            self.config.search_debounce(),
        );
        self.phase = AppPhase::Main(MainScreen { goal, diary });
        if let Some(diary) = self.diary_mut() {
            diary.load_meals().await;
        }
    }

    pub fn goal(&self) -> Option<Goal> {
        match &self.phase {
            AppPhase::Main(m) => m.goal,
            AppPhase::Onboarding(_) => None,
        }
    }

    pub fn diary(&self) -> Option<&DiaryView> {
        match &self.phase {
            AppPhase::Main(m) => Some(&m.diary),
            AppPhase::Onboarding(_) => None,
        }
    }

    pub fn diary_mut(&mut self) -> Option<&mut DiaryView> {
        match &mut self.phase {
            AppPhase::Main(m) => Some(&mut m.diary),
            AppPhase::Onboarding(_) => None,
        }
    }
}
