use std::path::{Path, PathBuf};

use anyhow::Context;
use caltrack_appcore::AppService;
use caltrack_core::ledger::DAILY_LIMIT_KCAL;
use caltrack_core::onboarding::{ActivityLevel, Cuisine, Goal, OnboardingWizard};
use caltrack_core::types::{FoodItem, Meal};
use caltrack_engine::diary::{AddMealMode, DiaryTab, DiaryView};
use caltrack_runtime::config_store::ConfigStore;
use caltrack_runtime::defaults::{
    BASE_URL_ENV, apply_base_url_override, default_client_config, default_config_path,
};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

const BAR_WIDTH: usize = 30;

#[derive(Parser)]
#[command(name = "caltrack")]
#[command(about = "Calorie tracker: food diary, photo recognition and food search")]
struct Cli {
    /// Config file; defaults are used when it does not exist.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides all endpoint URLs (`<base>/recognize`, `<base>/search`, `<base>/meals`).
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through the three onboarding steps, then show the diary.
    Onboard,
    /// Today's meals and totals.
    Diary,
    /// Recognize a dish from a photo and add it to the diary.
    Scan {
        image: PathBuf,
        /// Only show what was recognized.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Search the food database.
    Search {
        query: Option<String>,
        /// Add result N (1-based) to the diary.
        #[arg(long)]
        pick: Option<usize>,
    },
    /// Calories per day for the week.
    Stats,
    /// Today's menu suggestions.
    Menu,
    /// Write a config file with default values.
    InitConfig { path: PathBuf },
}

fn init_logging() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "caltrack=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    if let Commands::InitConfig { path } = &cli.command {
        return init_config(path, cli.base_url.as_deref());
    }
    if let Commands::Menu = &cli.command {
        print_menu();
        return Ok(());
    }

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut app = AppService::open(config_path, cli.base_url.as_deref())?;
    tracing::debug!(meals_url = %app.config().endpoints.meals_url, "client ready");

    let result = match cli.command {
        Commands::Onboard => onboard(&mut app).await,
        Commands::Diary => {
            let diary = main_diary(&mut app).await?;
            print_diary(diary);
            Ok(())
        }
        Commands::Scan { image, dry_run } => scan(&mut app, &image, dry_run).await,
        Commands::Search { query, pick } => search(&mut app, query, pick).await,
        Commands::Stats => {
            let diary = main_diary(&mut app).await?;
            diary.set_tab(DiaryTab::Stats);
            print_stats(diary);
            Ok(())
        }
        Commands::Menu | Commands::InitConfig { .. } => Ok(()),
    };

    print_toasts(&app);
    result
}

fn init_config(path: &Path, base_url: Option<&str>) -> anyhow::Result<()> {
    let env = std::env::var(BASE_URL_ENV).ok();
    let cfg = apply_base_url_override(default_client_config(), base_url, env.as_deref());
    let store = ConfigStore::at_path(path);
    store.save(&cfg)?;
    println!("Wrote {}", store.path().display());
    Ok(())
}

async fn main_diary(app: &mut AppService) -> anyhow::Result<&mut DiaryView> {
    app.skip_onboarding().await;
    app.diary_mut().context("main screen not available")
}

fn print_toasts(app: &AppService) {
    for toast in app.toasts().drain() {
        if toast.is_error() {
            eprintln!("[{}] {}", toast.title, toast.description);
        } else {
            println!("[{}] {}", toast.title, toast.description);
        }
    }
}

fn bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn print_meal(meal: &Meal) {
    println!(
        "  {:<5} {:<32} {:>5} kcal  P {:.1}  C {:.1}  F {:.1}",
        meal.time,
        meal.name,
        meal.nutrition.calories,
        meal.nutrition.protein,
        meal.nutrition.carbs,
        meal.nutrition.fat
    );
}

fn print_diary(diary: &DiaryView) {
    let totals = diary.totals();
    println!("{}", chrono::Local::now().format("%A, %-d %B"));
    println!(
        "{} / {} kcal  [{}] {:.0}%",
        totals.calories,
        DAILY_LIMIT_KCAL,
        bar(totals.progress_bar_percent()),
        totals.progress_fraction() * 100.0
    );
    println!("Remaining: {} kcal", totals.remaining());
    println!(
        "Protein {:.1} g  Carbs {:.1} g  Fat {:.1} g",
        totals.protein, totals.carbs, totals.fat
    );
    println!();

    if diary.meals().is_empty() {
        println!("No meals yet today.");
        return;
    }
    for meal in diary.meals() {
        print_meal(meal);
    }
}

fn print_stats(diary: &DiaryView) {
    let week = diary.week();
    for day in &week.days {
        println!(
            "{}  [{}] {:>5} kcal",
            day.label(),
            bar(week.bar_width_percent(day)),
            day.calories
        );
    }
    println!("Average: {} kcal/day", week.average());
}

fn print_menu() {
    for s in caltrack_core::menu::todays_suggestions() {
        println!("{:<7} {}  {:<28} {} kcal", s.meal, s.time, s.dish, s.calories);
    }
}

fn print_food(index: usize, item: &FoodItem) {
    println!(
        "{:>3}. {:<32} {:>5} kcal  {:<10} {}",
        index + 1,
        item.name,
        item.nutrition.calories,
        item.category,
        item.serving_size
    );
}

async fn scan(app: &mut AppService, image: &Path, dry_run: bool) -> anyhow::Result<()> {
    let diary = main_diary(app).await?;
    diary.open_add_meal();
    diary.choose_mode(AddMealMode::Camera);
    let capture = diary.capture_mut().context("capture flow not mounted")?;
    capture.select_file(image).await?;
    tracing::info!(mime = ?capture.captured_mime(), "analyzing {}", image.display());

    if dry_run {
        if let Some(food) = capture.analyze().await {
            println!(
                "{}: {} kcal  P {:.1}  C {:.1}  F {:.1}",
                food.name,
                food.nutrition.calories,
                food.nutrition.protein,
                food.nutrition.carbs,
                food.nutrition.fat
            );
        }
        diary.close_dialog();
        return Ok(());
    }

    if diary.confirm_capture().await {
        print_diary(diary);
    }
    Ok(())
}

async fn search(
    app: &mut AppService,
    query: Option<String>,
    pick: Option<usize>,
) -> anyhow::Result<()> {
    let diary = main_diary(app).await?;
    diary.open_add_meal();
    diary.choose_mode(AddMealMode::Search);
    let flow = diary.search_mut().context("search flow not mounted")?;
    if let Some(q) = query {
        flow.set_query(q);
    }
    let snapshot = flow.settle().await;

    match pick {
        None => {
            if snapshot.results.is_empty() {
                if snapshot.query.is_empty() {
                    println!("Start typing to search.");
                } else {
                    println!("Nothing found for {:?}.", snapshot.query);
                }
            }
            for (i, item) in snapshot.results.iter().enumerate() {
                print_food(i, item);
            }
            diary.close_dialog();
        }
        Some(n) => {
            let index = n.checked_sub(1).context("results are numbered from 1")?;
            if index >= snapshot.results.len() {
                anyhow::bail!("no result #{n} ({} results)", snapshot.results.len());
            }
            if diary.select_search_result(index).await {
                print_diary(diary);
            }
        }
    }
    Ok(())
}

fn print_wizard(w: &OnboardingWizard) {
    println!();
    println!(
        "Step {}/{}: {}  ({:.0}%)",
        w.step() + 1,
        caltrack_core::onboarding::STEP_COUNT,
        w.title(),
        w.progress_fraction() * 100.0
    );
    match w.step() {
        0 => {
            for (i, goal) in Goal::ALL.iter().enumerate() {
                let mark = if w.goal == Some(*goal) { "*" } else { " " };
                println!(" {mark} {}. {}", i + 1, goal.label());
            }
        }
        1 => {
            let b = &w.biometrics;
            println!(
                "  age {:?}, weight {:?} kg, height {:?} cm, activity {:?}",
                b.age, b.weight_kg, b.height_cm, b.activity
            );
            println!("  set with: age N | weight N | height N | activity low|medium|high");
        }
        _ => {
            let p = &w.preferences;
            let cuisines: Vec<_> = Cuisine::ALL
                .iter()
                .map(|c| {
                    let mark = if p.cuisines.contains(c) { "x" } else { " " };
                    format!("[{mark}] {}", c.label())
                })
                .collect();
            println!("  {}", cuisines.join("  "));
            println!("  dislikes: {}", p.dislikes);
            println!("  allergies: {}", p.allergies);
            println!("  set with: cuisine NAME | dislikes TEXT | allergies TEXT");
        }
    }
    let back = if w.can_go_back() { " | back" } else { "" };
    println!("[{}: empty line{back}]", w.next_label());
}

fn apply_answer(w: &mut OnboardingWizard, input: &str) -> Result<(), String> {
    if w.step() == 0 {
        let goal = input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| Goal::ALL.get(i).copied())
            .or_else(|| Goal::from_key(input))
            .ok_or_else(|| format!("unknown goal: {input}"))?;
        w.select_goal(goal);
        return Ok(());
    }

    let (key, value) = input.split_once(' ').unwrap_or((input, ""));
    let value = value.trim();
    let number = || value.parse::<f64>().map_err(|_| format!("not a number: {value}"));
    match (w.step(), key) {
        (1, "age") => {
            w.biometrics.age = Some(value.parse().map_err(|_| format!("not an age: {value}"))?)
        }
        (1, "weight") => w.biometrics.weight_kg = Some(number()?),
        (1, "height") => w.biometrics.height_cm = Some(number()?),
        (1, "activity") => {
            w.biometrics.activity = Some(
                ActivityLevel::from_key(value)
                    .ok_or_else(|| format!("unknown activity level: {value}"))?,
            )
        }
        (2, "cuisine") => {
            let c = Cuisine::from_key(value).ok_or_else(|| format!("unknown cuisine: {value}"))?;
            w.preferences.toggle_cuisine(c);
        }
        (2, "dislikes") => w.preferences.dislikes = value.to_string(),
        (2, "allergies") => w.preferences.allergies = value.to_string(),
        _ => return Err(format!("unrecognized input: {input}")),
    }
    Ok(())
}

async fn onboard(app: &mut AppService) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(w) = app.wizard() {
        print_wizard(w);
        let Some(line) = lines.next_line().await.context("read stdin")? else {
            anyhow::bail!("onboarding aborted");
        };
        let input = line.trim();
        match input {
            "" | "next" => {
                app.next_step().await;
            }
            "back" => {
                app.back_step();
            }
            other => {
                if let Some(w) = app.wizard_mut() {
                    if let Err(e) = apply_answer(w, other) {
                        eprintln!("{e}");
                    }
                }
            }
        }
    }

    match app.goal() {
        Some(goal) => println!("Goal: {}", goal.label()),
        None => println!("No goal selected."),
    }
    if let Some(diary) = app.diary() {
        println!();
        print_diary(diary);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_is_clamped_and_sized() {
        assert_eq!(bar(0.0), ".".repeat(BAR_WIDTH));
        assert_eq!(bar(250.0), "#".repeat(BAR_WIDTH));
        assert_eq!(bar(50.0).matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn goal_answers_by_number_or_key() {
        let mut w = OnboardingWizard::new();
        apply_answer(&mut w, "2").unwrap();
        assert_eq!(w.goal, Some(Goal::Maintain));
        apply_answer(&mut w, "iron").unwrap();
        assert_eq!(w.goal, Some(Goal::Iron));
        assert!(apply_answer(&mut w, "9").is_err());
    }

    #[test]
    fn cli_parses_search_pick() {
        let cli = Cli::parse_from([
            "caltrack",
            "--base-url",
            "http://h",
            "search",
            "rice",
            "--pick",
            "2",
        ]);
        assert_eq!(cli.base_url.as_deref(), Some("http://h"));
        match cli.command {
            Commands::Search { query, pick } => {
                assert_eq!(query.as_deref(), Some("rice"));
                assert_eq!(pick, Some(2));
            }
            _ => panic!("expected search"),
        }
    }
}
