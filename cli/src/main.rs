
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use fittrack_client::config::{ClientConfig, ConfigError};
use fittrack_client::error::{ErrorClass, ErrorCode};
use fittrack_client::net::types::{ActivityLevel, ApiError, Gender, Goal, MealType, User};
use fittrack_client::pages::dashboard::{self, DashboardSummary, NutrientProgress};
use fittrack_client::pages::food_search;
use fittrack_client::pages::login;
use fittrack_client::pages::profile::{self, ProfileChanges};
use fittrack_client::pages::register::{self, RegistrationForm, WELCOME_NOTICE};
use fittrack_client::pages::weight::{self, WeightHistory};
use fittrack_client::pages::PageError;
use fittrack_client::state::auth::SessionPhase;
use fittrack_client::util::dates::{format_iso_date, today};
use fittrack_client::SessionManager;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Client(#[from] ApiError),
    #[error("{0}")]
    Page(#[from] PageError),
    #[error("not signed in; run `fittrack login` first")]
    NotSignedIn,
    #[error("nothing to update; pass at least one field")]
    NoChanges,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "fittrack", about = "FitTrack nutrition and fitness client")]
struct Cli {
    /// Backend base URL (overrides `FITTRACK_API_URL`).
    #[arg(long, env = "FITTRACK_API_URL")]
    api_url: Option<String>,

    /// Directory holding the persisted auth token.
    #[arg(long, env = "FITTRACK_TOKEN_DIR")]
    token_dir: Option<PathBuf>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

struct CliContext {
    session: SessionManager,
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the session token.
    Login {
        username: String,
        #[arg(long, env = "FITTRACK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in.
    Register(RegisterArgs),
    /// Forget the persisted session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    Profile(ProfileCommand),
    /// Daily nutrition against goals.
    Dashboard {
        /// `YYYY-MM-DD`, defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    Foods(FoodsCommand),
    Weight(WeightCommand),
}

#[derive(Args, Debug)]
struct RegisterArgs {
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "FITTRACK_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long, env = "FITTRACK_CONFIRM_PASSWORD", hide_env_values = true)]
    confirm_password: String,
    #[arg(long)]
    age: Option<u32>,
    #[arg(long)]
    gender: Option<Gender>,
    /// Height in centimetres.
    #[arg(long)]
    height: Option<f64>,
    /// Weight in kilograms.
    #[arg(long)]
    weight: Option<f64>,
    #[arg(long, default_value = "sedentary")]
    activity_level: ActivityLevel,
    #[arg(long, default_value = "maintain")]
    goal: Goal,
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Show,
    Update(ProfileUpdateArgs),
}

#[derive(Args, Debug)]
struct ProfileUpdateArgs {
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    age: Option<u32>,
    #[arg(long)]
    gender: Option<Gender>,
    #[arg(long)]
    height: Option<f64>,
    #[arg(long)]
    weight: Option<f64>,
    #[arg(long)]
    activity_level: Option<ActivityLevel>,
    #[arg(long)]
    goal: Option<Goal>,
}

impl From<ProfileUpdateArgs> for ProfileChanges {
    fn from(args: ProfileUpdateArgs) -> Self {
        Self {
            email: args.email,
            age: args.age,
            gender: args.gender,
            height: args.height,
            weight: args.weight,
            activity_level: args.activity_level,
            goal: args.goal,
        }
    }
}

#[derive(Args, Debug)]
struct FoodsCommand {
    #[command(subcommand)]
    command: FoodsSubcommand,
}

#[derive(Subcommand, Debug)]
enum FoodsSubcommand {
    Search {
        query: String,
    },
    /// Search, pick a hit, and log it.
    Add {
        query: String,
        /// 1-based position in the search results.
        #[arg(long, default_value_t = 1)]
        pick: usize,
        #[arg(long, default_value = "breakfast")]
        meal: MealType,
        #[arg(long, default_value_t = 1.0)]
        servings: f64,
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Args, Debug)]
struct WeightCommand {
    #[command(subcommand)]
    command: WeightSubcommand,
}

#[derive(Subcommand, Debug)]
enum WeightSubcommand {
    List,
    Add {
        /// Kilograms.
        #[arg(long)]
        weight: Option<f64>,
        /// `YYYY-MM-DD`, defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match execute(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            notice(&render_error(&e));
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<(), CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = cli.api_url.as_deref() {
        config = config.with_api_url(api_url)?;
    }
    if let Some(token_dir) = cli.token_dir {
        config.token_dir = token_dir;
    }

    let ctx = CliContext { session: SessionManager::from_config(&config)?, json: cli.json };
    log_phase_changes(&ctx.session);

    let result = run(&ctx, cli.command).await;
    if let Err(CliError::Page(e)) = &result
        && e.class() == ErrorClass::Auth
    {
        tracing::info!(code = e.error_code(), "credentials rejected; clearing session");
        ctx.session.logout();
    }
    result
}

/// The user-facing line for a failed command: the `Display` message, never
/// the `Debug` structure.
fn render_error(err: &CliError) -> String {
    format!("error: {err}")
}

fn log_phase_changes(session: &SessionManager) {
    let mut rx = session.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let phase = rx.borrow_and_update().phase;
            tracing::debug!(%phase, "session phase changed");
        }
    });
}

async fn run(ctx: &CliContext, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login { username, password } => {
            let user = login::submit(&ctx.session, &username, &password).await?;
            notice(&format!("Signed in as {}", user.username));
            print_user(ctx, &user)
        }
        Command::Register(args) => run_register(ctx, args).await,
        Command::Logout => {
            ctx.session.logout();
            notice("Signed out");
            Ok(())
        }
        Command::Whoami => {
            let user = require_user(ctx).await?;
            print_user(ctx, &user)
        }
        Command::Profile(command) => run_profile(ctx, command).await,
        Command::Dashboard { date } => {
            require_user(ctx).await?;
            let request = ctx.session.request_config();
            let summary = dashboard::load_dashboard(ctx.session.api(), &request, date.as_deref()).await?;
            if ctx.json {
                print_json(&dashboard_json(&summary))
            } else {
                println!("{}", render_dashboard(&summary));
                Ok(())
            }
        }
        Command::Foods(command) => run_foods(ctx, command).await,
        Command::Weight(command) => run_weight(ctx, command).await,
    }
}

async fn run_register(ctx: &CliContext, args: RegisterArgs) -> Result<(), CliError> {
    let form = RegistrationForm {
        username: args.username,
        email: args.email,
        password: args.password,
        confirm_password: args.confirm_password,
        age: args.age,
        gender: args.gender,
        height: args.height,
        weight: args.weight,
        activity_level: args.activity_level,
        goal: args.goal,
    };
    let user = register::submit(&ctx.session, &form).await?;
    notice(WELCOME_NOTICE);
    print_user(ctx, &user)
}

async fn run_profile(ctx: &CliContext, command: ProfileCommand) -> Result<(), CliError> {
    let user = require_user(ctx).await?;
    match command.command {
        ProfileSubcommand::Show => print_user(ctx, &user),
        ProfileSubcommand::Update(args) => {
            let changes = ProfileChanges::from(args);
            if changes.is_empty() {
                return Err(CliError::NoChanges);
            }
            notice(profile::save(&ctx.session, &changes).await?);
            match ctx.session.current_user() {
                Some(user) => print_user(ctx, &user),
                None => Err(CliError::NotSignedIn),
            }
        }
    }
}

async fn run_foods(ctx: &CliContext, command: FoodsCommand) -> Result<(), CliError> {
    require_user(ctx).await?;
    let request = ctx.session.request_config();
    let api = ctx.session.api();
    match command.command {
        FoodsSubcommand::Search { query } => {
            let hits = food_search::search(api, &request, &query).await?;
            if ctx.json {
                return print_json(&serde_json::to_value(&hits)?);
            }
            if hits.is_empty() {
                println!("No foods found");
            }
            for (position, food) in hits.iter().enumerate() {
                let brand = food.brand_name.as_deref().map(|b| format!(" ({b})")).unwrap_or_default();
                println!(
                    "{:>2}. {}{brand}: {:.0} kcal, P {:.1}g C {:.1}g F {:.1}g per {}{}",
                    position + 1,
                    food.description,
                    food.calories,
                    food.protein,
                    food.carbs,
                    food.fat,
                    food.serving_size,
                    food.serving_unit
                );
            }
            Ok(())
        }
        FoodsSubcommand::Add { query, pick, meal, servings, date } => {
            let hits = food_search::search(api, &request, &query).await?;
            let food = food_search::pick(&hits, pick)?;
            let message = food_search::add_food(api, &request, food, meal, servings, date.as_deref()).await?;
            notice(&message);
            Ok(())
        }
    }
}

async fn run_weight(ctx: &CliContext, command: WeightCommand) -> Result<(), CliError> {
    require_user(ctx).await?;
    let request = ctx.session.request_config();
    let api = ctx.session.api();
    if let WeightSubcommand::Add { weight: kg, date } = command.command {
        let date = date.unwrap_or_else(|| format_iso_date(today()));
        notice(weight::log_weight(api, &request, kg, Some(&date)).await?);
    }
    let history = weight::load_history(api, &request).await?;
    if ctx.json {
        print_json(&weight_json(&history))
    } else {
        println!("{}", render_weight_history(&history));
        Ok(())
    }
}

/// Resume the persisted session or fail.
async fn require_user(ctx: &CliContext) -> Result<User, CliError> {
    match ctx.session.initialize().await {
        SessionPhase::Authenticated => ctx.session.current_user().ok_or(CliError::NotSignedIn),
        _ => Err(CliError::NotSignedIn),
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

fn notice(message: &str) {
    eprintln!("{message}");
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

fn print_user(ctx: &CliContext, user: &User) -> Result<(), CliError> {
    if ctx.json {
        let mut value = serde_json::to_value(user)?;
        if let (Some(reading), Some(object)) = (profile::user_bmi(user), value.as_object_mut()) {
            object.insert("bmi".to_owned(), json!({ "value": reading.value, "category": reading.category.label() }));
        }
        return print_json(&value);
    }
    println!("{}", render_user(user));
    Ok(())
}

fn optional<T: std::fmt::Display>(value: Option<T>, unit: &str) -> String {
    value.map_or_else(|| "-".to_owned(), |v| format!("{v}{unit}"))
}

fn render_user(user: &User) -> String {
    let mut lines = vec![
        format!("{} <{}>", user.username, user.email),
        format!("  age:            {}", optional(user.age, "")),
        format!("  gender:         {}", optional(user.gender, "")),
        format!("  height:         {}", optional(user.height, " cm")),
        format!("  weight:         {}", optional(user.weight, " kg")),
        format!("  activity level: {}", user.activity_level),
        format!("  goal:           {}", user.goal),
    ];
    if let Some(calories) = user.daily_calorie_goal {
        lines.push(format!(
            "  daily goals:    {calories:.0} kcal, P {}g C {}g F {}g",
            optional(user.daily_protein_goal.map(f64::round), ""),
            optional(user.daily_carb_goal.map(f64::round), ""),
            optional(user.daily_fat_goal.map(f64::round), ""),
        ));
    }
    match profile::user_bmi(user) {
        Some(reading) => lines.push(format!("  BMI:            {:.1} ({})", reading.value, reading.category)),
        None => lines.push("  BMI:            enter height and weight to calculate".to_owned()),
    }
    lines.join("\n")
}

fn render_nutrient(nutrient: &NutrientProgress) -> String {
    format!(
        "{:<9} {:>6.0} / {:<6.0}{:<5} {:>4.0}%  [{}]",
        nutrient.label,
        nutrient.current,
        nutrient.goal,
        nutrient.unit,
        nutrient.percentage(),
        nutrient.band()
    )
}

fn render_dashboard(summary: &DashboardSummary) -> String {
    let mut lines = vec![format!("Dashboard for {} ({} entries)", summary.date, summary.entries_count)];
    lines.extend(summary.nutrients().into_iter().map(render_nutrient));
    lines.push(format!("Calories remaining: {:.0}", summary.calories_remaining()));
    if let Some(latest) = &summary.latest_weight {
        lines.push(format!("Latest weight: {:.1} kg on {}", latest.weight, latest.date));
    }
    lines.join("\n")
}

fn dashboard_json(summary: &DashboardSummary) -> Value {
    let nutrients: Vec<Value> = summary
        .nutrients()
        .into_iter()
        .map(|n| {
            json!({
                "label": n.label,
                "current": n.current,
                "goal": n.goal,
                "unit": n.unit,
                "percentage": n.percentage(),
                "bar_width": n.bar_width(),
                "band": n.band().as_str(),
            })
        })
        .collect();
    json!({
        "date": summary.date,
        "entries_count": summary.entries_count,
        "nutrients": nutrients,
        "calories_remaining": summary.calories_remaining(),
        "latest_weight": summary.latest_weight,
    })
}

fn render_weight_history(history: &WeightHistory) -> String {
    if history.entries.is_empty() {
        return "No weight entries yet".to_owned();
    }
    let mut lines = Vec::with_capacity(history.entries.len() + 1);
    if let (Some(change), Some(trend)) = (history.change(), history.trend()) {
        lines.push(format!("Change: {} ({trend})", weight::format_change(change)));
    }
    lines.extend(history.entries.iter().map(|e| format!("{}  {:.1} kg", e.date, e.weight)));
    lines.join("\n")
}

fn weight_json(history: &WeightHistory) -> Value {
    json!({
        "entries": history.entries,
        "change": history.change(),
        "trend": history.trend().map(|t| t.as_str()),
    })
}
