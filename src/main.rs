use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use get_authentic::backend::{BackendClient, ProfileUpdate, ResultSubmission, SignupRequest};
use get_authentic::config::init::{looks_like_email, prompt_password, save_user};
use get_authentic::config::{get_config_path, Config, UserContext};
use get_authentic::output;
use get_authentic::questionnaire::{load_answers, parse_answer_list, CompletedAnswers};
use get_authentic::report::{build_report, write_report};
use get_authentic::results::{get_results_path, load_history, save_history, StoredResult};
use get_authentic::scoring::{
    averages_from_scores, classify, score_answers, validate_scoring, ProfileLabel, ScoreResult,
    ScoringConfig,
};
use get_authentic::tui::{resolve_theme, run_tui, App, AppContext, ThemeColors};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_INPUT: i32 = 5;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

/// Where answers come from: an inline list or a JSON file
#[derive(Args, Debug)]
struct AnswerSource {
    /// Answers in catalog order, comma or space separated (e.g. "7,6,5,...")
    #[arg(long, value_name = "LIST", conflicts_with = "input")]
    answers: Option<String>,

    /// JSON file: {"scores": [...], "categories": [...]} or a bare array
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer the questionnaire interactively (default if no subcommand)
    Quiz,
    /// Score a full set of answers
    Score {
        #[command(flatten)]
        source: AnswerSource,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Record the result in the local history
        #[arg(long)]
        save: bool,

        /// Send the result to the configured backend
        #[arg(long)]
        submit: bool,

        /// Also export a report to this path
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,
    },
    /// Classify four category scores given directly
    Classify {
        /// Ingredients, Visual Appearance, Cultural & Local Experiences, Servicescape
        #[arg(num_args = 4, required = true, value_name = "SCORE")]
        scores: Vec<f64>,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// List the statements of the questionnaire
    Questions,
    /// Show the guidelines for a customer profile
    Guidelines {
        /// leisure, food-driven or cultural-food
        profile: String,
    },
    /// Export a paginated report
    Report {
        #[command(flatten)]
        source: AnswerSource,

        /// Use a saved result instead of answers
        #[arg(long, conflicts_with_all = ["answers", "input"])]
        token: Option<String>,

        /// Output file
        #[arg(short, long, default_value = "get-authentic-report.txt")]
        output: PathBuf,
    },
    /// List saved results, or show one
    History {
        /// Show a single result (looked up locally, then on the backend)
        #[arg(long)]
        token: Option<String>,

        /// List results of every respondent
        #[arg(long)]
        all: bool,
    },
    /// Create an account on the backend (email from --email)
    Signup {
        /// Restaurant name for the account
        restaurant_name: String,
    },
    /// Log in to the backend and store the account as the respondent
    Login {
        /// Email or restaurant name (defaults to --email or user.email)
        identifier: Option<String>,
    },
    /// Send restaurant profile details to the backend
    Profile {
        #[arg(long)]
        owner_name: String,

        /// Province or city
        #[arg(long)]
        location: String,

        #[arg(long)]
        business_type: String,

        /// Your position at the restaurant
        #[arg(long)]
        position: String,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        website: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "get-authentic")]
#[command(about = "Thai cultural authenticity assessment for restaurants", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/get-authentic/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Respondent email (overrides user.email from the config)
    #[arg(long, global = true)]
    email: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Print an error and exit with the given code
fn fail(code: i32, msg: impl std::fmt::Display) -> ! {
    eprintln!("{}", msg);
    std::process::exit(code);
}

/// Respondent from --email and the config; the flag wins for the address
fn resolve_user(email: Option<String>, config: &Config) -> Option<UserContext> {
    match (email, config.user.clone()) {
        (Some(email), Some(mut user)) => {
            user.email = email;
            Some(user)
        }
        (Some(email), None) => Some(UserContext::new(email)),
        (None, user) => user,
    }
}

/// Why the respondent is missing for the requested actions, if it is
fn missing_respondent(
    save: bool,
    submit: bool,
    user: Option<&UserContext>,
) -> Option<&'static str> {
    if (save || submit) && user.is_none() {
        Some("Saving or submitting needs a respondent: pass --email or set user.email")
    } else {
        None
    }
}

fn read_answers(source: &AnswerSource) -> CompletedAnswers {
    let loaded = match (&source.answers, &source.input) {
        (Some(list), _) => parse_answer_list(list).map(CompletedAnswers::for_catalog),
        (None, Some(path)) => load_answers(path),
        (None, None) => fail(EXIT_INPUT, "Provide answers with --answers or --input"),
    };
    loaded.unwrap_or_else(|e| fail(EXIT_INPUT, format!("Invalid answers: {:#}", e)))
}

fn score_or_exit(answers: &CompletedAnswers, scoring: &ScoringConfig) -> ScoreResult {
    score_answers(&answers.scores, &answers.categories, scoring)
        .unwrap_or_else(|e| fail(EXIT_INPUT, format!("Invalid answers: {}", e)))
}

fn print_result(result: &ScoreResult, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!("{}", output::format_result(result, output::should_use_colors()))
        }
        OutputFormat::Tsv => println!("{}", output::format_tsv(result)),
        OutputFormat::Json => match output::format_json(result) {
            Ok(json) => println!("{}", json),
            Err(e) => fail(EXIT_FAILURE, format!("Failed to render JSON: {}", e)),
        },
    }
}

const NO_BACKEND: &str = "No backend configured. Add to ~/.config/get-authentic/config.yaml:
  backend:
    base_url: https://...";

fn backend_client(config: &Config) -> BackendClient {
    let Some(ref backend) = config.backend else {
        fail(EXIT_CONFIG, NO_BACKEND);
    };
    BackendClient::new(backend)
        .unwrap_or_else(|e| fail(EXIT_CONFIG, format!("Config error: {:#}", e)))
}

fn password_or_exit(message: &str) -> String {
    prompt_password(message).unwrap_or_else(|e| fail(EXIT_INPUT, format!("{:#}", e)))
}

fn export_report(path: &Path, user: Option<&UserContext>, result: &ScoreResult) {
    let doc = build_report(user, &result.averages, result.profile, Utc::now());
    if let Err(e) = write_report(path, &doc) {
        fail(EXIT_FAILURE, format!("Failed to export report: {:#}", e));
    }
    println!("Report written to {} ({} pages)", path.display(), doc.page_count());
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    get_authentic::logging::init_cli_logger(cli.verbose);

    // Install rustls crypto provider (required for rustls 0.23+)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }

    let command = cli.command.unwrap_or(Commands::Quiz);
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = command {
        if let Err(e) = get_authentic::config::init::run_init_wizard(config_path) {
            fail(EXIT_FAILURE, format!("Init failed: {:#}", e));
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match get_authentic::config::load_config(config_path.clone()) {
        Ok(c) => c,
        Err(e) => fail(EXIT_CONFIG, format!("Config error: {:#}", e)),
    };

    // Validate scoring config at startup
    let scoring = config.scoring.clone().unwrap_or_default();
    if let Err(errors) = validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let user = resolve_user(cli.email, &config);
    let results_path = get_results_path();
    let use_colors = output::should_use_colors();

    match command {
        Commands::Quiz => {
            let report_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            let theme = ThemeColors::for_theme(resolve_theme(config.theme.as_deref()));
            if config.backend.is_some() {
                // Surface a bad backend section before the terminal is taken over
                backend_client(&config);
            }
            let app = App::new(AppContext {
                scoring,
                user,
                results_path,
                report_dir,
                theme,
                backend: config.backend.clone(),
            });
            if let Err(e) = run_tui(app).await {
                fail(EXIT_FAILURE, format!("Terminal error: {:#}", e));
            }
        }
        Commands::Score {
            source,
            format,
            save,
            submit,
            report,
        } => {
            if let Some(msg) = missing_respondent(save, submit, user.as_ref()) {
                fail(EXIT_INPUT, msg);
            }

            let answers = read_answers(&source);
            let result = score_or_exit(&answers, &scoring);
            print_result(&result, format);

            let mut token = None;
            if submit {
                let client = backend_client(&config);
                let submission = ResultSubmission {
                    email: user.as_ref().map(|u| u.email.clone()).unwrap_or_default(),
                    scores: answers.scores.clone(),
                    categories: answers.categories.clone(),
                    profile_type: result.profile,
                };
                match client.submit_result(&submission).await {
                    Ok(receipt) => {
                        if let Some(ref t) = receipt.token {
                            eprintln!("Submitted: {}", t);
                        } else {
                            eprintln!("Submitted");
                        }
                        token = receipt.token;
                    }
                    Err(e) => fail(EXIT_NETWORK, format!("Submit failed: {:#}", e)),
                }
            }

            if save {
                let email = user.as_ref().map(|u| u.email.clone()).unwrap_or_default();
                let mut stored = StoredResult::new(
                    email,
                    answers.scores.clone(),
                    answers.categories.clone(),
                    &result,
                );
                if let Some(t) = token {
                    stored = stored.with_token(t);
                }
                let saved_token = stored.token.clone();
                let saved = load_history(&results_path).and_then(|mut history| {
                    history.record(stored)?;
                    save_history(&results_path, &history)
                });
                match saved {
                    Ok(()) => eprintln!("Saved: {}", saved_token),
                    Err(e) => fail(EXIT_FAILURE, format!("Failed to save result: {:#}", e)),
                }
            }

            if let Some(ref path) = report {
                export_report(path, user.as_ref(), &result);
            }
        }
        Commands::Classify { scores, format } => {
            let raw: [f64; 4] = scores
                .as_slice()
                .try_into()
                .unwrap_or_else(|_| fail(EXIT_INPUT, "Expected exactly four scores"));
            let averages = averages_from_scores(raw)
                .unwrap_or_else(|e| fail(EXIT_INPUT, format!("Invalid scores: {}", e)));
            let classification = classify(&averages, &scoring);
            let result = ScoreResult {
                averages,
                profile: classification.profile,
                breakdown: classification.breakdown,
            };
            print_result(&result, format);
        }
        Commands::Questions => {
            println!("{}", output::format_questions(use_colors));
        }
        Commands::Guidelines { profile } => {
            let profile = ProfileLabel::parse(&profile)
                .unwrap_or_else(|e| fail(EXIT_INPUT, format!("{:#}", e)));
            println!("{}", output::format_guidelines(profile, use_colors));
        }
        Commands::Report {
            source,
            token,
            output: path,
        } => {
            let result = match token {
                Some(token) => {
                    let history = load_history(&results_path)
                        .unwrap_or_else(|e| fail(EXIT_FAILURE, format!("{:#}", e)));
                    let Some(stored) = history.find(&token) else {
                        fail(EXIT_INPUT, format!("No saved result with token {}", token));
                    };
                    score_answers(&stored.scores, &stored.categories, &scoring).unwrap_or_else(|e| {
                        fail(EXIT_INPUT, format!("Saved result is invalid: {}", e))
                    })
                }
                None => score_or_exit(&read_answers(&source), &scoring),
            };
            export_report(&path, user.as_ref(), &result);
        }
        Commands::History { token, all } => {
            let history = load_history(&results_path)
                .unwrap_or_else(|e| fail(EXIT_FAILURE, format!("{:#}", e)));

            match token {
                Some(token) => {
                    let (email, scores, categories) = match history.find(&token) {
                        Some(stored) => (
                            stored.email.clone(),
                            stored.scores.clone(),
                            stored.categories.clone(),
                        ),
                        None => {
                            let client = backend_client(&config);
                            match client.fetch_result(&token).await {
                                Ok(remote) => (remote.email, remote.scores, remote.categories),
                                Err(e) => fail(EXIT_NETWORK, format!("Fetch failed: {:#}", e)),
                            }
                        }
                    };
                    let result =
                        score_answers(&scores, &categories, &scoring).unwrap_or_else(|e| {
                            fail(EXIT_INPUT, format!("Stored result is invalid: {}", e))
                        });
                    println!("Token: {}  Respondent: {}", token, email);
                    println!();
                    println!("{}", output::format_result(&result, use_colors));
                }
                None => {
                    let listed = match (&user, all) {
                        (Some(user), false) => history.for_email(&user.email),
                        _ => history.all(),
                    };
                    println!("{}", output::format_history(&listed, use_colors));
                }
            }
        }
        Commands::Signup { restaurant_name } => {
            let Some(email) = user.as_ref().map(|u| u.email.clone()) else {
                fail(EXIT_INPUT, "Signing up needs an email: pass --email");
            };
            if !looks_like_email(&email) {
                fail(EXIT_INPUT, format!("Not a valid email address: {}", email));
            }
            let client = backend_client(&config);
            let password = password_or_exit("Choose a password: ");
            if password_or_exit("Repeat the password: ") != password {
                fail(EXIT_INPUT, "Passwords do not match");
            }

            let request = SignupRequest {
                restaurant_name,
                email,
                password,
            };
            match client.signup(&request).await {
                Ok(message) => println!("{}", message),
                Err(e) => fail(EXIT_NETWORK, format!("Sign up failed: {:#}", e)),
            }
        }
        Commands::Login { identifier } => {
            let Some(identifier) = identifier.or_else(|| user.as_ref().map(|u| u.email.clone()))
            else {
                fail(EXIT_INPUT, "Provide an email or restaurant name to log in with");
            };
            let client = backend_client(&config);
            let password = password_or_exit("Password: ");

            let account = match client.login(&identifier, &password).await {
                Ok(account) => account,
                Err(e) => fail(EXIT_NETWORK, format!("Login failed: {:#}", e)),
            };

            let path = config_path.unwrap_or_else(get_config_path);
            if let Err(e) = save_user(&path, account.clone()) {
                fail(EXIT_FAILURE, format!("Failed to save login: {:#}", e));
            }
            println!(
                "Logged in as {} ({}); saved to {}",
                account.display_name(),
                account.email,
                path.display()
            );
        }
        Commands::Profile {
            owner_name,
            location,
            business_type,
            position,
            phone,
            website,
            description,
        } => {
            let Some(ref user) = user else {
                fail(EXIT_INPUT, "Updating the profile needs a respondent: log in first");
            };
            let client = backend_client(&config);
            let profile = ProfileUpdate {
                contact_email: user.email.clone(),
                owner_name,
                location,
                business_type,
                current_position: position,
                phone,
                website,
                description,
            };
            if let Err(e) = client.update_profile(&profile).await {
                fail(EXIT_NETWORK, format!("Profile update failed: {:#}", e));
            }
            println!("Profile updated for {}", user.email);
        }
        // Handled before the config is loaded
        Commands::Init => {}
    }

    std::process::exit(EXIT_SUCCESS);
}
