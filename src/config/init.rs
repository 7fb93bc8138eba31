use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::backend::BackendConfig;
use crate::catalog::Category;
use crate::config::{get_config_path, load_config, Config, UserContext};
use crate::scoring::{
    validate_scoring, ScoringConfig, ThresholdTable, TieBreakConfig, ANSWER_MAX, ANSWER_MIN,
};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Print text with a typewriter effect, one character at a time.
fn typewriter(text: &str) {
    use std::thread;
    use std::time::Duration;
    for c in text.chars() {
        print!("{}", c);
        std::io::stdout().flush().ok();
        thread::sleep(Duration::from_millis(18));
    }
    println!();
}

/// Parse a score bound on the answer scale.
fn parse_bound(input: &str) -> Result<f64, String> {
    let value: f64 = input
        .parse()
        .map_err(|_| format!("'{}' is not a number", input))?;
    if !value.is_finite() || value < ANSWER_MIN as f64 || value > ANSWER_MAX as f64 {
        return Err(format!("must be between {} and {}", ANSWER_MIN, ANSWER_MAX));
    }
    Ok(value)
}

fn prompt_bound(message: &str, default: f64) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match parse_bound(&input) {
            Ok(v) => return Ok(v),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    }
}

/// Loose check that an address has a local part and a dotted domain.
pub fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Serialize a config and write it, creating parent directories.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, &yaml)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(())
}

/// Store the respondent in the config at `path`, keeping every other section.
pub fn save_user(path: &Path, user: UserContext) -> Result<()> {
    let mut config = if path.exists() {
        load_config(Some(path.to_path_buf()))?
    } else {
        Config::default()
    };
    config.user = Some(user);
    write_config(path, &config)
}

/// Prompt for a password without echoing it.
pub fn prompt_password(message: &str) -> Result<String> {
    let password = rpassword::prompt_password(message).context("Failed to read password")?;
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }
    Ok(password)
}

fn configure_scoring() -> Result<ScoringConfig> {
    let mut thresholds = ThresholdTable::default();
    let mut tie_break = TieBreakConfig::default();

    loop {
        println!();
        typewriter(
            "Each category votes for a profile by comparing its average answer with two bounds.",
        );
        typewriter(
            "Below the first bound votes Leisure Traveler, below the second votes \
             Food-Driven Traveler, anything higher votes Cultural Food Traveler.",
        );
        for category in Category::ALL {
            println!();
            println!("{}", category.label());
            let row = thresholds.for_category_mut(category);
            row.leisure_below = prompt_bound("  Leisure below", row.leisure_below)?;
            row.food_driven_below = prompt_bound("  Food-Driven below", row.food_driven_below)?;
        }

        println!();
        typewriter("When the votes tie, the mean of all four categories decides.");
        tie_break.cultural_above = prompt_bound("Cultural Food above", tie_break.cultural_above)?;
        tie_break.leisure_at_least =
            prompt_bound("Leisure at or above", tie_break.leisure_at_least)?;

        let scoring = ScoringConfig {
            thresholds: Some(thresholds.clone()),
            tie_break: Some(tie_break.clone()),
        };
        match validate_scoring(&scoring) {
            Ok(()) => return Ok(scoring),
            Err(errors) => {
                println!();
                println!("  That calibration is not usable:");
                for error in errors {
                    println!("    - {}", error);
                }
                println!("  Let's go through it again.");
            }
        }
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    typewriter("Get Authentic Configuration Wizard");
    println!("==================================");
    println!();

    // 1. Respondent
    typewriter("Results you save or submit are filed under your email address.");
    let email = loop {
        let input = prompt("Email: ")?;
        if looks_like_email(&input) {
            break input;
        }
        println!("  Please enter a valid email address.");
    };
    let restaurant = prompt("Restaurant name (optional): ")?;
    let user = UserContext {
        email,
        restaurant_name: if restaurant.is_empty() {
            None
        } else {
            Some(restaurant)
        },
    };

    // 2. Scoring calibration
    println!();
    let adjust = prompt_yes_no(
        "Adjust scoring calibration? (n keeps the published values)",
        false,
    )?;
    let scoring = if adjust {
        Some(configure_scoring()?)
    } else {
        None
    };

    // 3. Backend
    println!();
    typewriter("A results backend stores submitted results and issues a shareable token.");
    let backend = if prompt_yes_no("Configure a results backend?", false)? {
        let base_url = loop {
            let url = prompt("Backend URL: ")?;
            if url.starts_with("http://") || url.starts_with("https://") {
                break url;
            }
            println!("  URL must start with http:// or https://");
        };
        let timeout = loop {
            let t = prompt_with_default("Request timeout", "10s")?;
            match humantime::parse_duration(&t) {
                Ok(_) => break t,
                Err(e) => println!("  Invalid: {}. Try again.", e),
            }
        };
        Some(BackendConfig {
            base_url,
            timeout: Some(timeout),
        })
    } else {
        None
    };

    // 4. Theme
    println!();
    let theme = loop {
        let t = prompt_with_default("TUI theme (auto, dark, light)", "auto")?;
        if matches!(t.as_str(), "auto" | "dark" | "light") {
            break t;
        }
        println!("  Choose auto, dark or light.");
    };

    // 5. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    let config = Config {
        user: Some(user),
        scoring,
        backend,
        theme: Some(theme),
    };
    write_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `get-authentic` to start the questionnaire.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bound() {
        assert_eq!(parse_bound("5.78"), Ok(5.78));
        assert_eq!(parse_bound("7"), Ok(7.0));
        assert!(parse_bound("0.5").is_err());
        assert!(parse_bound("7.1").is_err());
        assert!(parse_bound("NaN").is_err());
        assert!(parse_bound("high").is_err());
    }

    #[test]
    fn test_looks_like_email() {
        assert!(looks_like_email("owner@example.com"));
        assert!(!looks_like_email("owner"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("owner@localhost"));
        assert!(!looks_like_email("owner@example."));
    }

    #[test]
    fn test_written_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let config = Config {
            user: Some(UserContext {
                email: "owner@example.com".to_string(),
                restaurant_name: Some("Baan Thai".to_string()),
            }),
            scoring: Some(ScoringConfig {
                thresholds: Some(ThresholdTable::default()),
                tie_break: Some(TieBreakConfig {
                    cultural_above: 6.1,
                    leisure_at_least: 5.8,
                }),
            }),
            backend: Some(BackendConfig {
                base_url: "https://api.example.com".to_string(),
                timeout: Some("5s".to_string()),
            }),
            theme: Some("dark".to_string()),
        };

        write_config(&path, &config).unwrap();
        let loaded = load_config(Some(path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_minimal_config_omits_unset_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let config = Config {
            user: Some(UserContext::new("owner@example.com")),
            ..Config::default()
        };

        write_config(&path, &config).unwrap();
        let yaml = std::fs::read_to_string(&path).unwrap();
        assert!(!yaml.contains("scoring"));
        assert!(!yaml.contains("backend"));
        assert!(!yaml.contains("restaurant_name"));
        assert_eq!(load_config(Some(path)).unwrap(), config);
    }

    #[test]
    fn test_save_user_keeps_other_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let config = Config {
            user: Some(UserContext::new("old@example.com")),
            backend: Some(BackendConfig {
                base_url: "https://api.example.com".to_string(),
                timeout: None,
            }),
            theme: Some("light".to_string()),
            ..Config::default()
        };
        write_config(&path, &config).unwrap();

        let user = UserContext {
            email: "owner@example.com".to_string(),
            restaurant_name: Some("Baan Thai".to_string()),
        };
        save_user(&path, user.clone()).unwrap();

        let loaded = load_config(Some(path)).unwrap();
        assert_eq!(loaded.user, Some(user));
        assert_eq!(loaded.backend, config.backend);
        assert_eq!(loaded.theme.as_deref(), Some("light"));
    }

    #[test]
    fn test_save_user_creates_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh").join("config.yaml");
        save_user(&path, UserContext::new("owner@example.com")).unwrap();

        let loaded = load_config(Some(path)).unwrap();
        assert_eq!(loaded.user.unwrap().email, "owner@example.com");
        assert!(loaded.backend.is_none());
    }
}
