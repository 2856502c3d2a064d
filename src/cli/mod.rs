//! Interactive terminal frontend.
//!
//! ## Design
//! - Pure orchestration: every rule lives in [`crate::auth`] or
//!   [`crate::lookup`]. This layer prompts, renders, and maps outcomes
//!   to messages, nothing else.
//! - Account management works without an API key; air quality queries
//!   need one and explain how to provide it.
//! - Login lockout ends the process with a non-zero exit code.

use anyhow::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Password, Select};

use crate::auth::{policy, AuthError, AuthService, CredentialStore, LoginOutcome, RegisterRequest};
use crate::config::{self, Config};
use crate::lookup::{AirQualityProvider, AirQualityReport, AqiBand, OpenWeatherClient};

/// Re-prompt budget for each registration step.
const REGISTER_PROMPT_ATTEMPTS: usize = 3;

/// Main menu entries, in selection order.
const MENU_ITEMS: &[&str] = &["Login", "Create account", "Forgot password", "Exit"];

/// Run the menu loop until the user exits or login locks out.
pub fn run(config: &Config) -> Result<()> {
    let store = CredentialStore::new(config.store_path());
    let service = AuthService::with_attempt_budget(store, config.auth.max_login_attempts);
    let provider = match config.api_key() {
        Some(key) => Some(OpenWeatherClient::new(key)?),
        None => None,
    };

    println!(
        "{}",
        style("Welcome to the Air Quality Monitoring System").cyan().bold()
    );

    loop {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Choose an option")
            .items(MENU_ITEMS)
            .default(0)
            .interact()?;

        match choice {
            0 => {
                let identity = login_flow(&service)?;
                query_loop(
                    &identity,
                    provider.as_ref().map(|p| p as &dyn AirQualityProvider),
                )?;
            }
            1 => create_account_flow(&service)?,
            2 => forgot_password_flow(&service)?,
            _ => {
                println!("Thank you for using the Air Quality Monitoring System. Goodbye!");
                return Ok(());
            }
        }
    }
}

// ── Login ───────────────────────────────────────────────────────────

/// Prompt for credentials until they verify or the attempt budget runs
/// out. Lockout terminates the process.
fn login_flow(service: &AuthService) -> Result<String> {
    let mut session = service.begin_login();
    loop {
        let email = text_prompt("Email")?;
        let password = secret_prompt("Password")?;

        match session.attempt(&email, &password)? {
            LoginOutcome::Authenticated { identity } => {
                println!("{}", style("Login successful!").green());
                return Ok(identity);
            }
            LoginOutcome::Rejected { remaining } => {
                println!(
                    "{}",
                    style(format!(
                        "Invalid credentials. {remaining} attempts remaining."
                    ))
                    .red()
                );
                if remaining == 0 {
                    exit_locked_out();
                }
            }
            LoginOutcome::LockedOut => exit_locked_out(),
        }
    }
}

/// Print the lockout message and end the process.
fn exit_locked_out() -> ! {
    println!(
        "{}",
        style("Maximum login attempts exceeded. Exiting...").red().bold()
    );
    tracing::warn!("Login attempt budget exhausted");
    std::process::exit(1);
}

// ── Registration ────────────────────────────────────────────────────

/// Collect registration fields step by step, each with its own
/// re-prompt budget, then create the account.
fn create_account_flow(service: &AuthService) -> Result<()> {
    let mut email = None;
    for _ in 0..REGISTER_PROMPT_ATTEMPTS {
        let candidate = text_prompt("Email")?.trim().to_string();
        if !policy::valid_email(&candidate) {
            println!("Invalid email format. Please try again.");
            continue;
        }
        if service.is_registered(&candidate)? {
            println!("Email already exists. Please use a different email.");
            continue;
        }
        email = Some(candidate);
        break;
    }
    let email = match email {
        Some(email) => email,
        None => {
            println!("Too many invalid attempts. Returning to main menu.");
            return Ok(());
        }
    };

    let mut password = None;
    for _ in 0..REGISTER_PROMPT_ATTEMPTS {
        let candidate = secret_prompt("Password")?;
        if !policy::valid_password(&candidate) {
            println!(
                "Invalid password. It must be at least 8 characters long and \
                 contain uppercase, lowercase, digit, and special character."
            );
            continue;
        }
        password = Some(candidate);
        break;
    }
    let password = match password {
        Some(password) => password,
        None => {
            println!("Too many invalid attempts. Returning to main menu.");
            return Ok(());
        }
    };

    let recovery_question = text_prompt("Security question")?;
    let recovery_answer = text_prompt("Answer to your security question")?;

    let request = RegisterRequest {
        email,
        password,
        recovery_question,
        recovery_answer,
    };
    match service.register(request) {
        Ok(()) => println!("{}", style("Account created successfully!").green()),
        Err(err) => {
            tracing::error!("Account creation failed: {err}");
            println!("An error occurred: {err}");
            println!("Account creation failed. Please try again later.");
        }
    }
    Ok(())
}

// ── Password recovery ───────────────────────────────────────────────

/// Ask the security question, and on a correct answer let the user pick
/// a new password with unlimited strength retries.
fn forgot_password_flow(service: &AuthService) -> Result<()> {
    let email = text_prompt("Registered email")?;

    let question = match service.recovery_question(&email) {
        Ok(question) => question,
        Err(AuthError::IdentityNotFound) => {
            println!("Email not found.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!("Security question: {question}");
    let answer = text_prompt("Your answer")?;
    match service.verify_recovery_answer(&email, &answer) {
        Ok(()) => {}
        Err(AuthError::RecoveryFailed) => {
            println!("Incorrect answer to security question.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }

    loop {
        let new_password = secret_prompt("New password")?;
        match service.reset_password(&email, &answer, &new_password) {
            Ok(()) => {
                println!("{}", style("Password reset successful!").green());
                return Ok(());
            }
            Err(AuthError::WeakPassword) => {
                println!("Invalid password. Please try again.");
            }
            Err(AuthError::IdentityNotFound) => {
                println!("Email not found.");
                return Ok(());
            }
            Err(AuthError::RecoveryFailed) => {
                // The stored answer changed under us mid-flow.
                println!("Incorrect answer to security question.");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }
    }
}

// ── Air quality queries ─────────────────────────────────────────────

/// Post-login loop: one city name per round until `q`.
fn query_loop(identity: &str, provider: Option<&dyn AirQualityProvider>) -> Result<()> {
    let provider = match provider {
        Some(provider) => provider,
        None => {
            println!("No air quality API key is configured.");
            println!(
                "Set {} or add api_key under [lookup] in the config file.",
                config::API_KEY_ENV
            );
            return Ok(());
        }
    };

    println!("Signed in as {identity}.");
    loop {
        let city = text_prompt("City name ('q' to return to the menu)")?
            .trim()
            .to_string();
        if city.eq_ignore_ascii_case("q") {
            return Ok(());
        }

        match provider.by_city(&city) {
            Ok(Some(report)) => render_report(&report),
            Ok(None) => {
                println!("No location matches '{city}'. Check the spelling and try again.");
            }
            Err(err) => {
                tracing::warn!("Air quality lookup failed: {err}");
                println!("Failed to retrieve air quality data. Please try again.");
            }
        }
    }
}

/// Render one report: index, pollutant table, advisory.
fn render_report(report: &AirQualityReport) {
    let band = style(format!(
        "{} ({})",
        report.band.index(),
        report.band.label()
    ));
    let band = match report.band {
        AqiBand::Good | AqiBand::Fair => band.green(),
        AqiBand::Moderate => band.yellow(),
        AqiBand::Poor => band.red(),
        AqiBand::VeryPoor => band.red().bold(),
    };

    println!();
    println!(
        "Air Quality Information for {}:",
        style(&report.city).cyan().bold()
    );
    println!("AQI: {band}");
    println!();
    println!("Main Pollutants (μg/m³):");
    for (name, value) in report.components.readings() {
        println!("  {name}: {value}");
    }
    println!();
    println!("Health Recommendations:");
    println!("{}", report.band.advisory());
}

// ── Prompt helpers ──────────────────────────────────────────────────

fn text_prompt(prompt: &str) -> Result<String> {
    Ok(Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact_text()?)
}

fn secret_prompt(prompt: &str) -> Result<String> {
    Ok(Password::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact()?)
}
