//! Implements InputPort. Inquire-based interactive prompts.
//!
//! Menu mirrors the two tabs (Generate CRON / Describe CRON) plus usage help.

use crate::domain::cron::field_count;
use crate::domain::request::DESCRIPTION_MAX_CHARS;
use crate::domain::{DomainError, TranslationResult, is_structurally_valid_cron};
use crate::ports::InputPort;
use crate::usecases::{DescriptionTranslationService, ScheduleTranslationService};
use async_trait::async_trait;
use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use inquire::error::InquireError;
use inquire::ui::{Color as UiColor, RenderConfig, Styled};
use inquire::validator::Validation;
use inquire::{CustomUserError, Select, Text};
use std::fmt;
use std::io::stdout;
use std::sync::Arc;

use super::progress::spinner;

const EXAMPLES: &[&str] = &[
    "Run every 5 minutes",
    "Execute daily at 3 AM",
    "Perform on the 1st and 15th of each month at midnight",
    "Schedule for every weekday (Monday to Friday) at 10:30 PM",
];

/// Applies the prompt theme globally. Call once before the first prompt.
pub fn apply_theme() {
    let config = RenderConfig::default_colored()
        .with_prompt_prefix(Styled::new("»").with_fg(UiColor::LightCyan))
        .with_highlighted_option_prefix(Styled::new("➤").with_fg(UiColor::LightCyan));
    inquire::set_global_render_config(config);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Generate,
    Describe,
    Help,
    Quit,
}

impl MenuItem {
    const ALL: [MenuItem; 4] = [Self::Generate, Self::Describe, Self::Help, Self::Quit];
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Generate => "Generate CRON (text -> expression)",
            Self::Describe => "Describe CRON (expression -> text)",
            Self::Help => "How to use Cronscribe",
            Self::Quit => "Quit",
        };
        f.write_str(label)
    }
}

/// Form-level check before submitting a CRON expression.
fn check_cron_form(input: &str) -> Result<(), &'static str> {
    if input.trim().is_empty() {
        return Err("Please enter a CRON expression.");
    }
    if !is_structurally_valid_cron(input) {
        return Err("Please enter a valid CRON expression (5 or 6 parts).");
    }
    Ok(())
}

/// Form-level check before submitting a description.
fn check_description_form(input: &str) -> Result<(), String> {
    let len = input.trim().chars().count();
    if len == 0 {
        return Err("Please enter a schedule description.".to_string());
    }
    if len > DESCRIPTION_MAX_CHARS {
        return Err(format!(
            "Description is too long ({} / {} characters).",
            len, DESCRIPTION_MAX_CHARS
        ));
    }
    Ok(())
}

fn print_colored(color: Color, text: &str) {
    let mut out = stdout();
    let _ = out.execute(SetForegroundColor(color));
    let _ = out.execute(Print(text));
    let _ = out.execute(Print("\r\n"));
    let _ = out.execute(ResetColor);
}

fn print_result(label: &str, result: &TranslationResult) {
    match result {
        TranslationResult::Failure { error } => print_colored(Color::Red, &format!("✗ {}", error)),
        ok => {
            let payload = ok.payload().unwrap_or_default();
            print_colored(Color::Green, &format!("✓ {}: {}", label, payload));
        }
    }
    println!();
}

fn print_help() {
    print_colored(Color::Cyan, "How to use Cronscribe");
    println!("1. Generate: describe when a task should run, for example:");
    for ex in EXAMPLES {
        println!("     \"{}\"", ex);
    }
    println!("   and Cronscribe answers with a CRON expression.");
    println!("2. Describe: paste a CRON expression (5 or 6 fields) to get a plain-language explanation.");
    println!("   Fields: [second] minute hour day-of-month month day-of-week");
    println!("Requests are rate limited per caller. Esc returns to the menu.");
    println!();
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    schedule_service: Arc<ScheduleTranslationService>,
    description_service: Arc<DescriptionTranslationService>,
    /// Forwarded-for value reported for this session.
    client_addr: Option<String>,
}

impl TuiInputPort {
    pub fn new(
        schedule_service: Arc<ScheduleTranslationService>,
        description_service: Arc<DescriptionTranslationService>,
        client_addr: Option<String>,
    ) -> Self {
        Self {
            schedule_service,
            description_service,
            client_addr,
        }
    }

    async fn run_generate(&self) -> Result<(), DomainError> {
        let answer = Text::new("Describe the schedule:")
            .with_help_message(&format!(
                "e.g. \"{}\" (max {} characters)",
                EXAMPLES[0], DESCRIPTION_MAX_CHARS
            ))
            .with_validator(|input: &str| {
                Ok::<_, CustomUserError>(match check_description_form(input) {
                    Ok(()) => Validation::Valid,
                    Err(msg) => Validation::Invalid(msg.into()),
                })
            })
            .prompt_skippable();
        let Some(description) = skippable(answer)? else {
            return Ok(());
        };

        let pb = spinner("Generating CRON expression...");
        let result = self
            .schedule_service
            .generate(&description, self.client_addr.as_deref())
            .await;
        pb.finish_and_clear();
        print_result("CRON expression", &result);
        Ok(())
    }

    async fn run_describe(&self) -> Result<(), DomainError> {
        let answer = Text::new("CRON expression:")
            .with_help_message("e.g. \"0 8 * * 1\"")
            .with_validator(|input: &str| {
                Ok::<_, CustomUserError>(match check_cron_form(input) {
                    Ok(()) => Validation::Valid,
                    Err(msg) => Validation::Invalid(msg.into()),
                })
            })
            .prompt_skippable();
        let Some(expr) = skippable(answer)? else {
            return Ok(());
        };

        let pb = spinner(&format!("Describing {} fields...", field_count(&expr)));
        let result = self
            .description_service
            .describe(&expr, self.client_addr.as_deref())
            .await;
        pb.finish_and_clear();
        print_result("Description", &result);
        Ok(())
    }
}

/// Esc yields `None`; Ctrl-C also returns to the menu. Other prompt errors propagate.
fn skippable(answer: Result<Option<String>, InquireError>) -> Result<Option<String>, DomainError> {
    match answer {
        Ok(v) => Ok(v),
        Err(InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(DomainError::Ui(e.to_string())),
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let choice = Select::new("What would you like to do?", MenuItem::ALL.to_vec()).prompt();
            let choice = match choice {
                Ok(c) => c,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    return Ok(());
                }
                Err(e) => return Err(DomainError::Ui(e.to_string())),
            };

            match choice {
                MenuItem::Generate => self.run_generate().await?,
                MenuItem::Describe => self.run_describe().await?,
                MenuItem::Help => print_help(),
                MenuItem::Quit => return Ok(()),
            }
        }
    }
}
