//! Interactive session.
//!
//! Reads one command per line from stdin. Rationale regeneration and chat
//! round trips run as background tasks, so several days can be explained at
//! once while the prompt stays usable; their results are printed when they
//! arrive.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use healthie_core::{
    display::{DayOptions, DayView, Notice, PlanOverview, Transcript, WeekView},
    models::{Day, SlotKind},
    prompts, Planner, PlannerError,
};
use log::{debug, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::renderer::TerminalRenderer;

const INTRO: &str = "Type `help` for the list of commands, `quit` to leave.\n";

#[derive(Parser)]
#[command(
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "{subcommands}"
)]
struct Line {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Show the week, or one day
    Show { day: Option<Day> },
    /// List every option of a day
    #[command(alias = "o")]
    Options { day: Day },
    /// Choose option <number> for a slot (breakfast, lunch, dinner, exercise)
    #[command(alias = "s")]
    Select {
        day: Day,
        slot: SlotKind,
        number: usize,
    },
    /// Regenerate a day's explanation in the background
    #[command(alias = "e")]
    Explain { day: Day },
    /// Send a message to the assistant
    #[command(alias = "c")]
    Chat {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Show the conversation
    #[command(alias = "m")]
    Messages,
    /// Accept the plan proposed in message <number>
    Accept { number: usize },
    /// Cancel the plan proposed in message <number>
    Cancel { number: usize },
    /// Generate a new plan from the session profile
    Generate,
    /// Save the current plan
    Save,
    /// Leave the session
    #[command(aliases = ["exit", "q"])]
    Quit,
}

enum Flow {
    Continue,
    Quit,
}

/// Converts a 1-based number typed by the user into an index.
fn to_index(number: usize) -> Result<usize, PlannerError> {
    number
        .checked_sub(1)
        .ok_or_else(|| PlannerError::invalid_input("number").with_reason("Numbers start at 1"))
}

pub struct Session {
    planner: Arc<Planner>,
    renderer: Arc<TerminalRenderer>,
}

impl Session {
    pub fn new(planner: Arc<Planner>, renderer: Arc<TerminalRenderer>) -> Self {
        Self { planner, renderer }
    }

    pub async fn run(&self) -> Result<()> {
        if self.planner.has_plan().await {
            let snapshot = self.planner.snapshot().await?;
            self.renderer.render(PlanOverview::new(snapshot.resolver()))?;
        } else {
            self.renderer.notice(&Notice::warning(
                "No plan loaded. Use `generate` with a --profile to create one.",
            ))?;
        }
        self.renderer.render(INTRO)?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await.context("Failed to read input")? {
            if line.trim().is_empty() {
                continue;
            }
            let command = match Line::try_parse_from(line.split_whitespace()) {
                Ok(parsed) => parsed.command,
                Err(err) => {
                    print!("{err}");
                    continue;
                }
            };

            match self.handle(command).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(err) => match err.downcast_ref::<PlannerError>() {
                    Some(planner_err) => {
                        self.renderer.notice(&Notice::error(planner_err.to_string()))?;
                    }
                    None => return Err(err),
                },
            }
        }
        debug!("Session ended");
        Ok(())
    }

    async fn handle(&self, command: SessionCommand) -> Result<Flow> {
        match command {
            SessionCommand::Show { day } => {
                let snapshot = self.planner.snapshot().await?;
                match day {
                    Some(day) => self.renderer.render(DayView::new(
                        snapshot.resolver(),
                        day,
                        snapshot.rationales.get(day),
                    ))?,
                    None => self
                        .renderer
                        .render(WeekView::new(snapshot.resolver(), &snapshot.rationales))?,
                }
            }
            SessionCommand::Options { day } => {
                let snapshot = self.planner.snapshot().await?;
                self.renderer
                    .render(DayOptions::new(snapshot.resolver(), day))?;
            }
            SessionCommand::Select { day, slot, number } => {
                self.planner.select(day, slot, to_index(number)?).await?;
                let snapshot = self.planner.snapshot().await?;
                self.renderer.render(DayView::new(
                    snapshot.resolver(),
                    day,
                    snapshot.rationales.get(day),
                ))?;
            }
            SessionCommand::Explain { day } => self.spawn_explain(day),
            SessionCommand::Chat { text } => self.spawn_chat(text.join(" ")),
            SessionCommand::Messages => {
                let snapshot = self.planner.snapshot().await?;
                self.renderer.render(Transcript::new(snapshot.messages()))?;
            }
            SessionCommand::Accept { number } => {
                let report = self.planner.accept_proposal(to_index(number)?).await?;
                self.renderer
                    .notice(&Notice::success("The proposed plan is now active."))?;
                if let Some(notice) = report.notice() {
                    self.renderer.notice(&Notice::warning(notice))?;
                }
                let snapshot = self.planner.snapshot().await?;
                self.renderer.render(PlanOverview::new(snapshot.resolver()))?;
            }
            SessionCommand::Cancel { number } => {
                self.planner.cancel_proposal(to_index(number)?).await?;
                let snapshot = self.planner.snapshot().await?;
                let messages = snapshot.messages();
                self.renderer.render(Transcript::from_index(
                    messages,
                    messages.len().saturating_sub(1),
                ))?;
            }
            SessionCommand::Generate => {
                let profile = self.planner.profile().await;
                self.planner.generate(profile).await?;
                self.save().await?;
                let snapshot = self.planner.snapshot().await?;
                self.renderer.render(PlanOverview::new(snapshot.resolver()))?;
            }
            SessionCommand::Save => {
                if self.save().await? {
                    self.renderer.notice(&Notice::success("Plan saved."))?;
                }
            }
            SessionCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Saves the plan; a storage failure is shown as a warning. Returns
    /// whether the save succeeded.
    async fn save(&self) -> Result<bool> {
        match self.planner.save().await {
            Ok(()) => Ok(true),
            Err(PlannerError::NoActivePlan) => Err(PlannerError::NoActivePlan.into()),
            Err(err) => {
                warn!("Failed to save plan: {err}");
                self.renderer.notice(&Notice::warning(prompts::SAVE_FAILED))?;
                Ok(false)
            }
        }
    }

    fn spawn_explain(&self, day: Day) {
        let planner = Arc::clone(&self.planner);
        let renderer = Arc::clone(&self.renderer);
        tokio::spawn(async move {
            let shown = match planner.regenerate_rationale(day).await {
                Ok(_) => match planner.snapshot().await {
                    Ok(snapshot) => renderer.render(DayView::new(
                        snapshot.resolver(),
                        day,
                        snapshot.rationales.get(day),
                    )),
                    Err(err) => renderer.notice(&Notice::error(err.to_string())),
                },
                Err(err) => renderer.notice(&Notice::error(err.to_string())),
            };
            if let Err(err) = shown {
                warn!("Failed to print rationale for {day}: {err}");
            }
        });
    }

    fn spawn_chat(&self, text: String) {
        let planner = Arc::clone(&self.planner);
        let renderer = Arc::clone(&self.renderer);
        tokio::spawn(async move {
            let shown = match planner.send_message(&text).await {
                Ok(Some(_)) => match planner.snapshot().await {
                    Ok(snapshot) => {
                        let messages = snapshot.messages();
                        renderer.render(Transcript::from_index(
                            messages,
                            messages.len().saturating_sub(1),
                        ))
                    }
                    Err(err) => renderer.notice(&Notice::error(err.to_string())),
                },
                Ok(None) => renderer.notice(&Notice::warning(
                    "The plan changed before the assistant replied; the reply was dropped.",
                )),
                Err(err) => renderer.notice(&Notice::error(err.to_string())),
            };
            if let Err(err) = shown {
                warn!("Failed to print chat reply: {err}");
            }
        });
    }
}
