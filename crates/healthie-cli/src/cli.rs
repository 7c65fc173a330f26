//! One-shot commands.
//!
//! Each handler restores or generates the plan, runs one operation and
//! prints the result as Markdown through the [`TerminalRenderer`].

use std::sync::Arc;

use anyhow::{Context, Result};
use healthie_core::{
    display::{DayView, Notice, PlanOverview, WeekView},
    models::{Day, HealthProfile},
    prompts, Planner, RestoreOutcome,
};
use log::warn;

use crate::renderer::TerminalRenderer;

pub struct Cli {
    planner: Arc<Planner>,
    renderer: Arc<TerminalRenderer>,
}

impl Cli {
    pub fn new(planner: Arc<Planner>, renderer: Arc<TerminalRenderer>) -> Self {
        Self { planner, renderer }
    }

    /// Restores the saved plan, reporting a discarded one. Returns whether
    /// a plan is now active.
    pub async fn restore(&self) -> Result<bool> {
        match self
            .planner
            .restore()
            .await
            .context("Failed to load saved plan")?
        {
            RestoreOutcome::Restored => Ok(true),
            RestoreOutcome::Empty => Ok(false),
            RestoreOutcome::Discarded(notice) => {
                self.renderer.notice(&Notice::warning(notice))?;
                Ok(false)
            }
        }
    }

    pub async fn generate(&self, profile: Option<HealthProfile>) -> Result<()> {
        let profile = profile.context("A profile is required: pass --profile <file>")?;
        self.planner
            .generate(profile)
            .await
            .context("Failed to generate plan")?;

        if let Err(err) = self.planner.save().await {
            warn!("Failed to save generated plan: {err}");
            self.renderer.notice(&Notice::warning(prompts::SAVE_FAILED))?;
        }

        let snapshot = self.planner.snapshot().await?;
        self.renderer.render(PlanOverview::new(snapshot.resolver()))
    }

    pub async fn show(&self, day: Option<Day>) -> Result<()> {
        if !self.restore().await? {
            return self.renderer.notice(&Notice::warning(
                "No saved plan. Run `healthie generate --profile <file>` first.",
            ));
        }

        let snapshot = self.planner.snapshot().await?;
        match day {
            Some(day) => self.renderer.render(DayView::new(
                snapshot.resolver(),
                day,
                snapshot.rationales.get(day),
            )),
            None => self
                .renderer
                .render(WeekView::new(snapshot.resolver(), &snapshot.rationales)),
        }
    }

    pub async fn clear(&self) -> Result<()> {
        let removed = self
            .planner
            .clear_saved()
            .await
            .context("Failed to delete saved plan")?;
        let notice = if removed {
            Notice::success("Saved plan deleted.")
        } else {
            Notice::warning("No saved plan.")
        };
        self.renderer.notice(&notice)
    }
}
