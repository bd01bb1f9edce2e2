use clap::Subcommand;

#[derive(Subcommand)]
pub enum PromptAction {
    /// Show the prompt if appropriate (usage thresholds bypassed)
    Try,
    /// Show the prompt unconditionally
    Force {
        /// Omit the remind-later button
        #[arg(long)]
        no_later: bool,
    },
}

pub fn run(action: PromptAction) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = super::build_coordinator()?;
    match action {
        PromptAction::Try => coordinator.show_prompt_if_appropriate()?,
        PromptAction::Force { no_later } => coordinator.force_show_prompt(!no_later)?,
    }
    Ok(())
}
