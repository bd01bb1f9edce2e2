//! Terminal implementation of the presentation collaborator.
//!
//! The prompt is rendered as a numbered menu on stdout and the choice read
//! from stdin. Opening the store listing hands the review URL to the
//! platform opener.

use std::io::{self, BufRead, Write};

use ratekit_core::{PresentError, Presenter, PromptChoice, PromptContent};

pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for TerminalPresenter {
    fn present_prompt(
        &self,
        content: &PromptContent,
        show_later_button: bool,
    ) -> Result<PromptChoice, PresentError> {
        println!();
        println!("{}", content.title);
        println!("{}", content.message);
        println!();
        println!("  [1] {}", content.rate_label);
        if show_later_button {
            println!("  [2] {}", content.later_label);
        }
        println!("  [3] {}", content.cancel_label);

        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            print!("> ");
            io::stdout()
                .flush()
                .map_err(|e| PresentError::Failed(e.to_string()))?;

            line.clear();
            let read = stdin
                .lock()
                .read_line(&mut line)
                .map_err(|e| PresentError::Failed(e.to_string()))?;
            if read == 0 {
                // stdin closed before an answer.
                return Err(PresentError::Dismissed);
            }

            match line.trim() {
                "1" => return Ok(PromptChoice::Rate),
                "2" if show_later_button => return Ok(PromptChoice::Later),
                "3" => return Ok(PromptChoice::Cancel),
                other => println!("unrecognized choice: {other}"),
            }
        }
    }

    fn dismiss_prompt(&self) {
        // Nothing to tear down on a terminal.
    }

    fn open_store_listing(&self, url: &str) -> Result<(), PresentError> {
        tracing::debug!("opening store listing: {}", url);
        open::that(url).map_err(|e| PresentError::Failed(e.to_string()))
    }
}
