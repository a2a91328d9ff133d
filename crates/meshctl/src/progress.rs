//! Console progress reporting for uninstall runs

use indicatif::ProgressBar;
use meshctl_uninstall::{ProgressSink, ProgressState};
use owo_colors::OwoColorize;
use std::sync::Mutex;

/// Prints a status line for each state the planner reports.
///
/// With a spinner attached, lines are printed above it so the spinner is
/// not torn.
#[derive(Default)]
pub struct ConsoleProgress {
    spinner: Option<ProgressBar>,
    last: Mutex<Option<ProgressState>>,
}

impl ConsoleProgress {
    pub fn with_spinner(spinner: ProgressBar) -> Self {
        Self {
            spinner: Some(spinner),
            last: Mutex::new(None),
        }
    }

    pub fn last_state(&self) -> Option<ProgressState> {
        self.last.lock().ok().and_then(|last| *last)
    }
}

/// Status line for `state`
pub fn status_line(state: ProgressState) -> String {
    match state {
        ProgressState::UninstallComplete => format!("{} {}", "Success:".green().bold(), state),
        _ => format!("{} {}", "Info:".blue().bold(), state),
    }
}

impl ProgressSink for ConsoleProgress {
    fn set_state(&self, state: ProgressState) {
        tracing::debug!("Progress state: {}", state);
        let line = status_line(state);
        match &self.spinner {
            Some(spinner) => spinner.println(line),
            None => println!("{}", line),
        }
        if let Ok(mut last) = self.last.lock() {
            *last = Some(state);
        }
    }
}
