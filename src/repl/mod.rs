//! Interactive question loop
//!
//! Lines starting with `/` are built-in commands; anything else is answered
//! with the current strategy. The strategy can be switched mid-session and
//! loaded models and data are kept between questions.

pub mod commands;
pub mod display;
pub mod input;

use anyhow::Result;

use crate::app::{QaApp, Strategy};
use crate::cli::Verbosity;
use crate::errors::QaError;
use crate::repl::commands::Command;
pub use crate::repl::display::DisplayManager;
use crate::repl::input::{InputEvent, InputHandler};

/// REPL session coordinator
pub struct ReplSession {
    app: QaApp,
    strategy: Strategy,
    verbosity: Verbosity,
    input: InputHandler,
    display: DisplayManager,
}

impl ReplSession {
    /// Create a session; history is persisted to the configured file
    pub fn new(app: QaApp, strategy: Strategy, verbosity: Verbosity) -> Result<Self> {
        let input = InputHandler::with_history(app.config().history_path())?;
        let display = DisplayManager::new(verbosity.show_progress());

        let mut session = ReplSession {
            app,
            strategy,
            verbosity,
            input,
            display,
        };
        session.refresh_prompt();
        Ok(session)
    }

    fn refresh_prompt(&mut self) {
        self.input.set_prompt(format!("[{}] pokequery> ", self.strategy));
    }

    /// Run until `/exit` or Ctrl-D
    pub async fn run(&mut self) -> Result<()> {
        let dataset = self.app.config().dataset.path.clone();
        self.display
            .show_banner(env!("CARGO_PKG_VERSION"), self.strategy, &dataset);

        loop {
            match self.input.read_line()? {
                InputEvent::Line(line) => {
                    if line.is_empty() {
                        continue;
                    }
                    if !self.handle_line(&line).await {
                        break;
                    }
                }
                InputEvent::Interrupted => {
                    println!("\nUse /exit to quit gracefully");
                }
                InputEvent::Eof => break,
            }
        }

        self.input.save_history()?;
        Ok(())
    }

    /// Handle one line; returns false when the session should end
    pub async fn handle_line(&mut self, line: &str) -> bool {
        if commands::is_command(line) {
            return self.execute(commands::parse(line));
        }

        self.ask(line).await;
        true
    }

    async fn ask(&mut self, question: &str) {
        if self.verbosity.show_context() && self.strategy == Strategy::Rag {
            match self.app.context_for(question) {
                Ok(context) => self.display.show_context(&context),
                Err(e) => self.display.show_warning(&e.to_string()),
            }
        }

        self.display.start_thinking(self.strategy);
        match self.app.answer(self.strategy, question).await {
            Ok(answer) => self.display.show_answer(&answer),
            Err(QaError::EmptyQuestion) => self.display.finish_current(),
            Err(e) => self.display.show_error(&e.to_string()),
        }
    }

    fn execute(&mut self, command: Command) -> bool {
        match command {
            Command::Help => commands::show_help(),
            Command::Exit => {
                println!("Goodbye!");
                return false;
            }
            Command::Clear => self.display.clear_screen(),
            Command::Strategy { name: None } => {
                self.display.show_info(&format!(
                    "Current strategy: {} ({})",
                    self.strategy,
                    self.strategy.label()
                ));
            }
            Command::Strategy { name: Some(name) } => match name.parse::<Strategy>() {
                Ok(strategy) => {
                    self.strategy = strategy;
                    self.refresh_prompt();
                    self.display
                        .show_info(&format!("Switched to {}", strategy.label()));
                    if !self.app.credentials().permits(strategy) {
                        self.display
                            .show_warning("No API key is set for this strategy");
                    }
                }
                Err(e) => self.display.show_error(&e.to_string()),
            },
            Command::Lookup { name } => match self.app.retriever() {
                Ok(retriever) => {
                    let matches = retriever.find_by_name(&name);
                    self.display.show_entries(&name, &matches);
                }
                Err(e) => self.display.show_error(&e.to_string()),
            },
            Command::Top { limit } => {
                let ranked = self
                    .app
                    .retriever()
                    .and_then(|retriever| retriever.rank_by_dps(limit));
                match ranked {
                    Ok(ranked) => self.display.show_ranking(&ranked),
                    Err(e) => self.display.show_error(&e.to_string()),
                }
            }
            Command::Context { question } => match self.app.context_for(&question) {
                Ok(context) => self.display.show_context(&context),
                Err(e) => self.display.show_error(&e.to_string()),
            },
            Command::Unknown { input } => {
                self.display
                    .show_error(&format!("Unknown command: {}", input));
                println!("Type /help for available commands");
            }
        }

        true
    }
}
