//! Terminal output for the REPL and one-shot commands
//!
//! Row formatting is kept in plain functions so it can be tested without a
//! terminal; `DisplayManager` adds color and the progress spinner.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::app::Strategy;
use crate::catalog::{Entry, MoveStats};
use crate::rag::ScoredEntry;

const RULE_WIDTH: usize = 64;

/// One lookup row: name and optional id/types, then both moves and any
/// optional stats the dataset carried
pub fn entry_line(entry: &Entry) -> String {
    let mut line = String::new();
    if let Some(id) = &entry.id {
        line.push_str(&format!("#{} ", id));
    }
    line.push_str(entry.display_name());

    let types: Vec<&str> = [&entry.type_one, &entry.type_two]
        .into_iter()
        .filter_map(|t| t.as_deref())
        .collect();
    if !types.is_empty() {
        line.push_str(&format!(" [{}]", types.join("/")));
    }

    line.push_str(&format!(
        ": {} | {}",
        move_detail(&entry.fast, "Fast", "Energy gain"),
        move_detail(&entry.charge, "Charge", "Energy cost"),
    ));

    if let Some(window) = entry.damage_window_start {
        line.push_str(&format!(" | Damage window: {}s", window));
    }

    line
}

fn move_detail(stats: &MoveStats, kind: &str, energy_label: &str) -> String {
    let energy = stats
        .energy
        .map(|e| format!(", {}: {}", energy_label, e))
        .unwrap_or_default();

    format!(
        "{} ({}, Power: {}, Type: {}, Duration: {}s{})",
        stats.name, kind, stats.power, stats.move_type, stats.duration, energy
    )
}

/// One ranking row, 1-based
pub fn ranking_line(rank: usize, scored: &ScoredEntry<'_>) -> String {
    format!(
        "{:>3}. {:<24} total {:>8.2}  (fast {:.2}, charge {:.2})",
        rank,
        scored.entry.display_name(),
        scored.score.total_dps,
        scored.score.fast_dps,
        scored.score.charge_dps,
    )
}

/// Display manager for terminal UI
pub struct DisplayManager {
    current_bar: Option<ProgressBar>,
    show_progress: bool,
    update_interval: Duration,
}

impl DisplayManager {
    pub fn new(show_progress: bool) -> Self {
        DisplayManager {
            current_bar: None,
            show_progress,
            update_interval: Duration::from_millis(100),
        }
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, strategy: Strategy, dataset: &str) {
        let rule = "=".repeat(RULE_WIDTH);
        let title = format!("  pokequery {} - Pokémon Go Q&A", version);
        let info = format!("  Strategy: {} | Dataset: {}", strategy.label(), dataset);

        println!("\n{}", rule.cyan());
        println!("{}", title.bold().cyan());
        println!("{}", info.dimmed());
        println!("{}\n", rule.cyan());
        println!(
            "Ask a question (or {} for commands, {} to quit)\n",
            "/help".green(),
            "/exit".green()
        );
    }

    /// Start a spinner while a strategy is working
    pub fn start_thinking(&mut self, strategy: Strategy) {
        self.finish_current();
        if !self.show_progress {
            return;
        }

        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.set_message(format!("Asking {}...", strategy.label()));
        pb.enable_steady_tick(self.update_interval);

        self.current_bar = Some(pb);
    }

    /// Finish current spinner
    pub fn finish_current(&mut self) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_and_clear();
        }
    }

    /// Display an answer
    pub fn show_answer(&mut self, answer: &str) {
        self.finish_current();
        if answer.starts_with("Error: ") {
            println!("{}\n", answer.red());
        } else {
            println!("{}\n", answer);
        }
    }

    /// Display the retrieved context sentence
    pub fn show_context(&self, context: &str) {
        println!("{} {}", "Context:".cyan(), context.dimmed());
    }

    /// Display lookup results
    pub fn show_entries(&self, query: &str, entries: &[&Entry]) {
        if entries.is_empty() {
            println!("{}", format!("No entries match '{}'.", query).yellow());
            return;
        }

        self.show_section(&format!("{} match(es) for '{}'", entries.len(), query));
        for entry in entries {
            println!("  {} {}", "•".cyan(), entry_line(entry));
        }
        println!();
    }

    /// Display a DPS ranking
    pub fn show_ranking(&self, ranked: &[ScoredEntry<'_>]) {
        self.show_section("Highest total DPS");
        for (i, scored) in ranked.iter().enumerate() {
            println!("{}", ranking_line(i + 1, scored));
        }
        println!();
    }

    pub fn show_error(&mut self, error: &str) {
        self.finish_current();
        println!("{} {}", "Error:".red().bold(), error.red());
    }

    pub fn show_warning(&self, warning: &str) {
        println!("{} {}", "Warning:".yellow().bold(), warning.yellow());
    }

    pub fn show_info(&self, info: &str) {
        println!("{} {}", "Info:".cyan(), info);
    }

    pub fn show_section(&self, title: &str) {
        println!("\n{}", title.bold().cyan());
        println!("{}", "-".repeat(RULE_WIDTH).cyan());
    }

    pub fn clear_screen(&self) {
        print!("\x1B[2J\x1B[1;1H");
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::DpsScore;

    fn pikachu() -> Entry {
        Entry::new(
            "Pikachu",
            MoveStats {
                name: "Thunder Shock".to_string(),
                power: 5.0,
                move_type: "Electric".to_string(),
                duration: 0.6,
                energy: None,
            },
            MoveStats {
                name: "Wild Charge".to_string(),
                power: 90.0,
                move_type: "Electric".to_string(),
                duration: 2.6,
                energy: None,
            },
        )
    }

    #[test]
    fn test_entry_line() {
        assert_eq!(
            entry_line(&pikachu()),
            "Pikachu: Thunder Shock (Fast, Power: 5, Type: Electric, Duration: 0.6s) | \
             Wild Charge (Charge, Power: 90, Type: Electric, Duration: 2.6s)"
        );
    }

    #[test]
    fn test_entry_line_shows_optional_columns() {
        let mut entry = pikachu();
        entry.name = Some("Charizard".to_string());
        entry.id = Some("6".to_string());
        entry.type_one = Some("Fire".to_string());
        entry.type_two = Some("Flying".to_string());
        entry.fast.energy = Some(10.0);
        entry.charge.energy = Some(50.0);
        entry.damage_window_start = Some(2.75);

        let line = entry_line(&entry);
        assert!(line.starts_with("#6 Charizard [Fire/Flying]: "));
        assert!(line.contains("Duration: 0.6s, Energy gain: 10)"));
        assert!(line.contains("Duration: 2.6s, Energy cost: 50)"));
        assert!(line.ends_with(" | Damage window: 2.75s"));
    }

    #[test]
    fn test_entry_line_single_type() {
        let mut entry = pikachu();
        entry.type_one = Some("Electric".to_string());
        assert!(entry_line(&entry).starts_with("Pikachu [Electric]: Thunder Shock"));
    }

    #[test]
    fn test_ranking_line() {
        let entry = pikachu();
        let scored = ScoredEntry {
            index: 0,
            entry: &entry,
            score: DpsScore {
                fast_dps: 10.0,
                charge_dps: 25.0,
                total_dps: 35.0,
            },
        };
        let line = ranking_line(1, &scored);
        assert!(line.starts_with("  1. Pikachu"));
        assert!(line.contains("total    35.00"));
        assert!(line.contains("(fast 10.00, charge 25.00)"));
    }

    #[test]
    fn test_spinner_disabled_when_quiet() {
        let mut manager = DisplayManager::new(false);
        manager.start_thinking(Strategy::Rag);
        assert!(manager.current_bar.is_none());
    }

    #[test]
    fn test_spinner_lifecycle() {
        let mut manager = DisplayManager::new(true);
        manager.start_thinking(Strategy::Hosted);
        assert!(manager.current_bar.is_some());

        manager.show_answer("Pikachu is an Electric type.");
        assert!(manager.current_bar.is_none());
    }

    #[test]
    fn test_show_error_clears_spinner() {
        let mut manager = DisplayManager::default();
        manager.start_thinking(Strategy::Local);
        manager.show_error("Model error: download failed");
        assert!(manager.current_bar.is_none());
    }
}
