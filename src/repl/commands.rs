//! Built-in REPL commands
//!
//! Anything starting with `/` is a command; every other line is a question.

use colored::*;

/// REPL command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Show the current strategy, or switch to `name`
    Strategy { name: Option<String> },
    Lookup { name: String },
    Top { limit: usize },
    /// Print the retrieved context for a question
    Context { question: String },
    Clear,
    Exit,
    Unknown { input: String },
}

/// Parse input string into a command
pub fn parse(input: &str) -> Command {
    let trimmed = input.trim();
    let unknown = || Command::Unknown {
        input: trimmed.to_string(),
    };

    let Some(body) = trimmed.strip_prefix('/') else {
        return unknown();
    };

    let (word, rest) = match body.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (body, ""),
    };

    match word.to_lowercase().as_str() {
        "help" | "h" => Command::Help,
        "exit" | "quit" | "q" => Command::Exit,
        "clear" | "cls" => Command::Clear,
        "strategy" | "s" => Command::Strategy {
            name: (!rest.is_empty()).then(|| rest.to_string()),
        },
        "lookup" | "find" if !rest.is_empty() => Command::Lookup {
            name: rest.to_string(),
        },
        "top" => match rest {
            "" => Command::Top { limit: 1 },
            n => match n.parse::<usize>() {
                Ok(limit) if limit > 0 => Command::Top { limit },
                _ => unknown(),
            },
        },
        "context" | "ctx" if !rest.is_empty() => Command::Context {
            question: rest.to_string(),
        },
        _ => unknown(),
    }
}

/// Check whether a line is a command rather than a question
pub fn is_command(input: &str) -> bool {
    input.trim().starts_with('/')
}

/// Display help information
pub fn show_help() {
    println!("\n{}", "Available Commands:".bold().cyan());
    println!("{}", "=".repeat(60).cyan());

    let commands = [
        ("/help, /h", "Show this help message"),
        ("/strategy [name]", "Show or switch strategy (openai, local, rag)"),
        ("/lookup <name>", "List entries whose name contains <name>"),
        ("/top [n]", "Show the n highest-DPS entries (default: 1)"),
        ("/context <question>", "Show the data the RAG strategy would use"),
        ("/clear, /cls", "Clear screen"),
        ("/exit, /quit, /q", "Exit REPL"),
    ];

    for (cmd, desc) in commands {
        println!("  {:<22} {}", cmd.green(), desc);
    }

    println!("\n{}", "Usage:".bold());
    println!("  - Type your question directly (no / prefix)");
    println!("  - Use {} for question history", "UP/DOWN arrows".cyan());
    println!("  - Press {} or {} to exit", "Ctrl-D".cyan(), "/exit".cyan());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_command() {
        assert!(is_command("/help"));
        assert!(is_command(" /top 3"));
        assert!(!is_command("What are Pikachu's moves?"));
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("/help"), Command::Help);
        assert_eq!(parse("/H"), Command::Help);
        assert_eq!(parse("/quit"), Command::Exit);
        assert_eq!(parse("/cls"), Command::Clear);
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!(parse("/strategy"), Command::Strategy { name: None });
        assert_eq!(
            parse("/strategy  local "),
            Command::Strategy {
                name: Some("local".to_string())
            }
        );
    }

    #[test]
    fn test_parse_lookup_keeps_spaces() {
        assert_eq!(
            parse("/lookup Mr. Mime"),
            Command::Lookup {
                name: "Mr. Mime".to_string()
            }
        );
        assert!(matches!(parse("/lookup"), Command::Unknown { .. }));
    }

    #[test]
    fn test_parse_top() {
        assert_eq!(parse("/top"), Command::Top { limit: 1 });
        assert_eq!(parse("/top 5"), Command::Top { limit: 5 });
        assert!(matches!(parse("/top 0"), Command::Unknown { .. }));
        assert!(matches!(parse("/top many"), Command::Unknown { .. }));
    }

    #[test]
    fn test_parse_context() {
        assert_eq!(
            parse("/ctx highest dps"),
            Command::Context {
                question: "highest dps".to_string()
            }
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse("/teleport"),
            Command::Unknown {
                input: "/teleport".to_string()
            }
        );
        assert!(matches!(parse("no slash"), Command::Unknown { .. }));
    }
}
