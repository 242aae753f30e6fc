// Context builder: routes a question to a catalog lookup and phrases the fact
use serde::{Deserialize, Serialize};

use crate::catalog::Entry;
use crate::errors::Result;
use crate::rag::ranking::DpsScore;
use crate::rag::retrieval::Retriever;

/// Phrase that triggers the highest-DPS lookup
pub const HIGHEST_DPS_TRIGGER: &str = "highest dps";

/// Phrase that triggers the moves lookup
pub const MOVES_TRIGGER: &str = "moves";

/// Context when the moves lookup finds no entry
pub const MOVES_NOT_FOUND: &str = "Sorry, I couldn't find the moves for that Pokémon.";

/// Context when the question matches no lookup
pub const NO_RELEVANT_DATA: &str = "Sorry, I couldn't find any relevant data.";

/// Which lookup a question asks for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryIntent {
    HighestDps,
    /// Moves of the entity named by the last word of the question
    Moves { name: String },
    Unrecognised,
}

impl QueryIntent {
    /// Classify a question by keyword; the highest-DPS phrase wins
    pub fn classify(query: &str) -> Self {
        let lowered = query.to_lowercase();

        if lowered.contains(HIGHEST_DPS_TRIGGER) {
            QueryIntent::HighestDps
        } else if lowered.contains(MOVES_TRIGGER) {
            // Last whitespace-separated token, punctuation and all
            let name = query.split_whitespace().last().unwrap_or_default();
            QueryIntent::Moves {
                name: name.to_string(),
            }
        } else {
            QueryIntent::Unrecognised
        }
    }
}

/// Print a float the way the dataset tooling does: shortest round-trip
/// digits, and always a fractional part for whole numbers (`30.0`, not `30`)
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Sentence announcing the highest-DPS entry
pub fn highest_dps_sentence(entry: &Entry, score: &DpsScore) -> String {
    format!(
        "The Pokémon with the highest DPS is {} with a DPS of {}.",
        entry.display_name(),
        format_float(score.total_dps)
    )
}

/// Sentence listing an entry's fast and charge moves
pub fn moves_sentence(entry: &Entry) -> String {
    format!(
        "{}'s moves: {} (Fast, Power: {}, Type: {}), {} (Charge, Power: {}, Type: {}).",
        entry.display_name(),
        entry.fast.name,
        entry.fast.power,
        entry.fast.move_type,
        entry.charge.name,
        entry.charge.power,
        entry.charge.move_type
    )
}

/// Builds the context sentence for a question
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    retriever: Retriever,
}

impl ContextBuilder {
    /// Create new context builder
    pub fn new(retriever: Retriever) -> Self {
        Self { retriever }
    }

    /// Context sentence for `query`
    ///
    /// Lookup misses produce fixed sentences; only retriever failures such
    /// as an empty catalog are errors.
    pub fn build(&self, query: &str) -> Result<String> {
        let intent = QueryIntent::classify(query);
        tracing::debug!(?intent, "Classified query");

        match intent {
            QueryIntent::HighestDps => {
                let best = self.retriever.find_highest_dps()?;
                Ok(highest_dps_sentence(best.entry, &best.score))
            }
            QueryIntent::Moves { name } => {
                let matches = self.retriever.find_by_name(&name);
                match matches.first() {
                    Some(entry) => Ok(moves_sentence(entry)),
                    None => Ok(MOVES_NOT_FOUND.to_string()),
                }
            }
            QueryIntent::Unrecognised => Ok(NO_RELEVANT_DATA.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, MoveStats};
    use crate::errors::QaError;

    fn charizard() -> Entry {
        Entry::new(
            "Charizard",
            MoveStats {
                name: "Fire Spin".to_string(),
                power: 10.0,
                move_type: "Fire".to_string(),
                duration: 0.7,
                energy: None,
            },
            MoveStats {
                name: "Blast Burn".to_string(),
                power: 110.0,
                move_type: "Fire".to_string(),
                duration: 3.3,
                energy: None,
            },
        )
    }

    fn builder() -> ContextBuilder {
        ContextBuilder::new(Retriever::new(Catalog::new(vec![charizard()])))
    }

    #[test]
    fn test_classify_highest_dps_is_case_insensitive() {
        assert_eq!(
            QueryIntent::classify("Which Pokémon has the HIGHEST DPS moves?"),
            QueryIntent::HighestDps
        );
    }

    #[test]
    fn test_classify_moves_takes_last_token() {
        assert_eq!(
            QueryIntent::classify("What are Charizard's moves?"),
            QueryIntent::Moves {
                name: "moves?".to_string()
            }
        );
        assert_eq!(
            QueryIntent::classify("List the MOVES of Charizard"),
            QueryIntent::Moves {
                name: "Charizard".to_string()
            }
        );
    }

    #[test]
    fn test_classify_moves_is_substring_match() {
        assert_eq!(
            QueryIntent::classify("removes Pikachu"),
            QueryIntent::Moves {
                name: "Pikachu".to_string()
            }
        );
    }

    #[test]
    fn test_classify_unrecognised() {
        assert_eq!(
            QueryIntent::classify("Where do I find Snorlax?"),
            QueryIntent::Unrecognised
        );
    }

    #[test]
    fn test_moves_sentence_format() {
        assert_eq!(
            moves_sentence(&charizard()),
            "Charizard's moves: Fire Spin (Fast, Power: 10, Type: Fire), \
             Blast Burn (Charge, Power: 110, Type: Fire)."
        );
    }

    #[test]
    fn test_highest_dps_sentence_format() {
        let score = DpsScore {
            fast_dps: 10.5,
            charge_dps: 20.0,
            total_dps: 30.5,
        };
        let mut entry = charizard();
        entry.name = Some("Mewtwo".to_string());
        assert_eq!(
            highest_dps_sentence(&entry, &score),
            "The Pokémon with the highest DPS is Mewtwo with a DPS of 30.5."
        );
    }

    #[test]
    fn test_whole_number_total_keeps_decimal_point() {
        let mut mewtwo = charizard();
        mewtwo.name = Some("Mewtwo".to_string());
        mewtwo.fast.power = 10.0;
        mewtwo.fast.duration = 1.0;
        mewtwo.charge.power = 40.0;
        mewtwo.charge.duration = 2.0;

        let builder = ContextBuilder::new(Retriever::new(Catalog::new(vec![mewtwo])));
        assert_eq!(
            builder.build("highest dps").unwrap(),
            "The Pokémon with the highest DPS is Mewtwo with a DPS of 30.0."
        );
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(30.0), "30.0");
        assert_eq!(format_float(-2.0), "-2.0");
        assert_eq!(format_float(30.5), "30.5");
        assert_eq!(format_float(64.28571428571429), "64.28571428571429");
        assert_eq!(format_float(f64::NAN), "NaN");
    }

    #[test]
    fn test_build_moves_found_and_missing() {
        let builder = builder();
        assert!(builder
            .build("Show the moves of charizard")
            .unwrap()
            .starts_with("Charizard's moves: Fire Spin"));
        assert_eq!(builder.build("Show the moves of Pikachu").unwrap(), MOVES_NOT_FOUND);
        assert_eq!(builder.build("What are Charizard's moves?").unwrap(), MOVES_NOT_FOUND);
    }

    #[test]
    fn test_build_unrecognised() {
        assert_eq!(builder().build("hello").unwrap(), NO_RELEVANT_DATA);
    }

    #[test]
    fn test_build_highest_dps_on_empty_catalog_fails() {
        let builder = ContextBuilder::new(Retriever::new(Catalog::default()));
        assert!(matches!(
            builder.build("highest dps?"),
            Err(QaError::EmptyCatalog)
        ));
    }
}
