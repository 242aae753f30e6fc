//! Property tests for retrieval invariants

use pokequery::rag::DpsScore;
use pokequery::{Catalog, Entry, MoveStats, Retriever};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

fn ascii_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .take(12)
        .collect()
}

fn move_stats(power: u8, tenths: u8) -> MoveStats {
    MoveStats {
        name: "Tackle".to_string(),
        power: power as f64,
        move_type: "Normal".to_string(),
        duration: (tenths as f64 + 1.0) / 10.0,
        energy: None,
    }
}

fn catalog_from_names(names: &[String]) -> Catalog {
    Catalog::new(
        names
            .iter()
            .map(|n| Entry::new(ascii_name(n), move_stats(10, 5), move_stats(50, 20)))
            .collect(),
    )
}

#[quickcheck]
fn find_by_name_matches_substring_filter(names: Vec<String>, query: String) -> bool {
    let query = ascii_name(&query);
    let retriever = Retriever::new(catalog_from_names(&names));

    let found: Vec<&str> = retriever
        .find_by_name(&query)
        .iter()
        .map(|e| e.display_name())
        .collect();
    let expected: Vec<&str> = retriever
        .catalog()
        .iter()
        .map(|e| e.display_name())
        .filter(|n| n.to_lowercase().contains(&query.to_lowercase()))
        .collect();

    found == expected
}

#[quickcheck]
fn find_by_name_ignores_query_case(names: Vec<String>, query: String) -> bool {
    let query = ascii_name(&query);
    let retriever = Retriever::new(catalog_from_names(&names));

    retriever.find_by_name(&query.to_uppercase()) == retriever.find_by_name(&query.to_lowercase())
}

#[quickcheck]
fn empty_query_returns_every_named_entry(names: Vec<String>) -> bool {
    let retriever = Retriever::new(catalog_from_names(&names));
    retriever.find_by_name("").len() == names.len()
}

#[quickcheck]
fn highest_dps_is_first_maximum(moves: Vec<(u8, u8, u8, u8)>) -> TestResult {
    if moves.is_empty() {
        return TestResult::discard();
    }

    let catalog = Catalog::new(
        moves
            .iter()
            .enumerate()
            .map(|(i, &(fp, fd, cp, cd))| {
                Entry::new(format!("Mon{}", i), move_stats(fp, fd), move_stats(cp, cd))
            })
            .collect(),
    );
    let retriever = Retriever::new(catalog);

    let best = match retriever.find_highest_dps() {
        Ok(best) => best,
        Err(_) => return TestResult::failed(),
    };

    let totals: Vec<f64> = retriever
        .catalog()
        .iter()
        .filter_map(DpsScore::compute)
        .map(|s| s.total_dps)
        .collect();
    let max = totals.iter().cloned().fold(f64::MIN, f64::max);
    let first = totals.iter().position(|&t| t == max);

    // Repeated calls agree
    let again = retriever.find_highest_dps().map(|b| b.index).ok();

    TestResult::from_bool(
        best.score.total_dps == max && Some(best.index) == first && again == Some(best.index),
    )
}

#[quickcheck]
fn ranking_is_sorted_and_bounded(moves: Vec<(u8, u8, u8, u8)>, limit: u8) -> TestResult {
    if moves.is_empty() {
        return TestResult::discard();
    }

    let catalog = Catalog::new(
        moves
            .iter()
            .map(|&(fp, fd, cp, cd)| Entry::new("Mon", move_stats(fp, fd), move_stats(cp, cd)))
            .collect(),
    );
    let retriever = Retriever::new(catalog);
    let limit = limit as usize;

    let ranked = match retriever.rank_by_dps(limit) {
        Ok(ranked) => ranked,
        Err(_) => return TestResult::failed(),
    };

    let sorted = ranked
        .windows(2)
        .all(|w| w[0].score.total_dps >= w[1].score.total_dps);

    TestResult::from_bool(sorted && ranked.len() == limit.min(moves.len()))
}
