//! Combining extractor output with heuristic extraction.
//!
//! Extractor candidates claim the input line named by their `raw_line`
//! (trimmed, case-insensitive), or failing that the first line mentioning
//! their medicine name. Unclaimed lines go to the heuristic engine, unless
//! some extractor candidate could not be placed on any line: the extractor
//! then covers the whole input and its unplaced candidates come last.

use strsim::jaro_winkler;

use crate::extraction::HeuristicExtractor;
use crate::models::{MedicationCandidate, NormalizedInput};

/// Minimum Jaro-Winkler similarity between a name word and a line word.
const NAME_MATCH_THRESHOLD: f64 = 0.9;

/// Merged candidates, in output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    pub candidates: Vec<MedicationCandidate>,
    /// Candidates taken from the extractor
    pub from_extractor: usize,
    /// Candidates produced by the heuristic engine
    pub from_heuristic: usize,
}

fn line_key(line: &str) -> String {
    line.trim().to_lowercase()
}

/// Lowercase alphabetic words of at least three letters.
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|w| w.chars().count() >= 3)
        .map(str::to_lowercase)
        .collect()
}

fn mentions_name(line_words: &[String], name_words: &[String]) -> bool {
    name_words.iter().any(|name| {
        line_words
            .iter()
            .any(|word| jaro_winkler(name, word) >= NAME_MATCH_THRESHOLD)
    })
}

/// Merge `extracted` with heuristic results for every unclaimed line.
pub fn merge_candidates(
    input: &NormalizedInput,
    extracted: Vec<MedicationCandidate>,
    heuristic: &HeuristicExtractor,
) -> MergeOutcome {
    let lines: Vec<(usize, String)> = input
        .non_empty_lines()
        .map(|(idx, line)| (idx, line_key(&line.text)))
        .collect();

    let line_words: Vec<Vec<String>> = input.lines.iter().map(|l| words(&l.text)).collect();

    let mut claimed: Vec<Vec<MedicationCandidate>> = vec![Vec::new(); input.lines.len()];
    let mut unanchored = Vec::new();
    let from_extractor = extracted.len();

    for mut candidate in extracted {
        let by_line = candidate.raw_line.as_deref().map(line_key).and_then(|key| {
            lines
                .iter()
                .find(|(_, line)| *line == key)
                .map(|(idx, _)| *idx)
        });
        let anchor = by_line.or_else(|| {
            let name_words = words(candidate.medicine_name.as_deref()?);
            let matching: Vec<usize> = lines
                .iter()
                .map(|(idx, _)| *idx)
                .filter(|idx| mentions_name(&line_words[*idx], &name_words))
                .collect();
            // Prefer a line no other candidate has taken
            let idx = matching
                .iter()
                .copied()
                .find(|idx| claimed[*idx].is_empty())
                .or_else(|| matching.first().copied())?;
            if candidate.raw_line.is_none() {
                candidate.raw_line = Some(input.lines[idx].text.trim().to_string());
            }
            Some(idx)
        });
        match anchor {
            Some(idx) => claimed[idx].push(candidate),
            None => unanchored.push(candidate),
        }
    }

    // Unplaced extractor output may cover any line; heuristics would duplicate it
    let run_heuristic = unanchored.is_empty();
    if !run_heuristic {
        tracing::debug!(
            unanchored = unanchored.len(),
            "extractor output not tied to lines, skipping heuristics"
        );
    }

    let mut outcome = MergeOutcome {
        from_extractor,
        ..Default::default()
    };

    for (idx, line) in input.non_empty_lines() {
        let own = std::mem::take(&mut claimed[idx]);
        if !own.is_empty() {
            outcome.candidates.extend(own);
            continue;
        }
        if !run_heuristic {
            continue;
        }
        if let Some(candidate) = heuristic.extract_line(&line.text) {
            tracing::debug!(line = idx, source = ?line.source, "heuristic candidate");
            outcome.candidates.push(candidate);
            outcome.from_heuristic += 1;
        }
    }

    outcome.candidates.extend(unanchored);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::normalize;

    fn ai(name: &str, line: Option<&str>) -> MedicationCandidate {
        MedicationCandidate {
            raw_line: line.map(str::to_string),
            ..MedicationCandidate::named(name)
        }
    }

    #[test]
    fn test_no_extractor_output_is_all_heuristic() {
        let input = normalize(Some("Tab Dolo 650 OD x 5d\nCap Amoxil 500 BD x 7d"), None, None).unwrap();
        let outcome = merge_candidates(&input, Vec::new(), &HeuristicExtractor::new());

        let names: Vec<_> = outcome
            .candidates
            .iter()
            .map(|c| c.medicine_name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["Dolo", "Amoxil"]);
        assert_eq!(outcome.from_heuristic, 2);
        assert_eq!(outcome.from_extractor, 0);
    }

    #[test]
    fn test_extractor_claims_its_line() {
        let input = normalize(Some("Tab Dolo 650 OD x 5d\nCap Amoxil 500 BD x 7d"), None, None).unwrap();
        let extracted = vec![ai("Paracetamol (Dolo)", Some("  tab dolo 650 od x 5d "))];

        let outcome = merge_candidates(&input, extracted, &HeuristicExtractor::new());
        let names: Vec<_> = outcome
            .candidates
            .iter()
            .map(|c| c.medicine_name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["Paracetamol (Dolo)", "Amoxil"]);
        assert_eq!(outcome.from_heuristic, 1);
    }

    #[test]
    fn test_unplaced_candidates_suppress_heuristics() {
        let input = normalize(Some("Tab Dolo 650 OD x 5d\nZincovit OD"), None, None).unwrap();
        let extracted = vec![ai("Vitamin D3", None), ai("Zincovit", Some("not in input"))];

        let outcome = merge_candidates(&input, extracted, &HeuristicExtractor::new());
        let names: Vec<_> = outcome
            .candidates
            .iter()
            .map(|c| c.medicine_name.as_deref().unwrap())
            .collect();
        // Zincovit is placed by name; Vitamin D3 fits no line, so Dolo is not re-extracted
        assert_eq!(names, vec!["Zincovit", "Vitamin D3"]);
        assert_eq!(outcome.from_heuristic, 0);
    }

    #[test]
    fn test_candidate_placed_by_name() {
        let input = normalize(Some("Tab Dolo 650 OD x 5d\nTab Paracetmol 500 BD"), None, None).unwrap();
        let extracted = vec![ai("Paracetamol", None)];

        let outcome = merge_candidates(&input, extracted, &HeuristicExtractor::new());
        let names: Vec<_> = outcome
            .candidates
            .iter()
            .map(|c| c.medicine_name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["Dolo", "Paracetamol"]);
        assert_eq!(outcome.from_heuristic, 1);
        assert_eq!(
            outcome.candidates[1].raw_line.as_deref(),
            Some("Tab Paracetmol 500 BD")
        );
    }

    #[test]
    fn test_same_name_prefers_free_line() {
        let input = normalize(Some("Tab Dolo 650 OD\nTab Dolo 650 HS"), None, None).unwrap();
        let extracted = vec![ai("Dolo", None), ai("Dolo", None)];

        let outcome = merge_candidates(&input, extracted, &HeuristicExtractor::new());
        let lines: Vec<_> = outcome
            .candidates
            .iter()
            .map(|c| c.raw_line.as_deref().unwrap())
            .collect();
        assert_eq!(lines, vec!["Tab Dolo 650 OD", "Tab Dolo 650 HS"]);
        assert_eq!(outcome.from_heuristic, 0);
    }

    #[test]
    fn test_multiple_candidates_on_one_line_kept_in_order() {
        let input = normalize(Some("Dolo and Amoxil twice daily"), None, None).unwrap();
        let line = "Dolo and Amoxil twice daily";
        let extracted = vec![ai("Dolo", Some(line)), ai("Amoxil", Some(line))];

        let outcome = merge_candidates(&input, extracted, &HeuristicExtractor::new());
        assert_eq!(outcome.candidates.len(), 2);
        assert_eq!(outcome.candidates[1].medicine_name.as_deref(), Some("Amoxil"));
        assert_eq!(outcome.from_heuristic, 0);
    }
}
