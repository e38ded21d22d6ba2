//! Fuzzy filtering over encoded record lines.
//!
//! Candidates are encoded as `"<index>\t<field>\t<field>..."` so the
//! matcher only sees text after the first tab and the original position
//! survives the round trip through the engine. Lines are streamed into the
//! engine through one channel and matches drained from another; the feeder
//! closes its channel after the last line and the caller drains fully
//! before inspecting results, so neither side blocks on unbounded
//! buffering.
//!
//! Matched lines come back in the engine's ranking order (best score
//! first) and are decoded defensively: an unparsable or out-of-range
//! leading index is dropped, and duplicate indices are reported once.

use crossbeam_channel::unbounded;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::error::{Error, Result};

/// Encode one candidate as a search line: the original index, then the
/// searchable fields, tab-separated.
pub fn encode_line(index: usize, fields: &[&str]) -> String {
    let mut line = index.to_string();
    for field in fields {
        line.push('\t');
        line.push_str(field);
    }
    line
}

/// Decode the leading index of a matched line. Returns `None` for an
/// unparsable or out-of-range index.
fn decode_index(line: &str, candidate_count: usize) -> Option<usize> {
    let head = line.split('\t').next()?;
    let index: usize = head.parse().ok()?;
    (index < candidate_count).then_some(index)
}

/// Filter encoded search lines by a free-text term, returning the indices
/// of the matches in the engine's ranking order.
///
/// An empty term bypasses the engine and yields every candidate index in
/// original order.
pub fn filter_strings(inputs: &[String], term: &str) -> Result<Vec<usize>> {
    tracing::debug!(term, input_count = inputs.len(), "filtering search lines");

    if term.is_empty() {
        return Ok((0..inputs.len()).collect());
    }

    let (line_tx, line_rx) = unbounded::<String>();
    let (match_tx, match_rx) = unbounded::<String>();

    let lines: Vec<String> = inputs.to_vec();
    let feeder = std::thread::spawn(move || {
        for line in lines {
            if line_tx.send(line).is_err() {
                break;
            }
        }
        // line_tx dropped here: signals end of input to the engine
    });

    let pattern = term.to_string();
    let engine = std::thread::spawn(move || {
        let matcher = SkimMatcherV2::default();

        let mut scored: Vec<(i64, String)> = Vec::new();
        for line in line_rx {
            let haystack = line.split_once('\t').map(|(_, rest)| rest).unwrap_or("");
            if let Some(score) = matcher.fuzzy_match(haystack, &pattern) {
                scored.push((score, line));
            }
        }

        // Best match first, ties kept in input order
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        for (_, line) in scored {
            if match_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut seen = vec![false; inputs.len()];
    let mut matched = Vec::new();
    for line in match_rx {
        if let Some(index) = decode_index(&line, inputs.len()) {
            if !seen[index] {
                seen[index] = true;
                matched.push(index);
            }
        } else {
            tracing::warn!(line, "dropping match with invalid index");
        }
    }

    feeder
        .join()
        .map_err(|_| Error::Filter("fuzzy engine feeder panicked".to_string()))?;
    engine
        .join()
        .map_err(|_| Error::Filter("fuzzy engine worker panicked".to_string()))?;

    Ok(matched)
}
