use std::collections::HashSet;

use crate::templates::{Params, QuestionTemplate};

/// Counter value after which the template's own filler is abandoned in
/// favour of [`generic_filler`].
const TEMPLATE_FILLER_LIMIT: u32 = 64;

/// Build `count` unique options for `params`: the correct answer first, then
/// the template's wrong answers in generation order, padded if needed.
#[must_use]
pub fn synthesize(
    correct: &str,
    template: &QuestionTemplate,
    params: &Params,
    count: usize,
) -> Vec<String> {
    deduplicate_and_pad(correct, (template.distractors)(params), template.filler, count)
}

/// Deduplicate `candidates` against `correct` and each other, then pad with
/// `filler(1)`, `filler(2)`, ... until exactly `target_count` unique options
/// exist.
///
/// The correct answer is always the first entry. Blank candidates are
/// dropped. Extra candidates beyond `target_count - 1` are discarded, keeping
/// the earliest (most plausible) ones.
///
/// A filler that keeps colliding is abandoned after a bounded number of
/// tries in favour of a generic counter-based filler, so padding always
/// terminates.
#[must_use]
pub fn deduplicate_and_pad<I, F>(
    correct: &str,
    candidates: I,
    filler: F,
    target_count: usize,
) -> Vec<String>
where
    I: IntoIterator<Item = String>,
    F: Fn(u32) -> String,
{
    let target_count = target_count.max(1);
    let mut options = Vec::with_capacity(target_count);
    let mut seen = HashSet::with_capacity(target_count);

    seen.insert(correct.to_owned());
    options.push(correct.to_owned());

    for candidate in candidates {
        if options.len() == target_count {
            break;
        }
        let candidate = candidate.trim();
        if candidate.is_empty() || !seen.insert(candidate.to_owned()) {
            continue;
        }
        options.push(candidate.to_owned());
    }

    let mut counter = 1_u32;
    while options.len() < target_count {
        let padding = if counter <= TEMPLATE_FILLER_LIMIT {
            filler(counter)
        } else {
            generic_filler(counter)
        };
        counter = counter.saturating_add(1);
        if padding.trim().is_empty() || !seen.insert(padding.clone()) {
            continue;
        }
        options.push(padding);
    }

    options
}

fn generic_filler(counter: u32) -> String {
    format!("{}", 1_000 + u64::from(counter))
}
