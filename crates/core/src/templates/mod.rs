//! Declarative question templates and the engine that instantiates them.
//!
//! A [`QuestionTemplate`] is plain data: parameter ranges, an acceptance
//! predicate for rejection sampling, and pure functions that render the
//! prompt, answer, explanation and plausible wrong answers from one set of
//! resolved [`Params`]. Adding a topic means adding a template value; the
//! engine in [`library`] does the rest.

pub mod distractors;
pub mod library;
pub mod shuffle;

use crate::model::{Difficulty, TemplateId};

pub use distractors::{deduplicate_and_pad, synthesize};
pub use library::{GenerationError, MAX_DRAWS, draw_params, generate, instantiate};
pub use shuffle::shuffle_options;

/// Maximum number of integer parameters a template can draw.
pub const MAX_PARAMS: usize = 4;

//
// ─── PARAMETERS ────────────────────────────────────────────────────────────────
//

/// Inclusive integer range for one named parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamRange {
    pub name: &'static str,
    pub min: i64,
    pub max: i64,
}

/// Shorthand for declaring a parameter range in a template.
#[must_use]
pub const fn param(name: &'static str, min: i64, max: i64) -> ParamRange {
    ParamRange { name, min, max }
}

/// Resolved parameter values, positionally matching a template's domain.
///
/// Unused trailing slots are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Params([i64; MAX_PARAMS]);

impl Params {
    #[must_use]
    pub const fn new(values: [i64; MAX_PARAMS]) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn values(&self) -> [i64; MAX_PARAMS] {
        self.0
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<i64> {
        self.0.get(index).copied()
    }

    /// Pairs each value with its parameter name from `domain`.
    pub fn named<'a>(
        &'a self,
        domain: &'a [ParamRange],
    ) -> impl Iterator<Item = (&'static str, i64)> + 'a {
        domain.iter().zip(self.0.iter()).map(|(r, v)| (r.name, *v))
    }

    /// True when every drawn value lies inside its declared range.
    #[must_use]
    pub fn within(&self, domain: &[ParamRange]) -> bool {
        domain.len() <= MAX_PARAMS
            && domain
                .iter()
                .zip(self.0.iter())
                .all(|(r, v)| (r.min..=r.max).contains(v))
    }
}

//
// ─── TEMPLATE ──────────────────────────────────────────────────────────────────
//

/// Generation recipe for one kind of question.
///
/// Every render function receives the same resolved parameters, so the
/// explanation can never disagree with the answer.
#[derive(Debug)]
pub struct QuestionTemplate {
    pub id: TemplateId,
    pub topic: &'static str,
    pub difficulty: Difficulty,
    /// Ranges to draw from, in positional order.
    pub domain: &'static [ParamRange],
    /// Distinctness/niceness precondition; drawing repeats until it holds.
    pub accept: fn(&Params) -> bool,
    pub prompt: fn(&Params) -> String,
    pub answer: fn(&Params) -> String,
    pub explain: fn(&Params) -> String,
    /// Wrong answers encoding plausible mistakes, most plausible first.
    pub distractors: fn(&Params) -> Vec<String>,
    /// Filler option for padding, keyed by an increasing counter starting at 1.
    pub filler: fn(u32) -> String,
    /// Pre-validated parameters used when rejection sampling gives up.
    pub fallback: Params,
}

impl QuestionTemplate {
    /// Checks that `params` are in range and satisfy the precondition.
    #[must_use]
    pub fn admits(&self, params: &Params) -> bool {
        params.within(self.domain) && (self.accept)(params)
    }
}

//
// ─── SHARED MATH HELPERS ───────────────────────────────────────────────────────
//

/// Greatest common divisor; `gcd(0, 0) == 0`.
#[must_use]
pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// `" + n"` or `" - |n|"`, for appending a signed term.
#[must_use]
pub fn signed(n: i64) -> String {
    if n < 0 {
        format!(" - {}", n.unsigned_abs())
    } else {
        format!(" + {n}")
    }
}

/// Wraps negatives in parentheses, e.g. for `17 - (-5)`.
#[must_use]
pub fn paren(n: i64) -> String {
    if n < 0 { format!("({n})") } else { n.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: &[ParamRange] = &[param("a", 1, 9), param("b", -3, 3)];

    #[test]
    fn gcd_handles_signs_and_zero() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(-12, 18), 6);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(gcd(0, 0), 0);
    }

    #[test]
    fn signed_terms_render_without_double_signs() {
        assert_eq!(format!("3x{}", signed(-5)), "3x - 5");
        assert_eq!(format!("3x{}", signed(4)), "3x + 4");
        assert_eq!(paren(-5), "(-5)");
        assert_eq!(paren(5), "5");
    }

    #[test]
    fn params_know_their_domain() {
        let p = Params::new([4, -2, 0, 0]);
        assert!(p.within(DOMAIN));
        assert!(!Params::new([10, 0, 0, 0]).within(DOMAIN));
        let named: Vec<_> = p.named(DOMAIN).collect();
        assert_eq!(named, vec![("a", 4), ("b", -2)]);
    }
}
