use crate::model::{Difficulty, TemplateId};
use crate::templates::{Params, ParamRange, QuestionTemplate, gcd, param, paren, signed};

//
// ─── FORMATTING ────────────────────────────────────────────────────────────────
//

/// `coef·x^exp` without unit coefficients or exponents, e.g. `3x^2`, `x`, `5`.
fn monomial(coef: i64, exp: i64) -> String {
    let var = match exp {
        0 => return coef.to_string(),
        1 => "x".to_owned(),
        e => format!("x^{e}"),
    };
    match coef {
        1 => var,
        -1 => format!("-{var}"),
        c => format!("{c}{var}"),
    }
}

//
// ─── COMMON FACTORS ────────────────────────────────────────────────────────────
//

const COMMON_FACTORS_DOMAIN: &[ParamRange] =
    &[param("factor", 2, 9), param("b", 2, 9), param("c", 2, 9)];

fn common_factors_accept(p: &Params) -> bool {
    let [a, b, c, _] = p.values();
    b != c && a != b && a != c && gcd(b, c) == 1
}

fn common_factors_prompt(p: &Params) -> String {
    let [a, b, c, _] = p.values();
    format!("Factorise: ${}x + {}y$", a * b, a * c)
}

fn common_factors_answer(p: &Params) -> String {
    let [a, b, c, _] = p.values();
    format!("{a}({b}x + {c}y)")
}

fn common_factors_explain(p: &Params) -> String {
    let [a, b, c, _] = p.values();
    format!(
        "The HCF of ${ab}$ and ${ac}$ is ${a}$, since ${ab} = {a} \\times {b}$ and \
         ${ac} = {a} \\times {c}$. So ${ab}x + {ac}y = {a}({b}x + {c}y)$.",
        ab = a * b,
        ac = a * c,
    )
}

fn common_factors_distractors(p: &Params) -> Vec<String> {
    let [a, b, c, _] = p.values();
    vec![
        format!("{a}({b}x - {c}y)"),
        format!("{a}({c}x + {b}y)"),
        format!("{}x + {}y", a + b, a + c),
        format!("{}({b}x + {c}y)", a + 1),
    ]
}

fn common_factors_filler(k: u32) -> String {
    format!("{k}({}x + {}y)", k + 1, k + 2)
}

pub static COMMON_FACTORS: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("factorisation.common_factors"),
    topic: "Factorisation using common factors",
    difficulty: Difficulty::Medium,
    domain: COMMON_FACTORS_DOMAIN,
    accept: common_factors_accept,
    prompt: common_factors_prompt,
    answer: common_factors_answer,
    explain: common_factors_explain,
    distractors: common_factors_distractors,
    filler: common_factors_filler,
    fallback: Params::new([5, 2, 3, 0]),
};

//
// ─── THREE TERM FACTOR ─────────────────────────────────────────────────────────
//

const THREE_TERM_DOMAIN: &[ParamRange] = &[
    param("factor", 2, 6),
    param("b", 2, 9),
    param("c", 1, 9),
    param("d", 1, 9),
];

fn three_term_accept(p: &Params) -> bool {
    let [_, b, c, d] = p.values();
    b != c && c != d && b != d && gcd(gcd(b, c), d) == 1
}

fn three_term_prompt(p: &Params) -> String {
    let [a, b, c, d] = p.values();
    format!(
        "Factorise completely: ${} + {} + {}$",
        monomial(a * b, 2),
        monomial(a * c, 1),
        a * d
    )
}

fn three_term_inner(b: i64, c: i64, d: i64) -> String {
    format!("{} + {} + {d}", monomial(b, 2), monomial(c, 1))
}

fn three_term_answer(p: &Params) -> String {
    let [a, b, c, d] = p.values();
    format!("{a}({})", three_term_inner(b, c, d))
}

fn three_term_explain(p: &Params) -> String {
    let [a, b, c, d] = p.values();
    format!(
        "Each coefficient ${}$, ${}$ and ${}$ is divisible by ${a}$, and ${b}$, ${c}$ and ${d}$ \
         share no further common factor. Taking ${a}$ out gives ${a}({})$.",
        a * b,
        a * c,
        a * d,
        three_term_inner(b, c, d),
    )
}

fn three_term_distractors(p: &Params) -> Vec<String> {
    let [a, b, c, d] = p.values();
    vec![
        format!("{a}({} + {} - {d})", monomial(b, 2), monomial(c, 1)),
        format!("{a}({} + {}) + {}", monomial(b, 2), monomial(c, 1), a * d),
        format!("{a}x({} + {c} + {d})", monomial(b, 1)),
        format!("{}({})", a + 1, three_term_inner(b, c, d)),
    ]
}

fn three_term_filler(k: u32) -> String {
    format!("{k}(x^2 + {k}x + {})", k + 1)
}

pub static THREE_TERM_FACTOR: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("factorisation.three_terms"),
    topic: "Factorisation of trinomials by a common factor",
    difficulty: Difficulty::Hard,
    domain: THREE_TERM_DOMAIN,
    accept: three_term_accept,
    prompt: three_term_prompt,
    answer: three_term_answer,
    explain: three_term_explain,
    distractors: three_term_distractors,
    filler: three_term_filler,
    fallback: Params::new([3, 2, 5, 1]),
};

//
// ─── MONOMIAL DIVISION ─────────────────────────────────────────────────────────
//

const MONOMIAL_DIVISION_DOMAIN: &[ParamRange] = &[
    param("quotient", 2, 9),
    param("divisor", 2, 6),
    param("dividend_exp", 2, 6),
    param("divisor_exp", 1, 5),
];

fn monomial_division_accept(p: &Params) -> bool {
    let [q, b, c, d] = p.values();
    q != b && c > d
}

fn monomial_division_prompt(p: &Params) -> String {
    let [q, b, c, d] = p.values();
    format!(
        "Divide: $\\frac{{{}}}{{{}}}$",
        monomial(q * b, c),
        monomial(b, d)
    )
}

fn monomial_division_answer(p: &Params) -> String {
    let [q, _, c, d] = p.values();
    monomial(q, c - d)
}

fn monomial_division_explain(p: &Params) -> String {
    let [q, b, c, d] = p.values();
    format!(
        "Divide the coefficients: ${} \\div {b} = {q}$. Subtract the exponents: \
         $x^{c} \\div x^{d} = x^{{{c} - {d}}} = {}$. So the quotient is ${}$.",
        q * b,
        monomial(1, c - d),
        monomial(q, c - d),
    )
}

fn monomial_division_distractors(p: &Params) -> Vec<String> {
    let [q, b, c, d] = p.values();
    vec![
        monomial(q, c + d),
        monomial(b, c - d),
        monomial(q, c * d),
        monomial(q * b * b, c - d),
    ]
}

fn monomial_division_filler(k: u32) -> String {
    monomial(i64::from(k) + 10, 1)
}

pub static MONOMIAL_DIVISION: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("algebra.monomial_division"),
    topic: "Division of a monomial by a monomial",
    difficulty: Difficulty::Easy,
    domain: MONOMIAL_DIVISION_DOMAIN,
    accept: monomial_division_accept,
    prompt: monomial_division_prompt,
    answer: monomial_division_answer,
    explain: monomial_division_explain,
    distractors: monomial_division_distractors,
    filler: monomial_division_filler,
    fallback: Params::new([4, 3, 5, 2]),
};

const NEGATIVE_DIVISION_DOMAIN: &[ParamRange] = &[
    param("quotient", -9, -2),
    param("divisor", 2, 6),
    param("dividend_exp", 3, 9),
    param("divisor_exp", 1, 6),
];

pub static NEGATIVE_MONOMIAL_DIVISION: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("algebra.negative_monomial_division"),
    topic: "Division of monomials with negative coefficients",
    difficulty: Difficulty::Medium,
    domain: NEGATIVE_DIVISION_DOMAIN,
    accept: monomial_division_accept,
    prompt: monomial_division_prompt,
    answer: monomial_division_answer,
    explain: monomial_division_explain,
    distractors: monomial_division_distractors,
    filler: monomial_division_filler,
    fallback: Params::new([-4, 3, 5, 2]),
};

const POLYNOMIAL_DIVISION_DOMAIN: &[ParamRange] = &[
    param("first", 2, 9),
    param("second", 2, 9),
    param("divisor", 2, 6),
    param("exp", 3, 6),
];

fn polynomial_division_accept(p: &Params) -> bool {
    let [q1, q2, _, _] = p.values();
    q1 != q2
}

fn polynomial_division_prompt(p: &Params) -> String {
    let [q1, q2, b, c] = p.values();
    format!(
        "Divide: $\\frac{{{} + {}}}{{{}}}$",
        monomial(q1 * b, c),
        monomial(q2 * b, 2),
        monomial(b, 1)
    )
}

fn polynomial_division_answer(p: &Params) -> String {
    let [q1, q2, _, c] = p.values();
    format!("{} + {}", monomial(q1, c - 1), monomial(q2, 1))
}

fn polynomial_division_explain(p: &Params) -> String {
    let [q1, q2, b, c] = p.values();
    let divisor = monomial(b, 1);
    format!(
        "Divide each term by ${divisor}$: ${} \\div {divisor} = {}$ and \
         ${} \\div {divisor} = {}$. So the quotient is ${}$.",
        monomial(q1 * b, c),
        monomial(q1, c - 1),
        monomial(q2 * b, 2),
        monomial(q2, 1),
        polynomial_division_answer(p),
    )
}

/// Adding exponents, dividing only the first term, ignoring the variable.
fn polynomial_division_distractors(p: &Params) -> Vec<String> {
    let [q1, q2, b, c] = p.values();
    vec![
        format!("{} + {}", monomial(q1, c + 1), monomial(q2, 3)),
        format!("{} + {}", monomial(q1, c - 1), monomial(q2 * b, 2)),
        format!("{} + {}", monomial(q1, c), monomial(q2, 2)),
        format!("{} + {q2}", monomial(q1, c - 1)),
    ]
}

fn polynomial_division_filler(k: u32) -> String {
    format!("{}x^2 + {k}", k + 10)
}

pub static POLYNOMIAL_DIVISION: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("algebra.polynomial_division"),
    topic: "Division of a polynomial by a monomial",
    difficulty: Difficulty::Hard,
    domain: POLYNOMIAL_DIVISION_DOMAIN,
    accept: polynomial_division_accept,
    prompt: polynomial_division_prompt,
    answer: polynomial_division_answer,
    explain: polynomial_division_explain,
    distractors: polynomial_division_distractors,
    filler: polynomial_division_filler,
    fallback: Params::new([3, 4, 2, 4]),
};

//
// ─── LINEAR EQUATION ───────────────────────────────────────────────────────────
//

const LINEAR_EQUATION_DOMAIN: &[ParamRange] = &[
    param("coefficient", 2, 9),
    param("solution", -9, 9),
    param("constant", -15, 15),
];

fn linear_equation_accept(p: &Params) -> bool {
    let [_, x, b, _] = p.values();
    x != 0 && b != 0
}

fn linear_equation_prompt(p: &Params) -> String {
    let [a, x, b, _] = p.values();
    format!("Solve for $x$: ${a}x{} = {}$", signed(b), a * x + b)
}

fn linear_equation_answer(p: &Params) -> String {
    let [_, x, _, _] = p.values();
    format!("x = {x}")
}

fn linear_equation_explain(p: &Params) -> String {
    let [a, x, b, _] = p.values();
    let rhs = a * x + b;
    format!(
        "Subtract ${b}$ from both sides: ${a}x = {rhs} - {} = {}$. \
         Divide both sides by ${a}$: $x = {x}$.",
        paren(b),
        a * x,
    )
}

fn linear_equation_distractors(p: &Params) -> Vec<String> {
    let [a, x, b, _] = p.values();
    let rhs = a * x + b;
    vec![
        format!("x = {}", -x),
        format!("x = {}", rhs - b),
        format!("x = {}", x + 1),
        format!("x = {}", rhs + b),
    ]
}

fn linear_equation_filler(k: u32) -> String {
    format!("x = {}", 20 + k)
}

pub static LINEAR_EQUATION: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("algebra.linear_equation"),
    topic: "Linear equations in one variable",
    difficulty: Difficulty::Medium,
    domain: LINEAR_EQUATION_DOMAIN,
    accept: linear_equation_accept,
    prompt: linear_equation_prompt,
    answer: linear_equation_answer,
    explain: linear_equation_explain,
    distractors: linear_equation_distractors,
    filler: linear_equation_filler,
    fallback: Params::new([3, 4, -5, 0]),
};

const ONE_STEP_DOMAIN: &[ParamRange] = &[param("solution", -9, 20), param("constant", 1, 15)];

fn one_step_accept(p: &Params) -> bool {
    let [x, _, _, _] = p.values();
    x != 0
}

fn one_step_prompt(p: &Params) -> String {
    let [x, b, _, _] = p.values();
    format!("Solve for $x$: $x + {b} = {}$", x + b)
}

fn one_step_answer(p: &Params) -> String {
    let [x, _, _, _] = p.values();
    format!("x = {x}")
}

fn one_step_explain(p: &Params) -> String {
    let [x, b, _, _] = p.values();
    format!("Subtract ${b}$ from both sides: $x = {} - {b} = {x}$.", x + b)
}

/// Adding instead of subtracting, the sign flip, and copying the right side.
fn one_step_distractors(p: &Params) -> Vec<String> {
    let [x, b, _, _] = p.values();
    let rhs = x + b;
    vec![
        format!("x = {}", rhs + b),
        format!("x = {}", -x),
        format!("x = {rhs}"),
        format!("x = {}", x + 1),
    ]
}

pub static ONE_STEP_EQUATION: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("algebra.one_step_equation"),
    topic: "One-step linear equations",
    difficulty: Difficulty::Easy,
    domain: ONE_STEP_DOMAIN,
    accept: one_step_accept,
    prompt: one_step_prompt,
    answer: one_step_answer,
    explain: one_step_explain,
    distractors: one_step_distractors,
    filler: linear_equation_filler,
    fallback: Params::new([6, 4, 0, 0]),
};

const BOTH_SIDES_DOMAIN: &[ParamRange] = &[
    param("left", 3, 9),
    param("right", 1, 8),
    param("solution", -9, 9),
    param("constant", -15, 15),
];

/// Constant on the right-hand side once `x` is substituted.
fn both_sides_rhs(p: &Params) -> i64 {
    let [a, c, x, b] = p.values();
    (a - c) * x + b
}

fn both_sides_accept(p: &Params) -> bool {
    let [a, c, x, b] = p.values();
    a > c && x != 0 && b != 0 && both_sides_rhs(p) != 0
}

fn both_sides_prompt(p: &Params) -> String {
    let [a, c, _, b] = p.values();
    format!(
        "Solve for $x$: ${}{} = {}{}$",
        monomial(a, 1),
        signed(b),
        monomial(c, 1),
        signed(both_sides_rhs(p))
    )
}

fn both_sides_answer(p: &Params) -> String {
    let [_, _, x, _] = p.values();
    format!("x = {x}")
}

fn both_sides_explain(p: &Params) -> String {
    let [a, c, x, b] = p.values();
    let e = both_sides_rhs(p);
    let diff = monomial(a - c, 1);
    format!(
        "Subtract ${}$ from both sides: ${diff}{} = {e}$. \
         Subtract ${b}$ from both sides: ${diff} = {e} - {} = {}$. \
         Divide both sides by ${}$: $x = {x}$.",
        monomial(c, 1),
        signed(b),
        paren(b),
        e - b,
        a - c,
    )
}

fn both_sides_distractors(p: &Params) -> Vec<String> {
    let [_, _, x, b] = p.values();
    let e = both_sides_rhs(p);
    vec![
        format!("x = {}", -x),
        format!("x = {}", e - b),
        format!("x = {}", x + 1),
        format!("x = {}", e + b),
    ]
}

pub static BOTH_SIDES_EQUATION: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("algebra.both_sides_equation"),
    topic: "Linear equations with the variable on both sides",
    difficulty: Difficulty::Hard,
    domain: BOTH_SIDES_DOMAIN,
    accept: both_sides_accept,
    prompt: both_sides_prompt,
    answer: both_sides_answer,
    explain: both_sides_explain,
    distractors: both_sides_distractors,
    filler: linear_equation_filler,
    fallback: Params::new([5, 2, 3, -4]),
};
