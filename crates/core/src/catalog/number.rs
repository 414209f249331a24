use crate::model::{Difficulty, TemplateId};
use crate::templates::{Params, ParamRange, QuestionTemplate, gcd, param, paren};

/// Reduced `n/d`, or a whole number when the denominator divides out.
fn fraction(numerator: i64, denominator: i64) -> String {
    let g = gcd(numerator, denominator).max(1);
    let (n, d) = (numerator / g, denominator / g);
    if d == 1 { n.to_string() } else { format!("{n}/{d}") }
}

//
// ─── SINGLE DIGIT ADDITION ─────────────────────────────────────────────────────
//

const ADDITION_DOMAIN: &[ParamRange] = &[param("a", 1, 9), param("b", 1, 9)];

fn addition_accept(p: &Params) -> bool {
    let [a, b, _, _] = p.values();
    a != b
}

fn addition_prompt(p: &Params) -> String {
    let [a, b, _, _] = p.values();
    format!("What is ${a} + {b}$?")
}

fn addition_answer(p: &Params) -> String {
    let [a, b, _, _] = p.values();
    (a + b).to_string()
}

fn addition_explain(p: &Params) -> String {
    let [a, b, _, _] = p.values();
    format!("Start at ${a}$ and count on ${b}$ more: ${a} + {b} = {}$.", a + b)
}

fn addition_distractors(p: &Params) -> Vec<String> {
    let [a, b, _, _] = p.values();
    vec![
        (a * b).to_string(),
        (a + b + 1).to_string(),
        (a + b - 1).to_string(),
        (a - b).abs().to_string(),
    ]
}

fn addition_filler(k: u32) -> String {
    (20 + k).to_string()
}

pub static SINGLE_DIGIT_ADDITION: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("arithmetic.single_digit_addition"),
    topic: "Addition of single-digit numbers",
    difficulty: Difficulty::Easy,
    domain: ADDITION_DOMAIN,
    accept: addition_accept,
    prompt: addition_prompt,
    answer: addition_answer,
    explain: addition_explain,
    distractors: addition_distractors,
    filler: addition_filler,
    fallback: Params::new([4, 3, 0, 0]),
};

const BRIDGING_DOMAIN: &[ParamRange] = &[param("a", 2, 9), param("b", 2, 9)];

fn bridging_accept(p: &Params) -> bool {
    let [a, b, _, _] = p.values();
    a != b && a + b > 10
}

fn bridging_explain(p: &Params) -> String {
    let [a, b, _, _] = p.values();
    let need = 10 - a;
    format!(
        "Make a ten first: ${a} + {need} = 10$, which leaves ${b} - {need} = {rest}$. \
         Then $10 + {rest} = {sum}$.",
        rest = b - need,
        sum = a + b,
    )
}

pub static ADDITION_BRIDGING_TEN: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("arithmetic.addition_bridging_ten"),
    topic: "Addition of single-digit numbers past ten",
    difficulty: Difficulty::Medium,
    domain: BRIDGING_DOMAIN,
    accept: bridging_accept,
    prompt: addition_prompt,
    answer: addition_answer,
    explain: bridging_explain,
    distractors: addition_distractors,
    filler: addition_filler,
    fallback: Params::new([8, 5, 0, 0]),
};

const THREE_ADDENDS_DOMAIN: &[ParamRange] =
    &[param("a", 1, 9), param("b", 1, 9), param("c", 1, 9)];

fn three_addends_accept(p: &Params) -> bool {
    let [a, b, c, _] = p.values();
    a != b && b != c && a != c && a + b + c >= 12
}

fn three_addends_prompt(p: &Params) -> String {
    let [a, b, c, _] = p.values();
    format!("What is ${a} + {b} + {c}$?")
}

fn three_addends_answer(p: &Params) -> String {
    let [a, b, c, _] = p.values();
    (a + b + c).to_string()
}

fn three_addends_explain(p: &Params) -> String {
    let [a, b, c, _] = p.values();
    format!(
        "Add the first two: ${a} + {b} = {ab}$. Then add the third: ${ab} + {c} = {sum}$.",
        ab = a + b,
        sum = a + b + c,
    )
}

/// Dropping the last addend, off-by-one, and a doubled carry.
fn three_addends_distractors(p: &Params) -> Vec<String> {
    let [a, b, c, _] = p.values();
    let sum = a + b + c;
    vec![
        (a + b).to_string(),
        (sum + 1).to_string(),
        (sum - 1).to_string(),
        (sum + 10).to_string(),
    ]
}

fn three_addends_filler(k: u32) -> String {
    (40 + k).to_string()
}

pub static THREE_ADDENDS: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("arithmetic.three_addends"),
    topic: "Adding three single-digit numbers",
    difficulty: Difficulty::Hard,
    domain: THREE_ADDENDS_DOMAIN,
    accept: three_addends_accept,
    prompt: three_addends_prompt,
    answer: three_addends_answer,
    explain: three_addends_explain,
    distractors: three_addends_distractors,
    filler: three_addends_filler,
    fallback: Params::new([7, 5, 4, 0]),
};

//
// ─── PLACE VALUE ───────────────────────────────────────────────────────────────
//

const PLACE_VALUE_DOMAIN: &[ParamRange] = &[
    param("ones", 1, 9),
    param("tenths", 0, 9),
    param("hundredths", 0, 9),
    param("asks_hundredths", 0, 1),
];

fn place_value_accept(p: &Params) -> bool {
    let [n, t, h, _] = p.values();
    n != t && t != h && n != h
}

fn place_name(asks_hundredths: i64) -> &'static str {
    if asks_hundredths == 1 { "hundredths" } else { "tenths" }
}

fn place_value_prompt(p: &Params) -> String {
    let [n, t, h, which] = p.values();
    format!("Which digit is in the {} place of ${n}.{t}{h}$?", place_name(which))
}

fn place_value_answer(p: &Params) -> String {
    let [_, t, h, which] = p.values();
    if which == 1 { h.to_string() } else { t.to_string() }
}

fn place_value_explain(p: &Params) -> String {
    let [n, t, h, which] = p.values();
    format!(
        "In ${n}.{t}{h}$ the digit ${n}$ is in the ones place, ${t}$ is in the tenths place \
         and ${h}$ is in the hundredths place. So the {} digit is ${}$.",
        place_name(which),
        place_value_answer(p),
    )
}

fn place_value_distractors(p: &Params) -> Vec<String> {
    let [n, t, h, which] = p.values();
    let (other, digit) = if which == 1 { (t, h) } else { (h, t) };
    vec![other.to_string(), n.to_string(), ((digit + 1) % 10).to_string()]
}

fn place_value_filler(k: u32) -> String {
    (k % 10).to_string()
}

pub static PLACE_VALUE: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("decimals.place_value"),
    topic: "Place values of decimals",
    difficulty: Difficulty::Easy,
    domain: PLACE_VALUE_DOMAIN,
    accept: place_value_accept,
    prompt: place_value_prompt,
    answer: place_value_answer,
    explain: place_value_explain,
    distractors: place_value_distractors,
    filler: place_value_filler,
    fallback: Params::new([3, 7, 2, 0]),
};

const DIGIT_VALUE_DOMAIN: &[ParamRange] = &[
    param("ones", 1, 9),
    param("tenths", 1, 9),
    param("hundredths", 1, 9),
    param("asks_hundredths", 0, 1),
];

/// Value of a digit in the tenths (`places == 1`) or hundredths place.
fn decimal_value(digit: i64, places: usize) -> String {
    format!("0.{}{digit}", "0".repeat(places - 1))
}

fn asked_digit(p: &Params) -> (i64, usize) {
    let [_, t, h, which] = p.values();
    if which == 1 { (h, 2) } else { (t, 1) }
}

fn digit_value_prompt(p: &Params) -> String {
    let [n, t, h, _] = p.values();
    let (digit, _) = asked_digit(p);
    format!("What is the value of the digit ${digit}$ in ${n}.{t}{h}$?")
}

fn digit_value_answer(p: &Params) -> String {
    let (digit, places) = asked_digit(p);
    decimal_value(digit, places)
}

fn digit_value_explain(p: &Params) -> String {
    let [n, t, h, which] = p.values();
    let (digit, _) = asked_digit(p);
    format!(
        "In ${n}.{t}{h}$ the digit ${t}$ stands for ${t}$ tenths and ${h}$ stands for ${h}$ \
         hundredths. The ${digit}$ is in the {} place, so its value is ${}$.",
        place_name(which),
        digit_value_answer(p),
    )
}

/// The bare digit, then the right digit in the neighbouring place.
fn digit_value_distractors(p: &Params) -> Vec<String> {
    let (digit, places) = asked_digit(p);
    let other_place = if places == 1 { 2 } else { 1 };
    vec![
        digit.to_string(),
        decimal_value(digit, other_place),
        decimal_value(digit, 3),
        format!("{digit}0"),
    ]
}

fn digit_value_filler(k: u32) -> String {
    format!("0.{}", 10 + k)
}

pub static DIGIT_VALUE: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("decimals.digit_value"),
    topic: "Value of a digit in a decimal",
    difficulty: Difficulty::Medium,
    domain: DIGIT_VALUE_DOMAIN,
    accept: place_value_accept,
    prompt: digit_value_prompt,
    answer: digit_value_answer,
    explain: digit_value_explain,
    distractors: digit_value_distractors,
    filler: digit_value_filler,
    fallback: Params::new([3, 7, 2, 1]),
};

const THOUSANDTHS_DOMAIN: &[ParamRange] = &[
    param("whole", 10, 99),
    param("tenths", 0, 9),
    param("hundredths", 0, 9),
    param("thousandths", 1, 9),
];

fn thousandths_accept(p: &Params) -> bool {
    let [_, t, h, k] = p.values();
    t != h && h != k && t != k
}

fn thousandths_prompt(p: &Params) -> String {
    let [w, t, h, k] = p.values();
    format!("What is the value of the digit ${k}$ in ${w}.{t}{h}{k}$?")
}

fn thousandths_answer(p: &Params) -> String {
    let [_, _, _, k] = p.values();
    decimal_value(k, 3)
}

fn thousandths_explain(p: &Params) -> String {
    let [w, t, h, k] = p.values();
    format!(
        "After the decimal point of ${w}.{t}{h}{k}$ come the tenths (${t}$), hundredths \
         (${h}$) and thousandths (${k}$) digits. So the ${k}$ is worth \
         ${k} \\times 0.001 = {}$.",
        decimal_value(k, 3),
    )
}

fn thousandths_distractors(p: &Params) -> Vec<String> {
    let [_, t, _, k] = p.values();
    vec![
        decimal_value(k, 2),
        decimal_value(k, 1),
        k.to_string(),
        decimal_value(t, 3),
    ]
}

fn thousandths_filler(k: u32) -> String {
    format!("0.{}", 100 + k)
}

pub static THOUSANDTHS_PLACE: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("decimals.thousandths_place"),
    topic: "Decimals to the thousandths place",
    difficulty: Difficulty::Hard,
    domain: THOUSANDTHS_DOMAIN,
    accept: thousandths_accept,
    prompt: thousandths_prompt,
    answer: thousandths_answer,
    explain: thousandths_explain,
    distractors: thousandths_distractors,
    filler: thousandths_filler,
    fallback: Params::new([24, 5, 8, 3]),
};

//
// ─── HIGHEST COMMON FACTOR ─────────────────────────────────────────────────────
//

const HCF_DOMAIN: &[ParamRange] = &[param("hcf", 2, 12), param("m", 1, 9), param("n", 1, 9)];

fn hcf_accept(p: &Params) -> bool {
    let [_, m, n, _] = p.values();
    m != n && gcd(m, n) == 1
}

fn hcf_prompt(p: &Params) -> String {
    let [g, m, n, _] = p.values();
    format!("Find the HCF of ${}$ and ${}$.", g * m, g * n)
}

fn hcf_answer(p: &Params) -> String {
    let [g, _, _, _] = p.values();
    g.to_string()
}

fn hcf_explain(p: &Params) -> String {
    let [g, m, n, _] = p.values();
    format!(
        "${} = {g} \\times {m}$ and ${} = {g} \\times {n}$. Since ${m}$ and ${n}$ have no \
         common factor other than $1$, the HCF is ${g}$.",
        g * m,
        g * n,
    )
}

fn hcf_distractors(p: &Params) -> Vec<String> {
    let [g, m, n, _] = p.values();
    vec![
        (g * m * n).to_string(),
        (g * m.min(n)).to_string(),
        (g * (m - n).abs()).to_string(),
        (g * m + g * n).to_string(),
    ]
}

fn hcf_filler(k: u32) -> String {
    (100 + k).to_string()
}

pub static HCF: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("factors.hcf"),
    topic: "Highest common factor",
    difficulty: Difficulty::Medium,
    domain: HCF_DOMAIN,
    accept: hcf_accept,
    prompt: hcf_prompt,
    answer: hcf_answer,
    explain: hcf_explain,
    distractors: hcf_distractors,
    filler: hcf_filler,
    fallback: Params::new([6, 2, 3, 0]),
};

const SMALL_HCF_DOMAIN: &[ParamRange] = &[param("hcf", 2, 5), param("m", 1, 5), param("n", 1, 5)];

pub static SMALL_HCF: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("factors.hcf_small"),
    topic: "Highest common factor of small numbers",
    difficulty: Difficulty::Easy,
    domain: SMALL_HCF_DOMAIN,
    accept: hcf_accept,
    prompt: hcf_prompt,
    answer: hcf_answer,
    explain: hcf_explain,
    distractors: hcf_distractors,
    filler: hcf_filler,
    fallback: Params::new([2, 2, 3, 0]),
};

const HCF_OF_THREE_DOMAIN: &[ParamRange] = &[
    param("hcf", 2, 12),
    param("m", 2, 9),
    param("n", 2, 9),
    param("c", 2, 9),
];

fn hcf_of_three_accept(p: &Params) -> bool {
    let [_, m, n, c] = p.values();
    m != n && n != c && m != c && gcd(gcd(m, n), c) == 1
}

fn hcf_of_three_prompt(p: &Params) -> String {
    let [g, m, n, c] = p.values();
    format!("Find the HCF of ${}$, ${}$ and ${}$.", g * m, g * n, g * c)
}

fn hcf_of_three_explain(p: &Params) -> String {
    let [g, m, n, c] = p.values();
    format!(
        "${} = {g} \\times {m}$, ${} = {g} \\times {n}$ and ${} = {g} \\times {c}$. \
         The numbers ${m}$, ${n}$ and ${c}$ have no common factor other than $1$, \
         so the HCF is ${g}$.",
        g * m,
        g * n,
        g * c,
    )
}

/// HCF of the first pair only, the smallest number, and doubling.
fn hcf_of_three_distractors(p: &Params) -> Vec<String> {
    let [g, m, n, c] = p.values();
    vec![
        (g * gcd(m, n)).to_string(),
        (g * m.min(n).min(c)).to_string(),
        (2 * g).to_string(),
        (g * m * n * c).to_string(),
    ]
}

pub static HCF_OF_THREE: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("factors.hcf_of_three"),
    topic: "Highest common factor of three numbers",
    difficulty: Difficulty::Hard,
    domain: HCF_OF_THREE_DOMAIN,
    accept: hcf_of_three_accept,
    prompt: hcf_of_three_prompt,
    answer: hcf_answer,
    explain: hcf_of_three_explain,
    distractors: hcf_of_three_distractors,
    filler: hcf_filler,
    fallback: Params::new([4, 2, 3, 5]),
};

//
// ─── FRACTION ADDITION ─────────────────────────────────────────────────────────
//

const FRACTION_DOMAIN: &[ParamRange] = &[
    param("a", 1, 8),
    param("b", 2, 9),
    param("c", 1, 8),
    param("d", 2, 9),
];

fn fraction_accept(p: &Params) -> bool {
    let [a, b, c, d] = p.values();
    b != d && a < b && c < d && gcd(a, b) == 1 && gcd(c, d) == 1
}

fn fraction_prompt(p: &Params) -> String {
    let [a, b, c, d] = p.values();
    format!("Add: $\\frac{{{a}}}{{{b}}} + \\frac{{{c}}}{{{d}}}$")
}

fn fraction_answer(p: &Params) -> String {
    let [a, b, c, d] = p.values();
    fraction(a * d + c * b, b * d)
}

fn fraction_explain(p: &Params) -> String {
    let [a, b, c, d] = p.values();
    let bd = b * d;
    let sum = a * d + c * b;
    format!(
        "Use the common denominator ${b} \\times {d} = {bd}$: \
         $\\frac{{{a} \\times {d} + {c} \\times {b}}}{{{bd}}} = \\frac{{{sum}}}{{{bd}}}$, \
         which simplifies to ${}$.",
        fraction(sum, bd),
    )
}

fn fraction_distractors(p: &Params) -> Vec<String> {
    let [a, b, c, d] = p.values();
    vec![
        fraction(a + c, b + d),
        fraction(a * c, b * d),
        fraction(a * d + c, b * d),
        fraction(a + c, b.max(d)),
    ]
}

fn fraction_filler(k: u32) -> String {
    fraction(i64::from(k), i64::from(k) + 10)
}

pub static FRACTION_ADDITION: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("fractions.addition"),
    topic: "Adding fractions with unlike denominators",
    difficulty: Difficulty::Medium,
    domain: FRACTION_DOMAIN,
    accept: fraction_accept,
    prompt: fraction_prompt,
    answer: fraction_answer,
    explain: fraction_explain,
    distractors: fraction_distractors,
    filler: fraction_filler,
    fallback: Params::new([1, 2, 1, 3]),
};

const LIKE_FRACTION_DOMAIN: &[ParamRange] =
    &[param("a", 1, 9), param("c", 1, 9), param("denominator", 3, 12)];

fn like_fraction_accept(p: &Params) -> bool {
    let [a, c, b, _] = p.values();
    a != c && a < b && c < b
}

fn like_fraction_prompt(p: &Params) -> String {
    let [a, c, b, _] = p.values();
    format!("Add: $\\frac{{{a}}}{{{b}}} + \\frac{{{c}}}{{{b}}}$")
}

fn like_fraction_answer(p: &Params) -> String {
    let [a, c, b, _] = p.values();
    fraction(a + c, b)
}

fn like_fraction_explain(p: &Params) -> String {
    let [a, c, b, _] = p.values();
    format!(
        "Both denominators are ${b}$, so add the numerators: \
         $\\frac{{{a} + {c}}}{{{b}}} = \\frac{{{sum}}}{{{b}}}$, which simplifies to ${}$.",
        fraction(a + c, b),
        sum = a + c,
    )
}

/// Adding the denominators too, multiplying numerators, squaring the denominator.
fn like_fraction_distractors(p: &Params) -> Vec<String> {
    let [a, c, b, _] = p.values();
    vec![
        fraction(a + c, 2 * b),
        fraction(a * c, b),
        fraction(a + c, b * b),
        fraction(a + c + 1, b),
    ]
}

pub static LIKE_FRACTION_ADDITION: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("fractions.like_addition"),
    topic: "Adding fractions with like denominators",
    difficulty: Difficulty::Easy,
    domain: LIKE_FRACTION_DOMAIN,
    accept: like_fraction_accept,
    prompt: like_fraction_prompt,
    answer: like_fraction_answer,
    explain: like_fraction_explain,
    distractors: like_fraction_distractors,
    filler: fraction_filler,
    fallback: Params::new([1, 2, 5, 0]),
};

const LCD_FRACTION_DOMAIN: &[ParamRange] = &[
    param("a", 1, 5),
    param("b", 4, 12),
    param("c", 1, 5),
    param("d", 4, 12),
];

/// Denominators share a factor without one dividing the other, so the least
/// common denominator is smaller than their product.
fn lcd_fraction_accept(p: &Params) -> bool {
    let [a, b, c, d] = p.values();
    b != d
        && gcd(b, d) > 1
        && b % d != 0
        && d % b != 0
        && a < b
        && c < d
        && gcd(a, b) == 1
        && gcd(c, d) == 1
}

fn lcd_fraction_explain(p: &Params) -> String {
    let [a, b, c, d] = p.values();
    let lcd = b * d / gcd(b, d);
    let (ea, ec) = (a * (lcd / b), c * (lcd / d));
    format!(
        "The least common denominator of ${b}$ and ${d}$ is ${lcd}$. \
         Rewrite $\\frac{{{a}}}{{{b}}} = \\frac{{{ea}}}{{{lcd}}}$ and \
         $\\frac{{{c}}}{{{d}}} = \\frac{{{ec}}}{{{lcd}}}$, then add the numerators: \
         $\\frac{{{sum}}}{{{lcd}}}$, which simplifies to ${}$.",
        fraction(ea + ec, lcd),
        sum = ea + ec,
    )
}

pub static LCD_FRACTION_ADDITION: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("fractions.lcd_addition"),
    topic: "Adding fractions using the least common denominator",
    difficulty: Difficulty::Hard,
    domain: LCD_FRACTION_DOMAIN,
    accept: lcd_fraction_accept,
    prompt: fraction_prompt,
    answer: fraction_answer,
    explain: lcd_fraction_explain,
    distractors: fraction_distractors,
    filler: fraction_filler,
    fallback: Params::new([1, 4, 1, 6]),
};

//
// ─── ARITHMETIC PROGRESSION ────────────────────────────────────────────────────
//

const AP_DOMAIN: &[ParamRange] = &[
    param("first", -10, 20),
    param("difference", -5, 9),
    param("term", 5, 20),
];

fn ap_accept(p: &Params) -> bool {
    let [_, d, _, _] = p.values();
    d != 0
}

fn ap_prompt(p: &Params) -> String {
    let [a, d, n, _] = p.values();
    format!(
        "Find the {n}th term of the arithmetic progression ${a}, {}, {}, \\ldots$",
        a + d,
        a + 2 * d
    )
}

fn ap_answer(p: &Params) -> String {
    let [a, d, n, _] = p.values();
    (a + (n - 1) * d).to_string()
}

fn ap_explain(p: &Params) -> String {
    let [a, d, n, _] = p.values();
    format!(
        "The first term is $a = {a}$ and the common difference is $d = {d}$. \
         $a_{{{n}}} = a + ({n} - 1)d = {a} + {} \\times {} = {}$.",
        n - 1,
        paren(d),
        a + (n - 1) * d,
    )
}

fn ap_distractors(p: &Params) -> Vec<String> {
    let [a, d, n, _] = p.values();
    vec![
        (a + n * d).to_string(),
        (n * d).to_string(),
        (a - (n - 1) * d).to_string(),
        (a + (n - 2) * d).to_string(),
    ]
}

fn ap_filler(k: u32) -> String {
    (1_000 + k).to_string()
}

pub static AP_NTH_TERM: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("sequences.ap_nth_term"),
    topic: "Arithmetic progressions",
    difficulty: Difficulty::Hard,
    domain: AP_DOMAIN,
    accept: ap_accept,
    prompt: ap_prompt,
    answer: ap_answer,
    explain: ap_explain,
    distractors: ap_distractors,
    filler: ap_filler,
    fallback: Params::new([3, 4, 10, 0]),
};

const AP_NEXT_DOMAIN: &[ParamRange] = &[param("first", 1, 20), param("difference", 2, 9)];

fn ap_next_prompt(p: &Params) -> String {
    let [a, d, _, _] = p.values();
    format!(
        "What is the next term of the arithmetic progression ${a}, {}, {}, {}, \\ldots$?",
        a + d,
        a + 2 * d,
        a + 3 * d
    )
}

fn ap_next_answer(p: &Params) -> String {
    let [a, d, _, _] = p.values();
    (a + 4 * d).to_string()
}

fn ap_next_explain(p: &Params) -> String {
    let [a, d, _, _] = p.values();
    format!(
        "Each term is ${d}$ more than the one before, so the next term is \
         ${} + {d} = {}$.",
        a + 3 * d,
        a + 4 * d,
    )
}

fn ap_next_distractors(p: &Params) -> Vec<String> {
    let [a, d, _, _] = p.values();
    let next = a + 4 * d;
    vec![
        (next + d).to_string(),
        (a + 3 * d).to_string(),
        (next + 1).to_string(),
        (next - 1).to_string(),
    ]
}

fn ap_next_filler(k: u32) -> String {
    (500 + k).to_string()
}

pub static AP_NEXT_TERM: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("sequences.ap_next_term"),
    topic: "Continuing an arithmetic progression",
    difficulty: Difficulty::Easy,
    domain: AP_NEXT_DOMAIN,
    accept: ap_accept,
    prompt: ap_next_prompt,
    answer: ap_next_answer,
    explain: ap_next_explain,
    distractors: ap_next_distractors,
    filler: ap_next_filler,
    fallback: Params::new([3, 4, 0, 0]),
};

const AP_RISING_DOMAIN: &[ParamRange] = &[
    param("first", 1, 20),
    param("difference", 1, 9),
    param("term", 5, 12),
];

pub static AP_RISING_NTH_TERM: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("sequences.ap_rising_nth_term"),
    topic: "Terms of an increasing arithmetic progression",
    difficulty: Difficulty::Medium,
    domain: AP_RISING_DOMAIN,
    accept: ap_accept,
    prompt: ap_prompt,
    answer: ap_answer,
    explain: ap_explain,
    distractors: ap_distractors,
    filler: ap_filler,
    fallback: Params::new([3, 4, 10, 0]),
};

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::model::QuestionInstance;
    use crate::templates::{generate, instantiate};

    fn build(template: &QuestionTemplate, params: Params) -> QuestionInstance {
        instantiate(template, params, &mut StdRng::seed_from_u64(0)).unwrap()
    }

    #[test]
    fn fractions_are_reduced() {
        assert_eq!(fraction(6, 8), "3/4");
        assert_eq!(fraction(6, 3), "2");
        assert_eq!(fraction(5, 6), "5/6");
    }

    #[test]
    fn fraction_sum_is_simplified() {
        let q = build(&FRACTION_ADDITION, Params::new([1, 2, 1, 3]));
        assert_eq!(q.correct_answer(), "5/6");
        assert!(q.has_option("2/5"));
        assert!(q.solution().contains("\\frac{1 \\times 3 + 1 \\times 2}{6}"));
    }

    #[test]
    fn hcf_params_are_coprime_multipliers() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..300 {
            let q = generate(&HCF, &mut rng).unwrap();
            let [g, m, n, _] = q.params().values();
            assert_ne!(m, n);
            assert_eq!(gcd(g * m, g * n), g);
            assert_eq!(q.correct_answer(), g.to_string());
        }
    }

    #[test]
    fn place_value_reads_the_requested_digit() {
        let tenths = build(&PLACE_VALUE, Params::new([3, 7, 2, 0]));
        assert_eq!(tenths.correct_answer(), "7");
        let hundredths = build(&PLACE_VALUE, Params::new([3, 7, 2, 1]));
        assert_eq!(hundredths.correct_answer(), "2");
        assert!(hundredths.solution().contains("$3.72$"));
    }

    #[test]
    fn ap_term_uses_n_minus_one_steps() {
        let q = build(&AP_NTH_TERM, Params::new([3, 4, 10, 0]));
        assert_eq!(q.correct_answer(), "39");
        // off-by-one distractor counts n steps
        assert!(q.has_option("43"));
        assert!(q.solution().contains("3 + 9 \\times 4 = 39"));
    }

    #[test]
    fn ap_negative_difference_is_parenthesised() {
        let q = build(&AP_NTH_TERM, Params::new([20, -3, 5, 0]));
        assert_eq!(q.correct_answer(), "8");
        assert!(q.solution().contains("20 + 4 \\times (-3) = 8"));
    }

    #[test]
    fn bridging_ten_explains_the_split() {
        let q = build(&ADDITION_BRIDGING_TEN, Params::new([8, 5, 0, 0]));
        assert_eq!(q.correct_answer(), "13");
        assert!(q.solution().contains("$8 + 2 = 10$"));
        assert!(q.solution().contains("$10 + 3 = 13$"));
    }

    #[test]
    fn three_addends_sum_in_two_steps() {
        let q = build(&THREE_ADDENDS, Params::new([7, 5, 4, 0]));
        assert_eq!(q.correct_answer(), "16");
        assert!(q.has_option("12"));
        assert!(q.solution().contains("$12 + 4 = 16$"));
    }

    #[test]
    fn digit_value_names_the_place() {
        let tenths = build(&DIGIT_VALUE, Params::new([3, 7, 2, 0]));
        assert_eq!(tenths.correct_answer(), "0.7");
        assert!(tenths.has_option("0.07"));
        let hundredths = build(&DIGIT_VALUE, Params::new([3, 7, 2, 1]));
        assert_eq!(hundredths.correct_answer(), "0.02");
        assert!(hundredths.has_option("2"));
    }

    #[test]
    fn thousandths_digit_value() {
        let q = build(&THOUSANDTHS_PLACE, Params::new([24, 5, 8, 3]));
        assert_eq!(q.prompt(), "What is the value of the digit $3$ in $24.583$?");
        assert_eq!(q.correct_answer(), "0.003");
        assert!(q.has_option("0.03"));
    }

    #[test]
    fn hcf_of_three_ignores_pairwise_factors() {
        // 2 and 4 share a factor but 2, 4 and 5 do not
        let q = build(&HCF_OF_THREE, Params::new([3, 2, 4, 5]));
        assert_eq!(q.prompt(), "Find the HCF of $6$, $12$ and $15$.");
        assert_eq!(q.correct_answer(), "3");
        assert!(q.has_option("6"));
    }

    #[test]
    fn like_fractions_add_numerators() {
        let q = build(&LIKE_FRACTION_ADDITION, Params::new([1, 2, 5, 0]));
        assert_eq!(q.correct_answer(), "3/5");
        assert!(q.has_option("3/10"));
        let whole = build(&LIKE_FRACTION_ADDITION, Params::new([1, 3, 4, 0]));
        assert_eq!(whole.correct_answer(), "1");
    }

    #[test]
    fn lcd_is_smaller_than_the_product() {
        let q = build(&LCD_FRACTION_ADDITION, Params::new([1, 4, 1, 6]));
        assert_eq!(q.correct_answer(), "5/12");
        assert!(q.solution().contains("least common denominator of $4$ and $6$ is $12$"));
        assert!(!LCD_FRACTION_ADDITION.admits(&Params::new([1, 4, 1, 8])));
    }

    #[test]
    fn ap_next_term_adds_one_difference() {
        let q = build(&AP_NEXT_TERM, Params::new([3, 4, 0, 0]));
        assert!(q.prompt().contains("$3, 7, 11, 15, \\ldots$"));
        assert_eq!(q.correct_answer(), "19");
        assert!(q.has_option("15"));
    }

    #[test]
    fn addition_distinct_addends() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            let q = generate(&SINGLE_DIGIT_ADDITION, &mut rng).unwrap();
            let [a, b, _, _] = q.params().values();
            assert_ne!(a, b);
            assert!(q.solution().contains(&format!("{a} + {b} = {}", a + b)));
        }
    }
}
