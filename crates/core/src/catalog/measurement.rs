use crate::model::{Difficulty, TemplateId};
use crate::templates::{Params, ParamRange, QuestionTemplate, param};

const RECTANGLE_DOMAIN: &[ParamRange] = &[param("length", 3, 20), param("width", 2, 15)];

fn rectangle_accept(p: &Params) -> bool {
    let [l, w, _, _] = p.values();
    l != w
}

fn rectangle_prompt(p: &Params) -> String {
    let [l, w, _, _] = p.values();
    format!("A rectangle is ${l}$ cm long and ${w}$ cm wide. What is its area?")
}

fn rectangle_answer(p: &Params) -> String {
    let [l, w, _, _] = p.values();
    format!("{} cm²", l * w)
}

fn rectangle_explain(p: &Params) -> String {
    let [l, w, _, _] = p.values();
    format!(
        "Area $=$ length $\\times$ width $= {l}$ cm $\\times\\ {w}$ cm $= {}$ cm².",
        l * w
    )
}

/// Perimeter in place of area, then the right number in the wrong unit.
fn rectangle_distractors(p: &Params) -> Vec<String> {
    let [l, w, _, _] = p.values();
    vec![
        format!("{} cm²", 2 * (l + w)),
        format!("{} cm", l * w),
        format!("{} cm²", l + w),
        format!("{} cm", 2 * (l + w)),
    ]
}

fn rectangle_filler(k: u32) -> String {
    format!("{} cm²", 500 + k)
}

pub static RECTANGLE_AREA: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("mensuration.rectangle_area"),
    topic: "Area of rectangles",
    difficulty: Difficulty::Medium,
    domain: RECTANGLE_DOMAIN,
    accept: rectangle_accept,
    prompt: rectangle_prompt,
    answer: rectangle_answer,
    explain: rectangle_explain,
    distractors: rectangle_distractors,
    filler: rectangle_filler,
    fallback: Params::new([8, 5, 0, 0]),
};

const SMALL_RECTANGLE_DOMAIN: &[ParamRange] = &[param("length", 2, 9), param("width", 2, 9)];

pub static SMALL_RECTANGLE_AREA: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("mensuration.small_rectangle_area"),
    topic: "Area of small rectangles",
    difficulty: Difficulty::Easy,
    domain: SMALL_RECTANGLE_DOMAIN,
    accept: rectangle_accept,
    prompt: rectangle_prompt,
    answer: rectangle_answer,
    explain: rectangle_explain,
    distractors: rectangle_distractors,
    filler: rectangle_filler,
    fallback: Params::new([4, 3, 0, 0]),
};

const MISSING_SIDE_DOMAIN: &[ParamRange] = &[param("length", 4, 20), param("width", 2, 15)];

fn missing_side_prompt(p: &Params) -> String {
    let [l, w, _, _] = p.values();
    format!(
        "A rectangle has an area of ${}$ cm² and a length of ${l}$ cm. What is its width?",
        l * w
    )
}

fn missing_side_answer(p: &Params) -> String {
    let [_, w, _, _] = p.values();
    format!("{w} cm")
}

fn missing_side_explain(p: &Params) -> String {
    let [l, w, _, _] = p.values();
    format!(
        "Area $=$ length $\\times$ width, so width $=$ area $\\div$ length \
         $= {} \\div {l} = {w}$ cm.",
        l * w
    )
}

/// Subtracting instead of dividing, then the answer in square units.
fn missing_side_distractors(p: &Params) -> Vec<String> {
    let [l, w, _, _] = p.values();
    vec![
        format!("{} cm", l * w - l),
        format!("{w} cm²"),
        format!("{l} cm"),
        format!("{} cm", w + 1),
    ]
}

fn missing_side_filler(k: u32) -> String {
    format!("{} cm", 300 + k)
}

pub static RECTANGLE_MISSING_SIDE: QuestionTemplate = QuestionTemplate {
    id: TemplateId::new("mensuration.rectangle_missing_side"),
    topic: "Finding a side of a rectangle from its area",
    difficulty: Difficulty::Hard,
    domain: MISSING_SIDE_DOMAIN,
    accept: rectangle_accept,
    prompt: missing_side_prompt,
    answer: missing_side_answer,
    explain: missing_side_explain,
    distractors: missing_side_distractors,
    filler: missing_side_filler,
    fallback: Params::new([8, 5, 0, 0]),
};

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::templates::instantiate;

    #[test]
    fn area_and_perimeter_collision_is_padded() {
        // 6 x 3: area 18 equals perimeter 18, so one unit-confusion wrong is lost
        let q = instantiate(
            &RECTANGLE_AREA,
            Params::new([6, 3, 0, 0]),
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();
        assert_eq!(q.correct_answer(), "18 cm²");
        assert_eq!(q.options().len(), 4);
        assert!(q.has_option("18 cm"));
        assert!(q.has_option("9 cm²"));
        assert!(q.solution().contains("6$ cm"));
    }

    #[test]
    fn missing_side_divides_the_area() {
        let q = instantiate(
            &RECTANGLE_MISSING_SIDE,
            Params::new([8, 5, 0, 0]),
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();
        assert_eq!(q.correct_answer(), "5 cm");
        assert!(q.has_option("32 cm"));
        assert!(q.has_option("5 cm²"));
        assert!(q.solution().contains("40 \\div 8 = 5"));
    }
}
