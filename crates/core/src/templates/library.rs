use rand::Rng;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{InstanceError, OPTION_COUNT, QuestionInstance, TemplateId};
use crate::templates::{MAX_PARAMS, Params, QuestionTemplate, shuffle_options, synthesize};

/// Upper bound on parameter draws before a template falls back.
pub const MAX_DRAWS: u32 = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("template {template} found no acceptable parameters in {attempts} draws")]
    Exhausted { template: TemplateId, attempts: u32 },

    #[error("template {0} cannot produce a valid question, even from its fallback")]
    DefectiveTemplate(TemplateId),

    #[error(transparent)]
    Instance(#[from] InstanceError),
}

/// Produce one question from `template` using fresh randomness.
///
/// Parameters are redrawn until the template's precondition holds. When that
/// does not happen within [`MAX_DRAWS`], the template's fixed fallback
/// parameters are used instead, so a learner never sees a generation error
/// from a healthy template.
///
/// # Errors
///
/// Returns `GenerationError::DefectiveTemplate` only when the fallback itself
/// is rejected or cannot be rendered into a valid instance.
pub fn generate<R: Rng + ?Sized>(
    template: &QuestionTemplate,
    rng: &mut R,
) -> Result<QuestionInstance, GenerationError> {
    let drawn = draw_params(template, rng).and_then(|params| instantiate(template, params, rng));

    match drawn {
        Ok(instance) => Ok(instance),
        Err(err) => {
            warn!(
                template = %template.id,
                error = %err,
                "generation fell back to fixed parameters"
            );
            if !template.admits(&template.fallback) {
                return Err(GenerationError::DefectiveTemplate(template.id));
            }
            instantiate(template, template.fallback, rng)
                .map_err(|_| GenerationError::DefectiveTemplate(template.id))
        }
    }
}

/// Rejection-sample parameters for `template`.
///
/// # Errors
///
/// Returns `GenerationError::Exhausted` when no draw satisfies the
/// precondition within [`MAX_DRAWS`], and `DefectiveTemplate` when the
/// declared domain is empty or too wide.
pub fn draw_params<R: Rng + ?Sized>(
    template: &QuestionTemplate,
    rng: &mut R,
) -> Result<Params, GenerationError> {
    if template.domain.len() > MAX_PARAMS || template.domain.iter().any(|r| r.min > r.max) {
        return Err(GenerationError::DefectiveTemplate(template.id));
    }

    for draw in 1..=MAX_DRAWS {
        let mut values = [0_i64; MAX_PARAMS];
        for (slot, range) in values.iter_mut().zip(template.domain) {
            *slot = rng.random_range(range.min..=range.max);
        }
        let params = Params::new(values);
        if (template.accept)(&params) {
            if draw > 1 {
                debug!(template = %template.id, draws = draw, "parameters accepted");
            }
            return Ok(params);
        }
    }

    Err(GenerationError::Exhausted {
        template: template.id,
        attempts: MAX_DRAWS,
    })
}

/// Render a validated instance from already resolved parameters.
///
/// Prompt, answer, explanation and distractors all read the same `params`.
///
/// # Errors
///
/// Returns `GenerationError::Instance` if the rendered options break the
/// instance invariants.
pub fn instantiate<R: Rng + ?Sized>(
    template: &QuestionTemplate,
    params: Params,
    rng: &mut R,
) -> Result<QuestionInstance, GenerationError> {
    let correct = (template.answer)(&params);
    let options = synthesize(&correct, template, &params, OPTION_COUNT);
    let options = shuffle_options(options, rng);

    let instance = QuestionInstance::new(
        template.id,
        template.difficulty,
        params,
        (template.prompt)(&params),
        correct,
        options,
        (template.explain)(&params),
    )?;
    Ok(instance)
}
