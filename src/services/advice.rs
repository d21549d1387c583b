use crate::clients::huggingface::AdviceModelClient;
use crate::error::{AppError, Result};
use crate::models::advice::AdviceReply;
use crate::state::AppState;

/// Normalizes a model reply into an [`AdviceReply`].
///
/// A single pass over the lines keeps, for each label, the first line whose
/// prefix matches. All four labels present yields `Structured`; anything
/// less falls back to the whole reply as `Raw` rather than a partial record.
pub fn parse_reply(text: &str) -> AdviceReply {
    if text.trim().is_empty() {
        return AdviceReply::Fallback;
    }

    let mut disease = None;
    let mut precautions = None;
    let mut workouts = None;
    let mut diet = None;

    for line in text.lines() {
        if disease.is_none() && matches_label(line, "Disease:") {
            disease = Some(line.to_string());
        } else if precautions.is_none() && matches_label(line, "Precautions:") {
            precautions = Some(line.to_string());
        } else if workouts.is_none() && matches_label(line, "Workouts:") {
            workouts = Some(line.to_string());
        } else if diet.is_none() && matches_label(line, "Diet:") {
            diet = Some(line.to_string());
        }
    }

    match (disease, precautions, workouts, diet) {
        (Some(disease), Some(precautions), Some(workouts), Some(diet)) => {
            AdviceReply::Structured {
                disease,
                precautions,
                workouts,
                diet,
            }
        }
        _ => AdviceReply::Raw(text.to_string()),
    }
}

/// A line carries a label when, after the dash marker, it starts with the
/// label text. Only the label is matched case-insensitively.
fn matches_label(line: &str, label: &str) -> bool {
    let Some(rest) = line.trim_start().strip_prefix('-') else {
        return false;
    };
    let rest = rest.trim_start();
    rest.get(..label.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(label))
}

/// Produces health advice for the given symptoms.
///
/// Symptom entries are trimmed and blank ones dropped before being
/// comma-joined into the model prompt. An upstream failure is converted to
/// a user-visible message, not retried.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `symptoms` - The symptoms reported by the user.
///
/// # Returns
///
/// A `Result` containing the advice text.
pub async fn get_advice(state: &AppState, symptoms: &[String]) -> Result<String> {
    let joined = symptoms
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    if joined.is_empty() {
        return Err(AppError::Validation(
            "Please enter symptoms to get advice.".to_string(),
        ));
    }

    tracing::debug!("🩺 Requesting advice for symptoms: {}", joined);

    let client = AdviceModelClient::new(state.http.clone(), &state.config);
    match client.generate(&joined).await {
        Ok(reply) => Ok(parse_reply(&reply).render()),
        Err(AppError::Upstream(msg)) => {
            tracing::warn!("❌ Advice model call failed: {}", msg);
            Ok(format!("Error predicting health advice: {}", msg))
        }
        Err(e) => Err(e),
    }
}
