//! Client for the hosted-model inference API that produces health advice.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::config::Config;
use crate::error::{AppError, Result};

/// The prompt handed to the model. The few-shot examples pin the four-line
/// reply format the parser expects.
const PROMPT_TEMPLATE: &str = "\
You are a highly knowledgeable medical assistant. Based on the symptoms provided, \
diagnose the most probable disease and suggest clear, actionable precautions. Also, \
provide suitable workout and diet suggestions. Format your response as follows:

- Disease: [Disease Name]
- Precautions: [Precautions]
- Workouts: [Workouts]
- Diet: [Diet Suggestions]

Example 1:
Symptoms: fever, cough, headache
Response:
- Disease: Common Cold
- Precautions: Rest, drink plenty of fluids, and take over-the-counter medications.
- Workouts: Light stretching, yoga, or rest if unwell.
- Diet: Warm soups, herbal teas, and vitamin C-rich fruits like oranges.

Example 2:
Symptoms: chest pain, shortness of breath
Response:
- Disease: Heart Attack
- Precautions: Seek immediate medical attention, avoid physical exertion, and stay calm.
- Workouts: None until cleared by a doctor.
- Diet: Low-sodium, heart-healthy foods like leafy greens, nuts, and whole grains.

Now analyze the following symptoms:
Symptoms: {symptoms}

Response:
";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: GenerateParameters,
}

#[derive(Serialize)]
struct GenerateParameters {
    temperature: f32,
    max_new_tokens: u32,
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// HTTP client for the hosted advice model.
pub struct AdviceModelClient {
    http: reqwest::Client,
    endpoint: String,
    token: Zeroizing<String>,
}

impl AdviceModelClient {
    /// Creates a new client from the shared HTTP client and configuration.
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        let endpoint = format!(
            "{}/{}",
            config.model_api_url.trim_end_matches('/'),
            config.model_repo_id
        );
        Self {
            http,
            endpoint,
            token: config.model_api_token.clone(),
        }
    }

    /// Builds the prompt for a comma-joined symptom list.
    pub fn prompt_for(symptoms: &str) -> String {
        PROMPT_TEMPLATE.replace("{symptoms}", symptoms)
    }

    /// Asks the model for advice on the given symptoms and returns the first
    /// candidate's raw text. One shot, never retried.
    ///
    /// # Arguments
    ///
    /// * `symptoms` - The comma-joined symptom list.
    ///
    /// # Returns
    ///
    /// A `Result` containing the model's raw reply.
    pub async fn generate(&self, symptoms: &str) -> Result<String> {
        let prompt = Self::prompt_for(symptoms);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.token.as_str())
            .json(&GenerateRequest {
                inputs: &prompt,
                parameters: GenerateParameters {
                    temperature: 0.7,
                    max_new_tokens: 256,
                },
            })
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to reach the advice model: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Advice model returned {}",
                response.status()
            )));
        }

        let candidates: Vec<GeneratedText> = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse model response: {}", e)))?;

        candidates
            .into_iter()
            .next()
            .map(|c| c.generated_text)
            .ok_or_else(|| AppError::Upstream("Advice model returned no candidates".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_symptoms_and_format() {
        let prompt = AdviceModelClient::prompt_for("fever, cough");
        assert!(prompt.contains("Symptoms: fever, cough"));
        assert!(prompt.contains("- Disease:"));
        assert!(prompt.contains("- Diet:"));
        assert!(!prompt.contains("{symptoms}"));
    }

    #[test]
    fn candidate_payload_deserializes() {
        let parsed: Vec<GeneratedText> =
            serde_json::from_str(r#"[{"generated_text": "- Disease: Flu"}]"#).unwrap();
        assert_eq!(parsed[0].generated_text, "- Disease: Flu");
    }
}
