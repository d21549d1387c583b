use serde::Serialize;

/// The advice shown when the model returns an empty reply.
pub const FALLBACK_ADVICE: &str = "- Disease: Unknown\n\
                                   - Precautions: Consult a doctor for more information.\n\
                                   - Workouts: Not applicable.\n\
                                   - Diet: Not applicable.";

/// The normalized outcome of parsing a model reply.
///
/// The classifier is total: every input maps to one of these variants,
/// malformed output included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AdviceReply {
    /// All four labeled lines were found. Each field holds its line verbatim.
    Structured {
        disease: String,
        precautions: String,
        workouts: String,
        diet: String,
    },
    /// At least one label was missing; the reply is passed through as-is.
    Raw(String),
    /// The reply was empty or whitespace-only.
    Fallback,
}

impl AdviceReply {
    /// Renders the reply as the text handed back to the client.
    pub fn render(&self) -> String {
        match self {
            AdviceReply::Structured {
                disease,
                precautions,
                workouts,
                diet,
            } => format!("{disease}\n{precautions}\n{workouts}\n{diet}"),
            AdviceReply::Raw(text) => format!("\n{text}"),
            AdviceReply::Fallback => FALLBACK_ADVICE.to_string(),
        }
    }
}
