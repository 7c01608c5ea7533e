//! Answer synthesis prompts
//!
//! System prompt variants for grounded answer generation, selected by the
//! question's classification.

use crate::providers::gateway::QuestionType;

/// Base system prompt for answering from supplied context
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant that answers questions based on provided content.
Your role is to provide accurate, informative answers using ONLY the information provided in the context.

Guidelines:
1. Base your answers strictly on the provided content
2. If the context doesn't contain enough information to answer the question, clearly state this
3. Be concise but comprehensive in your responses
4. Cite specific information from the context when relevant
5. If the context contains conflicting information, acknowledge this
6. Do not make up or infer information not present in the context
7. Structure your answers clearly with paragraphs when appropriate";

/// System prompt specialized for a question type
pub fn system_prompt_for(question_type: QuestionType) -> String {
    let focus = match question_type {
        QuestionType::Factual => {
            "For factual questions, focus on providing specific dates, names, and figures from the context."
        }
        QuestionType::Analytical => {
            "For analytical questions, explain the relationships and implications found in the context."
        }
        QuestionType::Comparative => {
            "For comparative questions, clearly outline similarities and differences found in the context."
        }
        QuestionType::Historical => {
            "For historical questions, pay special attention to chronology and cause-effect relationships in the context."
        }
    };
    format!("{}\n\n{}", SYSTEM_PROMPT, focus)
}

/// User message for answer synthesis
///
/// `context` is used as given; callers bound its length.
pub fn build_answer_prompt(question: &str, context: &str) -> String {
    format!(
        "Question: {}\n\nContext:\n{}\n\nPlease provide a comprehensive answer based solely on the above context.",
        question, context
    )
}
