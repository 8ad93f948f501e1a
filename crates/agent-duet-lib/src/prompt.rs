//! Prompt templates and completion-text normalization.
//!
//! Everything here is pure string assembly. Retrieval happens in the caller;
//! these functions only receive the context text it produced.

use crate::model::persona::Persona;
use crate::model::turn::Turn;

/// Wrap a retrieved `context` and a `question` into a grounded query prompt.
///
/// An empty `context` still renders the template with an empty context
/// section; the model then answers without grounding.
pub fn grounded_query_prompt(context: &str, question: &str) -> String {
    format!(
        "\nUse the following context to answer the question.\n\n\
         Context:\n{context}\n\n\
         Question:\n{question}\n"
    )
}

/// Ask for three follow-up questions Agent A could put to Agent B.
///
/// # Arguments
///
/// * `topic` - the conversation seed
/// * `previous_query` - the most recent Agent A question
/// * `agent_b_response` - Agent B's answer to it
pub fn followup_prompt(topic: &str, previous_query: &str, agent_b_response: &str) -> String {
    format!(
        "\nYou are helping Agent A continue an intelligent and insightful conversation with Agent B.\n\n\
         The conversation so far:\n\n\
         Agent A asked:\n\"{previous_query}\"\n\n\
         Agent B responded:\n\"{agent_b_response}\"\n\n\
         The overall topic of discussion is:\n\"{topic}\"\n\n\
         Now, suggest 3 smart and contextually relevant follow-up questions that Agent A could ask \
         to keep the conversation flowing meaningfully.\n\n\
         Please provide only the 3 questions as a numbered list like this:\n\
         1. ...\n\
         2. ...\n\
         3. ...\n"
    )
}

fn strip_list_marker(line: &str) -> &str {
    let s = line.trim_start();
    let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let rest = &s[digits_end..];
    let s = if digits_end == 0 {
        s
    } else if rest.is_empty() {
        rest
    } else if rest.starts_with(|c: char| matches!(c, '.' | ')' | ':')) {
        &rest[1..]
    } else {
        s
    };
    s.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '*' | '•'))
        .trim()
}

/// Turn a raw follow-up completion into candidate questions.
///
/// Each non-blank line becomes one candidate after its leading numbering
/// (`1.`, `2)`, ...) or bullet marker and surrounding whitespace are stripped.
/// Lines that are empty after stripping are dropped. Never fails: unexpected
/// formatting simply yields whatever lines survive, possibly none.
pub fn parse_followups(raw: &str) -> Vec<String> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Render turns as `Speaker: message` lines.
pub fn format_transcript<'a, I>(turns: I) -> String
where
    I: IntoIterator<Item = &'a Turn>,
{
    turns
        .into_iter()
        .map(|t| format!("{}: {}", t.speaker.display_name(), t.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Short summary: three bullet points over the whole conversation.
pub fn short_summary_prompt(conversation: &str) -> String {
    format!(
        "\nSummarize the following conversation between Agent A and Agent B in 3 bullet points:\n\n\
         {conversation}\n"
    )
}

/// Long summary: recast the conversation as an FAQ, Agent A asking and Agent B answering.
pub fn long_summary_prompt(conversation: &str) -> String {
    format!(
        "\nConvert the following conversation between Agent A and Agent B into a detailed FAQ format. \
         Each question should be asked by Agent A and the corresponding answer should be from Agent B.\n\n\
         {conversation}\n"
    )
}

/// Frame an Agent A question with its persona, if any.
pub fn persona_query(persona: Option<Persona>, text: &str) -> String {
    match persona {
        Some(p) => format!("As a persona \"{}\", I would like to ask: {}", p, text),
        None => text.to_string(),
    }
}

/// Frame an Agent B answer with its persona, if any.
pub fn persona_response(persona: Option<Persona>, text: &str) -> String {
    match persona {
        Some(p) => format!("As a persona \"{}\", I would like to respond: {}", p, text),
        None => text.to_string(),
    }
}

/// Append the full document text to `text` as an inline context section.
///
/// Leaves `text` unchanged when `document` is empty.
pub fn with_document_context(text: &str, document: &str) -> String {
    if document.is_empty() {
        text.to_string()
    } else {
        format!("{}\n\nContext:\n{}", text, document)
    }
}
