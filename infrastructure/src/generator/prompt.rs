//! Prompt construction for chat-completion backends.

use forum_application::GenerationRequest;
use forum_domain::{ForumMode, PersonaProfile, Speaker, Turn};
use std::fmt::Write;

/// System prompt describing who the persona is and how to behave
pub fn system_prompt(persona: &PersonaProfile, mode: ForumMode) -> String {
    let mut prompt = format!("You are {}, taking part in a philosophical forum.\n", persona.name);
    if !persona.description.is_empty() {
        let _ = writeln!(prompt, "{}", persona.description);
    }
    if !persona.affinity_tags.is_empty() {
        let _ = writeln!(
            prompt,
            "\nTopics you care about: {}",
            persona.affinity_tags.join(", ").replace('_', " ")
        );
    }
    if !persona.position_terms.is_empty() {
        let _ = writeln!(
            prompt,
            "Ideas you are known to defend: {}",
            persona.position_terms.join(", ")
        );
    }
    let traits = &persona.traits;
    let _ = writeln!(
        prompt,
        "Temperament (0-1): curiosity {:.1}, assertiveness {:.1}, patience {:.1}, agreeableness {:.1}",
        traits.curiosity, traits.assertiveness, traits.patience, traits.agreeableness
    );
    let _ = writeln!(prompt, "\n{}", mode_instruction(mode));
    prompt.push_str(
        "Speak in the first person as yourself, engage with what others just said, \
         and keep to two to four sentences.",
    );
    prompt
}

fn mode_instruction(mode: ForumMode) -> &'static str {
    match mode {
        ForumMode::Consensus => {
            "The forum is seeking consensus: build on points of agreement and narrow differences."
        }
        ForumMode::Debate => {
            "The forum is a debate: challenge positions you disagree with and defend your own."
        }
        ForumMode::Exploration => {
            "The forum is an open exploration: follow interesting threads and raise new questions."
        }
    }
}

/// User prompt carrying the recent conversation
pub fn conversation_prompt(request: &GenerationRequest) -> String {
    let name = &request.persona.name;
    if request.context.turns.is_empty() {
        return format!(
            "The discussion is just beginning. Introduce yourself as {} and offer an opening thought.",
            name
        );
    }

    let mut prompt = String::from("Here is the recent conversation:\n\n");
    for turn in &request.context.turns {
        let _ = writeln!(prompt, "{}: {}\n", speaker_label(turn, &request.persona), turn.content);
    }
    if let Some(memory) = &request.context.memory {
        let _ = writeln!(prompt, "Your notes from earlier discussions: {}\n", memory.as_str());
    }
    let _ = write!(prompt, "Now respond as {}.", name);
    prompt
}

fn speaker_label(turn: &Turn, persona: &PersonaProfile) -> String {
    match &turn.speaker {
        Speaker::Human => "Human".to_string(),
        Speaker::Persona(id) if *id == persona.id => format!("{} (you)", persona.name),
        Speaker::Persona(id) => capitalize(id.as_str()),
        Speaker::System => "System".to_string(),
    }
}

/// `"aristotle"` → `"Aristotle"`
pub(crate) fn capitalize(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
