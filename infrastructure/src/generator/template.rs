//! Offline persona-styled response generator
//!
//! Produces short, deterministic replies from the persona profile and the
//! latest turn, so a forum can run end to end without any network access.
//! The same request always yields the same response.

use super::prompt::capitalize;
use async_trait::async_trait;
use forum_application::{GeneratedResponse, GenerationError, GenerationRequest, ResponseGenerator};
use forum_domain::{ForumMode, PersonaProfile, Speaker, TraitWeights, Turn};
use std::collections::HashSet;

/// Concepts a philosopher can seize on in someone else's words
const PHILOSOPHICAL_TERMS: &[&str] = &[
    "truth",
    "knowledge",
    "wisdom",
    "justice",
    "virtue",
    "good",
    "evil",
    "beauty",
    "reality",
    "existence",
    "soul",
    "mind",
    "consciousness",
    "morality",
    "ethics",
    "courage",
    "temperance",
    "love",
    "friendship",
    "happiness",
    "pleasure",
    "pain",
    "death",
    "life",
    "god",
    "freedom",
    "duty",
    "power",
    "harmony",
    "reason",
];

const MAX_CONCEPTS: usize = 3;

/// Curiosity at or above this makes the persona close with a question
const QUESTION_CURIOSITY: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Temperament {
    Inquisitive,
    Forceful,
    Measured,
    Conciliatory,
}

impl Temperament {
    /// Strongest trait wins; ties go to the earlier trait
    fn of(traits: &TraitWeights) -> Self {
        let ranked = [
            (Temperament::Inquisitive, traits.curiosity),
            (Temperament::Forceful, traits.assertiveness),
            (Temperament::Measured, traits.patience),
            (Temperament::Conciliatory, traits.agreeableness),
        ];
        let mut best = ranked[0];
        for candidate in &ranked[1..] {
            if candidate.1 > best.1 {
                best = *candidate;
            }
        }
        best.0
    }

    fn openings(&self) -> &'static [&'static str] {
        match self {
            Temperament::Inquisitive => &[
                "You speak of {concept}, {speaker}, and I confess I do not yet know what it is.",
                "Before we go further, {speaker}, we should examine what {concept} really means.",
                "An interesting claim about {concept}, {speaker}. I would like to see its foundations.",
            ],
            Temperament::Forceful => &[
                "Let me be plain, {speaker}: {concept} is not what you take it to be.",
                "{speaker} circles around {concept} without daring to name it.",
                "On {concept} I will not hedge, {speaker}.",
            ],
            Temperament::Measured => &[
                "{speaker} raises {concept}, and it deserves a patient answer.",
                "Let us consider {concept} slowly, {speaker}, as one tends a garden.",
                "There is more to {concept} than a single remark can hold, {speaker}.",
            ],
            Temperament::Conciliatory => &[
                "I hear much that is right in what {speaker} says about {concept}.",
                "{speaker} and I may be closer on {concept} than it first appears.",
                "There is common ground to be found in {concept}, {speaker}.",
            ],
        }
    }
}

fn mode_lines(mode: ForumMode) -> &'static [&'static str] {
    match mode {
        ForumMode::Debate => &[
            "Yet I cannot let it pass without defending {position}.",
            "Against this I set {position}, and I will hold that line.",
        ],
        ForumMode::Consensus => &[
            "Perhaps {position} offers us a place to agree.",
            "If we start from {position}, our views need not collide.",
        ],
        ForumMode::Exploration => &[
            "It leads me to wonder how {position} bears on all of this.",
            "Let us follow the thread to {position} and see where it goes.",
        ],
    }
}

const QUESTIONS: &[&str] = &[
    "But tell me, how would we know {concept} if we met it?",
    "What would follow if the opposite were true of {concept}?",
    "Can any of us say what {concept} is without first saying what it is not?",
];

fn pick<'a>(options: &'a [&'a str], seed: u64) -> &'a str {
    options[(seed % options.len() as u64) as usize]
}

fn fill(template: &str, speaker: &str, concept: &str, position: &str) -> String {
    template
        .replace("{speaker}", speaker)
        .replace("{concept}", concept)
        .replace("{position}", position)
}

/// Up to three concepts mentioned in `text`: shared philosophical terms
/// first, then the persona's own affinity keywords.
fn key_concepts(text: &str, persona: &PersonaProfile) -> Vec<String> {
    let words: HashSet<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();

    let mut concepts: Vec<String> = PHILOSOPHICAL_TERMS
        .iter()
        .filter(|term| words.contains(**term))
        .map(|term| term.to_string())
        .collect();
    for keyword in persona.affinity_keywords().into_iter().flatten() {
        if words.contains(&keyword) && !concepts.contains(&keyword) {
            concepts.push(keyword);
        }
    }
    concepts.truncate(MAX_CONCEPTS);
    concepts
}

fn favourite_topic(persona: &PersonaProfile) -> String {
    persona
        .affinity_tags
        .first()
        .map(|tag| tag.replace('_', " "))
        .unwrap_or_else(|| "the examined life".to_string())
}

/// Deterministic per persona, round and conversation position
fn seed(request: &GenerationRequest) -> u64 {
    let base = u64::from(request.round) * 31
        + request.context.latest().map(|t| t.sequence).unwrap_or(0);
    request
        .persona
        .id
        .as_str()
        .bytes()
        .fold(base, |acc, b| acc.wrapping_mul(131).wrapping_add(u64::from(b)))
}

/// Most recent turn by someone else, or the latest turn if there is none
fn prompting_turn<'a>(turns: &'a [Turn], persona: &PersonaProfile) -> Option<&'a Turn> {
    turns
        .iter()
        .rev()
        .find(|t| !t.is_from(&persona.id))
        .or_else(|| turns.last())
}

fn speaker_label(turn: &Turn, persona: &PersonaProfile) -> String {
    match &turn.speaker {
        Speaker::Human => "my friend".to_string(),
        Speaker::Persona(id) if *id == persona.id => "my earlier self".to_string(),
        Speaker::Persona(id) => capitalize(id.as_str()),
        Speaker::System => "the moderator".to_string(),
    }
}

/// Response generator that needs no model
pub struct TemplateResponseGenerator {
    name: String,
}

impl TemplateResponseGenerator {
    pub fn new() -> Self {
        Self {
            name: "template".to_string(),
        }
    }

    fn introduce(&self, persona: &PersonaProfile, seed: u64) -> GeneratedResponse {
        let topic = favourite_topic(persona);
        let mut content = format!("I am {}.", persona.name);
        if !persona.description.is_empty() {
            content.push(' ');
            content.push_str(&persona.description);
            content.push('.');
        }
        content.push_str(&format!(" Let us begin with {}.", topic));
        if persona.traits.curiosity >= QUESTION_CURIOSITY {
            content.push(' ');
            content.push_str(&fill(pick(QUESTIONS, seed), "", &topic, ""));
        }
        GeneratedResponse::new(content).with_thinking(format!(
            "Opening the forum; {} is where I feel most at home.",
            topic
        ))
    }

    fn respond(&self, request: &GenerationRequest, turn: &Turn, seed: u64) -> GeneratedResponse {
        let persona = &request.persona;
        let speaker = speaker_label(turn, persona);
        let concepts = key_concepts(&turn.content, persona);
        let concept = concepts
            .first()
            .cloned()
            .unwrap_or_else(|| favourite_topic(persona));
        let position = if persona.position_terms.is_empty() {
            favourite_topic(persona)
        } else {
            persona.position_terms[(seed % persona.position_terms.len() as u64) as usize].clone()
        };

        let mut sentences = vec![
            fill(
                pick(Temperament::of(&persona.traits).openings(), seed),
                &speaker,
                &concept,
                &position,
            ),
            fill(pick(mode_lines(request.mode), seed / 3), &speaker, &concept, &position),
        ];
        if persona.traits.curiosity >= QUESTION_CURIOSITY {
            sentences.push(fill(pick(QUESTIONS, seed / 7), &speaker, &concept, &position));
        }

        let mut thinking = if concepts.is_empty() {
            format!("Nothing {} said names a concept outright; I will steer towards {}.", speaker, concept)
        } else {
            format!("{} touched on {}.", speaker, concepts.join(", "))
        };
        thinking.push_str(&format!(
            " I answer from {}, in a {} forum.",
            position,
            request.mode.as_str()
        ));
        if let Some(memory) = &request.context.memory {
            thinking.push_str(&format!(" Recalling {}.", memory.as_str()));
        }

        GeneratedResponse::new(capitalize(&sentences.join(" "))).with_thinking(thinking)
    }
}

impl Default for TemplateResponseGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseGenerator for TemplateResponseGenerator {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GeneratedResponse, GenerationError> {
        let seed = seed(&request);
        let response = match prompting_turn(&request.context.turns, &request.persona) {
            Some(turn) => self.respond(&request, turn, seed),
            None => self.introduce(&request.persona, seed),
        };
        Ok(response)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
