#[cfg(test)]
#[path = "persona_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

/// Static description of a persona. Defined at compile time and never
/// mutated.
#[derive(Debug, PartialEq, Eq)]
pub struct PersonaConfig {
    pub id: Persona,
    pub display_name: &'static str,
    pub description: &'static str,
    pub system_prompt: &'static str,
}

static ASSISTANT: PersonaConfig = PersonaConfig {
    id: Persona::Assistant,
    display_name: "Smart Assistant",
    description: "General purpose helpful AI assistant",
    system_prompt: "You are a helpful, clever, and highly intelligent AI assistant. Provide clear, concise, and accurate information. Be polite and professional.",
};

static PROGRAMMER: PersonaConfig = PersonaConfig {
    id: Persona::Programmer,
    display_name: "Dev Helper",
    description: "Expert coding and debugging companion",
    system_prompt: "You are an expert Senior Software Engineer. You write clean, efficient, and well-documented code. You prefer modern best practices, TypeScript, and functional patterns. Always explain your code logic.",
};

static BUSINESS: PersonaConfig = PersonaConfig {
    id: Persona::Business,
    display_name: "Business Advisor",
    description: "Strategic business and startup advice",
    system_prompt: "You are a seasoned Business Consultant and Entrepreneur. You provide strategic advice on startups, marketing, finance, and operations. Focus on ROI, scalability, and practical execution.",
};

static CREATOR: PersonaConfig = PersonaConfig {
    id: Persona::Creator,
    display_name: "Content Creator",
    description: "Creative writing and content strategy",
    system_prompt: "You are a creative content strategist and copywriter. You specialize in engaging, persuasive, and viral content. You understand SEO, hooks, and storytelling.",
};

#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    EnumVariantNames,
    strum::Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Persona {
    #[default]
    Assistant,
    Programmer,
    Business,
    Creator,
}

impl Persona {
    /// Case insensitive lookup by persona id, e.g. `programmer`.
    pub fn parse(text: &str) -> Option<Persona> {
        let text = text.trim();
        return Persona::iter().find(|e| return e.to_string().eq_ignore_ascii_case(text));
    }

    pub fn config(&self) -> &'static PersonaConfig {
        match self {
            Persona::Assistant => return &ASSISTANT,
            Persona::Programmer => return &PROGRAMMER,
            Persona::Business => return &BUSINESS,
            Persona::Creator => return &CREATOR,
        }
    }

    pub fn display_name(&self) -> &'static str {
        return self.config().display_name;
    }

    pub fn system_prompt(&self) -> &'static str {
        return self.config().system_prompt;
    }
}
