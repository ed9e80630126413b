//! Persona registry — static persona data with public lookup API.

use crate::types::Persona;

/// Greeting used for any persona name without a dedicated entry.
pub const DEFAULT_GREETING: &str = "Hi! How can I help you today?";

struct PersonaEntry {
    id: &'static str,
    name: &'static str,
    description: &'static str,
}

const PERSONA_ENTRIES: &[PersonaEntry] = &[
    PersonaEntry {
        id: "692fff4255706e8287914db6",
        name: "Support Agent",
        description: "General-purpose assistant for everyday questions",
    },
    PersonaEntry {
        id: "6930a1e87c4d2f5a91b3c0d4",
        name: "Sales Agent",
        description: "Helps compare plans and pricing",
    },
    PersonaEntry {
        id: "6930a2517c4d2f5a91b3c0d5",
        name: "Gaming Agent",
        description: "Game recommendations, guides, and trivia",
    },
];

impl PersonaEntry {
    fn to_persona(&self) -> Persona {
        Persona {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            greeting: greeting_for(self.name).to_string(),
        }
    }
}

/// Get all registered personas in their stable display order.
pub fn list_personas() -> Vec<Persona> {
    PERSONA_ENTRIES.iter().map(|e| e.to_persona()).collect()
}

/// The persona a fresh session starts with (first in the list).
pub fn default_persona() -> Persona {
    PERSONA_ENTRIES[0].to_persona()
}

/// Look up a persona by its opaque id.
pub fn get_persona(id: &str) -> Option<Persona> {
    PERSONA_ENTRIES
        .iter()
        .find(|e| e.id == id)
        .map(|e| e.to_persona())
}

/// Greeting for a persona name.
///
/// Unknown names never fail; they degrade to [`DEFAULT_GREETING`].
pub fn greeting_for(name: &str) -> &'static str {
    match name {
        "Support Agent" => "Hi! How can I help you today?",
        "Sales Agent" => "Welcome! Looking for the right plan? I'm happy to help.",
        "Gaming Agent" => "Hey there, player! What are we talking about today?",
        _ => DEFAULT_GREETING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_ids_and_names_unique() {
        let personas = list_personas();
        for (i, a) in personas.iter().enumerate() {
            for b in personas.iter().skip(i + 1) {
                assert_ne!(a.id, b.id);
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_default_is_first() {
        assert_eq!(default_persona(), list_personas()[0]);
    }

    #[test]
    fn test_order_is_stable() {
        let names: Vec<_> = list_personas().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["Support Agent", "Sales Agent", "Gaming Agent"]);
    }

    #[test]
    fn test_lookup_by_id() {
        let persona = get_persona("692fff4255706e8287914db6").unwrap();
        assert_eq!(persona.name, "Support Agent");
        assert!(get_persona("no-such-id").is_none());
    }

    #[test]
    fn test_greeting_matches_name() {
        for persona in list_personas() {
            assert_eq!(persona.greeting, greeting_for(&persona.name));
        }
    }

    #[test]
    fn test_unknown_name_degrades_to_default() {
        assert_eq!(greeting_for("Mystery Agent"), DEFAULT_GREETING);
        assert_eq!(greeting_for(""), DEFAULT_GREETING);
    }
}
