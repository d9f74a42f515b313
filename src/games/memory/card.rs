//! Card types placed on the memory board.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One of the eight animal faces. Every board holds exactly two of each.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CardType {
    /// Cat card.
    Cat,
    /// Dog card.
    Dog,
    /// Horse card.
    Horse,
    /// Sheep card.
    Sheep,
    /// Cow card.
    Cow,
    /// Bird card.
    Bird,
    /// Pig card.
    Pig,
    /// Fish card.
    Fish,
}

impl CardType {
    /// All card types in declaration order.
    pub const ALL: [CardType; 8] = [
        CardType::Cat,
        CardType::Dog,
        CardType::Horse,
        CardType::Sheep,
        CardType::Cow,
        CardType::Bird,
        CardType::Pig,
        CardType::Fish,
    ];

    /// Returns the lowercase name used on the wire and in storage.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn eight_distinct_types() {
        let unique: HashSet<_> = CardType::iter().collect();
        assert_eq!(unique.len(), 8);
        assert_eq!(CardType::ALL.len(), 8);
    }

    #[test]
    fn names_are_lowercase_animals() {
        let names: Vec<_> = CardType::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            ["cat", "dog", "horse", "sheep", "cow", "bird", "pig", "fish"]
        );
        assert_eq!(CardType::from_str("horse").unwrap(), CardType::Horse);
        assert!(CardType::from_str("Horse").is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&CardType::Sheep).unwrap();
        assert_eq!(json, "\"sheep\"");
    }
}
