//! Enumerated fields stored by their string code.
//!
//! Every enum serializes as its stored code (`"MALE"`, `"POSITIVE"`), never a
//! display label. Columns hold the code as TEXT guarded by a CHECK constraint,
//! so rows carry plain `String`s and writes are checked with [`parse`](Gender::parse).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

macro_rules! define_code_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $code)] $variant ),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The stored string code.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $code ),+
                }
            }

            /// Parse a stored code, rejecting anything outside the enum.
            pub fn parse(code: &str) -> Result<Self, CoreError> {
                match code {
                    $( $code => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "\"{other}\" is not a valid {}. Must be one of: {}",
                        $label,
                        [$($code),+].join(", ")
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_code_enum! {
    /// Character gender. The column also accepts the blank code `""`.
    Gender ("gender") {
        Male = "MALE",
        Female = "FEMALE",
    }
}

define_code_enum! {
    /// Direction of a character arc.
    ArcType ("arc type") {
        Positive = "POSITIVE",
        Negative = "NEGATIVE",
        Flat = "FLAT",
    }
}

define_code_enum! {
    /// One facet of a directed relationship between two characters.
    RelationshipType ("relationship type") {
        Friend = "FRIEND",
        Enemy = "ENEMY",
        Mentor = "MENTOR",
        Lover = "LOVER",
        Family = "FAMILY",
    }
}

define_code_enum! {
    /// Category of a loose writing idea.
    IdeaType ("idea type") {
        Character = "CHARACTER",
        Place = "PLACE",
        Item = "ITEM",
        Scene = "SCENE",
        Conflict = "CONFLICT",
        Dialogue = "DIALOGUE",
        Concept = "CONCEPT",
        WorldDetail = "WORLD_DETAIL",
        PlotTwist = "PLOT_TWIST",
    }
}

/// Blank gender code accepted alongside [`Gender`] values.
pub const GENDER_UNSPECIFIED: &str = "";

/// Default arc direction for new arcs.
pub const DEFAULT_ARC_TYPE: ArcType = ArcType::Positive;

/// Default category for new ideas.
pub const DEFAULT_IDEA_TYPE: IdeaType = IdeaType::Concept;

/// Validate a gender code, allowing the blank code.
pub fn parse_gender(code: &str) -> Result<Option<Gender>, CoreError> {
    if code == GENDER_UNSPECIFIED {
        return Ok(None);
    }
    Gender::parse(code).map(Some)
}

/// Validate every element of a relationship `types` list.
///
/// Order and duplicates are preserved; the list is a sequence, not a set.
pub fn parse_relationship_types(codes: &[String]) -> Result<Vec<RelationshipType>, CoreError> {
    codes.iter().map(|c| RelationshipType::parse(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn codes_round_trip_through_parse() {
        for arc in ArcType::ALL {
            assert_eq!(ArcType::parse(arc.as_str()).unwrap(), *arc);
        }
        for idea in IdeaType::ALL {
            assert_eq!(IdeaType::parse(idea.as_str()).unwrap(), *idea);
        }
    }

    #[test]
    fn display_labels_are_not_codes() {
        assert_matches!(Gender::parse("Male"), Err(CoreError::Validation(_)));
        assert_matches!(IdeaType::parse("World detail"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn invalid_code_lists_allowed_values() {
        let err = ArcType::parse("SIDEWAYS").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("SIDEWAYS"));
        assert!(msg.contains("POSITIVE, NEGATIVE, FLAT"));
    }

    #[test]
    fn blank_gender_is_unspecified() {
        assert_eq!(parse_gender("").unwrap(), None);
        assert_eq!(parse_gender("FEMALE").unwrap(), Some(Gender::Female));
        assert!(parse_gender("OTHER").is_err());
    }

    #[test]
    fn relationship_types_keep_order_and_duplicates() {
        let codes = vec!["LOVER".to_string(), "ENEMY".to_string(), "LOVER".to_string()];
        let parsed = parse_relationship_types(&codes).unwrap();
        assert_eq!(
            parsed,
            vec![RelationshipType::Lover, RelationshipType::Enemy, RelationshipType::Lover]
        );
    }

    #[test]
    fn relationship_types_reject_unknown_element() {
        let codes = vec!["FRIEND".to_string(), "RIVAL".to_string()];
        assert_matches!(parse_relationship_types(&codes), Err(CoreError::Validation(msg)) if msg.contains("RIVAL"));
    }

    #[test]
    fn enums_serialize_as_codes() {
        let json = serde_json::to_string(&IdeaType::PlotTwist).unwrap();
        assert_eq!(json, "\"PLOT_TWIST\"");
    }
}
