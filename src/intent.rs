//! Transcript-to-intent classification.
//!
//! An ordered list of declarative predicate rules over normalized text.
//! The first matching rule wins; the phrase sets overlap, so the order is
//! part of the contract. Classification never fails: unmatched input
//! falls back to [`Movement::Stop`] so a garbled command cannot produce
//! unintended motion.

use crate::movement::Movement;

/// Stop synonyms. Checked before everything else so "detener y avanza"
/// still stops the rover.
const STOP_WORDS: &[&str] = &["detener", "para", "alto", "stop"];

/// Bare forward-motion synonyms.
const FORWARD_WORDS: &[&str] = &["adelante", "avanza", "frente"];

/// Bare backward-motion synonyms.
const BACKWARD_WORDS: &[&str] = &["atras", "retrocede", "reversa", "regresa"];

/// Full-turn magnitude tokens ("vuelta completa" is matched as a phrase).
const FULL_TURN_WORDS: &[&str] = &["360", "completo"];

/// Quarter-turn magnitude tokens.
const QUARTER_TURN_WORDS: &[&str] = &["90", "noventa"];

/// The literal word required by the combined motion-with-turn rules.
const TURN_WORD: &str = "vuelta";

/// Turn direction, matched by word prefix to tolerate transcription
/// variance ("derecha"/"derecho", "izquierda"/"izquierdo").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Right,
    Left,
}

/// Tokenized view of one normalized utterance.
struct Phrase<'a> {
    words: Vec<&'a str>,
}

impl<'a> Phrase<'a> {
    fn new(normalized: &'a str) -> Self {
        Self {
            words: normalized.split_whitespace().collect(),
        }
    }

    /// Whether any of `tokens` appears as a whole word.
    fn has_any_word(&self, tokens: &[&str]) -> bool {
        self.words.iter().any(|w| tokens.contains(w))
    }

    fn has_word(&self, token: &str) -> bool {
        self.words.iter().any(|w| *w == token)
    }

    fn has_direction(&self, direction: Direction) -> bool {
        let prefix = match direction {
            Direction::Right => "derech",
            Direction::Left => "izquier",
        };
        self.words.iter().any(|w| w.starts_with(prefix))
    }

    /// Two whole words in immediate succession.
    fn has_phrase(&self, first: &str, second: &str) -> bool {
        self.words
            .windows(2)
            .any(|pair| pair[0] == first && pair[1] == second)
    }

    /// Full-turn magnitude: "360", "completo", or the phrase
    /// "vuelta completa".
    fn has_full_turn_magnitude(&self) -> bool {
        self.has_any_word(FULL_TURN_WORDS) || self.has_phrase(TURN_WORD, "completa")
    }

    fn has_quarter_turn_magnitude(&self) -> bool {
        self.has_any_word(QUARTER_TURN_WORDS)
    }

    /// Whether the utterance names a combined motion-with-turn: a
    /// direction token plus the literal word "vuelta". Bare forward and
    /// backward rules yield when this holds so the combined rules further
    /// down can fire.
    fn names_combined_turn(&self) -> bool {
        self.has_word(TURN_WORD)
            && (self.has_direction(Direction::Right) || self.has_direction(Direction::Left))
    }
}

/// One classification rule: first `when` that holds selects `movement`.
struct Rule {
    when: fn(&Phrase<'_>) -> bool,
    movement: Movement,
}

/// Priority-ordered rule table. Stop first, bare motion next (guarded so
/// combined phrases fall through), then turns by magnitude, then the
/// combined motion-with-turn rules.
const RULES: &[Rule] = &[
    Rule {
        when: |p| p.has_any_word(STOP_WORDS),
        movement: Movement::Stop,
    },
    Rule {
        when: |p| p.has_any_word(FORWARD_WORDS) && !p.names_combined_turn(),
        movement: Movement::Forward,
    },
    Rule {
        when: |p| p.has_any_word(BACKWARD_WORDS) && !p.names_combined_turn(),
        movement: Movement::Backward,
    },
    Rule {
        when: |p| p.has_full_turn_magnitude() && p.has_direction(Direction::Right),
        movement: Movement::FullTurnRight,
    },
    Rule {
        when: |p| p.has_full_turn_magnitude() && p.has_direction(Direction::Left),
        movement: Movement::FullTurnLeft,
    },
    Rule {
        when: |p| p.has_quarter_turn_magnitude() && p.has_direction(Direction::Right),
        movement: Movement::QuarterTurnRight,
    },
    Rule {
        when: |p| p.has_quarter_turn_magnitude() && p.has_direction(Direction::Left),
        movement: Movement::QuarterTurnLeft,
    },
    Rule {
        when: |p| {
            p.has_any_word(FORWARD_WORDS)
                && p.has_direction(Direction::Right)
                && p.has_word(TURN_WORD)
        },
        movement: Movement::ForwardTurnRight,
    },
    Rule {
        when: |p| {
            p.has_any_word(FORWARD_WORDS)
                && p.has_direction(Direction::Left)
                && p.has_word(TURN_WORD)
        },
        movement: Movement::ForwardTurnLeft,
    },
    Rule {
        when: |p| {
            p.has_any_word(BACKWARD_WORDS)
                && p.has_direction(Direction::Right)
                && p.has_word(TURN_WORD)
        },
        movement: Movement::BackwardTurnRight,
    },
    Rule {
        when: |p| {
            p.has_any_word(BACKWARD_WORDS)
                && p.has_direction(Direction::Left)
                && p.has_word(TURN_WORD)
        },
        movement: Movement::BackwardTurnLeft,
    },
];

/// Classify normalized text into a movement.
///
/// Input must already be normalized (see [`crate::normalize::normalize`]).
/// Always returns a movement; unmatched input stops the rover.
#[must_use]
pub fn classify(normalized: &str) -> Movement {
    let phrase = Phrase::new(normalized);
    RULES
        .iter()
        .find(|rule| (rule.when)(&phrase))
        .map_or(Movement::Stop, |rule| rule.movement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    fn classify_raw(raw: &str) -> Movement {
        classify(&normalize(raw))
    }

    #[test]
    fn stop_synonyms_classify_as_stop() {
        for text in ["detener", "para ya", "alto", "stop"] {
            assert_eq!(classify_raw(text), Movement::Stop, "input: {text}");
        }
    }

    #[test]
    fn stop_wins_over_forward() {
        assert_eq!(classify_raw("detener y avanza"), Movement::Stop);
    }

    #[test]
    fn bare_motion_words() {
        assert_eq!(classify_raw("adelante"), Movement::Forward);
        assert_eq!(classify_raw("avanza al frente"), Movement::Forward);
        assert_eq!(classify_raw("atrás"), Movement::Backward);
        assert_eq!(classify_raw("retrocede"), Movement::Backward);
    }

    #[test]
    fn combined_forward_turn_beats_bare_forward() {
        assert_eq!(
            classify_raw("adelante vuelta a la derecha"),
            Movement::ForwardTurnRight
        );
        assert_eq!(
            classify_raw("vuelta adelante izquierda"),
            Movement::ForwardTurnLeft
        );
    }

    #[test]
    fn combined_backward_turn_beats_bare_backward() {
        assert_eq!(
            classify_raw("atras vuelta a la izquierda"),
            Movement::BackwardTurnLeft
        );
        assert_eq!(
            classify_raw("vuelta atrás derecha"),
            Movement::BackwardTurnRight
        );
    }

    #[test]
    fn combined_rules_require_the_word_vuelta() {
        // Without "vuelta" the direction token alone does not turn a bare
        // motion command into a turning movement.
        assert_eq!(classify_raw("adelante a la derecha"), Movement::Forward);
        assert_eq!(classify_raw("atras a la izquierda"), Movement::Backward);
    }

    #[test]
    fn quarter_turns_match_magnitude_and_direction_in_any_order() {
        assert_eq!(
            classify_raw("gira noventa grados a la izquierda"),
            Movement::QuarterTurnLeft
        );
        assert_eq!(
            classify_raw("a la izquierda gira noventa"),
            Movement::QuarterTurnLeft
        );
        assert_eq!(classify_raw("giro 90 derecha"), Movement::QuarterTurnRight);
    }

    #[test]
    fn full_turns_match_360_completo_and_vuelta_completa() {
        assert_eq!(classify_raw("giro 360 derecha"), Movement::FullTurnRight);
        assert_eq!(
            classify_raw("giro completo a la izquierda"),
            Movement::FullTurnLeft
        );
        assert_eq!(
            classify_raw("vuelta completa a la derecha"),
            Movement::FullTurnRight
        );
    }

    #[test]
    fn vuelta_completa_requires_adjacent_whole_words() {
        // Runs of the letters inside a longer word are not the phrase.
        assert_eq!(
            classify_raw("lavuelta completa a la derecha"),
            Movement::Stop
        );
        assert_eq!(
            classify_raw("da una vuelta completa derecha"),
            Movement::FullTurnRight
        );
    }

    #[test]
    fn full_turn_wins_over_quarter_when_both_magnitudes_present() {
        // Table order: full-turn rules precede quarter-turn rules.
        assert_eq!(
            classify_raw("giro 360 y no 90 a la derecha"),
            Movement::FullTurnRight
        );
    }

    #[test]
    fn direction_prefix_tolerates_gender_variants() {
        assert_eq!(classify_raw("giro 90 derecho"), Movement::QuarterTurnRight);
        assert_eq!(classify_raw("giro 90 izquierdo"), Movement::QuarterTurnLeft);
    }

    #[test]
    fn unmatched_input_defaults_to_stop() {
        for text in ["", "hola rover", "canta una cancion", "derecha"] {
            assert_eq!(classify_raw(text), Movement::Stop, "input: {text}");
        }
    }

    #[test]
    fn every_result_is_one_of_the_eleven_movements() {
        for text in [
            "adelante",
            "atras",
            "detener",
            "vuelta adelante derecha",
            "vuelta atras izquierda",
            "giro 90 izquierda",
            "giro 360 derecha",
            "sin sentido alguno",
        ] {
            let movement = classify_raw(text);
            assert!(crate::movement::ALL.contains(&movement), "input: {text}");
        }
    }
}
