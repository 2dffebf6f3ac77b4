//! The closed catalog of rover movements.
//!
//! Each movement has a stable numeric id (the wire value sent to the
//! movement service), a canonical Spanish label, and a fixed spoken
//! confirmation phrase.

/// One of the 11 movements the rover understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    Forward,
    Backward,
    Stop,
    ForwardTurnRight,
    ForwardTurnLeft,
    BackwardTurnRight,
    BackwardTurnLeft,
    QuarterTurnRight,
    QuarterTurnLeft,
    FullTurnRight,
    FullTurnLeft,
}

/// All movements in wire-id order.
pub const ALL: [Movement; 11] = [
    Movement::Forward,
    Movement::Backward,
    Movement::Stop,
    Movement::ForwardTurnRight,
    Movement::ForwardTurnLeft,
    Movement::BackwardTurnRight,
    Movement::BackwardTurnLeft,
    Movement::QuarterTurnRight,
    Movement::QuarterTurnLeft,
    Movement::FullTurnRight,
    Movement::FullTurnLeft,
];

/// Generic spoken confirmation when no movement-specific phrase applies.
pub const FALLBACK_CONFIRMATION: &str = "Listo.";

impl Movement {
    /// Stable wire id in `[1, 11]`, as expected by the movement service.
    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Self::Forward => 1,
            Self::Backward => 2,
            Self::Stop => 3,
            Self::ForwardTurnRight => 4,
            Self::ForwardTurnLeft => 5,
            Self::BackwardTurnRight => 6,
            Self::BackwardTurnLeft => 7,
            Self::QuarterTurnRight => 8,
            Self::QuarterTurnLeft => 9,
            Self::FullTurnRight => 10,
            Self::FullTurnLeft => 11,
        }
    }

    /// Look up a movement by wire id. Returns `None` outside `[1, 11]`.
    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Forward),
            2 => Some(Self::Backward),
            3 => Some(Self::Stop),
            4 => Some(Self::ForwardTurnRight),
            5 => Some(Self::ForwardTurnLeft),
            6 => Some(Self::BackwardTurnRight),
            7 => Some(Self::BackwardTurnLeft),
            8 => Some(Self::QuarterTurnRight),
            9 => Some(Self::QuarterTurnLeft),
            10 => Some(Self::FullTurnRight),
            11 => Some(Self::FullTurnLeft),
            _ => None,
        }
    }

    /// Canonical Spanish label for displays and history rows.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Forward => "Adelante",
            Self::Backward => "Atrás",
            Self::Stop => "Detener",
            Self::ForwardTurnRight => "Vuelta adelante derecha",
            Self::ForwardTurnLeft => "Vuelta adelante izquierda",
            Self::BackwardTurnRight => "Vuelta atrás derecha",
            Self::BackwardTurnLeft => "Vuelta atrás izquierda",
            Self::QuarterTurnRight => "Giro 90° derecha",
            Self::QuarterTurnLeft => "Giro 90° izquierda",
            Self::FullTurnRight => "Giro 360° derecha",
            Self::FullTurnLeft => "Giro 360° izquierda",
        }
    }

    /// Fixed spoken confirmation phrase for this movement.
    #[must_use]
    pub fn confirmation(self) -> &'static str {
        match self {
            Self::Forward => "Avanzando.",
            Self::Backward => "Retrocediendo.",
            Self::Stop => "Deteniendo.",
            Self::ForwardTurnRight => "Adelante con giro a la derecha.",
            Self::ForwardTurnLeft => "Adelante con giro a la izquierda.",
            Self::BackwardTurnRight => "Atrás con giro a la derecha.",
            Self::BackwardTurnLeft => "Atrás con giro a la izquierda.",
            Self::QuarterTurnRight => "Giro noventa grados a la derecha.",
            Self::QuarterTurnLeft => "Giro noventa grados a la izquierda.",
            Self::FullTurnRight => "Giro completo a la derecha.",
            Self::FullTurnLeft => "Giro completo a la izquierda.",
        }
    }
}

impl std::fmt::Display for Movement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} — {}", self.id(), self.label())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn ids_are_stable_and_cover_one_through_eleven() {
        for (i, movement) in ALL.iter().enumerate() {
            assert_eq!(movement.id() as usize, i + 1);
        }
    }

    #[test]
    fn from_id_round_trips_every_movement() {
        for movement in ALL {
            assert_eq!(Movement::from_id(movement.id()), Some(movement));
        }
    }

    #[test]
    fn from_id_rejects_out_of_range() {
        assert_eq!(Movement::from_id(0), None);
        assert_eq!(Movement::from_id(12), None);
        assert_eq!(Movement::from_id(255), None);
    }

    #[test]
    fn every_movement_has_a_distinct_label_and_confirmation() {
        let labels: std::collections::HashSet<_> = ALL.iter().map(|m| m.label()).collect();
        assert_eq!(labels.len(), ALL.len());
        let phrases: std::collections::HashSet<_> =
            ALL.iter().map(|m| m.confirmation()).collect();
        assert_eq!(phrases.len(), ALL.len());
    }

    #[test]
    fn display_shows_id_and_label() {
        assert_eq!(Movement::ForwardTurnRight.to_string(), "4 — Vuelta adelante derecha");
    }
}
