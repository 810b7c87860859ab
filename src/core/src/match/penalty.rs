use rand::Rng;
use rand::RngExt;
use serde::{Deserialize, Serialize};

/// Chance that the kick goes wild regardless of where the goalkeeper dives.
pub const KICK_ERROR_PROBABILITY: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalZone {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalZone {
    Top,
    Low,
}

/// One of the six goal zones a kick or dive can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyDirection {
    LeftTop,
    LeftLow,
    CenterTop,
    CenterLow,
    RightTop,
    RightLow,
}

impl PenaltyDirection {
    pub const ALL: [PenaltyDirection; 6] = [
        PenaltyDirection::LeftTop,
        PenaltyDirection::LeftLow,
        PenaltyDirection::CenterTop,
        PenaltyDirection::CenterLow,
        PenaltyDirection::RightTop,
        PenaltyDirection::RightLow,
    ];

    pub fn horizontal(&self) -> HorizontalZone {
        match self {
            PenaltyDirection::LeftTop | PenaltyDirection::LeftLow => HorizontalZone::Left,
            PenaltyDirection::CenterTop | PenaltyDirection::CenterLow => HorizontalZone::Center,
            PenaltyDirection::RightTop | PenaltyDirection::RightLow => HorizontalZone::Right,
        }
    }

    pub fn vertical(&self) -> VerticalZone {
        match self {
            PenaltyDirection::LeftTop
            | PenaltyDirection::CenterTop
            | PenaltyDirection::RightTop => VerticalZone::Top,
            PenaltyDirection::LeftLow
            | PenaltyDirection::CenterLow
            | PenaltyDirection::RightLow => VerticalZone::Low,
        }
    }

    pub fn random(rng: &mut impl Rng) -> PenaltyDirection {
        PenaltyDirection::ALL[rng.random_range(0..PenaltyDirection::ALL.len())]
    }
}

/// A fully resolved penalty kick. The kicker and goalkeeper are stored as
/// player-role placeholders; the outcome is derived at construction and
/// never both a goal and a miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Penalty {
    pub kicker: String,
    pub goalkeeper: String,
    pub kick_direction: PenaltyDirection,
    pub dive_direction: PenaltyDirection,
    is_goal: bool,
    is_out: bool,
}

impl Penalty {
    /// Binds a kicker and goalkeeper to a pair of directions and resolves
    /// the kick immediately.
    pub fn kicked(
        kicker: impl Into<String>,
        goalkeeper: impl Into<String>,
        kick_direction: PenaltyDirection,
        dive_direction: PenaltyDirection,
        rng: &mut impl Rng,
    ) -> Penalty {
        let (is_goal, is_out) = resolve_kick(kick_direction, dive_direction, rng);

        Penalty {
            kicker: kicker.into(),
            goalkeeper: goalkeeper.into(),
            kick_direction,
            dive_direction,
            is_goal,
            is_out,
        }
    }

    /// Draws both directions uniformly, for non-interactive play.
    pub fn auto(
        kicker: impl Into<String>,
        goalkeeper: impl Into<String>,
        rng: &mut impl Rng,
    ) -> Penalty {
        let kick_direction = PenaltyDirection::random(rng);
        let dive_direction = PenaltyDirection::random(rng);
        Penalty::kicked(kicker, goalkeeper, kick_direction, dive_direction, rng)
    }

    pub(crate) fn resolved(
        kicker: impl Into<String>,
        goalkeeper: impl Into<String>,
        kick_direction: PenaltyDirection,
        dive_direction: PenaltyDirection,
        is_goal: bool,
        is_out: bool,
    ) -> Penalty {
        debug_assert!(!(is_goal && is_out));
        Penalty {
            kicker: kicker.into(),
            goalkeeper: goalkeeper.into(),
            kick_direction,
            dive_direction,
            is_goal,
            is_out,
        }
    }

    pub fn is_goal(&self) -> bool {
        self.is_goal
    }

    pub fn is_out(&self) -> bool {
        self.is_out
    }

    pub fn is_saved(&self) -> bool {
        !self.is_goal && !self.is_out
    }
}

/// Draws the random parts of a kick and resolves it. Returns
/// `(is_goal, is_out)`.
pub fn resolve_kick(
    kick_direction: PenaltyDirection,
    dive_direction: PenaltyDirection,
    rng: &mut impl Rng,
) -> (bool, bool) {
    let wild_kick = rng.random::<f64>() < KICK_ERROR_PROBABILITY;
    let coin_is_goal = rng.random::<f64>() < 0.5;
    zone_outcome(kick_direction, dive_direction, wild_kick, coin_is_goal)
}

/// The deterministic outcome table. A wild kick is always out; a matched
/// dive is a save; a crossed horizontal zone is a goal; the right side at
/// the wrong height comes down to the coin.
fn zone_outcome(
    kick_direction: PenaltyDirection,
    dive_direction: PenaltyDirection,
    wild_kick: bool,
    coin_is_goal: bool,
) -> (bool, bool) {
    if wild_kick {
        return (false, true);
    }

    if kick_direction == dive_direction {
        return (false, false);
    }

    if kick_direction.horizontal() != dive_direction.horizontal() {
        return (true, false);
    }

    (coin_is_goal, false)
}
