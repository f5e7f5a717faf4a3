//! Caravaneer trait: a caravan with at least one able Caravaneer moves 15%
//! faster. The bonus doesn't stack, and downed or imprisoned Caravaneers
//! contribute nothing.

use crate::config::CaravaneerConfig;

/// The facts about one caravan member the speed rule needs.
#[derive(Debug, Clone, Copy)]
pub struct CaravanMember {
    pub caravaneer: bool,
    pub downed: bool,
    pub prisoner: bool,
}

#[derive(Clone)]
pub struct CaravaneerRule {
    cfg: CaravaneerConfig,
}

impl CaravaneerRule {
    pub fn new(cfg: CaravaneerConfig) -> Self {
        Self { cfg }
    }

    /// Applies the speed bonus to a caravan's base ticks-per-move. At most
    /// one member's bonus counts.
    pub fn ticks_per_move(&self, members: &[CaravanMember], base_ticks: u32) -> u32 {
        for member in members {
            if member.caravaneer && !member.downed && !member.prisoner {
                return (base_ticks as f32 / (1.0 + self.cfg.speed_bonus)).round() as u32;
            }
        }
        base_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> CaravaneerRule {
        CaravaneerRule::new(CaravaneerConfig::default())
    }

    fn member(caravaneer: bool) -> CaravanMember {
        CaravanMember {
            caravaneer,
            downed: false,
            prisoner: false,
        }
    }

    #[test]
    fn test_bonus_applies_once() {
        let members = [member(false), member(true)];
        assert_eq!(rule().ticks_per_move(&members, 336), 292);
    }

    #[test]
    fn test_bonus_does_not_stack() {
        let one = [member(true)];
        let three = [member(true), member(true), member(true)];
        let r = rule();
        assert_eq!(
            r.ticks_per_move(&one, 336),
            r.ticks_per_move(&three, 336)
        );
    }

    #[test]
    fn test_no_caravaneer_no_bonus() {
        let members = [member(false), member(false)];
        assert_eq!(rule().ticks_per_move(&members, 336), 336);
    }

    #[test]
    fn test_downed_and_prisoner_excluded() {
        let mut hurt = member(true);
        hurt.downed = true;
        let mut captive = member(true);
        captive.prisoner = true;
        assert_eq!(rule().ticks_per_move(&[hurt, captive], 336), 336);
        // An able one alongside them still counts.
        assert_eq!(rule().ticks_per_move(&[hurt, member(true)], 336), 292);
    }
}
