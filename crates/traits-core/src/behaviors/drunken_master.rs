//! Drunken Master trait: melee skill rises with intoxication. Alcohol
//! counts as a combat stimulant for these pawns (as long as it won't black
//! them out), and they generate carrying a little of it.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::components::hediff::HediffKind;
use crate::components::pawn::{ItemKind, PawnId, TraitKind};
use crate::config::DrunkenMasterConfig;
use crate::host::{Host, Stat};

#[derive(Clone)]
pub struct DrunkenMasterRule {
    cfg: DrunkenMasterConfig,
}

impl DrunkenMasterRule {
    pub fn new(cfg: DrunkenMasterConfig) -> Self {
        Self { cfg }
    }

    /// Melee hit/dodge offset from the current alcohol stage. Sober pawns
    /// (no alcohol status) get nothing; so does the blackout stage.
    pub fn stat_offset(&self, host: &dyn Host, pawn: PawnId, stat: Stat) -> f32 {
        match stat {
            Stat::MeleeHitChance | Stat::MeleeDodgeChance => {}
        }
        if !host.has_trait(pawn, TraitKind::DrunkenMaster) {
            return 0.0;
        }
        let Some(stage) = host.stage_index(pawn, HediffKind::AlcoholHigh) else {
            return 0.0;
        };
        self.cfg.stage_offsets.get(stage).copied().unwrap_or(0.0)
    }

    /// Combat-stimulant search: the first alcohol item in inventory whose
    /// dose would not push the pawn into the blackout stage.
    pub fn combat_drug(&self, host: &dyn Host, pawn: PawnId) -> Option<ItemKind> {
        if !host.has_trait(pawn, TraitKind::DrunkenMaster) {
            return None;
        }
        let current = host
            .severity(pawn, HediffKind::AlcoholHigh)
            .unwrap_or(0.0);
        if current + self.cfg.dose_severity >= self.cfg.blackout_severity {
            return None;
        }
        host.inventory_kinds(pawn)
            .into_iter()
            .find(|kind| kind.is_alcohol())
    }

    /// Severity one drink adds.
    pub fn dose_severity(&self) -> f32 {
        self.cfg.dose_severity
    }

    /// How much alcohol a freshly generated Drunken Master carries.
    /// Addicts get none; they'd bring their own problems.
    pub fn starting_alcohol(&self, rng: &mut SmallRng, body_size: f32, addicted: bool) -> u32 {
        if addicted {
            return 0;
        }
        let max = (2.0 * body_size).round() as u32;
        rng.gen_range(0..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::pawn::FactionKind;
    use crate::host::fake::{FakeHost, FakePawn};
    use rand::SeedableRng;

    fn rule() -> DrunkenMasterRule {
        DrunkenMasterRule::new(DrunkenMasterConfig::default())
    }

    fn bar() -> (FakeHost, PawnId) {
        let mut host = FakeHost::new();
        let pawn = host.add_pawn(
            1,
            FakePawn::human(FactionKind::Colony).with_trait(TraitKind::DrunkenMaster),
        );
        (host, pawn)
    }

    #[test]
    fn test_offset_follows_stage_curve() {
        let (mut host, pawn) = bar();
        let r = rule();

        // Sober: no alcohol status at all.
        assert_eq!(r.stat_offset(&host, pawn, Stat::MeleeHitChance), 0.0);

        for (severity, expected) in [(0.1, 0.0), (0.3, 0.04), (0.5, 0.08), (0.7, 0.12), (0.95, 0.0)]
        {
            host.pawn_mut(pawn).hediffs.remove(HediffKind::AlcoholHigh);
            host.pawn_mut(pawn)
                .hediffs
                .attach(HediffKind::AlcoholHigh, severity);
            let offset = r.stat_offset(&host, pawn, Stat::MeleeHitChance);
            assert!(
                (offset - expected).abs() < f32::EPSILON,
                "severity {severity} gave offset {offset}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_offset_requires_trait() {
        let mut host = FakeHost::new();
        let pawn = host.add_pawn(1, FakePawn::human(FactionKind::Colony));
        host.pawn_mut(pawn)
            .hediffs
            .attach(HediffKind::AlcoholHigh, 0.5);
        assert_eq!(rule().stat_offset(&host, pawn, Stat::MeleeDodgeChance), 0.0);
    }

    #[test]
    fn test_beer_is_an_acceptable_combat_drug() {
        let (mut host, pawn) = bar();
        host.pawn_mut(pawn).inventory.add(ItemKind::Pemmican, 3);
        host.pawn_mut(pawn).inventory.add(ItemKind::Beer, 2);
        assert_eq!(rule().combat_drug(&host, pawn), Some(ItemKind::Beer));
    }

    #[test]
    fn test_near_blackout_rejects_the_drink() {
        let (mut host, pawn) = bar();
        host.pawn_mut(pawn).inventory.add(ItemKind::Beer, 2);
        host.pawn_mut(pawn)
            .hediffs
            .attach(HediffKind::AlcoholHigh, 0.8);
        // 0.8 + 0.15 >= 0.9 would black out.
        assert_eq!(rule().combat_drug(&host, pawn), None);
    }

    #[test]
    fn test_no_trait_no_liquid_courage() {
        let mut host = FakeHost::new();
        let pawn = host.add_pawn(1, FakePawn::human(FactionKind::Colony));
        host.pawn_mut(pawn).inventory.add(ItemKind::Beer, 2);
        assert_eq!(rule().combat_drug(&host, pawn), None);
    }

    #[test]
    fn test_starting_alcohol_bounds() {
        let r = rule();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let count = r.starting_alcohol(&mut rng, 1.0, false);
            assert!(count <= 2);
        }
        assert_eq!(r.starting_alcohol(&mut rng, 1.0, true), 0);
    }
}
