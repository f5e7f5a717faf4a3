//! Berserker trait: taking hostile damage builds ire, which can boil over
//! into an uncontrollable rage. Rage forces melee aggression (downed
//! enemies included), taunts nearby pawns, and feeds a little severity
//! back into ire so it self-sustains briefly before draining out.

use crate::components::hediff::HediffKind;
use crate::components::job::Job;
use crate::components::mental_state::MentalStateKind;
use crate::components::pawn::{PawnId, TraitKind};
use crate::config::BerserkerConfig;
use crate::host::{DamageInfo, Host, InteractionKind, TargetPolicy};

/// What a hostile-damage event did to the ire machinery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IreResponse {
    /// Not a berserker concern (no trait, no instigator, or friendly fire).
    NotApplicable,
    /// The trait had been stripped; orphaned ire/rage were cleaned up.
    TraitLost,
    /// The rage roll fired and the raging state was acquired.
    RageStarted,
    /// The rage roll fired but the mode slot was occupied; ire unchanged.
    RageRefused,
    /// The roll missed; ire rose to the given severity.
    IreRose { severity: f32 },
}

/// The ire/rage state machine and the berserk combat overrides.
#[derive(Clone)]
pub struct BerserkerRule {
    cfg: BerserkerConfig,
}

impl BerserkerRule {
    pub fn new(cfg: BerserkerConfig) -> Self {
        Self { cfg }
    }

    fn ire_floor(&self) -> f32 {
        HediffKind::BerserkerIre.severity_range().0
    }

    /// Hostile-damage hook.
    ///
    /// Runs the trait-stripped cleanup before anything else, then rolls for
    /// rage *before* raising severity, so the first hit can never trigger
    /// (severity starts at zero and the probability is zero by
    /// construction).
    pub fn on_damage(&self, host: &mut dyn Host, pawn: PawnId, dinfo: &DamageInfo) -> IreResponse {
        if !host.has_trait(pawn, TraitKind::Berserker) {
            let orphaned = host.severity(pawn, HediffKind::BerserkerIre).is_some()
                || host.severity(pawn, HediffKind::BerserkerRage).is_some();
            if orphaned {
                host.remove_hediff(pawn, HediffKind::BerserkerIre);
                host.remove_hediff(pawn, HediffKind::BerserkerRage);
                return IreResponse::TraitLost;
            }
            return IreResponse::NotApplicable;
        }

        let Some(instigator) = dinfo.instigator else {
            return IreResponse::NotApplicable;
        };
        if !host.is_hostile(pawn, instigator) {
            return IreResponse::NotApplicable;
        }

        if host.severity(pawn, HediffKind::BerserkerIre).is_none() {
            host.attach_hediff(pawn, HediffKind::BerserkerIre, self.ire_floor());
        }
        let severity = host
            .severity(pawn, HediffKind::BerserkerIre)
            .unwrap_or(0.0);

        if host.chance(self.cfg.rage_chance_factor * severity) {
            if self.enter_rage(host, pawn) {
                IreResponse::RageStarted
            } else {
                IreResponse::RageRefused
            }
        } else {
            let gain =
                dinfo.amount / host.core_part_max_health(pawn) / self.cfg.damage_scale_factor;
            host.adjust_severity(pawn, HediffKind::BerserkerIre, gain);
            IreResponse::IreRose {
                severity: host
                    .severity(pawn, HediffKind::BerserkerIre)
                    .unwrap_or(0.0),
            }
        }
    }

    /// Fixed-cadence ire decay. Returns true when ire drained to the floor
    /// while the pawn was raging (rage ended this tick).
    pub fn ire_tick(&self, host: &mut dyn Host, pawn: PawnId) -> bool {
        if !host.is_interval_tick(pawn, self.cfg.decay_interval) {
            return false;
        }
        let Some(severity) = host.severity(pawn, HediffKind::BerserkerIre) else {
            return false;
        };
        if severity <= self.ire_floor() {
            return false;
        }

        host.adjust_severity(pawn, HediffKind::BerserkerIre, -self.cfg.ire_trickle);
        if host.severity(pawn, HediffKind::BerserkerIre) == Some(self.ire_floor()) {
            let was_raging = host.current_state(pawn) == Some(MentalStateKind::Berserking);
            self.exit_rage(host, pawn);
            host.remove_hediff(pawn, HediffKind::BerserkerIre);
            return was_raging;
        }
        false
    }

    /// Fixed-cadence rage upkeep: trickles severity back into ire, and
    /// removes the rage status if the raging state was cleared by
    /// something else. Returns true on that desync removal.
    pub fn rage_tick(&self, host: &mut dyn Host, pawn: PawnId) -> bool {
        if !host.is_interval_tick(pawn, self.cfg.decay_interval) {
            return false;
        }
        if host.severity(pawn, HediffKind::BerserkerRage).is_none() {
            return false;
        }

        if host.severity(pawn, HediffKind::BerserkerIre).is_some() {
            host.adjust_severity(
                pawn,
                HediffKind::BerserkerIre,
                self.cfg.ire_trickle * self.cfg.rage_ire_trickle_factor,
            );
        }

        if host.current_state(pawn) != Some(MentalStateKind::Berserking) {
            host.remove_hediff(pawn, HediffKind::BerserkerRage);
            return true;
        }
        false
    }

    /// Taunt cycle while raging: every taunt interval, pick a random
    /// nearby pawn able to receive an interaction and insult it. The
    /// enemy-insult variant is used unconditionally so hostile targets
    /// can't block it and it never escalates into a fight.
    pub fn taunt_tick(&self, host: &mut dyn Host, pawn: PawnId) -> Option<PawnId> {
        if !host.is_interval_tick(pawn, self.cfg.taunt_interval) {
            return None;
        }
        let candidates: Vec<PawnId> = host
            .pawns_in_radius(pawn, self.cfg.taunt_radius)
            .into_iter()
            .filter(|&t| host.can_receive_interaction(t))
            .collect();
        let index = host.choose(candidates.len())?;
        let target = candidates[index];
        if host.try_interact(pawn, target, InteractionKind::InsultEnemy) {
            Some(target)
        } else {
            None
        }
    }

    /// Berserk combat job: nearest hostile under a policy that keeps
    /// non-threats, so downed enemies get attacked too. The melee job
    /// carries a bounded random expiry and re-evaluation flags.
    pub fn combat_job(&self, host: &mut dyn Host, pawn: PawnId) -> Option<Job> {
        let target = host.find_attack_target(
            pawn,
            &TargetPolicy {
                radius: self.cfg.target_acquire_radius,
                include_non_threats: true,
            },
        )?;
        if !host.has_melee_option(pawn, target) {
            return None;
        }
        let expiry = host.range_inclusive(self.cfg.melee_expiry_min, self.cfg.melee_expiry_max);
        Some(
            Job::melee_attack(target)
                .allowing_downed_target()
                .with_expiry(expiry)
                .checking_override_on_expire()
                .expiring_only_near_enemies(),
        )
    }

    fn enter_rage(&self, host: &mut dyn Host, pawn: PawnId) -> bool {
        if !host.try_start_state(pawn, MentalStateKind::Berserking) {
            return false;
        }
        host.attach_hediff(pawn, HediffKind::BerserkerRage, 1.0);
        host.set_severity(pawn, HediffKind::BerserkerIre, 1.0);
        true
    }

    fn exit_rage(&self, host: &mut dyn Host, pawn: PawnId) {
        if host.current_state(pawn) != Some(MentalStateKind::Berserking) {
            return;
        }
        host.end_state(pawn, MentalStateKind::Berserking);
        host.remove_hediff(pawn, HediffKind::BerserkerRage);
        // Re-draft standing colonists so they don't run off after rage.
        if host.is_player_controlled(pawn) && !host.is_incapacitated(pawn) {
            host.draft(pawn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::pawn::FactionKind;
    use crate::host::fake::{FakeHost, FakePawn};
    use crate::host::DamageKind;

    fn rule() -> BerserkerRule {
        BerserkerRule::new(BerserkerConfig::default())
    }

    fn hostile_hit(amount: f32, instigator: PawnId) -> DamageInfo {
        DamageInfo {
            amount,
            kind: DamageKind::Cut,
            instigator: Some(instigator),
        }
    }

    /// Host with a berserker colonist (id 1) and a hostile raider (id 2).
    fn arena() -> (FakeHost, PawnId, PawnId) {
        let mut host = FakeHost::new();
        let berserker = host.add_pawn(
            1,
            FakePawn::human(FactionKind::Colony).with_trait(TraitKind::Berserker),
        );
        let raider = host.add_pawn(2, FakePawn::human(FactionKind::Raiders).at(3, 0));
        (host, berserker, raider)
    }

    #[test]
    fn test_missed_roll_raises_severity_by_formula() {
        let (mut host, pawn, raider) = arena();
        host.force_roll(false);

        let response = rule().on_damage(&mut host, pawn, &hostile_hit(40.0, raider));

        // 40 / 100 core health / 0.5 = 0.8
        assert_eq!(response, IreResponse::IreRose { severity: 0.8 });
        assert_eq!(
            host.pawn(pawn).hediffs.severity(HediffKind::BerserkerIre),
            Some(0.8)
        );
    }

    #[test]
    fn test_first_hit_creates_ire_from_zero() {
        let (mut host, pawn, raider) = arena();
        host.force_roll(false);
        assert!(host.pawn(pawn).hediffs.severity(HediffKind::BerserkerIre).is_none());

        rule().on_damage(&mut host, pawn, &hostile_hit(10.0, raider));

        assert_eq!(
            host.pawn(pawn).hediffs.severity(HediffKind::BerserkerIre),
            Some(0.2)
        );
    }

    #[test]
    fn test_severity_saturates_at_ceiling() {
        let (mut host, pawn, raider) = arena();
        host.pawn_mut(pawn)
            .hediffs
            .attach(HediffKind::BerserkerIre, 0.9);
        host.force_roll(false);

        let response = rule().on_damage(&mut host, pawn, &hostile_hit(60.0, raider));
        assert_eq!(response, IreResponse::IreRose { severity: 1.0 });
    }

    #[test]
    fn test_hit_roll_starts_rage_and_resets_ire() {
        let (mut host, pawn, raider) = arena();
        host.pawn_mut(pawn)
            .hediffs
            .attach(HediffKind::BerserkerIre, 0.8);
        host.force_roll(true);

        let response = rule().on_damage(&mut host, pawn, &hostile_hit(5.0, raider));

        assert_eq!(response, IreResponse::RageStarted);
        let p = host.pawn(pawn);
        assert!(p.state.is(MentalStateKind::Berserking));
        assert_eq!(p.hediffs.severity(HediffKind::BerserkerIre), Some(1.0));
        assert_eq!(p.hediffs.severity(HediffKind::BerserkerRage), Some(1.0));
    }

    #[test]
    fn test_occupied_mode_slot_refuses_rage_and_leaves_ire() {
        let (mut host, pawn, raider) = arena();
        host.pawn_mut(pawn)
            .hediffs
            .attach(HediffKind::BerserkerIre, 0.8);
        host.pawn_mut(pawn)
            .state
            .try_start(MentalStateKind::Panic, 0, None);
        host.force_roll(true);

        let response = rule().on_damage(&mut host, pawn, &hostile_hit(5.0, raider));

        assert_eq!(response, IreResponse::RageRefused);
        let p = host.pawn(pawn);
        assert_eq!(p.hediffs.severity(HediffKind::BerserkerIre), Some(0.8));
        assert!(!p.hediffs.has(HediffKind::BerserkerRage));
        assert!(p.state.is(MentalStateKind::Panic));
    }

    #[test]
    fn test_friendly_fire_and_unattributed_damage_ignored() {
        let (mut host, pawn, _) = arena();
        let friend = host.add_pawn(3, FakePawn::human(FactionKind::Colony));

        let response = rule().on_damage(&mut host, pawn, &hostile_hit(30.0, friend));
        assert_eq!(response, IreResponse::NotApplicable);

        let unattributed = DamageInfo {
            amount: 30.0,
            kind: DamageKind::Blunt,
            instigator: None,
        };
        let response = rule().on_damage(&mut host, pawn, &unattributed);
        assert_eq!(response, IreResponse::NotApplicable);
        assert!(!host.pawn(pawn).hediffs.has(HediffKind::BerserkerIre));
    }

    #[test]
    fn test_stripped_trait_cleans_up_before_the_roll() {
        let (mut host, pawn, raider) = arena();
        {
            let p = host.pawn_mut(pawn);
            p.hediffs.attach(HediffKind::BerserkerIre, 0.5);
            p.hediffs.attach(HediffKind::BerserkerRage, 1.0);
            p.state.try_start(MentalStateKind::Berserking, 0, None);
            p.traits.remove(TraitKind::Berserker);
        }
        // A roll is scripted but must never be consumed.
        host.force_roll(true);

        let response = rule().on_damage(&mut host, pawn, &hostile_hit(10.0, raider));

        assert_eq!(response, IreResponse::TraitLost);
        let p = host.pawn(pawn);
        assert!(!p.hediffs.has(HediffKind::BerserkerIre));
        assert!(!p.hediffs.has(HediffKind::BerserkerRage));
        assert_eq!(host.forced_rolls.len(), 1);
    }

    #[test]
    fn test_ire_decays_by_trickle() {
        let (mut host, pawn, _) = arena();
        host.pawn_mut(pawn)
            .hediffs
            .attach(HediffKind::BerserkerIre, 0.5);

        let ended = rule().ire_tick(&mut host, pawn);

        assert!(!ended);
        let severity = host
            .pawn(pawn)
            .hediffs
            .severity(HediffKind::BerserkerIre)
            .unwrap();
        assert!((severity - 0.44).abs() < 1e-6);
    }

    #[test]
    fn test_ire_draining_ends_rage_and_redrafts() {
        let (mut host, pawn, _) = arena();
        {
            let p = host.pawn_mut(pawn);
            p.hediffs.attach(HediffKind::BerserkerIre, 0.05);
            p.hediffs.attach(HediffKind::BerserkerRage, 0.6);
            p.state.try_start(MentalStateKind::Berserking, 0, None);
        }

        let ended = rule().ire_tick(&mut host, pawn);

        assert!(ended);
        let p = host.pawn(pawn);
        assert!(p.state.current().is_none());
        assert!(!p.hediffs.has(HediffKind::BerserkerIre));
        assert!(!p.hediffs.has(HediffKind::BerserkerRage));
        assert!(p.drafted, "standing colonist should be re-drafted");
    }

    #[test]
    fn test_downed_pawn_not_redrafted_on_rage_end() {
        let (mut host, pawn, _) = arena();
        {
            let p = host.pawn_mut(pawn);
            p.hediffs.attach(HediffKind::BerserkerIre, 0.05);
            p.hediffs.attach(HediffKind::BerserkerRage, 0.6);
            p.state.try_start(MentalStateKind::Berserking, 0, None);
            p.downed = true;
        }

        rule().ire_tick(&mut host, pawn);

        assert!(!host.pawn(pawn).drafted);
        assert!(host.drafted.is_empty());
    }

    #[test]
    fn test_ire_drain_without_rage_just_removes_ire() {
        let (mut host, pawn, _) = arena();
        host.pawn_mut(pawn)
            .hediffs
            .attach(HediffKind::BerserkerIre, 0.05);

        let ended = rule().ire_tick(&mut host, pawn);

        assert!(!ended);
        assert!(!host.pawn(pawn).hediffs.has(HediffKind::BerserkerIre));
        assert!(host.drafted.is_empty());
    }

    #[test]
    fn test_rage_trickles_exactly_into_ire() {
        let (mut host, pawn, _) = arena();
        {
            let p = host.pawn_mut(pawn);
            p.hediffs.attach(HediffKind::BerserkerIre, 0.5);
            p.hediffs.attach(HediffKind::BerserkerRage, 1.0);
            p.state.try_start(MentalStateKind::Berserking, 0, None);
        }

        let desynced = rule().rage_tick(&mut host, pawn);

        assert!(!desynced);
        let severity = host
            .pawn(pawn)
            .hediffs
            .severity(HediffKind::BerserkerIre)
            .unwrap();
        // 0.06 * 0.4 = 0.024 per interval
        assert!((severity - 0.524).abs() < 1e-6);
    }

    #[test]
    fn test_externally_cleared_state_removes_rage_hediff() {
        let (mut host, pawn, _) = arena();
        {
            let p = host.pawn_mut(pawn);
            p.hediffs.attach(HediffKind::BerserkerIre, 0.5);
            p.hediffs.attach(HediffKind::BerserkerRage, 1.0);
            // Raging state was cleared by something outside the rule.
        }

        let desynced = rule().rage_tick(&mut host, pawn);

        assert!(desynced);
        assert!(!host.pawn(pawn).hediffs.has(HediffKind::BerserkerRage));
    }

    #[test]
    fn test_taunt_picks_random_nearby_pawn() {
        let (mut host, pawn, _raider) = arena();
        host.pawn_mut(pawn)
            .state
            .try_start(MentalStateKind::Berserking, 0, None);
        // A second candidate inside the 5-cell radius.
        host.add_pawn(4, FakePawn::human(FactionKind::Raiders).at(0, 4));
        host.force_choice(1);

        let taunted = rule().taunt_tick(&mut host, pawn).unwrap();

        assert_eq!(host.interactions.len(), 1);
        let (actor, recipient, kind) = host.interactions[0];
        assert_eq!(actor, pawn);
        assert_eq!(recipient, taunted);
        assert_eq!(kind, InteractionKind::InsultEnemy);
    }

    #[test]
    fn test_taunt_reaches_hostile_targets() {
        let (mut host, pawn, raider) = arena();
        let taunted = rule().taunt_tick(&mut host, pawn).unwrap();
        // The plain insult would be refused against a hostile; the enemy
        // variant goes through.
        assert_eq!(taunted, raider);
    }

    #[test]
    fn test_taunt_with_no_candidates_is_a_no_op() {
        let mut host = FakeHost::new();
        let loner = host.add_pawn(
            1,
            FakePawn::human(FactionKind::Colony).with_trait(TraitKind::Berserker),
        );
        assert!(rule().taunt_tick(&mut host, loner).is_none());
        assert!(host.interactions.is_empty());
    }

    #[test]
    fn test_combat_job_attacks_downed_enemy() {
        let (mut host, pawn, raider) = arena();
        host.pawn_mut(raider).downed = true;
        host.force_range(400);

        let job = rule().combat_job(&mut host, pawn).unwrap();

        assert_eq!(job.target, Some(raider));
        assert!(job.allow_downed_target);
        assert_eq!(job.expiry_interval, Some(400));
        assert!(job.check_override_on_expire);
        assert!(job.expire_requires_enemies_nearby);
    }

    #[test]
    fn test_combat_job_expiry_stays_in_bounds() {
        let (mut host, pawn, _) = arena();
        let job = rule().combat_job(&mut host, pawn).unwrap();
        let expiry = job.expiry_interval.unwrap();
        assert!((360..=480).contains(&expiry));
    }

    #[test]
    fn test_combat_job_none_without_hostiles() {
        let mut host = FakeHost::new();
        let pawn = host.add_pawn(
            1,
            FakePawn::human(FactionKind::Colony).with_trait(TraitKind::Berserker),
        );
        host.add_pawn(2, FakePawn::human(FactionKind::Colony).at(2, 0));
        assert!(rule().combat_job(&mut host, pawn).is_none());
    }

    #[test]
    fn test_full_cycle_damage_to_rage_to_recovery() {
        let (mut host, pawn, raider) = arena();
        let r = rule();

        // First hit: severity 0, roll misses by construction.
        host.force_roll(false);
        r.on_damage(&mut host, pawn, &hostile_hit(40.0, raider));

        // Second hit fires the roll: rage starts, ire resets to full.
        host.force_roll(true);
        assert_eq!(
            r.on_damage(&mut host, pawn, &hostile_hit(5.0, raider)),
            IreResponse::RageStarted
        );

        // Drain: each interval loses 0.06 and regains 0.024 while raging.
        let mut rage_ended = false;
        for _ in 0..40 {
            rage_ended |= r.ire_tick(&mut host, pawn);
            r.rage_tick(&mut host, pawn);
            if rage_ended {
                break;
            }
        }
        assert!(rage_ended, "rage should end once ire drains to the floor");
        let p = host.pawn(pawn);
        assert!(p.state.current().is_none());
        assert!(!p.hediffs.has(HediffKind::BerserkerIre));
        assert!(!p.hediffs.has(HediffKind::BerserkerRage));
        assert!(p.drafted);
    }
}
