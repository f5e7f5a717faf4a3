//! Hediff Components
//!
//! Severity-bearing status effects attached to pawns. Each kind declares a
//! severity range, discrete stages derived from severity, and an optional
//! natural decay applied on the fixed cadence.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// A discrete stage of a hediff, selected by severity threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HediffStage {
    /// Minimum severity (inclusive) for this stage.
    pub min_severity: f32,
    pub label: &'static str,
}

/// The status-effect kinds the trait pack uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HediffKind {
    /// Berserker ire: rises on hostile damage, drains over time.
    BerserkerIre,
    /// Berserker rage: combat surge carried while the raging state lasts.
    BerserkerRage,
    /// Boredom inflicted by Boring conversation partners.
    Bored,
    /// Intoxication from alcohol.
    AlcoholHigh,
}

impl HediffKind {
    /// Declared severity range. Writes through `Hediff::set_severity` are
    /// clamped to it.
    pub fn severity_range(self) -> (f32, f32) {
        match self {
            HediffKind::BerserkerIre
            | HediffKind::BerserkerRage
            | HediffKind::Bored
            | HediffKind::AlcoholHigh => (0.0, 1.0),
        }
    }

    /// Severity trimmed off on each fixed decay interval. Ire decay is
    /// owned by the berserker rule itself and is zero here.
    pub fn natural_decay(self) -> f32 {
        match self {
            HediffKind::BerserkerIre => 0.0,
            HediffKind::BerserkerRage => 0.02,
            HediffKind::Bored => 0.02,
            HediffKind::AlcoholHigh => 0.015,
        }
    }

    /// Whether the hediff is discarded once severity sits at the floor.
    pub fn vanishes_at_floor(self) -> bool {
        match self {
            // Ire and rage lifecycles are owned by the berserker rule.
            HediffKind::BerserkerIre | HediffKind::BerserkerRage => false,
            HediffKind::Bored | HediffKind::AlcoholHigh => true,
        }
    }

    pub fn stages(self) -> &'static [HediffStage] {
        match self {
            HediffKind::BerserkerIre => &[
                HediffStage {
                    min_severity: 0.0,
                    label: "simmering",
                },
                HediffStage {
                    min_severity: 0.35,
                    label: "smoldering",
                },
                HediffStage {
                    min_severity: 0.7,
                    label: "boiling",
                },
            ],
            HediffKind::BerserkerRage => &[HediffStage {
                min_severity: 0.0,
                label: "raging",
            }],
            HediffKind::Bored => &[
                HediffStage {
                    min_severity: 0.0,
                    label: "listless",
                },
                HediffStage {
                    min_severity: 0.4,
                    label: "weary",
                },
                HediffStage {
                    min_severity: 0.9,
                    label: "stupefied",
                },
            ],
            HediffKind::AlcoholHigh => &[
                HediffStage {
                    min_severity: 0.0,
                    label: "warm",
                },
                HediffStage {
                    min_severity: 0.25,
                    label: "tipsy",
                },
                HediffStage {
                    min_severity: 0.4,
                    label: "drunk",
                },
                HediffStage {
                    min_severity: 0.6,
                    label: "hammered",
                },
                HediffStage {
                    min_severity: 0.9,
                    label: "blackout",
                },
            ],
        }
    }

    /// Index of the stage the given severity falls in.
    pub fn stage_index(self, severity: f32) -> usize {
        let stages = self.stages();
        stages
            .iter()
            .rposition(|s| severity >= s.min_severity)
            .unwrap_or(0)
    }

    pub fn stage_label(self, severity: f32) -> &'static str {
        self.stages()[self.stage_index(severity)].label
    }

    pub fn label(self) -> &'static str {
        match self {
            HediffKind::BerserkerIre => "berserker_ire",
            HediffKind::BerserkerRage => "berserker_rage",
            HediffKind::Bored => "bored",
            HediffKind::AlcoholHigh => "alcohol_high",
        }
    }
}

/// A status effect instance attached to a pawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hediff {
    pub kind: HediffKind,
    severity: f32,
}

impl Hediff {
    pub fn new(kind: HediffKind, severity: f32) -> Self {
        let mut hediff = Self {
            kind,
            severity: 0.0,
        };
        hediff.set_severity(severity);
        hediff
    }

    pub fn severity(&self) -> f32 {
        self.severity
    }

    /// Writes severity, clamped to the kind's declared range. Clamping
    /// makes the floor exact, so floor comparisons don't need an epsilon.
    pub fn set_severity(&mut self, severity: f32) {
        let (min, max) = self.kind.severity_range();
        self.severity = severity.clamp(min, max);
    }

    pub fn adjust_severity(&mut self, delta: f32) {
        self.set_severity(self.severity + delta);
    }

    pub fn at_floor(&self) -> bool {
        self.severity == self.kind.severity_range().0
    }

    pub fn stage_index(&self) -> usize {
        self.kind.stage_index(self.severity)
    }

    pub fn stage_label(&self) -> &'static str {
        self.kind.stage_label(self.severity)
    }
}

/// The set of hediffs on one pawn; at most one instance per kind.
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct HediffSet {
    hediffs: Vec<Hediff>,
}

impl HediffSet {
    pub fn get(&self, kind: HediffKind) -> Option<&Hediff> {
        self.hediffs.iter().find(|h| h.kind == kind)
    }

    pub fn get_mut(&mut self, kind: HediffKind) -> Option<&mut Hediff> {
        self.hediffs.iter_mut().find(|h| h.kind == kind)
    }

    pub fn severity(&self, kind: HediffKind) -> Option<f32> {
        self.get(kind).map(Hediff::severity)
    }

    /// Attaches a hediff, or raises the existing one's severity by the
    /// given amount when one of this kind is already present.
    pub fn attach(&mut self, kind: HediffKind, severity: f32) {
        match self.get_mut(kind) {
            Some(h) => h.adjust_severity(severity),
            None => self.hediffs.push(Hediff::new(kind, severity)),
        }
    }

    pub fn remove(&mut self, kind: HediffKind) {
        self.hediffs.retain(|h| h.kind != kind);
    }

    pub fn has(&self, kind: HediffKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hediff> {
        self.hediffs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_clamps_to_range() {
        let mut hediff = Hediff::new(HediffKind::BerserkerIre, 0.5);
        hediff.adjust_severity(2.0);
        assert_eq!(hediff.severity(), 1.0);
        hediff.adjust_severity(-5.0);
        assert_eq!(hediff.severity(), 0.0);
        assert!(hediff.at_floor());
    }

    #[test]
    fn test_floor_is_exact_after_clamp() {
        let mut hediff = Hediff::new(HediffKind::BerserkerIre, 0.04);
        hediff.adjust_severity(-0.06);
        // Clamping returns the exact bound, no epsilon needed.
        assert!(hediff.at_floor());
    }

    #[test]
    fn test_stage_selection() {
        assert_eq!(HediffKind::BerserkerIre.stage_index(0.0), 0);
        assert_eq!(HediffKind::BerserkerIre.stage_index(0.35), 1);
        assert_eq!(HediffKind::BerserkerIre.stage_index(0.9), 2);
        assert_eq!(HediffKind::AlcoholHigh.stage_label(0.45), "drunk");
        assert_eq!(HediffKind::AlcoholHigh.stage_label(0.95), "blackout");
    }

    #[test]
    fn test_attach_merges_severity() {
        let mut set = HediffSet::default();
        set.attach(HediffKind::Bored, 0.15);
        set.attach(HediffKind::Bored, 0.15);
        assert_eq!(set.severity(HediffKind::Bored), Some(0.3));
        assert_eq!(set.iter().count(), 1);
    }

    #[test]
    fn test_remove() {
        let mut set = HediffSet::default();
        set.attach(HediffKind::BerserkerRage, 1.0);
        assert!(set.has(HediffKind::BerserkerRage));
        set.remove(HediffKind::BerserkerRage);
        assert!(!set.has(HediffKind::BerserkerRage));
    }
}
