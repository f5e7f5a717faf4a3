//! Teacher trait: talking with a Teacher rubs off. After each successful
//! interaction the teacher makes up to two attempts to pass on a randomly
//! chosen skill they know better than the listener.

use crate::components::pawn::{PawnId, SkillKind, TraitKind};
use crate::config::TeacherConfig;
use crate::host::{Host, InteractionKind};

/// Attempts made per interaction; a broad skill base means better odds.
const TEACH_ATTEMPTS: usize = 2;

#[derive(Clone)]
pub struct TeacherRule {
    cfg: TeacherConfig,
}

impl TeacherRule {
    pub fn new(cfg: TeacherConfig) -> Self {
        Self { cfg }
    }

    /// Post-interaction hook on the initiator's side. Returns the skill
    /// taught and XP granted, when a lesson landed.
    pub fn after_interaction(
        &self,
        host: &mut dyn Host,
        actor: PawnId,
        recipient: PawnId,
        kind: InteractionKind,
    ) -> Option<(SkillKind, f32)> {
        if !host.has_trait(actor, TraitKind::Teacher) {
            return None;
        }
        for _ in 0..TEACH_ATTEMPTS {
            let index = host.choose(SkillKind::ALL.len())?;
            let skill = SkillKind::ALL[index];
            // Bail out entirely if either side has no skill tracker.
            let teacher_level = host.skill_level(actor, skill)?;
            let student_level = host.skill_level(recipient, skill)?;
            if teacher_level > student_level {
                let xp = (teacher_level - student_level) as f32
                    * self.cfg.xp_per_level_difference
                    * self.cfg.factor(kind);
                host.learn_skill(recipient, skill, xp);
                return Some((skill, xp));
            }
        }
        None
    }
}
