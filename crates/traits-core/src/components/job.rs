//! Job Components
//!
//! A job is the concrete directive a pawn is currently executing: whom to
//! attack, where to wander, or simply to hold position. Jobs can carry an
//! expiry and re-evaluation flags.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use super::pawn::PawnId;

/// What a job does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Close to melee range and attack the target.
    MeleeAttack,
    /// Move away from the target.
    FleeFrom,
    /// Drift to random nearby cells.
    Wander,
    /// Hold position (drafted stand-ready, dozing).
    Wait,
}

/// A directive with target, expiry, and re-evaluation flags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Job {
    pub kind: JobKind,
    pub target: Option<PawnId>,
    /// Ticks after start when the job expires, if bounded.
    pub expiry_interval: Option<u32>,
    /// Tick the job was started on; set by the engine when assigned.
    pub started_tick: u64,
    /// Re-run job selection when the job expires.
    pub check_override_on_expire: bool,
    /// The expiry only applies while hostiles remain nearby.
    pub expire_requires_enemies_nearby: bool,
    /// Melee attacks may strike incapacitated targets. Normal melee policy
    /// refuses them.
    pub allow_downed_target: bool,
}

impl Job {
    pub fn new(kind: JobKind) -> Self {
        Self {
            kind,
            target: None,
            expiry_interval: None,
            started_tick: 0,
            check_override_on_expire: false,
            expire_requires_enemies_nearby: false,
            allow_downed_target: false,
        }
    }

    pub fn melee_attack(target: PawnId) -> Self {
        let mut job = Self::new(JobKind::MeleeAttack);
        job.target = Some(target);
        job
    }

    pub fn flee_from(target: PawnId) -> Self {
        let mut job = Self::new(JobKind::FleeFrom);
        job.target = Some(target);
        job
    }

    pub fn wander() -> Self {
        Self::new(JobKind::Wander)
    }

    pub fn wait() -> Self {
        Self::new(JobKind::Wait)
    }

    pub fn with_expiry(mut self, ticks: u32) -> Self {
        self.expiry_interval = Some(ticks);
        self
    }

    pub fn checking_override_on_expire(mut self) -> Self {
        self.check_override_on_expire = true;
        self
    }

    pub fn expiring_only_near_enemies(mut self) -> Self {
        self.expire_requires_enemies_nearby = true;
        self
    }

    pub fn allowing_downed_target(mut self) -> Self {
        self.allow_downed_target = true;
        self
    }

    /// Whether the job's expiry has elapsed at the given tick.
    pub fn expired(&self, tick: u64) -> bool {
        self.expiry_interval
            .is_some_and(|interval| tick >= self.started_tick + u64::from(interval))
    }
}

/// The job a pawn is currently running, if any.
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentJob {
    pub job: Option<Job>,
}

impl CurrentJob {
    pub fn start(&mut self, mut job: Job, tick: u64) {
        job.started_tick = tick;
        self.job = Some(job);
    }

    pub fn clear(&mut self) {
        self.job = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_melee_job_builder() {
        let job = Job::melee_attack(PawnId(7))
            .with_expiry(420)
            .checking_override_on_expire()
            .expiring_only_near_enemies()
            .allowing_downed_target();
        assert_eq!(job.kind, JobKind::MeleeAttack);
        assert_eq!(job.target, Some(PawnId(7)));
        assert_eq!(job.expiry_interval, Some(420));
        assert!(job.check_override_on_expire);
        assert!(job.expire_requires_enemies_nearby);
        assert!(job.allow_downed_target);
    }

    #[test]
    fn test_expiry() {
        let mut current = CurrentJob::default();
        current.start(Job::melee_attack(PawnId(1)).with_expiry(100), 50);
        let job = current.job.unwrap();
        assert!(!job.expired(149));
        assert!(job.expired(150));
    }

    #[test]
    fn test_unbounded_job_never_expires() {
        let job = Job::wander();
        assert!(!job.expired(u64::MAX));
    }
}
