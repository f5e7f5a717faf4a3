//! Doors, Doormats, and Dirt
//!
//! Door open/close timers with the satan-spawn latch, doormat wipes with
//! the slob skip, and dirt tracked in from outside.

use bevy_ecs::prelude::*;

use crate::behaviors::Behaviors;
use crate::components::map::{Coord, Map};
use crate::config::{DoorConfig, FilthConfig};

/// Counts down open doors and closes them. Latched doors never count
/// down; the latch outlives any timer.
pub fn tick_doors(world: &mut World) {
    let Some(mut map) = world.get_resource_mut::<Map>() else {
        return;
    };
    for door in &mut map.doors {
        if !door.open || door.held_open {
            continue;
        }
        if door.ticks_until_close > 0 {
            door.ticks_until_close -= 1;
        } else {
            door.open = false;
        }
    }
}

/// A pawn steps onto a cell: door handling (open, latch, release, reset),
/// doormat wipe, and dirt pickup/deposit. Returns true when the step
/// latched a door open.
#[allow(clippy::too_many_arguments)]
pub fn enter_cell(
    map: &mut Map,
    rules: &Behaviors,
    is_satan: bool,
    is_slob: bool,
    dirt: &mut f32,
    dest: Coord,
    doors_cfg: &DoorConfig,
    filth_cfg: &FilthConfig,
) -> bool {
    let mut jammed = false;
    if let Some(door) = map.door_at_mut(dest) {
        if !door.open {
            door.open = true;
            door.ticks_until_close = doors_cfg.close_delay;
        } else if rules.satan_spawn.holds_door_open(is_satan, door) && !door.held_open {
            door.held_open = true;
            jammed = true;
        }
        if door.held_open && rules.satan_spawn.releases_latch(is_satan) {
            door.held_open = false;
            door.ticks_until_close = doors_cfg.close_delay;
        }
        // Passing traffic resets the countdown; a latched door skips the
        // reset entirely (and close attempts while latched are refused).
        if !door.held_open {
            door.ticks_until_close = doors_cfg.close_delay;
        }
    }

    if map.doormat_at(dest) && !rules.slob.ignores_doormat(is_slob) {
        *dirt = 0.0;
    }

    if map.is_indoors(dest) {
        let deposit = dirt.min(filth_cfg.deposit_per_indoor_step);
        if deposit > 0.0 {
            map.deposit_filth(dest, deposit);
            *dirt -= deposit;
        }
    } else {
        *dirt = (*dirt + filth_cfg.dirt_per_outdoor_step).min(1.0);
    }
    jammed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::map::{Door, Doormat};
    use crate::config::Config;

    fn fixtures() -> (Map, Behaviors, DoorConfig, FilthConfig) {
        let config = Config::default();
        let mut map = Map::new(30, 30, Coord::new(0, 0), Coord::new(9, 9));
        map.doors.push(Door::new(Coord::new(10, 5)));
        map.doormats.push(Doormat {
            position: Coord::new(9, 5),
        });
        (
            map,
            Behaviors::from_config(&config),
            config.doors,
            config.filth,
        )
    }

    fn pass(
        map: &mut Map,
        rules: &Behaviors,
        satan: bool,
        slob: bool,
        dirt: &mut f32,
        dest: Coord,
        doors_cfg: &DoorConfig,
        filth_cfg: &FilthConfig,
    ) -> bool {
        enter_cell(map, rules, satan, slob, dirt, dest, doors_cfg, filth_cfg)
    }

    #[test]
    fn test_door_opens_then_closes_after_delay() {
        let (mut map, rules, doors_cfg, filth_cfg) = fixtures();
        let mut dirt = 0.0;
        pass(
            &mut map,
            &rules,
            false,
            false,
            &mut dirt,
            Coord::new(10, 5),
            &doors_cfg,
            &filth_cfg,
        );
        assert!(map.door_at(Coord::new(10, 5)).unwrap().open);

        let mut world = World::new();
        world.insert_resource(map);
        for _ in 0..=doors_cfg.close_delay {
            tick_doors(&mut world);
        }
        assert!(!world.resource::<Map>().door_at(Coord::new(10, 5)).unwrap().open);
    }

    #[test]
    fn test_satan_spawn_latches_open_door() {
        let (mut map, rules, doors_cfg, filth_cfg) = fixtures();
        let door_cell = Coord::new(10, 5);
        let mut dirt = 0.0;

        // First pass opens the closed door (no latch), second latches it.
        assert!(!pass(&mut map, &rules, true, false, &mut dirt, door_cell, &doors_cfg, &filth_cfg));
        assert!(pass(&mut map, &rules, true, false, &mut dirt, door_cell, &doors_cfg, &filth_cfg));
        assert!(map.door_at(door_cell).unwrap().held_open);

        // Latched doors never close, no matter how long the timer runs.
        let mut world = World::new();
        world.insert_resource(map);
        for _ in 0..(doors_cfg.close_delay * 4) {
            tick_doors(&mut world);
        }
        assert!(world.resource::<Map>().door_at(door_cell).unwrap().open);
    }

    #[test]
    fn test_stranger_releases_the_latch() {
        let (mut map, rules, doors_cfg, filth_cfg) = fixtures();
        let door_cell = Coord::new(10, 5);
        let mut dirt = 0.0;
        pass(&mut map, &rules, true, false, &mut dirt, door_cell, &doors_cfg, &filth_cfg);
        pass(&mut map, &rules, true, false, &mut dirt, door_cell, &doors_cfg, &filth_cfg);
        assert!(map.door_at(door_cell).unwrap().held_open);

        pass(&mut map, &rules, false, false, &mut dirt, door_cell, &doors_cfg, &filth_cfg);
        let door = map.door_at(door_cell).unwrap();
        assert!(!door.held_open);
        assert_eq!(door.ticks_until_close, doors_cfg.close_delay);
    }

    #[test]
    fn test_doormat_wipes_unless_slob() {
        let (mut map, rules, doors_cfg, filth_cfg) = fixtures();
        let mat = Coord::new(9, 5);

        let mut dirt = 0.6;
        pass(&mut map, &rules, false, false, &mut dirt, mat, &doors_cfg, &filth_cfg);
        assert_eq!(dirt, 0.0);

        let mut dirt = 0.6;
        pass(&mut map, &rules, false, true, &mut dirt, mat, &doors_cfg, &filth_cfg);
        assert!(dirt > 0.0, "slobs track dirt straight past the mat");
    }

    #[test]
    fn test_dirt_tracked_in_as_filth() {
        let (mut map, rules, doors_cfg, filth_cfg) = fixtures();
        let mut dirt = 0.0;

        // A walk outside picks dirt up.
        pass(&mut map, &rules, false, false, &mut dirt, Coord::new(20, 20), &doors_cfg, &filth_cfg);
        pass(&mut map, &rules, false, false, &mut dirt, Coord::new(21, 20), &doors_cfg, &filth_cfg);
        assert!(dirt > 0.0);

        // Walking indoors deposits it.
        let before = dirt;
        pass(&mut map, &rules, false, false, &mut dirt, Coord::new(5, 5), &doors_cfg, &filth_cfg);
        assert!(dirt < before);
        assert!(map.total_filth() > 0.0);
    }
}
