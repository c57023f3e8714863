//! Unit tests for nav-agent.

use nav_core::{
    Axis, Calibration, EntityId, Facing, GridPos, NavConfig, NavError, Ticks, Timeout, WorldPoint, WorldPos,
};
use nav_journey::{JourneyObserver, JourneyOutcome, NoopObserver};
use nav_remote::{BoxExtent, Event, ScriptedWorld};
use nav_route::StaticPlanner;

use crate::{AgentError, Bot, BotBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

const ME: EntityId = EntityId(1);
const IMP: EntityId = EntityId(2);
const LABEL: EntityId = EntityId(7);

fn g(x: i32, y: i32) -> GridPos {
    GridPos::new(x, y)
}

fn calibration() -> Calibration {
    Calibration::calibrate(
        g(0, 0),
        WorldPoint::new(1000.0, 2000.0),
        g(10, 20),
        WorldPoint::new(1480.0, 1040.0),
    )
    .unwrap()
}

fn at(cell: GridPos) -> WorldPos {
    calibration().world_from_grid(cell).with_z(0.0)
}

/// A tagged world whose calibration matches [`calibration`].
fn world(start: GridPos) -> ScriptedWorld {
    ScriptedWorld::new(ME, at(start))
        .with_map_name("arena")
        .with_tag("penminx", 0)
        .with_tag("penminy", 0)
        .with_tag("penmaxx", 10)
        .with_tag("penmaxy", 20)
        .with_tag("doomminx", 1000)
        .with_tag("doomminy", 2000)
        .with_tag("doommaxx", 1480)
        .with_tag("doommaxy", 1040)
        .with_player_start(at(g(1, 1)))
        .with_entity(LABEL, "label_kitchen", at(g(0, 5)))
        .with_named("label", "kitchen", LABEL)
}

fn planner() -> StaticPlanner {
    StaticPlanner::new(g(1, 1)).with_label("kitchen", g(0, 5))
}

fn bot(world: ScriptedWorld) -> Bot<ScriptedWorld, StaticPlanner> {
    BotBuilder::new(world, planner()).build().unwrap()
}

fn bot_with(world: ScriptedWorld, config: NavConfig) -> Bot<ScriptedWorld, StaticPlanner> {
    BotBuilder::new(world, planner()).config(config).build().unwrap()
}

fn true_cell(bot: &Bot<ScriptedWorld, StaticPlanner>) -> GridPos {
    calibration().grid_from_pos(bot.cache().transport().true_position())
}

#[derive(Default)]
struct Outcomes(Vec<JourneyOutcome>);

impl JourneyObserver for Outcomes {
    fn on_outcome(&mut self, outcome: JourneyOutcome) {
        self.0.push(outcome);
    }
}

// ── Construction ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod construction {
    use super::*;

    #[test]
    fn calibrates_from_map_tags() {
        let bot = bot(world(g(0, 0)));
        assert_eq!(*bot.calibration(), calibration());
        assert_eq!(bot.me(), ME);
        assert_eq!(bot.name(), "python_doommarine_mp");
    }

    #[test]
    fn non_numeric_tag_is_rejected() {
        let w = world(g(0, 0)).with_tag("doommaxy", "north");
        match BotBuilder::new(w, planner()).build() {
            Err(AgentError::Tag { name, value }) => {
                assert_eq!(name, "doommaxy");
                assert_eq!(value, "north");
            }
            Err(e) => panic!("unexpected error {e}"),
            Ok(_) => panic!("bot built from a bad tag"),
        }
    }

    #[test]
    fn fractional_grid_tag_is_rejected() {
        let w = world(g(0, 0)).with_tag("penmaxx", "10.5");
        assert!(matches!(
            BotBuilder::new(w, planner()).build(),
            Err(AgentError::Tag { name: "penmaxx", .. })
        ));
    }

    #[test]
    fn missing_tag_is_a_remote_error() {
        let w = ScriptedWorld::new(ME, at(g(0, 0)));
        assert!(matches!(BotBuilder::new(w, planner()).build(), Err(AgentError::Cache(_))));
    }

    #[test]
    fn shared_corner_coordinate_is_degenerate() {
        let w = world(g(0, 0)).with_tag("penmaxx", 0);
        assert!(matches!(
            BotBuilder::new(w, planner()).build(),
            Err(AgentError::Calibration(NavError::DegenerateCalibration { axis: Axis::X }))
        ));
    }

    #[test]
    fn inexact_scale_calibrates() {
        let cal = Calibration::calibrate(g(0, 0), WorldPoint::new(0.0, 0.0), g(7, 3), WorldPoint::new(1000.0, 1000.0))
            .unwrap();
        let w = ScriptedWorld::new(ME, cal.world_from_grid(g(0, 0)).with_z(0.0))
            .with_tag("penminx", 0)
            .with_tag("penminy", 0)
            .with_tag("penmaxx", 7)
            .with_tag("penmaxy", 3)
            .with_tag("doomminx", 0)
            .with_tag("doomminy", 0)
            .with_tag("doommaxx", 1000)
            .with_tag("doommaxy", 1000)
            .with_player_start(cal.world_from_grid(g(1, 1)).with_z(0.0));
        let mut bot = BotBuilder::new(w, planner()).build().unwrap();
        assert_eq!(*bot.calibration(), cal);
        for x in 0..=7 {
            for y in 0..=3 {
                assert!(bot.init_bbox_cell(g(x, y)).is_ok(), "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn lossy_calibration_fails_at_start_up() {
        // Corners survive the round trip; the cells between them do not.
        let w = world(g(0, 0))
            .with_tag("penmaxx", 1000)
            .with_tag("doomminx", "1000000000000000")
            .with_tag("doommaxx", "1000000000000001");
        match BotBuilder::new(w, planner()).build() {
            Err(AgentError::Calibration(NavError::RoundTrip { grid, recovered })) => {
                assert_eq!(grid, g(1, 0));
                assert_eq!(recovered, g(0, 0));
            }
            Err(e) => panic!("unexpected error {e}"),
            Ok(_) => panic!("lossy calibration went unnoticed"),
        }
    }

    #[test]
    fn player_start_must_match_the_planner() {
        let w = world(g(0, 0));
        let result = BotBuilder::new(w, StaticPlanner::new(g(5, 5))).build();
        match result {
            Err(AgentError::Calibration(NavError::RoundTrip { grid, recovered })) => {
                assert_eq!(grid, g(5, 5));
                assert_eq!(recovered, g(1, 1));
            }
            Err(e) => panic!("unexpected error {e}"),
            Ok(_) => panic!("player start mismatch went unnoticed"),
        }
    }

    #[test]
    fn invalid_config_is_rejected_before_any_remote_call() {
        let config = NavConfig { grid_unit: 0.0, ..NavConfig::default() };
        let result = BotBuilder::new(world(g(0, 0)), planner()).config(config).build();
        assert!(matches!(result, Err(AgentError::Calibration(NavError::Config(_)))));
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use super::*;

    #[test]
    fn calc_nav_routes_to_the_object_cell() {
        let mut bot = bot(world(g(0, 0)).with_entity(IMP, "imp", at(g(3, 0))));
        let (route, distance) = bot.calc_nav(IMP).unwrap();
        assert_eq!(route.iter().collect::<Vec<_>>(), [g(1, 0), g(2, 0), g(3, 0)]);
        assert_eq!(route.origin(), g(0, 0));
        assert!((distance - 3.0).abs() < 1e-9);
    }

    #[test]
    fn calc_nav_pos_starts_from_the_current_cell() {
        let mut bot = bot(world(g(2, 2)));
        let (route, distance) = bot.calc_nav_pos(g(4, 4)).unwrap();
        assert_eq!(route.iter().collect::<Vec<_>>(), [g(3, 3), g(4, 4)]);
        assert!((distance - 2.0 * 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn blocked_destination_is_a_route_error() {
        let w = world(g(0, 0));
        let mut bot = BotBuilder::new(w, planner().block(g(2, 0))).build().unwrap();
        assert!(matches!(bot.calc_nav_pos(g(3, 0)), Err(AgentError::Route(_))));
    }
}

// ── Navigation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod navigation {
    use super::*;

    #[test]
    fn straight_line_is_one_move() {
        let mut bot = bot(world(g(0, 0)));
        let outcome = bot.navigate_to(g(4, 0), &mut NoopObserver).unwrap();
        assert_eq!(outcome, JourneyOutcome::ReachedDestination);
        assert_eq!(true_cell(&bot), g(4, 0));
        assert_eq!(bot.cache().transport().calls("forward"), 1);
    }

    #[test]
    fn bend_continues_past_the_intermediate_hop() {
        let mut bot = bot(world(g(0, 0)));
        let mut seen = Outcomes::default();
        let outcome = bot.navigate_to(g(3, 2), &mut seen).unwrap();
        assert_eq!(outcome, JourneyOutcome::ReachedDestination);
        assert_eq!(
            seen.0,
            [JourneyOutcome::ReachedIntermediateHop, JourneyOutcome::ReachedDestination]
        );
        assert_eq!(true_cell(&bot), g(3, 2));
    }

    #[test]
    fn drift_triggers_a_replan() {
        let mut bot = bot(world(g(0, 0)));
        bot.cache_mut().transport_mut().queue_drift(WorldPoint::new(0.0, -48.0));
        let mut seen = Outcomes::default();
        let outcome = bot.navigate_to(g(4, 0), &mut seen).unwrap();
        assert_eq!(outcome, JourneyOutcome::ReachedDestination);
        assert_eq!(seen.0, [JourneyOutcome::OffRoute, JourneyOutcome::ReachedDestination]);
        assert_eq!(bot.cache().transport().calls("forward"), 2);
        assert_eq!(true_cell(&bot), g(4, 0));
    }

    #[test]
    fn replans_are_bounded() {
        let config = NavConfig { max_replans: 0, ..NavConfig::default() };
        let mut bot = bot_with(world(g(0, 0)), config);
        bot.cache_mut().transport_mut().queue_drift(WorldPoint::new(0.0, -48.0));
        let outcome = bot.navigate_to(g(4, 0), &mut NoopObserver).unwrap();
        assert_eq!(outcome, JourneyOutcome::OffRoute);
        assert_eq!(true_cell(&bot), g(4, 1));
    }

    #[test]
    fn legs_are_bounded() {
        let config = NavConfig { max_legs: 1, ..NavConfig::default() };
        let mut bot = bot_with(world(g(0, 0)), config);
        let outcome = bot.navigate_to(g(3, 2), &mut NoopObserver).unwrap();
        assert_eq!(outcome, JourneyOutcome::ReachedIntermediateHop);
        assert_eq!(true_cell(&bot), g(2, 2));
    }

    #[test]
    fn already_there() {
        let mut bot = bot(world(g(2, 2)));
        let outcome = bot.navigate_to(g(2, 2), &mut NoopObserver).unwrap();
        assert_eq!(outcome, JourneyOutcome::ReachedDestination);
        assert_eq!(bot.cache().transport().calls("forward"), 0);
    }

    #[test]
    fn label_destination_comes_from_the_planner() {
        let mut bot = bot(world(g(0, 0)));
        let outcome = bot.navigate_to_label("kitchen", &mut NoopObserver).unwrap();
        assert_eq!(outcome, JourneyOutcome::ReachedDestination);
        assert_eq!(true_cell(&bot), g(0, 5));
    }

    #[test]
    fn unknown_label() {
        let mut bot = bot(world(g(0, 0)));
        match bot.navigate_to_label("attic", &mut NoopObserver) {
            Err(AgentError::UnknownLabel(name)) => assert_eq!(name, "attic"),
            other => panic!("expected UnknownLabel, got {other:?}"),
        }
    }

    #[test]
    fn follows_a_moving_object() {
        let mut bot = bot(world(g(0, 0)).with_entity(IMP, "imp", at(g(3, 2))));
        // The imp walks off while the bot turns for its first move.
        bot.cache_mut().transport_mut().queue_relocation(IMP, at(g(5, 2)));
        let outcome = bot.navigate_to_object(IMP, &mut NoopObserver).unwrap();
        assert_eq!(outcome, JourneyOutcome::ReachedDestination);
        assert_eq!(true_cell(&bot), g(5, 2));
    }

    #[test]
    fn moving_object_without_replans_left() {
        let config = NavConfig { max_replans: 0, ..NavConfig::default() };
        let mut bot = bot_with(world(g(0, 0)).with_entity(IMP, "imp", at(g(3, 2))), config);
        bot.cache_mut().transport_mut().queue_relocation(IMP, at(g(5, 2)));
        let outcome = bot.navigate_to_object(IMP, &mut NoopObserver).unwrap();
        assert_eq!(outcome, JourneyOutcome::TrackedObjectMoved);
        assert_eq!(true_cell(&bot), g(2, 2));
    }

    #[test]
    fn remote_failure_propagates() {
        let mut bot = bot(world(g(0, 0)));
        bot.cache_mut().transport_mut().fail_next("forward");
        assert!(matches!(
            bot.navigate_to(g(4, 0), &mut NoopObserver),
            Err(AgentError::Journey(_))
        ));
    }
}

// ── Facing, labels and movement ───────────────────────────────────────────────

#[cfg(test)]
mod facing {
    use super::*;

    #[test]
    fn face_label_turns_then_aims() {
        let mut bot = bot(world(g(0, 0)));
        bot.face_label("kitchen").unwrap();
        let w = bot.cache().transport();
        assert_eq!(w.last_turn().map(|(angle, _)| angle), Some(Facing::RIGHT));
        assert_eq!(w.true_facing(), Facing::RIGHT);
        assert_eq!(w.calls("aim"), 1);
        assert_eq!(w.log().last(), Some(&"aim"));
    }

    #[test]
    fn label_lookup() {
        let mut bot = bot(world(g(0, 0)));
        assert_eq!(bot.label_entity("kitchen").unwrap(), LABEL);
        assert_eq!(bot.label_position("kitchen").unwrap(), at(g(0, 5)));
        assert!(matches!(bot.label_entity("attic"), Err(AgentError::Cache(_))));
    }

    #[test]
    fn face_object() {
        let mut bot = bot(world(g(0, 0)).with_entity(IMP, "imp", at(g(3, 0))));
        bot.face(IMP).unwrap();
        let w = bot.cache().transport();
        assert_eq!(w.last_turn().map(|(angle, _)| angle), Some(Facing::UP));
        assert_eq!(w.calls("aim"), 1);
    }

    #[test]
    fn face_reads_the_target_after_it_moved() {
        let mut bot = bot(world(g(0, 0)).with_entity(IMP, "imp", at(g(3, 0))));
        assert_eq!(bot.world_position(IMP).unwrap(), at(g(3, 0)));

        bot.cache_mut().transport_mut().queue_relocation(IMP, at(g(0, 3)));
        bot.cache_mut().timeout(Timeout::Arm(Ticks(5))).unwrap();
        bot.cache_mut().select(&[Event::Timeout]).unwrap();

        bot.face(IMP).unwrap();
        let w = bot.cache().transport();
        assert_eq!(w.last_turn().map(|(angle, _)| angle), Some(Facing::RIGHT));
        assert_eq!(w.true_facing(), Facing::RIGHT);
    }

    #[test]
    fn turn_applies_the_angle_offset() {
        let config = NavConfig { angle_offset: 90, ..NavConfig::default() };
        let mut bot = bot_with(world(g(0, 0)), config);
        bot.turn(Facing::UP, 1).unwrap();
        assert_eq!(bot.cache().transport().last_turn(), Some((Facing::LEFT, 1)));
    }

    #[test]
    fn crouch_steps_down() {
        let mut bot = bot(world(g(0, 0)));
        bot.crouch().unwrap();
        assert_eq!(bot.cache().transport().log().last(), Some(&"step_up"));
    }

    #[test]
    fn grid_and_world_position() {
        let mut bot = bot(world(g(4, 6)));
        assert_eq!(bot.grid_position().unwrap(), g(4, 6));
        assert_eq!(bot.world_position(ME).unwrap(), at(g(4, 6)));
    }
}

// ── Bounding boxes ────────────────────────────────────────────────────────────

#[cfg(test)]
mod bboxes {
    use super::*;

    #[test]
    fn boxes_on_entities_and_cells() {
        let mut bot = bot(world(g(0, 0)));
        bot.init_bbox_entity(LABEL, BoxExtent::LABEL).unwrap();
        bot.init_bbox_cell(g(2, 3)).unwrap();
        assert_eq!(bot.cache().transport().bbox_count(), 2);
    }
}
