//! Tests for the path-following controller.
//!
//! All scenarios use a calibration with 48 world units per cell, x parallel
//! and y anti-parallel, and start the agent exactly on a grid point so every
//! unperturbed move lands exactly on its target.

use nav_cache::ActionCache;
use nav_core::{Calibration, EntityId, GridPos, NavConfig, WorldPoint, WorldPos};
use nav_remote::ScriptedWorld;
use nav_route::Route;

use crate::{JourneyObserver, JourneyOutcome, Segment};

// ── Helpers ───────────────────────────────────────────────────────────────────

const ME: EntityId = EntityId(1);
const IMP: EntityId = EntityId(2);

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

fn cache_at(cell: GridPos) -> ActionCache<ScriptedWorld> {
    ActionCache::new(ScriptedWorld::new(ME, at(cell)))
}

fn true_cell(cache: &ActionCache<ScriptedWorld>) -> GridPos {
    calibration().grid_from_pos(cache.transport().true_position())
}

/// Records every callback.
#[derive(Default)]
struct Recorder {
    starts:    usize,
    segments:  Vec<(GridPos, GridPos, usize)>,
    advances:  Vec<GridPos>,
    off_route: usize,
    outcomes:  Vec<JourneyOutcome>,
}

impl JourneyObserver for Recorder {
    fn on_journey_start(&mut self, _current: GridPos, _destination: GridPos, _hops: usize) {
        self.starts += 1;
    }

    fn on_segment(&mut self, from: GridPos, segment: &Segment) {
        self.segments.push((from, segment.target(), segment.len()));
    }

    fn on_advance(&mut self, _advanced: f64, at: GridPos) {
        self.advances.push(at);
    }

    fn on_off_route(&mut self, _at: GridPos, _segment: &Segment) {
        self.off_route += 1;
    }

    fn on_outcome(&mut self, outcome: JourneyOutcome) {
        self.outcomes.push(outcome);
    }
}

// ── Collinearity merge ────────────────────────────────────────────────────────

#[cfg(test)]
mod segment {
    use super::*;

    #[test]
    fn merges_identical_steps() {
        let route = Route::new(g(0, 0), [g(1, 0), g(2, 0), g(3, 0), g(4, 1)]);
        let seg = Segment::from_route(g(0, 0), &route).unwrap();
        assert_eq!(seg.direction, g(1, 0));
        assert_eq!(seg.hops(), [g(1, 0), g(2, 0), g(3, 0)]);
        assert_eq!(seg.target(), g(3, 0));
        assert_eq!(seg.position_of(g(2, 0)), Some(1));
    }

    #[test]
    fn direction_is_taken_from_current_position() {
        // The first step is (2, 0), so unit steps after it do not merge.
        let route = Route::new(g(0, 0), [g(2, 0), g(3, 0)]);
        let seg = Segment::from_route(g(0, 0), &route).unwrap();
        assert_eq!(seg.len(), 1);
    }

    #[test]
    fn diagonal_run() {
        let route = Route::new(g(0, 0), [g(1, 1), g(2, 2), g(3, 3), g(3, 4)]);
        let seg = Segment::from_route(g(0, 0), &route).unwrap();
        assert_eq!(seg.target(), g(3, 3));
        assert_eq!(seg.len(), 3);
    }

    #[test]
    fn single_hop_targets_that_hop() {
        let route = Route::new(g(0, 0), [g(0, 1), g(1, 1)]);
        let seg = Segment::from_route(g(0, 0), &route).unwrap();
        assert_eq!(seg.hops(), [g(0, 1)]);
        assert_eq!(seg.target(), g(0, 1));
    }

    #[test]
    fn empty_route_has_no_segment() {
        assert!(Segment::from_route(g(0, 0), &Route::empty(g(0, 0))).is_none());
    }
}

// ── Outcome codes ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod outcome {
    use super::*;
    use crate::JourneyError;
    use nav_cache::CacheError;
    use nav_remote::TransportError;

    #[test]
    fn codes_are_distinct_and_ordered() {
        let codes: Vec<u8> = JourneyOutcome::ALL.iter().map(|o| o.code()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn errors_classify_as_unrecognized() {
        let err = JourneyError::Cache(CacheError::Transport(TransportError::Disconnected));
        assert_eq!(JourneyOutcome::from_result(Err(err)), JourneyOutcome::UnrecognizedFailure);
        assert_eq!(
            JourneyOutcome::from_result(Ok(JourneyOutcome::OffRoute)),
            JourneyOutcome::OffRoute
        );
    }

    #[test]
    fn only_intermediate_hop_is_retryable() {
        let retryable: Vec<_> = JourneyOutcome::ALL.into_iter().filter(|o| o.is_retryable()).collect();
        assert_eq!(retryable, vec![JourneyOutcome::ReachedIntermediateHop]);
    }
}

// ── Turning and movement helpers ──────────────────────────────────────────────

#[cfg(test)]
mod motion {
    use super::*;
    use crate::Journey;
    use nav_core::Facing;

    #[test]
    fn turnface_takes_the_short_way() {
        let cal = calibration();
        let cfg = NavConfig::default();
        let mut cache = cache_at(g(2, 2));
        let mut j = Journey::new(&mut cache, &cal, &cfg);
        // Target one cell toward -y in grid, i.e. +y in world: facing LEFT (90).
        let facing = j.face_position(cal.world_from_grid(g(2, 1)), None).unwrap();
        assert_eq!(facing, Facing::LEFT);
        assert_eq!(cache.transport().last_turn(), Some((Facing::LEFT, 1)));
    }

    #[test]
    fn turnface_wraps_through_zero() {
        let cal = calibration();
        let cfg = NavConfig::default();
        let mut cache = cache_at(g(2, 2));
        let mut j = Journey::new(&mut cache, &cal, &cfg);
        // +1 in grid y is -y in world: facing RIGHT (270); from 0 the short way is down.
        j.face_position(cal.world_from_grid(g(2, 3)), None).unwrap();
        assert_eq!(cache.transport().last_turn(), Some((Facing::RIGHT, -1)));
    }

    #[test]
    fn angle_offset_is_applied() {
        let cal = calibration();
        let cfg = NavConfig { angle_offset: 90, ..NavConfig::default() };
        let mut cache = cache_at(g(2, 2));
        let mut j = Journey::new(&mut cache, &cal, &cfg);
        let facing = j.face_position(cal.world_from_grid(g(3, 2)), Some(1)).unwrap();
        assert_eq!(facing, Facing::LEFT);
        assert_eq!(cache.transport().last_turn(), Some((Facing::LEFT, 1)));
    }

    #[test]
    fn blocking_face_consumes_the_turn_event() {
        let cal = calibration();
        let cfg = NavConfig::default();
        let mut cache = cache_at(g(2, 2));
        let mut j = Journey::new(&mut cache, &cal, &cfg);
        j.face_position_blocking(cal.world_from_grid(g(1, 2))).unwrap();
        assert_eq!(cache.transport().calls("select"), 1);
        assert_eq!(cache.transport().true_facing(), Facing::DOWN);
    }

    #[test]
    fn scaling_depends_on_grid_cells_only() {
        let cal = calibration();
        let cfg = NavConfig::default();
        let mut cache = cache_at(g(0, 0));
        let j = Journey::new(&mut cache, &cal, &cfg);
        assert!((j.movement_distance(g(0, 0), g(0, 5), 100.0) - 55.0).abs() < 1e-9);
        assert!((j.movement_distance(g(0, 0), g(5, 5), 100.0) - 50.0).abs() < 1e-9);
        // A lopsided diagonal is still diagonal.
        assert!((j.movement_distance(g(0, 0), g(1, 5), 100.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn bulk_move_reports_grid_distance() {
        let cal = calibration();
        let cfg = NavConfig::default();
        let mut cache = cache_at(g(1, 1));
        let mut j = Journey::new(&mut cache, &cal, &cfg);
        let advanced = j.bulk_move(g(4, 1), 100).unwrap();
        assert!((advanced - 3.0).abs() < 1e-12);
        assert_eq!(j.grid_position().unwrap(), g(4, 1));
        assert!(j.on_cell(ME, g(4, 1)).unwrap());
        assert_eq!(j.bulk_move(g(4, 1), 100).unwrap(), 0.0);
    }
}

// ── Journey scenarios ─────────────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use super::*;
    use crate::{Journey, JourneyRequest, NoopObserver};

    fn run(
        cache: &mut ActionCache<ScriptedWorld>,
        route: &mut Route,
        request: JourneyRequest,
        observer: &mut Recorder,
    ) -> JourneyOutcome {
        let cal = calibration();
        let cfg = NavConfig::default();
        Journey::new(cache, &cal, &cfg).step(route, &request, observer).unwrap()
    }

    fn straight_route() -> Route {
        Route::new(g(0, 0), [g(1, 0), g(2, 0), g(3, 0), g(4, 0)])
    }

    #[test]
    fn already_at_destination_issues_no_movement() {
        let mut cache = cache_at(g(3, 3));
        let mut route = Route::empty(g(3, 3));
        let mut rec = Recorder::default();
        let outcome = run(&mut cache, &mut route, JourneyRequest::new(g(3, 3), 100, 10.0), &mut rec);
        assert_eq!(outcome, JourneyOutcome::ReachedDestination);
        for op in ["forward", "right", "step_vec", "turn"] {
            assert_eq!(cache.transport().calls(op), 0, "{op}");
        }
        assert_eq!(rec.outcomes, vec![JourneyOutcome::ReachedDestination]);
    }

    #[test]
    fn collinear_hops_take_one_bulk_move() {
        let mut cache = cache_at(g(0, 0));
        let mut route = straight_route();
        let mut rec = Recorder::default();
        let outcome = run(&mut cache, &mut route, JourneyRequest::new(g(4, 0), 100, 10.0), &mut rec);
        assert_eq!(outcome, JourneyOutcome::ReachedDestination);
        assert_eq!(cache.transport().calls("forward"), 1);
        assert_eq!(cache.transport().calls("turn"), 1);
        assert_eq!(rec.segments, vec![(g(0, 0), g(4, 0), 4)]);
        assert!(route.is_empty());
        assert_eq!(true_cell(&cache), g(4, 0));
    }

    #[test]
    fn bend_stops_at_intermediate_hop() {
        let mut cache = cache_at(g(0, 0));
        let mut route = Route::new(g(0, 0), [g(1, 0), g(2, 0), g(3, 1), g(4, 2)]);
        let request = JourneyRequest::new(g(4, 2), 100, 10.0);

        let mut rec = Recorder::default();
        assert_eq!(run(&mut cache, &mut route, request, &mut rec), JourneyOutcome::ReachedIntermediateHop);
        assert_eq!(route.origin(), g(2, 0));
        assert_eq!(route.iter().collect::<Vec<_>>(), vec![g(3, 1), g(4, 2)]);

        assert_eq!(run(&mut cache, &mut route, request, &mut rec), JourneyOutcome::ReachedDestination);
        assert_eq!(true_cell(&cache), g(4, 2));
        assert_eq!(cache.transport().calls("forward"), 2);
        assert_eq!(rec.starts, 2);
    }

    #[test]
    fn partial_advance_on_the_segment_consumes_passed_hops() {
        let mut cache = cache_at(g(0, 0));
        cache.transport_mut().queue_cutoff(0.5);
        let mut route = straight_route();
        let mut rec = Recorder::default();
        let outcome = run(&mut cache, &mut route, JourneyRequest::new(g(4, 0), 100, 10.0), &mut rec);
        assert_eq!(outcome, JourneyOutcome::ReachedIntermediateHop);
        assert_eq!(route.next_hop(), Some(g(3, 0)));
        assert_eq!(rec.advances, vec![g(2, 0)]);
    }

    #[test]
    fn landing_off_the_segment_is_off_route() {
        let mut cache = cache_at(g(0, 0));
        cache.transport_mut().queue_cutoff(0.5);
        // One cell toward +grid y.
        cache.transport_mut().queue_drift(WorldPoint::new(0.0, -48.0));
        let mut route = straight_route();
        let mut rec = Recorder::default();
        let outcome = run(&mut cache, &mut route, JourneyRequest::new(g(4, 0), 100, 10.0), &mut rec);
        assert_eq!(outcome, JourneyOutcome::OffRoute);
        assert_eq!(true_cell(&cache), g(2, 1));
        assert_eq!(route, straight_route());
        assert_eq!(rec.off_route, 1);
        assert_eq!(rec.outcomes, vec![JourneyOutcome::OffRoute]);
    }

    #[test]
    fn stalled_move_is_unrecognized() {
        let mut cache = cache_at(g(0, 0));
        cache.transport_mut().queue_cutoff(0.0);
        let mut route = straight_route();
        let mut rec = Recorder::default();
        let outcome = run(&mut cache, &mut route, JourneyRequest::new(g(4, 0), 100, 10.0), &mut rec);
        assert_eq!(outcome, JourneyOutcome::UnrecognizedFailure);
        assert_eq!(route.len(), 4);
        assert!(rec.advances.is_empty());
    }

    #[test]
    fn tracked_object_leaving_its_cell() {
        let mut cache = ActionCache::new(
            ScriptedWorld::new(ME, at(g(0, 0))).with_entity(IMP, "imp", at(g(9, 9))),
        );
        cache.transport_mut().queue_relocation(IMP, at(g(8, 9)));
        cache.transport_mut().queue_cutoff(0.0);
        let mut route = straight_route();
        let mut rec = Recorder::default();
        let request = JourneyRequest::new(g(4, 0), 100, 10.0).tracking(IMP);
        let outcome = run(&mut cache, &mut route, request, &mut rec);
        assert_eq!(outcome, JourneyOutcome::TrackedObjectMoved);
    }

    #[test]
    fn hop_reached_outranks_tracked_object_moving() {
        let mut cache = ActionCache::new(
            ScriptedWorld::new(ME, at(g(0, 0))).with_entity(IMP, "imp", at(g(9, 9))),
        );
        cache.transport_mut().queue_relocation(IMP, at(g(8, 9)));
        let mut route = Route::new(g(0, 0), [g(1, 0), g(2, 1)]);
        let mut rec = Recorder::default();
        let request = JourneyRequest::new(g(2, 1), 100, 10.0).tracking(IMP);
        let outcome = run(&mut cache, &mut route, request, &mut rec);
        assert_eq!(outcome, JourneyOutcome::ReachedIntermediateHop);
    }

    #[test]
    fn small_budget_still_walks_the_whole_segment() {
        let mut cache = cache_at(g(0, 0));
        let mut route = straight_route();
        let mut rec = Recorder::default();
        let outcome = run(&mut cache, &mut route, JourneyRequest::new(g(4, 0), 100, 1.0), &mut rec);
        assert_eq!(outcome, JourneyOutcome::ReachedDestination);
        assert_eq!(cache.transport().calls("forward"), 1);
        assert_eq!(true_cell(&cache), g(4, 0));
        assert!(route.is_empty());
    }

    #[test]
    fn empty_budget_moves_nothing() {
        let mut cache = cache_at(g(0, 0));
        let mut route = straight_route();
        let mut rec = Recorder::default();
        let outcome = run(&mut cache, &mut route, JourneyRequest::new(g(4, 0), 100, 0.0), &mut rec);
        assert_eq!(outcome, JourneyOutcome::OutOfDistanceBudget);
        assert_eq!(cache.transport().calls("forward"), 0);
    }

    #[test]
    fn zero_velocity_and_exhausted_route_are_unrecognized() {
        let mut cache = cache_at(g(0, 0));
        let mut route = straight_route();
        let mut rec = Recorder::default();
        let outcome = run(&mut cache, &mut route, JourneyRequest::new(g(4, 0), 0, 10.0), &mut rec);
        assert_eq!(outcome, JourneyOutcome::UnrecognizedFailure);

        let mut route = Route::empty(g(0, 0));
        let outcome = run(&mut cache, &mut route, JourneyRequest::new(g(4, 0), 100, 10.0), &mut rec);
        assert_eq!(outcome, JourneyOutcome::UnrecognizedFailure);
        assert_eq!(cache.transport().calls("forward"), 0);
    }

    #[test]
    fn hops_behind_the_agent_are_skipped() {
        let mut cache = cache_at(g(2, 0));
        let mut route = straight_route();
        let mut rec = Recorder::default();
        let outcome = run(&mut cache, &mut route, JourneyRequest::new(g(4, 0), 100, 10.0), &mut rec);
        assert_eq!(outcome, JourneyOutcome::ReachedDestination);
        assert_eq!(rec.segments, vec![(g(2, 0), g(4, 0), 2)]);
    }

    #[test]
    fn transport_failure_aborts_the_call() {
        let cal = calibration();
        let cfg = NavConfig::default();
        let mut cache = cache_at(g(0, 0));
        cache.transport_mut().fail_next("forward");
        let mut route = straight_route();
        let request = JourneyRequest::new(g(4, 0), 100, 10.0);
        let result = Journey::new(&mut cache, &cal, &cfg).step(&mut route, &request, &mut NoopObserver);
        assert!(result.is_err());
        assert_eq!(JourneyOutcome::from_result(result), JourneyOutcome::UnrecognizedFailure);
    }
}

// ── Randomised journeys ───────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::{Journey, JourneyRequest};
    use nav_route::StaticPlanner;

    /// Perturbed journeys always produce exactly one outcome per call, each
    /// outcome agrees with where the agent really is, and replanning on
    /// `OffRoute` eventually reaches the destination.
    #[test]
    fn every_call_has_one_consistent_outcome() {
        let cal = calibration();
        let cfg = NavConfig::default();

        for seed in 0..40u64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let start = g(rng.gen_range(0..10), rng.gen_range(0..10));
            let dest = g(rng.gen_range(0..10), rng.gen_range(0..10));
            let mut cache = cache_at(start);
            let mut route = Route::new(start, StaticPlanner::walk(start, dest));
            let request = JourneyRequest::new(dest, 100, 100.0);

            let mut done = false;
            for call in 0..60 {
                let current = true_cell(&cache);
                let segment = Segment::from_route(current, &route);
                if let Some(seg) = &segment {
                    if rng.gen_bool(0.3) {
                        let k = seg.len() as u32;
                        cache.transport_mut().queue_cutoff(rng.gen_range(0..=k) as f64 / k as f64);
                    }
                    if rng.gen_bool(0.2) {
                        let dx = rng.gen_range(-1..=1) as f64 * 48.0;
                        let dy = rng.gen_range(-1..=1) as f64 * 48.0;
                        cache.transport_mut().queue_drift(WorldPoint::new(dx, dy));
                    }
                }

                let mut rec = Recorder::default();
                let outcome = Journey::new(&mut cache, &cal, &cfg)
                    .step(&mut route, &request, &mut rec)
                    .unwrap();
                let ctx = format!("seed {seed} call {call}: {outcome}");
                assert_eq!(rec.outcomes, vec![outcome], "{ctx}");

                let now = true_cell(&cache);
                match outcome {
                    JourneyOutcome::ReachedDestination => {
                        assert_eq!(now, dest, "{ctx}");
                        done = true;
                        break;
                    }
                    JourneyOutcome::ReachedIntermediateHop => {
                        assert_eq!(route.origin(), now, "{ctx}");
                    }
                    JourneyOutcome::OffRoute => {
                        let seg = segment.as_ref().unwrap();
                        assert!(seg.position_of(now).is_none(), "{ctx}");
                        route = Route::new(now, StaticPlanner::walk(now, dest));
                    }
                    JourneyOutcome::UnrecognizedFailure => {
                        // Stall: the agent did not leave its cell.
                        assert_eq!(now, current, "{ctx}");
                    }
                    other => panic!("unexpected {other} ({ctx})"),
                }
            }
            assert!(done, "seed {seed} never reached {dest}");
        }
    }
}
