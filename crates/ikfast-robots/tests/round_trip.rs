//! Integration test: forward kinematics followed by IK recovers the
//! configuration, for every built-in robot.
//!
//! For each robot, random in-limit configurations are pushed through the
//! chain's forward kinematics, converted to the robot's target type, and
//! solved again. The original configuration must be among the solutions
//! (modulo 2π on revolute joints), and every returned solution must
//! reproduce the target.

use std::f64::consts::PI;

use ikfast_core::{IkSolution, SolverConfig, TargetPose, normalize_angle};
use ikfast_robots::catalog::{
    ELBOW3, OPW6, PAN_TILT, PLANAR2R, PLANAR3R, PLANAR3R_POSE, RAIL_OPW7,
};
use ikfast_robots::registry_with_config;
use ikfast_solver::{IkSolver, SolverSource};
use ikfast_test_utils::random_configurations;

const SAMPLES: usize = 25;
const MARGIN: f64 = 0.1;

fn solver(robot: &str, increment: f64) -> IkSolver {
    let registry = registry_with_config(SolverConfig::default()).unwrap();
    registry.create_solver(robot, increment).unwrap().unwrap()
}

fn same_configuration(solution: &IkSolution, q: &[f64]) -> bool {
    solution
        .joints()
        .iter()
        .zip(q)
        .all(|(a, b)| normalize_angle(a - b).abs() < 1e-6)
}

fn target_for(solver: &IkSolver, q: &[f64]) -> TargetPose {
    let ee = solver.chain().forward_kinematics(q);
    TargetPose::from_end_effector(solver.parameterization(), &ee)
}

fn assert_round_trip(solver: &IkSolver, q: &[f64]) {
    let target = target_for(solver, q);
    let solutions = solver.find_solutions(&target, None, |_| true).unwrap();
    assert!(
        solutions.iter().any(|s| same_configuration(s, q)),
        "{}: {q:?} not recovered from {} solutions",
        solver.id(),
        solutions.len()
    );
    for s in &solutions {
        assert!(solver.chain().within_limits(s.joints(), 0.0));
        let fk = solver.chain().forward_kinematics(s.joints());
        assert!(target.residual(&fk).within(1e-5), "{}: {s:?}", solver.id());
    }
}

// ---------------------------------------------------------------------------
// Robots without free joints
// ---------------------------------------------------------------------------

#[test]
fn exact_robots_recover_random_configurations() {
    for (robot, seed) in [
        (PLANAR2R, 1),
        (PLANAR3R_POSE, 2),
        (PAN_TILT, 3),
        (ELBOW3, 4),
        (OPW6, 5),
    ] {
        let solver = solver(robot, 0.04);
        for q in random_configurations(solver.chain(), SAMPLES, seed, MARGIN) {
            assert_round_trip(&solver, &q);
        }
    }
}

#[test]
fn exact_robots_call_equations_once() {
    for robot in [PLANAR2R, PLANAR3R_POSE, PAN_TILT, ELBOW3, OPW6] {
        let solver = solver(robot, 0.04);
        assert_eq!(solver.sample_count(), 1);
        let q = solver.chain().mid_configuration();
        let target = target_for(&solver, &q);
        let report = solver
            .solve_with(&target, None, |_| true, &Default::default())
            .unwrap();
        assert_eq!(report.stats.samples, 1, "{robot}");
    }
}

#[test]
fn opw6_returns_at_most_eight() {
    let solver = solver(OPW6, 0.04);
    for q in random_configurations(solver.chain(), SAMPLES, 11, MARGIN) {
        let target = target_for(&solver, &q);
        let solutions = solver.find_solutions(&target, None, |_| true).unwrap();
        assert!(!solutions.is_empty() && solutions.len() <= 8);
    }
}

// ---------------------------------------------------------------------------
// Robots with a free joint
// ---------------------------------------------------------------------------

#[test]
fn planar3r_recovers_configuration_on_grid() {
    let increment = 0.04;
    let solver = solver(PLANAR3R, increment);
    let shoulder = -PI + 80.0 * increment;
    let q = [shoulder, 0.6, -1.1];
    assert_round_trip(&solver, &q);

    let target = target_for(&solver, &q);
    let solutions = solver.find_solutions(&target, None, |_| true).unwrap();
    // Many shoulder samples admit a solution.
    assert!(solutions.len() > 10);
}

#[test]
fn rail_recovers_configuration_on_grid() {
    let solver = solver(RAIL_OPW7, 0.25);
    assert_eq!(solver.sample_count(), 9);
    let q = [0.5, 0.3, -0.2, 0.4, 1.0, 0.7, -0.5];
    assert_round_trip(&solver, &q);

    let target = target_for(&solver, &q);
    let solutions = solver.find_solutions(&target, Some(&q), |_| true).unwrap();
    assert!(same_configuration(&solutions[0], &q));
    assert!(solutions.iter().any(|s| s[0] != 0.5));
}

#[test]
fn finer_increment_finds_at_least_as_many() {
    let coarse = solver(RAIL_OPW7, 0.5);
    let fine = solver(RAIL_OPW7, 0.25);
    let q = [1.0, -0.3, 0.1, 0.2, 0.3, -0.8, 0.9];
    let target = target_for(&fine, &q);
    let n_coarse = coarse.find_solutions(&target, None, |_| true).unwrap().len();
    let n_fine = fine.find_solutions(&target, None, |_| true).unwrap().len();
    assert!(n_fine >= n_coarse);
}

// ---------------------------------------------------------------------------
// Query behaviour
// ---------------------------------------------------------------------------

#[test]
fn seed_is_ranked_first() {
    let solver = solver(OPW6, 0.04);
    for q in random_configurations(solver.chain(), 10, 21, MARGIN) {
        let target = target_for(&solver, &q);
        let solutions = solver.find_solutions(&target, Some(&q), |_| true).unwrap();
        assert!(same_configuration(&solutions[0], &q));

        let closest = solver
            .find_closest_solution(&target, &q, |_| true)
            .unwrap()
            .unwrap();
        assert!(same_configuration(&closest, &q));
    }
}

#[test]
fn unreachable_target_is_empty() {
    let solver = solver(OPW6, 0.04);
    let target = TargetPose::Transform6D(nalgebra::Isometry3::translation(4.0, 0.0, 0.5));
    assert!(solver.find_solutions(&target, None, |_| true).unwrap().is_empty());
    assert!(solver.find_first_solution(&target, |_| true).unwrap().is_none());
}

#[test]
fn filter_is_applied() {
    let solver = solver(OPW6, 0.04);
    let q = [0.3, 0.2, 0.1, 0.4, 0.5, 0.6];
    let target = target_for(&solver, &q);
    let all = solver.find_solutions(&target, None, |_| true).unwrap();
    let positive_wrist = solver
        .find_solutions(&target, None, |s| s[4] >= 0.0)
        .unwrap();
    assert!(positive_wrist.len() < all.len());
    assert!(positive_wrist.iter().all(|s| s[4] >= 0.0));
}

#[test]
fn wrong_target_type_is_rejected() {
    let solver = solver(OPW6, 0.04);
    let target = TargetPose::Translation3D(nalgebra::Vector3::new(0.5, 0.0, 1.0));
    assert!(solver.find_solutions(&target, None, |_| true).is_err());
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_matches_sequential() {
    let solver = solver(RAIL_OPW7, 0.1);
    let q = [0.8, 0.2, 0.4, -0.3, 0.5, 1.2, -0.7];
    let target = target_for(&solver, &q);
    let sequential = solver.find_solutions(&target, Some(&q), |_| true).unwrap();
    let parallel = solver
        .find_solutions_par(&target, Some(&q), |_| true)
        .unwrap();
    assert_eq!(sequential, parallel);
}
