use approx::assert_relative_eq;
use dmdist::{
    constants::{COARSE_STEP, DEFAULT_STEP, DISTANCE_CEILING, EXTRAGALACTIC_BUDGET},
    density::{smooth_disk::SmoothDisk, uniform::UniformMedium},
    dispatch::{compute_line_of_sight, scan_plan, ScanResult, TargetType},
    integrator::{ConversionDirection, Scan, ScanEnd},
    scattering::tau_sc,
};

mod common;
use common::{builtin_params, request, DiskAndCloud};

fn pulsar_distance_to_dm(l: f64, b: f64, distance: f64) -> f64 {
    let params = builtin_params();
    let req = request(
        l,
        b,
        distance,
        ConversionDirection::DistanceToDm,
        TargetType::GalacticPulsar,
    );
    match compute_line_of_sight(&req, &params, &SmoothDisk) {
        ScanResult::Pulsar(solution) => solution.dm,
        other => panic!("expected a pulsar result, got {other:?}"),
    }
}

#[test]
fn test_uniform_distance_to_dm() {
    let params = builtin_params();
    let req = request(
        0.0,
        0.0,
        1000.0,
        ConversionDirection::DistanceToDm,
        TargetType::GalacticPulsar,
    );
    let ScanResult::Pulsar(solution) =
        compute_line_of_sight(&req, &params, &UniformMedium::new(0.01))
    else {
        panic!("expected a pulsar result");
    };
    assert_eq!(solution.end, ScanEnd::Crossed);
    assert_eq!(solution.distance, 1000.0);
    assert_relative_eq!(solution.dm, 10.0, max_relative = 1e-9);
    assert_relative_eq!(solution.log_tau, tau_sc(10.0).log10(), max_relative = 1e-9);
}

#[test]
fn test_uniform_dm_to_distance() {
    let params = builtin_params();
    let req = request(
        0.0,
        0.0,
        10.0,
        ConversionDirection::DmToDistance,
        TargetType::GalacticPulsar,
    );
    let ScanResult::Pulsar(solution) =
        compute_line_of_sight(&req, &params, &UniformMedium::new(0.01))
    else {
        panic!("expected a pulsar result");
    };
    assert_eq!(solution.end, ScanEnd::Crossed);
    assert_eq!(solution.dm, 10.0);
    assert_relative_eq!(solution.distance, 1000.0, epsilon = 1e-6);
    assert_relative_eq!(solution.log_tau, tau_sc(10.0).log10());
}

#[test]
fn test_round_trip_within_one_step() {
    let params = builtin_params();
    for (l, b, distance) in [(45.0, 2.0, 3000.0), (200.0, -10.0, 1500.0), (330.0, 0.5, 8000.0)] {
        let dm = pulsar_distance_to_dm(l, b, distance);
        let req = request(
            l,
            b,
            dm,
            ConversionDirection::DmToDistance,
            TargetType::GalacticPulsar,
        );
        let ScanResult::Pulsar(back) = compute_line_of_sight(&req, &params, &SmoothDisk) else {
            panic!("expected a pulsar result");
        };
        assert_eq!(back.end, ScanEnd::Crossed);
        assert!(
            (back.distance - distance).abs() <= 5.0,
            "l={l} b={b}: {distance} pc -> DM {dm} -> {} pc",
            back.distance
        );
    }
}

#[test]
fn test_dm_grows_with_distance() {
    let dms: Vec<f64> = (1..=10)
        .map(|k| pulsar_distance_to_dm(60.0, 1.0, 1000.0 * k as f64))
        .collect();
    assert!(dms.windows(2).all(|w| w[1] >= w[0]), "{dms:?}");
    assert!(dms[9] > dms[0]);
}

#[test]
fn test_magellanic_split_and_scattering() {
    let params = builtin_params();
    let model = DiskAndCloud {
        disk_ne: 0.01,
        disk_edge: 2000.0,
        cloud_ne: 0.05,
        cloud_start: 49_000.0,
        cloud_end: 51_000.0,
    };
    let req = request(
        280.0,
        -33.0,
        60_000.0,
        ConversionDirection::DistanceToDm,
        TargetType::Magellanic,
    );
    let ScanResult::Magellanic { solution, split } = compute_line_of_sight(&req, &params, &model)
    else {
        panic!("expected a Magellanic result");
    };

    assert_eq!(solution.end, ScanEnd::Crossed);
    assert_relative_eq!(split.galactic, 20.0, max_relative = 1e-9);
    // the cloud is entered with a coarse step, then sampled at 5 pc
    assert!((split.magellanic - 100.0).abs() <= 12.0, "{split:?}");
    assert_relative_eq!(
        split.galactic + split.magellanic,
        solution.dm,
        max_relative = 1e-12
    );

    let expected = (0.5 * tau_sc(split.galactic)).max(0.5 * tau_sc(split.magellanic));
    assert_relative_eq!(solution.log_tau, expected.log10(), max_relative = 1e-12);
}

#[test]
fn test_step_refines_inside_magellanic_cloud() {
    let params = builtin_params();
    let model = DiskAndCloud {
        disk_ne: 0.01,
        disk_edge: 2000.0,
        cloud_ne: 0.05,
        cloud_start: 49_000.0,
        cloud_end: 51_000.0,
    };
    let req = request(
        280.0,
        -33.0,
        60_000.0,
        ConversionDirection::DistanceToDm,
        TargetType::Magellanic,
    );
    let mut cfg = scan_plan(&req);
    cfg.record_profile = true;
    let out = Scan::new(&model, &params, req.sky_direction()).run(&cfg);

    assert_eq!(out.end, ScanEnd::Crossed);
    assert_eq!(out.samples, 9582);
    assert_relative_eq!(out.dm, 116.0, max_relative = 1e-9);
    assert_relative_eq!(out.galactic_dm.unwrap(), 20.0, max_relative = 1e-9);

    let p = &out.profile;
    let step = |i: usize| p[i].0 - p[i - 1].0;
    let increment = |i: usize| p[i].1 - p[i - 1].1;

    // coarse steps between the Galaxy and the cloud
    let outside: Vec<usize> = (1..p.len())
        .filter(|&i| p[i - 1].0 > 40_000.0 && p[i].0 < 49_000.0)
        .collect();
    assert!(!outside.is_empty());
    assert!(outside.iter().all(|&i| (step(i) - COARSE_STEP).abs() < 1e-6));

    // the first cloud sample is still integrated over a coarse step
    let entry = (1..p.len())
        .find(|&i| p[i].0 > 40_000.0 && increment(i) > 0.0)
        .unwrap();
    assert_relative_eq!(increment(entry), 0.05 * COARSE_STEP, max_relative = 1e-9);
    assert_relative_eq!(increment(entry + 1), 0.05 * DEFAULT_STEP, max_relative = 1e-9);

    // fine steps from then on, also after leaving the cloud
    assert!((entry + 2..p.len()).all(|i| (step(i) - DEFAULT_STEP).abs() < 1e-6));
    assert_eq!(increment(p.len() - 1), 0.0);
}

#[test]
fn test_empty_magellanic_line_exhausts_budget() {
    let params = builtin_params();
    let req = request(
        180.0,
        0.0,
        10.0,
        ConversionDirection::DmToDistance,
        TargetType::Magellanic,
    );
    let ScanResult::Magellanic { solution, split } =
        compute_line_of_sight(&req, &params, &UniformMedium::new(0.0))
    else {
        panic!("expected a Magellanic result");
    };
    assert_eq!(solution.end, ScanEnd::BudgetExhausted);
    assert_eq!(solution.distance, DISTANCE_CEILING);
    assert_eq!(solution.dm, 0.0);
    assert_eq!(split.galactic, 0.0);
    assert_eq!(split.magellanic, 0.0);
    assert_eq!(solution.log_tau, f64::NEG_INFINITY);
}

#[test]
fn test_frb_handoff() {
    let params = builtin_params();
    let req = dmdist::dispatch::LineOfSightRequest::builder()
        .longitude(150.0)
        .latitude(20.0)
        .target_value(600.0)
        .direction(ConversionDirection::DmToDistance)
        .target_type(TargetType::Frb)
        .host_dm(50.0)
        .build()
        .unwrap();
    let ScanResult::Frb(handoff) = compute_line_of_sight(&req, &params, &SmoothDisk) else {
        panic!("expected an FRB hand-off");
    };
    assert_eq!(handoff.input_value, 600.0);
    assert!(!handoff.input_was_distance);
    assert_eq!(handoff.dm_host, 50.0);
    assert!(handoff.dm_gal > 0.0);
    assert!(handoff.dm_mc >= 0.0);
    assert!(handoff.dm_mc < handoff.dm_gal);
}

#[test]
fn test_budget_constant_bounds_frb_scan() {
    // a 100 kpc sentinel at 5 pc steps needs exactly the extragalactic budget
    assert_eq!(
        (dmdist::constants::FRB_SENTINEL_DISTANCE / dmdist::constants::DEFAULT_STEP) as usize,
        EXTRAGALACTIC_BUDGET
    );
}
