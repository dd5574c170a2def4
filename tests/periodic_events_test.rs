mod common;

use approx::assert_relative_eq;
use common::init_logger;
use umbra::{
    ephemeris::{elp2000::Elp2000, vsop87::Vsop87},
    moon::moon_node_inclination,
    time::TimeCorrelation,
    umbra::Umbra,
};

#[test]
fn test_node_passages_count_and_order() {
    init_logger();
    let ctx = Umbra::new();
    let nodes = ctx.node_passages(2010.0, 2015.0);

    // Two passages per draconic month
    let expected = 2.0 * 5.0 * 13.4223;
    assert!(
        (nodes.len() as f64 - expected).abs() <= 3.0,
        "{} node passages",
        nodes.len()
    );

    for pair in nodes.windows(2) {
        let gap = pair[1].jd_tdb - pair[0].jd_tdb;
        // Half a draconic month, perturbed by up to a day
        assert!(gap > 12.2 && gap < 15.0, "gap = {gap}");
    }
}

#[test]
fn test_node_passages_alternate() {
    let ctx = Umbra::new();
    let step = ctx.get_params().node_sample_step_seconds();

    let signs: Vec<bool> = ctx
        .node_passages(2020.0, 2021.0)
        .iter()
        .map(|ts| moon_node_inclination(&ctx, ts, step) > 0.0)
        .collect();

    assert!(signs[0], "the first passage is an ascending node");
    for pair in signs.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn test_new_moons_spacing() {
    let ctx = Umbra::new();
    let moons = ctx.new_moons(2000.0, 2010.0).unwrap();
    assert!(moons.len() >= 123);

    for pair in moons.windows(2) {
        let lunation = pair[1].jd_tdb - pair[0].jd_tdb;
        assert!(lunation > 29.2 && lunation < 29.9, "lunation = {lunation}");
    }
}

#[test]
fn test_empty_ranges() {
    let ctx = Umbra::new();
    assert!(ctx.node_passages(2012.0, 2012.0).is_empty());
    assert!(ctx.new_moons(2012.0, 2012.0).unwrap().is_empty());
    assert!(ctx.new_moons(2013.0, 2012.0).unwrap().is_empty());
    // Inside a lunation: no index is rounded in
    assert!(ctx.node_passages(2012.3, 2012.3).is_empty());
    assert!(ctx.new_moons(2012.3, 2012.3).unwrap().is_empty());
    assert!(ctx.solar_eclipses(2012.0, 2012.0).unwrap().is_empty());
}

#[test]
fn test_delta_t_does_not_move_dynamical_instants() {
    let reference = Umbra::new();
    let corr = TimeCorrelation::with_delta_t(vec![(1990.0, 50.0), (2030.0, 90.0)]).unwrap();
    let custom = Umbra::with_ephemerides(corr, Elp2000, Vsop87);

    let ref_moons = reference.new_moons(2018.0, 2019.0).unwrap();
    let moons = custom.new_moons(2018.0, 2019.0).unwrap();
    assert_eq!(ref_moons.len(), moons.len());

    for (a, b) in ref_moons.iter().zip(&moons) {
        assert_relative_eq!(a.jd_tdb, b.jd_tdb, epsilon = 1e-9);
        // Only the universal time follows the table
        assert!((a.jd_ut1 - b.jd_ut1).abs() > 1e-6);
    }
}
