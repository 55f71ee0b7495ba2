//! Benchmark of a full guidance + stabilisation control cycle.

use criterion::{criterion_group, criterion_main, Criterion};

use ap_lib::{
    guidance::{self, Guidance, Profile, Waypoint},
    stab_ctrl::{self, StabCtrl},
};
use fdm_if::eqpt::AircraftState;
use util::module::State;

fn wp(north_m: f64, east_m: f64) -> Waypoint {
    Waypoint {
        north_m,
        east_m,
        alt_m: 500.0,
    }
}

fn bench_guidance_cycle(c: &mut Criterion) {
    let mut guidance = Guidance::from_params(guidance::Params::default());
    let mut stab = StabCtrl::from_params(stab_ctrl::Params::default());

    let profile = Profile {
        waypoints: vec![
            wp(0.0, 0.0),
            wp(5000.0, 0.0),
            wp(5000.0, 5000.0),
            wp(0.0, 5000.0),
        ],
    };

    let state = AircraftState {
        north_m: 100.0,
        east_m: 25.0,
        alt_ft: 1640.0,
        heading_deg: 10.0,
        airspeed_fps: 135.0,
        ..Default::default()
    };

    guidance.begin_fillet(&state, profile, 200.0).unwrap();

    c.bench_function("guidance_stab_cycle", |b| {
        b.iter(|| {
            let (dems, _) = guidance.proc(&state).unwrap();
            if let Some(dems) = dems {
                let input = stab_ctrl::InputData {
                    dems,
                    state,
                    dt_s: 0.1,
                };
                stab.proc(&input).unwrap();
            }
        })
    });
}

criterion_group!(benches, bench_guidance_cycle);
criterion_main!(benches);
