use chrono::{Duration, Utc};
use metro_empire_server::game::economy;
use metro_empire_server::game::types::GameState;

#[test]
fn level_two_generator_two_hours() {
    let mut state = GameState::default();
    state.buildings.insert("generator".into(), 2);

    let now = Utc::now();
    let mut last_tick = now - Duration::hours(2);
    let prior_energy = state.resources.energy;

    let gains = economy::accrue_offline(&mut state, &mut last_tick, now)
        .expect("two hours should pay out");

    // 140 * 1.25 = 175/h, 2 h -> 350
    assert_eq!(gains.energy, 350);
    assert_eq!(state.resources.energy, prior_energy + 350);
    assert_eq!(last_tick, now);
}

#[test]
fn all_four_resources_accrue_at_level_one() {
    let mut state = GameState::default();
    let now = Utc::now();
    let mut last_tick = now - Duration::hours(1);
    let prior = state.resources.clone();

    let gains = economy::accrue_offline(&mut state, &mut last_tick, now).expect("payout");

    assert_eq!(gains.energy, 140);
    assert_eq!(gains.metal, 90);
    assert_eq!(gains.water, 70);
    assert_eq!(gains.food, 60);
    // Crystals are never produced offline.
    assert_eq!(state.resources.crystals, prior.crystals);
    assert!(state.resources.energy >= 0);
}

#[test]
fn below_threshold_is_a_strict_noop_twice_over() {
    let mut state = GameState::default();
    let now = Utc::now();
    let tick_before = now - Duration::seconds(30);
    let mut last_tick = tick_before;

    assert!(economy::accrue_offline(&mut state, &mut last_tick, now).is_none());
    let after_first = state.clone();
    // The tick must not advance, otherwise spam would reset the window.
    assert_eq!(last_tick, tick_before);

    assert!(economy::accrue_offline(&mut state, &mut last_tick, now).is_none());
    assert_eq!(state, after_first);
    assert_eq!(last_tick, tick_before);
}

#[test]
fn twenty_four_hours_pays_like_eight() {
    let now = Utc::now();

    let mut capped = GameState::default();
    let mut capped_tick = now - Duration::hours(24);
    let capped_gains =
        economy::accrue_offline(&mut capped, &mut capped_tick, now).expect("payout");

    let mut exact = GameState::default();
    let mut exact_tick = now - Duration::hours(8);
    let exact_gains = economy::accrue_offline(&mut exact, &mut exact_tick, now).expect("payout");

    assert_eq!(capped_gains, exact_gains);
    assert_eq!(capped.resources, exact.resources);
    assert_eq!(capped_tick, now);
}

#[test]
fn future_tick_never_rolls_back() {
    let mut state = GameState::default();
    let now = Utc::now();
    let ahead = now + Duration::hours(1);
    let mut last_tick = ahead;

    assert!(economy::accrue_offline(&mut state, &mut last_tick, now).is_none());
    assert_eq!(last_tick, ahead);
    assert_eq!(state, GameState::default());
}

#[test]
fn absent_building_counts_as_level_one() {
    let mut state = GameState::default();
    state.buildings.remove("mine");

    let now = Utc::now();
    let mut last_tick = now - Duration::hours(1);
    let gains = economy::accrue_offline(&mut state, &mut last_tick, now).expect("payout");

    assert_eq!(gains.metal, 90);
}
