//! End-to-end draws passed from participant to participant through links.

use std::collections::HashSet;
use std::sync::Arc;

use linkdraw::{
    DrawConfig, DrawEngine, DrawOutcome, DrawState, IndexSource, LinkBuilder, LinkMode, Pool,
    RngSource, StateCodec,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

struct Fixed(usize);

impl IndexSource for Fixed {
    fn pick_index(&mut self, _len: usize) -> usize {
        self.0
    }
}

struct Setup {
    codec: StateCodec,
    engine: DrawEngine,
    links: LinkBuilder,
}

fn setup() -> Setup {
    let base_url = Some("https://draw.example.test/".to_owned());
    let config = DrawConfig::from_sources(base_url, None, None).expect("config");
    Setup {
        codec: StateCodec::new(config.pool.clone()),
        engine: DrawEngine::new(config.pool.clone()),
        links: LinkBuilder::from_config(&config),
    }
}

#[test]
fn host_link_starts_with_full_mask() {
    let s = setup();
    let mode = s.links.resolve(&s.codec, None, 1_700_000_000_000);
    let LinkMode::Host(state) = mode else {
        panic!("expected host mode");
    };
    assert_eq!(state.remaining, 511);

    let link = s.links.publish(&s.codec, &state).expect("link");
    assert_eq!(link.as_str(), "https://draw.example.test/?s=me7.ts44we8");
}

#[test]
fn drawing_index_three_yields_503() {
    let s = setup();
    let state = s.codec.decode("me7").expect("decode");

    // Slot 3 among a full pool is pool index 3.
    let DrawOutcome::Picked(pick) = s.engine.draw(&state, &mut Fixed(3)) else {
        panic!("expected a pick");
    };
    assert_eq!(pick.item.label, "Delta");
    assert_eq!(pick.next.remaining, 503);
    assert_eq!(s.codec.encode(&pick.next), "mdz");
}

#[test]
fn nine_participants_draw_a_permutation() {
    let s = setup();
    let mut rng = RngSource(StdRng::seed_from_u64(2024));
    let host = DrawState::fresh(s.codec.pool(), Some(1_700_000_000_000));
    let host_link = s.links.publish(&s.codec, &host).expect("link");
    let mut link = host_link.to_string();
    let mut picks = Vec::new();

    for participant in 0..9 {
        // Each participant rebuilds state from the link alone.
        let mode = s.links.resolve(&s.codec, Some(link.as_str()), 0);
        let LinkMode::Participant(state) = mode else {
            panic!("participant {participant} got an unusable link");
        };
        assert_eq!(state.remaining_count(), 9 - participant);
        assert_eq!(state.created_at, Some(1_700_000_000_000));

        let DrawOutcome::Picked(pick) = s.engine.draw(&state, &mut rng) else {
            panic!("participant {participant} found the pool exhausted");
        };
        picks.push(pick.item.label.clone());
        let next_link = s.links.publish(&s.codec, &pick.next).expect("link");
        link = next_link.to_string();
    }

    let final_mode = s.links.resolve(&s.codec, Some(link.as_str()), 0);
    let final_state = final_mode.state().expect("state");
    assert_eq!(final_state.remaining, 0);
    assert!(s.engine.draw(&final_state, &mut rng).is_exhausted());

    let unique: HashSet<&str> = picks.iter().map(String::as_str).collect();
    assert_eq!(picks.len(), 9);
    assert_eq!(unique.len(), 9);
    for item in s.codec.pool().iter() {
        assert!(unique.contains(item.label.as_str()), "{} never drawn", item.label);
    }
}

#[test]
fn racing_holders_of_one_link_diverge() {
    let s = setup();
    let state = s.codec.decode("me7").expect("decode");

    let DrawOutcome::Picked(first) = s.engine.draw(&state, &mut Fixed(0)) else {
        panic!("expected a pick");
    };
    let DrawOutcome::Picked(second) = s.engine.draw(&state, &mut Fixed(8)) else {
        panic!("expected a pick");
    };

    assert_ne!(s.codec.encode(&first.next), s.codec.encode(&second.next));
    assert_eq!(first.next.remaining_count(), second.next.remaining_count());
}

#[test]
fn legacy_link_continues_in_compact_grammar() {
    let s = setup();
    let legacy = s.codec.encode_legacy(&DrawState::new((1 << 2) | (1 << 5)));
    let link = s.links.link_for(&legacy).expect("link");

    let mode = s.links.resolve(&s.codec, Some(link.as_str()), 0);
    let state = mode.state().expect("state");
    assert_eq!(state.remaining, (1 << 2) | (1 << 5));

    let DrawOutcome::Picked(pick) = s.engine.draw(&state, &mut Fixed(1)) else {
        panic!("expected a pick");
    };
    assert_eq!(pick.item.label, "Foxtrot");
    assert_eq!(s.codec.encode(&pick.next), "m4");
}

#[test]
fn invalid_link_is_reported_not_fatal() {
    let s = setup();
    let link = "https://draw.example.test/?s=not-a-valid-token!!";
    let mode = s.links.resolve(&s.codec, Some(link), 0);
    assert_eq!(mode, LinkMode::Invalid);
}

#[test]
fn small_pool_scenario() {
    let pool = Pool::from_labels(&["one", "two", "three"]).expect("pool");
    let pool = Arc::new(pool);
    let codec = StateCodec::new(pool.clone());
    let engine = DrawEngine::new(pool.clone());
    let mut token = codec.encode(&DrawState::fresh(&pool, None));
    assert_eq!(token, "m7");

    for _ in 0..3 {
        let state = codec.decode(&token).expect("decode");
        let DrawOutcome::Picked(pick) = engine.draw(&state, &mut Fixed(0)) else {
            panic!("expected a pick");
        };
        token = codec.encode(&pick.next);
    }

    assert_eq!(token, "m0");
}
