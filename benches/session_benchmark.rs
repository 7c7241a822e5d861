//! Performance benchmarks for bowwow sessions
//!
//! Measures the three steps of every request against the bundled workbook:
//! starting a session, resuming one from its token, and the full
//! decode-advance-encode cycle.

use bowwow::{
    catalogue::{CatalogueLoader, DeckCatalogue},
    logger::{LogFormat, SessionLogger, VerbosityLevel},
    service::{self, Operation, Request},
    session::{self, GameSession},
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

fn load_catalogue() -> DeckCatalogue {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("cards/wnrs.cards");
    match CatalogueLoader::load_from_file(&path) {
        Ok(catalogue) => catalogue,
        Err(e) => panic!("Failed to load {}: {e}", path.display()),
    }
}

fn bench_start(c: &mut Criterion) {
    let catalogue = load_catalogue();
    let decks = catalogue.deck_ids();
    let mut rng = StdRng::seed_from_u64(42);

    c.bench_function("start_all_decks", |b| {
        b.iter(|| {
            let session = GameSession::start_with_rng(&catalogue, &decks, &mut rng).unwrap();
            black_box(session.len())
        })
    });
}

fn bench_restore(c: &mut Criterion) {
    let catalogue = load_catalogue();
    let session = GameSession::start(&catalogue, catalogue.deck_ids()).unwrap();
    let token = session::serialize(&session.state()).unwrap();

    c.bench_function("restore_from_token", |b| {
        b.iter(|| {
            let state = session::deserialize(black_box(&token)).unwrap();
            let session = GameSession::from_state(&catalogue, state).unwrap();
            black_box(session.cursor())
        })
    });
}

fn bench_request_cycle(c: &mut Criterion) {
    let catalogue = load_catalogue();
    let logger = SessionLogger::new(VerbosityLevel::Silent, LogFormat::Text);
    let mut rng = StdRng::seed_from_u64(42);
    let start = Request::Start {
        decks: catalogue.deck_ids(),
    };
    let token = service::handle(&catalogue, &start, &mut rng, &logger)
        .unwrap()
        .token;
    let next = Request::Resume {
        token,
        op: Operation::Next,
    };

    c.bench_function("request_next", |b| {
        b.iter(|| black_box(service::handle(&catalogue, &next, &mut rng, &logger).unwrap()))
    });
}

criterion_group!(benches, bench_start, bench_restore, bench_request_cycle);
criterion_main!(benches);
