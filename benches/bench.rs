use criterion::{black_box, criterion_group, criterion_main, Criterion};
use forest_core::{
    config::GameBalanceConfig,
    game::{
        data::GameDataBase,
        deck::Deck,
        map::{
            population::{pop_enemies, pop_rewards},
            MapField, Position,
        },
    },
};
use rand::{rngs::StdRng, SeedableRng};

fn bench_deck_draw(c: &mut Criterion) {
    let data = GameDataBase::load_embedded().expect("embedded catalog");
    let balance = GameBalanceConfig::default();
    let mut rng = StdRng::seed_from_u64(7);
    let cards = balance
        .player
        .initial_deck
        .iter()
        .map(|id| data.battle_cards.resolve(*id, &mut rng))
        .collect::<Result<Vec<_>, _>>()
        .expect("initial deck");

    c.bench_function("deck_draw_all", |b| {
        b.iter(|| {
            let mut deck = Deck::new(cards.clone());
            while let Some(card) = deck.draw(&mut rng) {
                black_box(card);
            }
        })
    });
}

fn bench_map_population(c: &mut Criterion) {
    let balance = GameBalanceConfig::default();
    let enemy_ids = vec!["fire_0".to_string(), "ice_0".to_string(), "wind_0".to_string()];
    let mut rng = StdRng::seed_from_u64(11);

    c.bench_function("map_populate", |b| {
        b.iter(|| {
            let mut field = MapField::new(6, 3, Position::new(0, 1), 11);
            black_box(pop_enemies(&mut field, &enemy_ids, &balance.map, &mut rng));
            black_box(pop_rewards(&mut field, &balance.map, &mut rng));
        })
    });
}

criterion_group!(benches, bench_deck_draw, bench_map_population);
criterion_main!(benches);
