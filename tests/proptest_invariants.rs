// 乱数で生成した局,手牌に対する不変条件のテスト
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use riichi_table::actor::{Actor, RandomDiscard};
use riichi_table::control::common::count_tiles;
use riichi_table::control::engine::{MahjongEngine, TurnState};
use riichi_table::control::wall::build_layout;
use riichi_table::hand::{decompose, is_complete, wait_tiles};
use riichi_table::model::*;

fn random_actors(seed: u64, call_rate: f64) -> [Box<dyn Actor>; SEAT] {
    [
        Box::new(RandomDiscard::new(seed, call_rate)),
        Box::new(RandomDiscard::new(seed + 10, call_rate)),
        Box::new(RandomDiscard::new(seed + 20, call_rate)),
        Box::new(RandomDiscard::new(seed + 30, call_rate)),
    ]
}

fn random_kind(rng: &mut StdRng) -> Tile {
    let ti = rng.gen_range(0..TYPE);
    let max = if ti == TZ { DR } else { 9 };
    Tile(ti, rng.gen_range(1..=max))
}

// 雀頭+4面子を組み合わせ,半分の確率で1枚を別の牌に置き換えた14枚
fn random_hand(seed: u64) -> TileTable {
    let mut rng = StdRng::seed_from_u64(seed);
    loop {
        let pair = random_kind(&mut rng);
        let mut tiles = vec![pair, pair];
        for _ in 0..4 {
            let t = random_kind(&mut rng);
            if t.is_suit() && t.1 <= 7 && rng.gen_bool(0.5) {
                tiles.extend([t, Tile(t.0, t.1 + 1), Tile(t.0, t.1 + 2)]);
            } else {
                tiles.extend([t, t, t]);
            }
        }
        if rng.gen_bool(0.5) {
            let i = rng.gen_range(0..tiles.len());
            tiles[i] = random_kind(&mut rng);
        }

        let mut tt = TileTable::default();
        for t in &tiles {
            tt[t.0][t.1] += 1;
        }
        if tt.iter().all(|tr| tr.iter().all(|&n| n <= TILE)) {
            return tt;
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn random_rounds_keep_tile_count(seed in 1u64..100_000) {
        let mut engine = MahjongEngine::new(seed, Rule::default(), random_actors(seed, 0.3), vec![]);
        // 各stepで牌の総数が検査され,不一致の場合はErrが返る
        engine.start_round().unwrap();
        while !engine.get_state().is_terminal() {
            prop_assert!(engine.step().is_ok());
        }
        prop_assert!(engine.get_round_result().is_some());

        let stg = engine.get_stage();
        let mut n = engine.get_draw_queue().len() + engine.get_dead_wall().unwrap().count();
        for pl in &stg.players {
            n += count_tiles(&pl.hand);
            n += pl.melds.iter().map(|m| m.tiles.len()).sum::<usize>();
            n += pl.discards.len();
        }
        prop_assert_eq!(n, N_TILE);
        prop_assert_eq!(engine.get_dead_wall().unwrap().count(), 14);
        prop_assert!(stg.n_kan <= 4);
        if engine.get_state() == TurnState::WallExhausted {
            prop_assert_eq!(stg.wall_count, 0);
        }
    }

    #[test]
    fn layout_preserves_inventory(seed in 0u64..100_000, dice in 2usize..=12, dealer in 0usize..SEAT) {
        let mut rng = StdRng::seed_from_u64(seed);
        let layout = build_layout(&mut rng, 1, dice, dealer);
        let dead = layout.dead_wall.tiles();
        let mut tt = TileTable::default();
        let all = layout
            .hands
            .iter()
            .flatten()
            .chain(layout.draw_queue.iter())
            .chain(dead.iter());
        let mut n = 0;
        for t in all {
            let t = t.to_normal();
            tt[t.0][t.1] += 1;
            n += 1;
        }
        prop_assert_eq!(n, N_TILE);
        for ti in 0..TYPE {
            let max = if ti == TZ { DR } else { 9 };
            for ni in 1..=max {
                prop_assert_eq!(tt[ti][ni], TILE);
            }
        }
        prop_assert_eq!(layout.draw_queue.len(), 70);
    }

    #[test]
    fn is_complete_agrees_with_decompose(seed in 0u64..1_000_000) {
        let hand = random_hand(seed);
        prop_assert_eq!(is_complete(&hand, &[]), !decompose(&hand).is_empty());
    }

    #[test]
    fn waits_complete_the_hand(seed in 0u64..1_000_000) {
        let mut hand = random_hand(seed);
        // 14枚から1枚抜いて13枚にする
        let (ti, ni) = (0..TYPE)
            .flat_map(|ti| (1..TNUM).map(move |ni| (ti, ni)))
            .find(|&(ti, ni)| hand[ti][ni] > 0)
            .unwrap();
        hand[ti][ni] -= 1;
        for w in wait_tiles(&hand, &[]) {
            let mut h = hand;
            h[w.0][w.1] += 1;
            prop_assert!(is_complete(&h, &[]));
            prop_assert!(!decompose(&h).is_empty());
        }
    }
}
