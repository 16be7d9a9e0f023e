use std::collections::VecDeque;

use rand::prelude::*;

use super::common::{count_tile, dec_tile, inc_tile, tiles_from_tile_table};
use super::dead_wall::{DeadWall, DEAD_LEN, N_INDICATOR, REPLACEMENT_SLOTS};
use super::string::tiles_from_string;
use crate::model::*;
use crate::util::misc::Res;

pub const WALL_LEN: usize = 17; // 山1辺のstack数

// 山の1辺 (2段x17列). rows[0]が上段
#[derive(Debug, Clone)]
pub struct Wall {
    pub rows: [[Tile; WALL_LEN]; 2],
}

// 王牌を取り除いた後の山
#[derive(Debug, Clone)]
pub struct CarvedWalls {
    pub walls: [Wall; SEAT],
    pub removed: [[bool; WALL_LEN]; SEAT], // 王牌として取り除かれたstack
    pub wall_index: usize,                 // 王牌の開始位置の山
    pub tile_index: usize,                 // 王牌の開始位置のstack
}

impl CarvedWalls {
    pub fn count(&self) -> usize {
        let n_removed: usize = self
            .removed
            .iter()
            .map(|r| r.iter().filter(|&&b| b).count())
            .sum();
        (SEAT * WALL_LEN - n_removed) * 2
    }
}

// 局の開始時の配置
#[derive(Debug, Clone)]
pub struct WallLayout {
    pub dice: usize,
    pub hands: [Vec<Tile>; SEAT],
    pub draw_queue: VecDeque<Tile>,
    pub dead_wall: DeadWall,
}

pub fn build_inventory(n_red5: usize) -> Vec<Tile> {
    assert!(n_red5 <= TILE);
    let mut inventory = Vec::with_capacity(N_TILE);
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            if ti == TZ && ni > DR {
                break;
            }
            for n in 0..TILE {
                let ni2 = if ti != TZ && ni == 5 && n < n_red5 {
                    0
                } else {
                    ni
                }; // 赤5
                inventory.push(Tile(ti, ni2));
            }
        }
    }
    inventory
}

pub fn shuffle_and_partition<R: Rng + ?Sized>(mut inventory: Vec<Tile>, rng: &mut R) -> [Wall; SEAT] {
    assert_eq!(inventory.len(), N_TILE);
    inventory.shuffle(rng);
    partition(&inventory)
}

fn partition(tiles: &[Tile]) -> [Wall; SEAT] {
    assert_eq!(tiles.len(), N_TILE);
    std::array::from_fn(|w| {
        let mut rows = [[Z8; WALL_LEN]; 2];
        for r in 0..2 {
            for c in 0..WALL_LEN {
                rows[r][c] = tiles[w * 2 * WALL_LEN + r * WALL_LEN + c];
            }
        }
        Wall { rows }
    })
}

// サイコロの目から王牌の位置を決定して切り出す
// 選択された山に収まらない場合は前の山の先頭から続ける
pub fn carve_dead_wall(walls: [Wall; SEAT], dice: usize) -> (DeadWall, CarvedWalls) {
    assert!((2..=12).contains(&dice), "invalid dice: {}", dice);
    let w = (dice - 1) % SEAT;
    let ti = WALL_LEN - dice;
    let prev = (w + SEAT - 1) % SEAT;

    let mut removed = [[false; WALL_LEN]; SEAT];
    let mut tiles = [[Z8; DEAD_LEN]; 2];
    for i in 0..DEAD_LEN {
        let (wi, c) = if ti + i < WALL_LEN {
            (w, ti + i)
        } else {
            (prev, ti + i - WALL_LEN)
        };
        removed[wi][c] = true;
        for r in 0..2 {
            tiles[r][i] = walls[wi].rows[r][c];
        }
    }

    let carved = CarvedWalls {
        walls,
        removed,
        wall_index: w,
        tile_index: ti,
    };
    (DeadWall::new(tiles), carved)
}

// 各山に残ったstackを左から順に返す
// 王牌の右側に残ったstackは前の山の先頭に付け替える
fn remaining_stacks(carved: &CarvedWalls) -> [Vec<(usize, usize)>; SEAT] {
    let w = carved.wall_index;
    let prev = (w + SEAT - 1) % SEAT;
    let mut stacks: [Vec<(usize, usize)>; SEAT] = Default::default();
    for wi in 0..SEAT {
        if wi == prev {
            for c in carved.tile_index..WALL_LEN {
                if !carved.removed[w][c] {
                    stacks[wi].push((w, c));
                }
            }
        }
        for c in 0..WALL_LEN {
            if carved.removed[wi][c] || (wi == w && c >= carved.tile_index) {
                continue;
            }
            stacks[wi].push((wi, c));
        }
    }
    stacks
}

// ツモ順に並べる. 山の順に,各山の上段を右から,続けて下段を右から
pub fn linearize_draw_queue(carved: &CarvedWalls) -> VecDeque<Tile> {
    let mut queue = VecDeque::with_capacity(carved.count());
    for stacks in remaining_stacks(carved) {
        for r in 0..2 {
            for &(wi, c) in stacks.iter().rev() {
                queue.push_back(carved.walls[wi].rows[r][c]);
            }
        }
    }
    queue
}

// 親から順に3枚ずつ4周,その後1枚ずつ配る
pub fn deal_initial_hands(queue: &mut VecDeque<Tile>, dealer: Seat) -> [Vec<Tile>; SEAT] {
    assert!(queue.len() >= SEAT * N_HAND);
    let mut hands: [Vec<Tile>; SEAT] = Default::default();
    for _ in 0..4 {
        for i in 0..SEAT {
            let s = (dealer + i) % SEAT;
            hands[s].extend(queue.drain(..3));
        }
    }
    for i in 0..SEAT {
        let s = (dealer + i) % SEAT;
        if let Some(t) = queue.pop_front() {
            hands[s].push(t);
        }
    }
    hands
}

pub fn roll_dice<R: Rng + ?Sized>(rng: &mut R) -> usize {
    rng.gen_range(1..=6) + rng.gen_range(1..=6)
}

// 牌の生成から配牌までを一括で行う
pub fn build_layout<R: Rng + ?Sized>(
    rng: &mut R,
    n_red5: usize,
    dice: usize,
    dealer: Seat,
) -> WallLayout {
    let walls = shuffle_and_partition(build_inventory(n_red5), rng);
    let (dead_wall, carved) = carve_dead_wall(walls, dice);
    let mut draw_queue = linearize_draw_queue(&carved);
    let hands = deal_initial_hands(&mut draw_queue, dealer);
    WallLayout {
        dice,
        hands,
        draw_queue,
        dead_wall,
    }
}

// デバッグ用に作為的な配置を生成 指定がない場所はシード値に従ってランダムに生成
#[derive(Debug, Clone, Default)]
pub struct LayoutPreset<'a> {
    pub hands: [&'a str; SEAT], // 各座席の配牌 (最大13枚)
    pub draws: &'a str,         // ツモ山の先頭 最初の牌は親の14枚目
    pub indicators: &'a str,    // ドラ表示牌 (最大5枚)
    pub replacements: &'a str,  // 嶺上牌 (最大4枚)
}

pub fn create_layout_debug(preset: &LayoutPreset<'_>, seed: u64, n_red5: usize) -> Res<WallLayout> {
    let hands: Vec<Vec<Tile>> = preset
        .hands
        .iter()
        .map(|h| tiles_from_string(h))
        .collect::<Res<_>>()?;
    let draws = tiles_from_string(preset.draws)?;
    let indicators = tiles_from_string(preset.indicators)?;
    let replacements = tiles_from_string(preset.replacements)?;
    if hands.iter().any(|h| h.len() > N_HAND)
        || indicators.len() > N_INDICATOR
        || replacements.len() > REPLACEMENT_SLOTS.len()
    {
        Err("too many preset tiles")?;
    }

    let mut tt = TileTable::default();
    for t in build_inventory(n_red5) {
        inc_tile(&mut tt, t);
    }
    let fixed = hands.iter().flatten().chain(&draws).chain(&indicators).chain(&replacements);
    for &t in fixed {
        if count_tile(&tt, t) == 0 {
            Err(format!("too many copies of {} in preset", t))?;
        }
        dec_tile(&mut tt, t);
    }

    // 余った牌をランダムにシャッフル
    let mut remain = tiles_from_tile_table(&tt);
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    remain.shuffle(&mut rng);
    let mut take = || remain.pop().ok_or("tile shortage");

    let mut dead = [[Z8; DEAD_LEN]; 2];
    for i in 0..N_INDICATOR {
        dead[0][i + 1] = match indicators.get(i) {
            Some(&t) => t,
            None => take()?,
        };
    }
    for (i, &(r, c)) in REPLACEMENT_SLOTS.iter().enumerate() {
        dead[r][c] = match replacements.get(i) {
            Some(&t) => t,
            None => take()?,
        };
    }
    for r in 0..2 {
        for c in 0..DEAD_LEN {
            if dead[r][c] == Z8 {
                dead[r][c] = take()?;
            }
        }
    }

    let mut layout_hands: [Vec<Tile>; SEAT] = Default::default();
    for (s, h) in hands.into_iter().enumerate() {
        let mut h = h;
        while h.len() < N_HAND {
            h.push(take()?);
        }
        layout_hands[s] = h;
    }

    let mut draw_queue: VecDeque<Tile> = draws.into_iter().collect();
    while let Ok(t) = take() {
        draw_queue.push_back(t);
    }

    Ok(WallLayout {
        dice: 7,
        hands: layout_hands,
        draw_queue,
        dead_wall: DeadWall::new(dead),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::common::tiles_to_tile_table;

    // シャッフルしていない山
    fn indexed_walls() -> [Wall; SEAT] {
        let inventory = build_inventory(0);
        partition(&inventory)
    }

    fn sorted(mut v: Vec<Tile>) -> Vec<Tile> {
        v.sort();
        v
    }

    #[test]
    fn test_inventory() {
        let inv = build_inventory(1);
        assert_eq!(inv.len(), N_TILE);
        let tt = tiles_to_tile_table(&inv);
        for ti in 0..3 {
            assert_eq!(tt[ti][0], 1);
            assert_eq!(tt[ti][5], 4);
        }
        assert_eq!(tt[TZ][DR], 4);
        assert_eq!(tt[TZ][UK], 0);
    }

    #[test]
    fn test_carve_boundaries() {
        // (dice, 王牌の開始の山, 開始stack, 前の山に続く枚数)
        for (dice, w, ti, overflow) in [(2, 1, 15, 5), (6, 1, 11, 1), (7, 2, 10, 0), (12, 3, 5, 0)] {
            let walls = indexed_walls();
            let (dw, carved) = carve_dead_wall(walls.clone(), dice);
            assert_eq!(carved.wall_index, w);
            assert_eq!(carved.tile_index, ti);
            assert_eq!(dw.count(), 14);
            assert_eq!(carved.count(), N_TILE - 14);

            let prev = (w + SEAT - 1) % SEAT;
            let n_prev = carved.removed[prev].iter().filter(|&&b| b).count();
            assert_eq!(n_prev, overflow);
            let tiles = dw.tiles();
            assert_eq!(tiles[0], walls[w].rows[0][ti]);
            if overflow > 0 {
                assert_eq!(tiles[DEAD_LEN - 1], walls[prev].rows[0][overflow - 1]);
            } else {
                assert_eq!(tiles[DEAD_LEN - 1], walls[w].rows[0][ti + DEAD_LEN - 1]);
            }
        }
    }

    #[test]
    fn test_linearize_order() {
        let walls = indexed_walls();
        let (_, carved) = carve_dead_wall(walls.clone(), 7);
        let queue = linearize_draw_queue(&carved);
        assert_eq!(queue.len(), N_TILE - 14);
        // 山0の上段を右から,続けて下段を右から
        assert_eq!(queue[0], walls[0].rows[0][16]);
        assert_eq!(queue[1], walls[0].rows[0][15]);
        assert_eq!(queue[16], walls[0].rows[0][0]);
        assert_eq!(queue[17], walls[0].rows[1][16]);
        assert_eq!(queue[34], walls[1].rows[0][16]);
        // 王牌の山は左側の10stackのみ
        assert_eq!(queue[68], walls[2].rows[0][9]);
        assert_eq!(queue[78], walls[2].rows[1][9]);
        assert_eq!(queue[88], walls[3].rows[0][16]);
        assert_eq!(queue[queue.len() - 1], walls[3].rows[1][0]);

        // dice=12: 王牌の右側の5stackは前の山(山2)の右端に続く
        let (_, carved) = carve_dead_wall(walls.clone(), 12);
        let queue = linearize_draw_queue(&carved);
        assert_eq!(queue.len(), N_TILE - 14);
        assert_eq!(queue[68], walls[2].rows[0][16]);
        assert_eq!(queue[84], walls[2].rows[0][0]);
        assert_eq!(queue[85], walls[3].rows[0][16]);
        assert_eq!(queue[89], walls[3].rows[0][12]);
        assert_eq!(queue[90], walls[2].rows[1][16]);
        assert_eq!(queue[111], walls[3].rows[1][12]);
        assert_eq!(queue[112], walls[3].rows[0][4]);
        assert_eq!(queue[121], walls[3].rows[1][0]);

        // dice=2: 前の山(山0)の左側5stackが王牌
        let (_, carved) = carve_dead_wall(walls.clone(), 2);
        let queue = linearize_draw_queue(&carved);
        assert_eq!(queue[0], walls[0].rows[0][16]);
        assert_eq!(queue[11], walls[0].rows[0][5]);
        assert_eq!(queue[12], walls[0].rows[1][16]);
        assert_eq!(queue[24], walls[1].rows[0][14]);
    }

    #[test]
    fn test_multiset_preserved() {
        let mut rng = StdRng::seed_from_u64(0);
        for dice in 2..=12 {
            let layout = build_layout(&mut rng, 1, dice, dice % SEAT);
            let mut all = layout.dead_wall.tiles();
            all.extend(layout.draw_queue.iter());
            for h in &layout.hands {
                assert_eq!(h.len(), N_HAND);
                all.extend(h);
            }
            assert_eq!(layout.draw_queue.len(), 70);
            assert_eq!(sorted(all), sorted(build_inventory(1)));
        }
    }

    #[test]
    fn test_deal_order() {
        let mut queue: VecDeque<Tile> = build_inventory(0).into_iter().collect();
        let first: Vec<Tile> = queue.iter().take(3).copied().collect();
        let hands = deal_initial_hands(&mut queue, 2);
        assert_eq!(hands[2][..3], first[..]);
        assert_eq!(queue.len(), N_TILE - SEAT * N_HAND);
    }

    #[test]
    fn test_layout_debug() {
        let preset = LayoutPreset {
            hands: ["m111222333p789z1", "", "", ""],
            draws: "z1",
            indicators: "s9",
            replacements: "z7",
        };
        let layout = create_layout_debug(&preset, 0, 1).unwrap();
        assert_eq!(layout.hands[0], tiles_from_string("m111222333p789z1").unwrap());
        assert_eq!(layout.draw_queue[0], Tile(TZ, WE));
        assert_eq!(layout.draw_queue.len(), 70);
        assert_eq!(layout.dead_wall.indicators(), vec![Tile(TS, 9)]);

        let bad = LayoutPreset {
            hands: ["z11111", "", "", ""],
            ..Default::default()
        };
        assert!(create_layout_debug(&bad, 0, 1).is_err());
    }
}
