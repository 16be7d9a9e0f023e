use crate::control::common::{count_tiles, distinct_tiles, tiles_with_red5};
use crate::model::*;

// [完成形判定 (面子, 雀頭)]
// 手牌はTileTableで受け取り,赤5の列(index 0)は無視する

// それぞれの牌種について"枚数を3で割った余り"と"余り数の集計"を返却
fn calc_mods_cnts(hand: &TileTable) -> ([usize; TYPE], [usize; 3]) {
    let mut mods = [0; TYPE];
    for ti in 0..TYPE {
        mods[ti] = hand[ti][1..TNUM].iter().sum();
        mods[ti] %= 3;
    }

    let mut cnts = [0; 3];
    for ti in 0..TYPE {
        cnts[mods[ti]] += 1;
    }

    (mods, cnts)
}

// 面子のみで構成されているかの判定
// 小さい数字から順に,刻子にできない余りをその数字から始まる順子で消費する
fn is_sets(tr: &TileRow, ti: Type) -> bool {
    let (mut n0, mut n1, mut n2);
    n0 = tr[1];
    n1 = tr[2];
    for i in 1..8 {
        n2 = tr[i + 2];
        let n = n0 % 3;
        if (ti == TZ && n != 0) || (n1 < n || n2 < n) {
            return false;
        }
        n0 = n1 - n;
        n1 = n2 - n;
    }
    n0 % 3 == 0 && n1 % 3 == 0
}

// 牌種が完成面子+雀頭の場合において雀頭候補となる数字を返す
// [1,4,7], [2,5,8], [3,6,9] のいずれか
fn calc_pair_candidate_index(tr: &TileRow) -> [Tnum; 3] {
    // 面子の和は3で割り切れるので余りの値によって雀頭候補を絞り込める
    let mut sum = 0;
    for i in 1..TNUM {
        sum += i * tr[i];
    }
    let mod3 = sum % 3;
    [3 - mod3, 6 - mod3, 9 - mod3]
}

// 牌種が完成面子+雀頭のみで構成されている場合,雀頭のリストを返す.
// 基本的に1つだが,3113,3111113のような形の場合2つ
fn calc_pair_candidate(tr: &TileRow, ti: Type) -> Vec<Tile> {
    let mut tr = *tr;
    let mut res = vec![];
    for ni in calc_pair_candidate_index(&tr) {
        if tr[ni] < 2 {
            continue;
        }
        tr[ni] -= 2;
        if is_sets(&tr, ti) {
            res.push(Tile(ti, ni));
        }
        tr[ni] += 2;
    }
    res
}

// 和了形である場合,雀頭候補のリストを返却
fn calc_possible_pairs(hand: &TileTable) -> Vec<Tile> {
    let (mods, cnts) = calc_mods_cnts(hand);
    if cnts[1] != 0 || cnts[2] != 1 {
        return vec![];
    }

    let mut res = vec![];
    for ti in 0..TYPE {
        if mods[ti] == 2 {
            res = calc_pair_candidate(&hand[ti], ti);
            if res.is_empty() {
                return vec![];
            }
        } else if !is_sets(&hand[ti], ti) {
            return vec![];
        }
    }
    res
}

// 4面子1雀頭の和了形判定. 手牌の枚数は 14 - (副露数) * 3 でなければならない
pub fn is_complete(hand: &TileTable, melds: &[Meld]) -> bool {
    if melds.len() > 4 || count_tiles(hand) != 3 * (4 - melds.len()) + 2 {
        return false;
    }
    !calc_possible_pairs(hand).is_empty()
}

// [分解]

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Block {
    Sequence(Tile), // 先頭の牌
    Triplet(Tile),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    pub pair: Tile,
    pub blocks: Vec<Block>, // ソート済み
}

// 手牌を雀頭+面子に分解するすべての方法を列挙 (全探索)
pub fn decompose(hand: &TileTable) -> Vec<Decomposition> {
    let mut tt = *hand;
    for tr in tt.iter_mut() {
        tr[0] = 0;
    }
    if count_tiles(&tt) % 3 != 2 {
        return vec![];
    }

    let mut res = vec![];
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            if tt[ti][ni] < 2 {
                continue;
            }
            tt[ti][ni] -= 2;
            let mut blocks = vec![];
            let mut found = vec![];
            search_blocks(&mut tt, &mut blocks, &mut found);
            for mut bs in found {
                bs.sort();
                res.push(Decomposition {
                    pair: Tile(ti, ni),
                    blocks: bs,
                });
            }
            tt[ti][ni] += 2;
        }
    }
    res.dedup();
    res
}

// 最も小さい牌は刻子の一部か,その牌から始まる順子の先頭のいずれか
fn search_blocks(tt: &mut TileTable, blocks: &mut Vec<Block>, found: &mut Vec<Vec<Block>>) {
    let first = (0..TYPE)
        .flat_map(|ti| (1..TNUM).map(move |ni| (ti, ni)))
        .find(|&(ti, ni)| tt[ti][ni] > 0);
    let (ti, ni) = match first {
        Some(p) => p,
        None => {
            found.push(blocks.clone());
            return;
        }
    };

    if tt[ti][ni] >= 3 {
        tt[ti][ni] -= 3;
        blocks.push(Block::Triplet(Tile(ti, ni)));
        search_blocks(tt, blocks, found);
        blocks.pop();
        tt[ti][ni] += 3;
    }

    if ti != TZ && ni <= 7 && tt[ti][ni + 1] > 0 && tt[ti][ni + 2] > 0 {
        for k in 0..3 {
            tt[ti][ni + k] -= 1;
        }
        blocks.push(Block::Sequence(Tile(ti, ni)));
        search_blocks(tt, blocks, found);
        blocks.pop();
        for k in 0..3 {
            tt[ti][ni + k] += 1;
        }
    }
}

// [待ち判定]

fn all_tile_kinds() -> impl Iterator<Item = Tile> {
    (0..TYPE).flat_map(|ti| {
        let max = if ti == TZ { DR } else { 9 };
        (1..=max).map(move |ni| Tile(ti, ni))
    })
}

// 13 - (副露数) * 3 枚の手牌の待ち牌一覧 (赤5は通常の5として返却)
// 手牌で4枚使用している牌は除外
pub fn wait_tiles(hand: &TileTable, melds: &[Meld]) -> Vec<Tile> {
    let mut hand = *hand;
    let mut res = vec![];
    for t in all_tile_kinds() {
        if hand[t.0][t.1] >= TILE {
            continue;
        }
        hand[t.0][t.1] += 1;
        if is_complete(&hand, melds) {
            res.push(t);
        }
        hand[t.0][t.1] -= 1;
    }
    res
}

// ツモ番の手牌において聴牌となる打牌と待ちの組み合わせの一覧を返却
// 赤5と通常の5は別の打牌として返却
pub fn tenpai_discards(hand: &TileTable, melds: &[Meld]) -> Vec<(Tile, Vec<Tile>)> {
    collect_tenpai_discards(hand, |h| wait_tiles(h, melds))
}

fn collect_tenpai_discards(
    hand: &TileTable,
    waits: impl Fn(&TileTable) -> Vec<Tile>,
) -> Vec<(Tile, Vec<Tile>)> {
    let mut res = vec![];
    let mut h = *hand;
    // 赤5と通常の5はまとめて処理
    let mut kinds: Vec<Tile> = distinct_tiles(hand).into_iter().map(|t| t.to_normal()).collect();
    kinds.dedup();
    for n in kinds {
        h[n.0][n.1] -= 1;
        let v = waits(&h);
        h[n.0][n.1] += 1;
        if v.is_empty() {
            continue;
        }
        for t2 in tiles_with_red5(hand, n) {
            res.push((t2, v.clone()));
        }
    }
    res.sort_by_key(|e| e.0);
    res
}

// [特殊形]

// 七対子 (同じ牌4枚は2対子として扱わない)
pub fn is_chiitoitsu_win(hand: &TileTable) -> bool {
    let mut n_pair = 0;
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            match hand[ti][ni] {
                0 => {}
                2 => n_pair += 1,
                _ => return false,
            }
        }
    }
    n_pair == 7
}

// 国士無双
pub fn is_kokushimusou_win(hand: &TileTable) -> bool {
    let mut count = 0;
    for ti in 0..TZ {
        if hand[ti][1] == 0 || hand[ti][9] == 0 {
            return false;
        }
        for ni in 2..9 {
            if hand[ti][ni] != 0 {
                return false;
            }
        }
        count += hand[ti][1] + hand[ti][9]
    }
    for ni in 1..=DR {
        if hand[TZ][ni] == 0 {
            return false;
        }
        count += hand[TZ][ni]
    }
    count == 14
}

// 和了形判定 (irregular: 七対子,国士無双を含める)
pub fn is_winning_hand(hand: &TileTable, melds: &[Meld], irregular: bool) -> bool {
    if is_complete(hand, melds) {
        return true;
    }
    irregular
        && melds.is_empty()
        && (is_chiitoitsu_win(hand) || is_kokushimusou_win(hand))
}

// 和了牌一覧 (irregular: 七対子,国士無双を含める)
pub fn winning_tiles(hand: &TileTable, melds: &[Meld], irregular: bool) -> Vec<Tile> {
    if !irregular {
        return wait_tiles(hand, melds);
    }
    let mut hand = *hand;
    let mut res = vec![];
    for t in all_tile_kinds() {
        if hand[t.0][t.1] >= TILE {
            continue;
        }
        hand[t.0][t.1] += 1;
        if is_winning_hand(&hand, melds, true) {
            res.push(t);
        }
        hand[t.0][t.1] -= 1;
    }
    res
}

// winning_tilesに対応する聴牌打牌一覧
pub fn winning_discards(
    hand: &TileTable,
    melds: &[Meld],
    irregular: bool,
) -> Vec<(Tile, Vec<Tile>)> {
    collect_tenpai_discards(hand, |h| winning_tiles(h, melds, irregular))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::common::tiles_to_tile_table;
    use crate::control::string::{meld_from_string, tiles_from_string};

    fn tt(s: &str) -> TileTable {
        tiles_to_tile_table(&tiles_from_string(s).unwrap())
    }

    fn tiles(s: &str) -> Vec<Tile> {
        tiles_from_string(s).unwrap()
    }

    #[test]
    fn test_is_complete() {
        assert!(is_complete(&tt("m123456789p11z777"), &[]));
        assert!(is_complete(&tt("m111222333p055s99"), &[]));
        assert!(!is_complete(&tt("m123456789p12z777"), &[]));
        assert!(!is_complete(&tt("z11223344556677"), &[])); // 七対子は通常形ではない
        // 字牌の順子は認めない
        assert!(!is_complete(&tt("m111222333z12355"), &[]));
        // 枚数不一致
        assert!(!is_complete(&tt("m123456789p11z77"), &[]));
    }

    #[test]
    fn test_triplets_minus_one() {
        // 4刻子+雀頭から1枚でも抜くと和了形ではない
        let full = tiles("m111222333p555s99");
        assert!(is_complete(&tiles_to_tile_table(&full), &[]));
        for i in 0..full.len() {
            let mut rest = full.clone();
            rest.remove(i);
            assert!(!is_complete(&tiles_to_tile_table(&rest), &[]), "removed {}", full[i]);
        }
    }

    #[test]
    fn test_is_complete_with_melds() {
        let melds = vec![meld_from_string("z7+77", 0).unwrap()];
        assert!(is_complete(&tt("m123456789p11"), &melds));
        assert!(!is_complete(&tt("m123456789p11z77"), &melds));
    }

    #[test]
    fn test_greedy_counterexamples() {
        // 先頭から貪欲に刻子を取ると失敗する形
        for h in [
            "m11123p123p456s789",
            "m11122233344455",
            "p11112222333344",
            "s222345678z11555",
        ] {
            assert!(is_complete(&tt(h), &[]), "{}", h);
            assert!(!decompose(&tt(h)).is_empty(), "{}", h);
        }
    }

    #[test]
    fn test_decompose() {
        // 111222333は3刻子と3順子の2通り
        let ds = decompose(&tt("m111222333p789s55"));
        assert_eq!(ds.len(), 2);
        assert!(ds.iter().all(|d| d.pair == Tile(TS, 5)));
        assert!(ds.iter().any(|d| d.blocks.contains(&Block::Triplet(Tile(TM, 1)))));
        assert!(ds.iter().any(|d| d.blocks.iter().filter(|&&b| b == Block::Sequence(Tile(TM, 1))).count() == 3));
        assert!(decompose(&tt("m123456789p12z777")).is_empty());
    }

    #[test]
    fn test_wait_tiles() {
        assert_eq!(wait_tiles(&tt("s123555p66z22777"), &[]), tiles("p6z2"));
        assert!(wait_tiles(&tt("s123555p66z2777"), &[]).is_empty()); // 12枚
        assert_eq!(wait_tiles(&tt("m1112345678999"), &[]), tiles("m123456789"));
        // 4枚使いの牌は待ちに含めない
        assert_eq!(wait_tiles(&tt("m1111234p456s789"), &[]), tiles("m4"));
        assert!(wait_tiles(&tt("m1357p2468s1357z1"), &[]).is_empty());
    }

    #[test]
    fn test_tenpai_discards() {
        let res = tenpai_discards(&tt("m123456789p06s11z1"), &[]);
        assert_eq!(res, vec![(Tile(TZ, WE), tiles("p47"))]);

        // 赤5と通常5は別の打牌
        let res = tenpai_discards(&tt("m123456789p055z11"), &[]);
        let discards: Vec<Tile> = res.iter().map(|e| e.0).collect();
        assert!(discards.contains(&Tile(TP, 0)));
        assert!(discards.contains(&Tile(TP, 5)));
    }

    #[test]
    fn test_irregular_hands() {
        let h = tt("m1199p1199s1199z1");
        let mut h14 = h;
        h14[TZ][WE] += 1;
        assert!(is_winning_hand(&h14, &[], true));
        assert!(!is_winning_hand(&h14, &[], false));
        assert_eq!(winning_tiles(&h, &[], true), tiles("z1"));
        assert!(winning_tiles(&h, &[], false).is_empty());

        let k = tt("m19p19s19z1234567");
        assert_eq!(winning_tiles(&k, &[], true).len(), 13);
        assert!(is_kokushimusou_win(&tt("m119p19s19z1234567")));
        assert!(!is_chiitoitsu_win(&tt("m1111p1199s1199z11")));
    }
}
