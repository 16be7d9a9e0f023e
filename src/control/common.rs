use crate::model::*;

// baseの次の座席から順に(base自身を除く)
pub fn seats_after(base_seat: Seat) -> impl Iterator<Item = Seat> {
    (1..SEAT).map(move |i| (base_seat + i) % SEAT)
}

// TileTable
// 赤5を区別して枚数を数える (Tile(ti, 5)は通常5のみ)
// 実在しない牌は0枚
pub fn count_tile(tt: &TileTable, t: Tile) -> usize {
    if !t.is_valid() {
        return 0;
    }
    if t.1 == 5 {
        tt[t.0][t.1] - tt[t.0][0]
    } else {
        tt[t.0][t.1]
    }
}

pub fn inc_tile(tt: &mut TileTable, tile: Tile) {
    let t = tile;
    tt[t.0][t.1] += 1;
    if t.1 == 0 {
        // 0は赤5のフラグなので本来の5をたてる
        tt[t.0][5] += 1;
    }
}

pub fn dec_tile(tt: &mut TileTable, tile: Tile) {
    let t = tile;
    assert!(count_tile(tt, t) != 0, "tile not in table: {}", t);
    tt[t.0][t.1] -= 1;
    if t.1 == 0 {
        tt[t.0][5] -= 1;
    }
}

pub fn count_tiles(tt: &TileTable) -> usize {
    tt.iter().map(|tr| tr[1..].iter().sum::<usize>()).sum()
}

pub fn tiles_from_tile_table(tt: &TileTable) -> Vec<Tile> {
    let mut hand = vec![];
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            for c in 0..tt[ti][ni] {
                if ti != TZ && ni == 5 && c < tt[ti][0] {
                    hand.push(Tile(ti, 0)); // 赤5
                } else {
                    hand.push(Tile(ti, ni));
                }
            }
        }
    }
    hand
}

pub fn tiles_to_tile_table(tiles: &[Tile]) -> TileTable {
    let mut tt = TileTable::default();
    for &t in tiles {
        inc_tile(&mut tt, t);
    }
    tt
}

// 手牌に存在する牌の種類 (赤5と通常5は別の牌として列挙)
pub fn distinct_tiles(tt: &TileTable) -> Vec<Tile> {
    let mut res = vec![];
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            if ti != TZ && ni == 5 {
                if tt[ti][0] > 0 {
                    res.push(Tile(ti, 0));
                }
                if tt[ti][5] > tt[ti][0] {
                    res.push(Tile(ti, 5));
                }
            } else if tt[ti][ni] > 0 {
                res.push(Tile(ti, ni));
            }
        }
    }
    res
}

pub fn tiles_with_red5(tt: &TileTable, t: Tile) -> Vec<Tile> {
    let t = t.to_normal();
    if tt[t.0][t.1] == 0 {
        return vec![];
    }

    let Tile(ti, ni) = t;
    let tr = tt[ti];
    if ni != 5 {
        return vec![t]; // 5ではない場合
    }
    if tr[0] == 0 {
        return vec![t]; // 通常5しかない場合
    }
    if tr[0] == tr[5] {
        return vec![Tile(ti, 0)]; // 赤5しかない場合
    }
    vec![t, Tile(ti, 0)] // 通常5と赤5の両方がある場合
}

// ドラ表示牌からドラを返却
pub fn dora_from_indicator(ind: Tile) -> Tile {
    let ni = if ind.is_hornor() {
        match ind.1 {
            WN => WE,
            DR => DW,
            i => i + 1,
        }
    } else {
        match ind.1 {
            9 => 1,
            0 => 6,
            _ => ind.1 + 1,
        }
    };
    Tile(ind.0, ni)
}

// 么九牌の種類数 (九種九牌の判定用)
pub fn count_end_kinds(tt: &TileTable) -> usize {
    let mut n = 0;
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            if tt[ti][ni] > 0 && Tile(ti, ni).is_end() && (ti != TZ || ni <= DR) {
                n += 1;
            }
        }
    }
    n
}

#[test]
fn test_tile_table_red5() {
    let mut tt = TileTable::default();
    inc_tile(&mut tt, Tile(TP, 0));
    inc_tile(&mut tt, Tile(TP, 5));
    assert_eq!(count_tile(&tt, Tile(TP, 0)), 1);
    assert_eq!(count_tile(&tt, Tile(TP, 5)), 1);
    assert_eq!(count_tiles(&tt), 2);
    assert_eq!(distinct_tiles(&tt), vec![Tile(TP, 0), Tile(TP, 5)]);
    dec_tile(&mut tt, Tile(TP, 0));
    assert_eq!(tiles_with_red5(&tt, Tile(TP, 0)), vec![Tile(TP, 5)]);

    // 実在しない牌
    assert_eq!(count_tile(&tt, Tile(TM, 12)), 0);
    assert_eq!(count_tile(&tt, Tile(TYPE, 1)), 0);
    assert_eq!(count_tile(&tt, Tile(TZ, UK)), 0);
}

#[test]
fn test_dora_from_indicator() {
    assert_eq!(dora_from_indicator(Tile(TM, 9)), Tile(TM, 1));
    assert_eq!(dora_from_indicator(Tile(TS, 0)), Tile(TS, 6));
    assert_eq!(dora_from_indicator(Tile(TZ, WN)), Tile(TZ, WE));
    assert_eq!(dora_from_indicator(Tile(TZ, DR)), Tile(TZ, DW));
    assert_eq!(dora_from_indicator(Tile(TZ, DW)), Tile(TZ, DG));
}
