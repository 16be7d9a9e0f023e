use super::common::*;
use crate::errors::{EngineError, EngineResult};
use crate::model::*;

// [鳴き判定]

pub fn can_kan(hand: &TileTable, t: Tile) -> bool {
    let t = t.to_normal();
    hand[t.0][t.1] >= 3
}

pub fn can_pon(hand: &TileTable, t: Tile) -> bool {
    let t = t.to_normal();
    hand[t.0][t.1] >= 2
}

// チーは打牌者の下家のみ
pub fn can_chii(hand: &TileTable, t: Tile, caller: Seat, discarder: Seat) -> bool {
    caller == (discarder + 1) % SEAT && !chii_candidates(hand, t).is_empty()
}

// チーで手牌から消費する2枚の組み合わせ一覧
// 赤5を含む組み合わせは別の候補として列挙
pub fn chii_candidates(hand: &TileTable, t: Tile) -> Vec<Vec<Tile>> {
    if t.is_hornor() {
        return vec![];
    }

    let mut check: Vec<(Tnum, Tnum)> = vec![];
    let Tile(ti, ni) = t.to_normal();
    if 3 <= ni {
        check.push((ni - 2, ni - 1)); // 右端をチー
    }
    if (2..=8).contains(&ni) {
        check.push((ni - 1, ni + 1)); // 嵌張をチー
    }
    if ni <= 7 {
        check.push((ni + 1, ni + 2)); // 左端をチー
    }

    let mut res = vec![];
    for (ni0, ni1) in check {
        for t0 in tiles_with_red5(hand, Tile(ti, ni0)) {
            for t1 in tiles_with_red5(hand, Tile(ti, ni1)) {
                res.push(vec![t0, t1]);
            }
        }
    }
    res
}

// ポン,槓で手牌から消費するn枚 (通常の5を優先して消費)
pub fn take_copies(hand: &TileTable, t: Tile, n: usize) -> Vec<Tile> {
    let t = t.to_normal();
    let n_red = if t.is_suit() && t.1 == 5 { hand[t.0][0] } else { 0 };
    let n_normal = hand[t.0][t.1] - n_red;
    let mut res = vec![t; n.min(n_normal)];
    while res.len() < n {
        res.push(Tile(t.0, 0));
    }
    res
}

// 打牌に対する鳴きの候補を優先度順 (槓 > ポン > チー, 同じ種別内は打牌者から順) に返却
// リーチ中のプレイヤー,牌山の最後の牌に対する鳴きは除外
pub fn calc_call_offers(stg: &Stage, discarder: Seat, tile: Tile) -> Vec<CallOffer> {
    if stg.wall_count == 0 {
        return vec![];
    }

    let mut offers = vec![];
    for call_type in [CallType::Kan, CallType::Pon, CallType::Chii] {
        for s in seats_after(discarder) {
            let pl = &stg.players[s];
            if pl.is_riichi {
                continue;
            }
            let h = &pl.hand;
            let candidates = match call_type {
                CallType::Kan if stg.can_declare_kan() && can_kan(h, tile) => {
                    vec![take_copies(h, tile, 3)]
                }
                CallType::Pon if can_pon(h, tile) => vec![take_copies(h, tile, 2)],
                CallType::Chii if can_chii(h, tile, s, discarder) => chii_candidates(h, tile),
                _ => continue,
            };
            offers.push(CallOffer {
                seat: s,
                call_type,
                tile,
                candidates,
            });
        }
    }
    offers
}

// 受理された鳴きが成立条件を満たしているか検証
pub fn validate_call(
    stg: &Stage,
    seat: Seat,
    call_type: CallType,
    discarder: Seat,
    tile: Tile,
    consumed: &[Tile],
) -> EngineResult {
    let malformed = || EngineError::MalformedCallAttempt {
        seat,
        call: call_type,
        tile,
    };
    let pl = &stg.players[seat];
    let h = &pl.hand;

    if stg.last_tile != Some((discarder, tile)) || seat == discarder || pl.is_riichi {
        return Err(malformed());
    }
    let ok = match call_type {
        CallType::Kan => stg.can_declare_kan() && can_kan(h, tile),
        CallType::Pon => can_pon(h, tile),
        CallType::Chii => can_chii(h, tile, seat, discarder),
    };
    if !ok || consumed.len() != call_type.consumed_count() {
        return Err(malformed());
    }

    // 消費する牌が手牌に存在するか
    let mut h = *h;
    for &t in consumed {
        if count_tile(&h, t) == 0 {
            return Err(EngineError::InvalidTileReference { seat, tile: t });
        }
        dec_tile(&mut h, t);
    }

    // 牌の組み合わせ
    let mut nis: Vec<Tnum> = consumed.iter().map(|t| t.to_normal().1).collect();
    nis.push(tile.to_normal().1);
    nis.sort();
    let same_type = consumed.iter().all(|t| t.0 == tile.0);
    let formed = match call_type {
        CallType::Kan | CallType::Pon => nis.windows(2).all(|w| w[0] == w[1]),
        CallType::Chii => nis[1] == nis[0] + 1 && nis[2] == nis[1] + 1,
    };
    if !same_type || !formed {
        return Err(malformed());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::string::tiles_from_string;

    fn tt(s: &str) -> TileTable {
        tiles_to_tile_table(&tiles_from_string(s).unwrap())
    }

    fn tiles(s: &str) -> Vec<Tile> {
        tiles_from_string(s).unwrap()
    }

    fn stage_with_hands(hands: [&str; SEAT]) -> Stage {
        let mut stg = Stage::default();
        for s in 0..SEAT {
            stg.players[s].seat = s;
            stg.players[s].hand = tt(hands[s]);
        }
        stg.wall_count = 50;
        stg
    }

    #[test]
    fn test_chii_candidates() {
        let h = tt("m34p4056");
        assert_eq!(chii_candidates(&h, Tile(TM, 2)), vec![tiles("m34")]);
        assert_eq!(chii_candidates(&h, Tile(TM, 5)), vec![tiles("m34")]);
        // 赤5は別の候補
        let cs = chii_candidates(&h, Tile(TP, 6));
        assert_eq!(cs, vec![tiles("p45"), tiles("p40")]);
        assert!(chii_candidates(&h, Tile(TZ, WE)).is_empty());
    }

    #[test]
    fn test_can_call() {
        let h = tt("m555p11z777");
        assert!(can_kan(&h, Tile(TM, 0)));
        assert!(can_pon(&h, Tile(TP, 1)));
        assert!(!can_kan(&h, Tile(TP, 1)));
        assert!(!can_pon(&h, Tile(TZ, WE)));
        let h = tt("m46");
        assert!(can_chii(&h, Tile(TM, 5), 1, 0));
        assert!(!can_chii(&h, Tile(TM, 5), 2, 0)); // 下家以外
    }

    #[test]
    fn test_take_copies() {
        let h = tt("p055");
        assert_eq!(take_copies(&h, Tile(TP, 5), 2), tiles("p55"));
        assert_eq!(take_copies(&h, Tile(TP, 5), 3), tiles("p550"));
    }

    #[test]
    fn test_offer_priority() {
        // seat0の打牌s3: seat1はチー,seat2はポン,seat3は槓が可能
        let mut stg = stage_with_hands(["m1", "s45z1", "s33z1", "s333"]);
        stg.last_tile = Some((0, Tile(TS, 3)));
        let offers = calc_call_offers(&stg, 0, Tile(TS, 3));
        let order: Vec<(Seat, CallType)> = offers.iter().map(|o| (o.seat, o.call_type)).collect();
        assert_eq!(
            order,
            vec![
                (3, CallType::Kan),
                (2, CallType::Pon),
                (3, CallType::Pon),
                (1, CallType::Chii),
            ]
        );

        // リーチ者には鳴きを提示しない
        stg.players[3].is_riichi = true;
        let offers = calc_call_offers(&stg, 0, Tile(TS, 3));
        assert!(offers.iter().all(|o| o.seat != 3));

        // 牌山の最後の牌は鳴けない
        stg.wall_count = 0;
        assert!(calc_call_offers(&stg, 0, Tile(TS, 3)).is_empty());
    }

    #[test]
    fn test_validate_call() {
        let mut stg = stage_with_hands(["m1", "s45z1", "s33z1", "s333"]);
        stg.last_tile = Some((0, Tile(TS, 3)));
        let t = Tile(TS, 3);
        assert!(validate_call(&stg, 1, CallType::Chii, 0, t, &tiles("s45")).is_ok());
        assert!(validate_call(&stg, 2, CallType::Pon, 0, t, &tiles("s33")).is_ok());
        assert_eq!(
            validate_call(&stg, 2, CallType::Chii, 0, t, &tiles("s45")),
            Err(EngineError::MalformedCallAttempt {
                seat: 2,
                call: CallType::Chii,
                tile: t
            })
        );
        assert_eq!(
            validate_call(&stg, 1, CallType::Chii, 0, t, &tiles("s24")),
            Err(EngineError::InvalidTileReference {
                seat: 1,
                tile: Tile(TS, 2)
            })
        );
        assert_eq!(
            validate_call(&stg, 2, CallType::Pon, 0, t, &[Tile(TS, 3), Tile(TS, 11)]),
            Err(EngineError::InvalidTileReference {
                seat: 2,
                tile: Tile(TS, 11)
            })
        );
        stg.n_kan = 4;
        assert!(validate_call(&stg, 3, CallType::Kan, 0, t, &tiles("s333")).is_err());
    }
}
