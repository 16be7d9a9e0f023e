use crate::model::*;
use crate::util::misc::Res;

pub fn tile_type_from_char(ch: char) -> Res<Type> {
    match ch {
        'm' => Ok(TM),
        'p' => Ok(TP),
        's' => Ok(TS),
        'z' => Ok(TZ),
        _ => Err(format!("invalid tile type char: {}", ch))?,
    }
}

pub fn tile_type_to_char(ti: Type) -> char {
    ['m', 'p', 's', 'z'][ti]
}

pub fn tile_number_from_char(ch: char) -> Res<Tnum> {
    if let Some(i) = ch.to_digit(10) {
        Ok(i as Tnum)
    } else {
        Err(format!("invalid tile number char: {}", ch))?
    }
}

// "m123p0s55z77" 形式の文字列を牌のリストに変換
pub fn tiles_from_string(exp: &str) -> Res<Vec<Tile>> {
    let mut tiles = vec![];
    let mut ti = None;
    for ch in exp.chars() {
        match ch {
            'm' | 'p' | 's' | 'z' => ti = Some(tile_type_from_char(ch)?),
            '0'..='9' => {
                let ti = ti.ok_or("tile number before tile type")?;
                let t = Tile(ti, tile_number_from_char(ch)?);
                if !t.is_valid() {
                    Err(format!("invalid tile: {}", t))?;
                }
                tiles.push(t);
            }
            ' ' => {}
            _ => {
                Err(format!("invalid char: '{}'", ch))?;
            }
        }
    }
    Ok(tiles)
}

pub fn tiles_to_string(tiles: &[Tile]) -> String {
    let mut res = String::new();
    let mut last_ti = None;
    for t in tiles {
        if last_ti != Some(t.0) {
            last_ti = Some(t.0);
            res.push(tile_type_to_char(t.0));
        }
        res.push_str(&t.1.to_string());
    }
    res
}

// 副露の文字列表現 (例: "p4+56", "z7+77", "m5+550", "s[1111]")
// '+'の直前の牌が鳴いた牌. '+'の位置で鳴いた相手を表す (左:上家, 中:対面, 右:下家)
// 括弧で囲んだ4枚は暗槓
pub fn meld_from_string(exp: &str, seat: Seat) -> Res<Meld> {
    let concealed = exp.contains('[');
    let body: String = exp.chars().filter(|&c| c != '[' && c != ']').collect();
    let mut ti = None;
    let mut tiles = vec![];
    let mut claimed = None;
    for ch in body.chars() {
        match ch {
            'm' | 'p' | 's' | 'z' => ti = Some(tile_type_from_char(ch)?),
            '+' => {
                let &t = tiles.last().ok_or("invalid '+' position")?;
                if claimed.is_some() {
                    Err("multiple '+' in meld")?;
                }
                let pos = tiles.len() - 1;
                let offset = SEAT - 1 - pos.min(2); // 3:上家, 2:対面, 1:下家
                claimed = Some(((seat + offset) % SEAT, t));
            }
            '0'..='9' => {
                let ti = ti.ok_or("tile number before tile type")?;
                tiles.push(Tile(ti, tile_number_from_char(ch)?));
            }
            _ => {
                Err(format!("invalid char: '{}'", ch))?;
            }
        }
    }
    if tiles.iter().any(|t| !t.is_valid()) {
        Err(format!("invalid tile in meld: '{}'", exp))?;
    }

    let mut nis: Vec<Tnum> = tiles.iter().map(|t| t.to_normal().1).collect();
    nis.sort();
    let same_type = tiles.iter().all(|t| t.0 == tiles[0].0);
    let all_same = nis.windows(2).all(|w| w[0] == w[1]);
    let is_run = nis.len() == 3 && nis[1] == nis[0] + 1 && nis[2] == nis[1] + 1;

    let meld_type = match (tiles.len(), concealed) {
        (4, true) if same_type && all_same => MeldType::ConcealedKan,
        (4, false) if same_type && all_same => MeldType::OpenKan,
        (3, false) if same_type && all_same => MeldType::Triplet,
        (3, false) if same_type && is_run && tiles[0].is_suit() => MeldType::Sequence,
        _ => Err(format!("invalid meld: '{}'", exp))?,
    };
    if meld_type.is_open() != claimed.is_some() {
        Err(format!("invalid claimed tile mark: '{}'", exp))?;
    }

    tiles.sort();
    Ok(Meld {
        step: 0,
        seat,
        meld_type,
        tiles,
        claimed,
    })
}

#[test]
fn test_tiletable() {
    use super::common::{tiles_from_tile_table, tiles_to_tile_table};
    let hand_str = "p34777s1230567z66";
    let hand = tiles_from_string(hand_str).unwrap();
    let tt = tiles_to_tile_table(&hand);
    let hand2 = tiles_from_tile_table(&tt);
    let mut sorted = hand.clone();
    sorted.sort();
    assert_eq!(sorted, hand2);
}

#[test]
fn test_tiles_to_string() {
    let hand_str = "p34777s1235567z66";
    let hand = tiles_from_string(hand_str).unwrap();
    assert_eq!(hand_str, tiles_to_string(&hand));
    assert!(tiles_from_string("z8").is_err());
    assert!(tiles_from_string("12m").is_err());
}

#[test]
fn test_meld_from_string() {
    let m = meld_from_string("p4+56", 0).unwrap();
    assert_eq!(m.meld_type, MeldType::Sequence);
    assert_eq!(m.claimed, Some((3, Tile(TP, 4))));

    let m = meld_from_string("z77+7", 2).unwrap();
    assert_eq!(m.meld_type, MeldType::Triplet);
    assert_eq!(m.claimed, Some((0, Tile(TZ, DR)))); // seat2の対面

    let m = meld_from_string("s[1111]", 0).unwrap();
    assert_eq!(m.meld_type, MeldType::ConcealedKan);
    assert_eq!(m.claimed, None);

    assert!(meld_from_string("z123", 0).is_err());
    assert!(meld_from_string("m555", 0).is_err()); // '+'なし
}
