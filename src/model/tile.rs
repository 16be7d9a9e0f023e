use serde::{de, ser};

use super::*;
use crate::control::string::{tile_number_from_char, tile_type_from_char};
use crate::util::misc::Res;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile(pub Type, pub Tnum); // (type index, number index)
pub const Z8: Tile = Tile(TZ, UK); // unknown tile

impl Tile {
    pub fn from_symbol(s: &str) -> Res<Self> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 2 {
            Err(format!("invalid tile symbol: '{}'", s))?;
        }
        let t = tile_type_from_char(chars[0])?;
        let n = tile_number_from_char(chars[1])?;
        let tile = Self(t, n);
        if !tile.is_valid() {
            Err(format!("invalid tile symbol: '{}'", s))?;
        }
        Ok(tile)
    }

    // 実在する牌かどうか (字牌は1~7, 数牌の0は赤5)
    #[inline]
    pub fn is_valid(&self) -> bool {
        match self.0 {
            TM | TP | TS => self.1 < TNUM,
            TZ => (WE..=DR).contains(&self.1),
            _ => false,
        }
    }

    // 赤5の場合,通常の5を返却. それ以外の場合はコピーをそのまま返却.
    #[inline]
    pub fn to_normal(self) -> Self {
        if self.1 == 0 {
            Self(self.0, 5)
        } else {
            self
        }
    }

    // 数牌
    #[inline]
    pub fn is_suit(&self) -> bool {
        self.0 != TZ
    }

    // 字牌
    #[inline]
    pub fn is_hornor(&self) -> bool {
        self.0 == TZ
    }

    // 么九牌
    #[inline]
    pub fn is_end(&self) -> bool {
        self.0 == TZ || self.1 == 1 || self.1 == 9
    }

    // 風牌
    #[inline]
    pub fn is_wind(&self) -> bool {
        self.0 == TZ && (WE..=WN).contains(&self.1)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = ['m', 'p', 's', 'z'].get(self.0).copied().unwrap_or('?');
        write!(f, "{}{}", c, self.1)
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl PartialOrd for Tile {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tile {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.0 != other.0 {
            return self.0.cmp(&other.0);
        }

        // 赤5は通常の5の直前に並べる
        let a = if self.1 == 0 { 9 } else { self.1 * 2 };
        let b = if other.1 == 0 { 9 } else { other.1 * 2 };
        a.cmp(&b)
    }
}

impl ser::Serialize for Tile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

struct TileVisitor;

impl<'de> de::Visitor<'de> for TileVisitor {
    type Value = Tile;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("tile symbol")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Tile::from_symbol(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> de::Deserialize<'de> for Tile {
    fn deserialize<D>(deserializer: D) -> Result<Self, <D as de::Deserializer<'de>>::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_str(TileVisitor)
    }
}

// [TileTable]
// hand[ti][ni]: 牌の枚数. hand[ti][0]は赤5の枚数で, 赤5はhand[ti][5]にも計上される
pub type TileRow = [usize; TNUM];
pub type TileTable = [TileRow; TYPE];

#[test]
fn test_tile_order() {
    let mut tiles = vec![Tile(TM, 6), Tile(TM, 5), Tile(TM, 0), Tile(TM, 4), Tile(TZ, 1)];
    tiles.sort();
    assert_eq!(
        tiles,
        vec![Tile(TM, 4), Tile(TM, 0), Tile(TM, 5), Tile(TM, 6), Tile(TZ, 1)]
    );
}

#[test]
fn test_tile_symbol() {
    assert_eq!(Tile::from_symbol("p0").unwrap(), Tile(TP, 0));
    assert!(Tile::from_symbol("z8").is_err());
    assert!(Tile::from_symbol("x1").is_err());
    assert!(!Tile(TM, 12).is_valid());
    assert_eq!(Tile(TYPE, 1).to_string(), "?1");
    let json = serde_json::to_string(&Tile(TS, 7)).unwrap();
    assert_eq!(json, "\"s7\"");
    let t: Tile = serde_json::from_str(&json).unwrap();
    assert_eq!(t, Tile(TS, 7));
}
