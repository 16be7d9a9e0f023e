use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeldType {
    Sequence,     // チー
    Triplet,      // ポン
    OpenKan,      // 明槓
    ConcealedKan, // 暗槓
}

impl MeldType {
    #[inline]
    pub fn is_kan(&self) -> bool {
        matches!(self, Self::OpenKan | Self::ConcealedKan)
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::ConcealedKan)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    pub step: usize,
    pub seat: Seat,
    pub meld_type: MeldType,
    pub tiles: Vec<Tile>,              // 鳴いた牌を含むすべての牌 (ソート済み)
    pub claimed: Option<(Seat, Tile)>, // 鳴いた捨て牌とその持ち主 (暗槓はNone)
}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut marked = false;
        let mut s = vec![];
        for &t in &self.tiles {
            match self.claimed {
                Some((from, c)) if c == t && !marked => {
                    marked = true;
                    s.push(format!("{}({})", t, from));
                }
                _ => s.push(t.to_string()),
            }
        }
        if self.meld_type == MeldType::ConcealedKan {
            write!(f, "[{}]", s.join("|"))
        } else {
            write!(f, "{}", s.join("|"))
        }
    }
}
