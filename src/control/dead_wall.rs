use crate::errors::{EngineError, EngineResult};
use crate::model::*;

pub const DEAD_LEN: usize = 7; // 王牌のstack数
pub const N_INDICATOR: usize = 5; // ドラ表示牌の最大数
pub const N_REPLACEMENT: usize = 4; // 嶺上牌の数

// 嶺上牌の位置 (row, column). 取られる順
pub const REPLACEMENT_SLOTS: [(usize, usize); N_REPLACEMENT] = [(0, 0), (1, 0), (0, 6), (1, 6)];

// 王牌 (2段x7列)
// ドラ表示牌は上段の1~5列目. 嶺上牌を取るごとに牌山の最後の牌が補充されるため常に14枚
#[derive(Debug, Clone)]
pub struct DeadWall {
    tiles: [[Tile; DEAD_LEN]; 2],
    n_indicator: usize,   // 公開済みのドラ表示牌の数
    n_replacement: usize, // 取られた嶺上牌の数
}

impl DeadWall {
    pub fn new(tiles: [[Tile; DEAD_LEN]; 2]) -> Self {
        Self {
            tiles,
            n_indicator: 1,
            n_replacement: 0,
        }
    }

    pub fn tiles(&self) -> Vec<Tile> {
        self.tiles.iter().flatten().copied().collect()
    }

    #[inline]
    pub fn count(&self) -> usize {
        2 * DEAD_LEN
    }

    pub fn indicators(&self) -> Vec<Tile> {
        self.tiles[0][1..=self.n_indicator].to_vec()
    }

    #[inline]
    pub fn can_reveal(&self) -> bool {
        self.n_indicator < N_INDICATOR
    }

    #[inline]
    pub fn remaining_replacements(&self) -> usize {
        N_REPLACEMENT - self.n_replacement
    }

    // 槓ドラをめくる
    pub fn reveal_next(&mut self) -> EngineResult<Tile> {
        if !self.can_reveal() {
            return Err(EngineError::invalid_state("no dora indicator left"));
        }
        self.n_indicator += 1;
        Ok(self.tiles[0][self.n_indicator])
    }

    // 嶺上牌を取り,空いた場所にlive_tail(牌山の最後の牌)を補充する
    pub fn draw_replacement(&mut self, live_tail: Tile) -> EngineResult<Tile> {
        if self.remaining_replacements() == 0 {
            return Err(EngineError::invalid_state("no replacement tile left"));
        }
        let (r, c) = REPLACEMENT_SLOTS[self.n_replacement];
        let t = self.tiles[r][c];
        self.tiles[r][c] = live_tail;
        self.n_replacement += 1;
        Ok(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_dead_wall() -> DeadWall {
        let mut tiles = [[Z8; DEAD_LEN]; 2];
        for r in 0..2 {
            for c in 0..DEAD_LEN {
                tiles[r][c] = Tile(r, c + 1);
            }
        }
        DeadWall::new(tiles)
    }

    #[test]
    fn test_reveal_indicators() {
        let mut dw = numbered_dead_wall();
        assert_eq!(dw.indicators(), vec![Tile(0, 2)]);
        for _ in 0..4 {
            dw.reveal_next().unwrap();
        }
        assert_eq!(
            dw.indicators(),
            vec![Tile(0, 2), Tile(0, 3), Tile(0, 4), Tile(0, 5), Tile(0, 6)]
        );
        assert!(dw.reveal_next().is_err());
    }

    #[test]
    fn test_replacement_keeps_size() {
        let mut dw = numbered_dead_wall();
        let tail = Tile(TZ, DR);
        assert_eq!(dw.draw_replacement(tail).unwrap(), Tile(0, 1));
        assert_eq!(dw.draw_replacement(tail).unwrap(), Tile(1, 1));
        assert_eq!(dw.draw_replacement(tail).unwrap(), Tile(0, 7));
        assert_eq!(dw.draw_replacement(tail).unwrap(), Tile(1, 7));
        assert!(dw.draw_replacement(tail).is_err());
        assert_eq!(dw.tiles().len(), 14);
        assert_eq!(dw.tiles().iter().filter(|&&t| t == tail).count(), 4);
        // 表示牌の位置は変化しない
        assert_eq!(dw.indicators(), vec![Tile(0, 2)]);
    }
}
