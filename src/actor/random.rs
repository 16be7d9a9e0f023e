use rand::prelude::*;

use super::*;

pub struct RandomDiscardBuilder;

impl ActorBuilder for RandomDiscardBuilder {
    fn get_default_config(&self) -> Config {
        Config {
            name: "RandomDiscard".to_string(),
            args: vec![
                Arg::int("seed", 0),
                Arg::float("call", 0.0),
                Arg::bool("riichi", true),
            ],
        }
    }

    fn create(&self, config: Config) -> Box<dyn Actor> {
        Box::new(RandomDiscard::from_config(config))
    }
}

// 手牌からランダムに打牌する. 和了は常に宣言し,鳴きはcallの確率で受諾する
#[derive(Clone)]
pub struct RandomDiscard {
    config: Config,
    rng: StdRng,
    seed: u64,
    call_rate: f64,
    riichi: bool,
}

impl RandomDiscard {
    pub fn new(seed: u64, call_rate: f64) -> Self {
        let mut config = RandomDiscardBuilder {}.get_default_config();
        config.args[0] = Arg::int("seed", seed as i64);
        config.args[1] = Arg::float("call", call_rate);
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Self {
        let seed = config.arg("seed").and_then(|v| v.as_int()).unwrap_or(0) as u64;
        let call_rate = config.arg("call").and_then(|v| v.as_float()).unwrap_or(0.0);
        let riichi = config.arg("riichi").and_then(|v| v.as_bool()).unwrap_or(true);
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            seed,
            call_rate: call_rate.clamp(0.0, 1.0),
            riichi,
        }
    }
}

impl Actor for RandomDiscard {
    fn init(&mut self, seat: Seat) {
        // 座席ごとに異なる乱数列
        self.rng = StdRng::seed_from_u64(self.seed.wrapping_add(seat as u64));
    }

    fn choose_discard(
        &mut self,
        _stg: &Stage,
        _seat: Seat,
        hand: &[Tile],
        drawn: Option<Tile>,
    ) -> Tile {
        match hand.choose(&mut self.rng) {
            Some(&t) => t,
            None => default_discard(hand, drawn),
        }
    }

    fn respond_to_call_offer(&mut self, _stg: &Stage, _offer: &CallOffer) -> bool {
        self.rng.gen_bool(self.call_rate)
    }

    fn choose_chii_candidate(
        &mut self,
        _stg: &Stage,
        _seat: Seat,
        candidates: &[Vec<Tile>],
    ) -> usize {
        if candidates.is_empty() {
            0
        } else {
            self.rng.gen_range(0..candidates.len())
        }
    }

    fn declare_riichi(&mut self, _stg: &Stage, _seat: Seat, _waits: &[Tile]) -> bool {
        self.riichi
    }

    fn declare_concealed_kan(&mut self, _stg: &Stage, _seat: Seat, _tile: Tile) -> bool {
        self.rng.gen_bool(self.call_rate)
    }

    fn declare_tsumo(&mut self, _stg: &Stage, _seat: Seat, _tile: Tile) -> bool {
        true
    }

    fn respond_to_ron(&mut self, _stg: &Stage, _seat: Seat, _tile: Tile, _from: Seat) -> bool {
        true
    }

    fn declare_nine_terminals(&mut self, _stg: &Stage, _seat: Seat) -> bool {
        true
    }

    fn get_config(&self) -> &Config {
        &self.config
    }
}

impl Listener for RandomDiscard {}
