use std::sync::mpsc;
use std::time::Duration;

use rand::prelude::*;

use crate::actor::*;
use crate::control::engine::{MahjongEngine, RoundResult};
use crate::listener::*;
use crate::model::*;
use crate::util::log;
use crate::util::misc::*;

use crate::{error, info};

// [App]
#[derive(Debug)]
pub struct EngineApp {
    seed: u64,
    rule: Rule,
    dice: Option<usize>,
    timeout: f64, // Actorの応答制限時間(秒) 0の場合は無制限
    n_game: u32,
    n_thread: u32,
    write: bool,
    debug: bool,
    quiet: bool,
    names: [String; SEAT], // actor names
}

impl EngineApp {
    pub fn new(args: Vec<String>) -> Self {
        let mut app = Self {
            seed: 0,
            rule: Rule::default(),
            dice: None,
            timeout: 0.0,
            n_game: 0,
            n_thread: 16,
            write: false,
            debug: false,
            quiet: false,
            names: ["Nop".into(), "Nop".into(), "Nop".into(), "Nop".into()],
        };

        let mut it = args.iter();
        while let Some(s) = it.next() {
            match s.as_str() {
                "-s" => app.seed = next_value(&mut it, s),
                "-r-hands" => app.rule.hands = next_value(&mut it, s),
                "-r-red5" => app.rule.red5 = next_value(&mut it, s),
                "-r-irregular" => app.rule.irregular_hands = next_value(&mut it, s),
                "-r-abort" => app.rule.abortive_draw = next_value(&mut it, s),
                "-r-file" => {
                    let path: String = next_value(&mut it, s);
                    app.rule = std::fs::read_to_string(&path)
                        .map_err(|e| e.into())
                        .and_then(|data| Rule::from_json(&data))
                        .unwrap_or_else(|e| error_exit(format!("{}: {}", path, e)));
                }
                "-dice" => app.dice = Some(next_value(&mut it, s)),
                "-timeout" => app.timeout = next_value(&mut it, s),
                "-g" => app.n_game = next_value(&mut it, s),
                "-t" => app.n_thread = next_value(&mut it, s),
                "-w" => app.write = true,
                "-d" => app.debug = true,
                "-q" => app.quiet = true,
                "-0" => app.names[0] = next_value(&mut it, s),
                "-1" => app.names[1] = next_value(&mut it, s),
                "-2" => app.names[2] = next_value(&mut it, s),
                "-3" => app.names[3] = next_value(&mut it, s),
                opt => {
                    error!("unknown option: {}", opt);
                    std::process::exit(0);
                }
            }
        }

        if app.quiet {
            log::set_level(log::LEVEL_ERROR);
        } else if app.debug {
            log::set_level(log::LEVEL_DEBUG);
        }

        if app.rule.red5 > TILE {
            error_exit::<_, ()>(format!("-r-red5 must be in 0..={}", TILE));
        }
        if let Some(d) = app.dice {
            if !(2..=12).contains(&d) {
                error_exit::<_, ()>(format!("-dice must be in 2..=12: {}", d));
            }
        }
        if app.n_thread == 0 {
            app.n_thread = 1;
        }

        if app.seed == 0 {
            app.seed = unixtime_now();
            info!(
                "Random seed is not specified. Unix timestamp '{}' is used as seed.",
                app.seed
            );
        }

        app
    }

    pub fn run(self) {
        println!("seed: {}", self.seed);

        let mut actors = vec![];
        for name in &self.names {
            match self.create_actor(name) {
                Ok(a) => actors.push(a),
                Err(e) => {
                    error!("{}", e);
                    return;
                }
            }
        }
        let actors: [Box<dyn Actor>; SEAT] = match actors.try_into() {
            Ok(a) => a,
            Err(_) => return,
        };
        for (s, a) in actors.iter().enumerate() {
            println!("actor{}: {:?}", s, a);
        }
        println!();

        let start = std::time::Instant::now();
        if self.n_game == 0 {
            self.run_single_game(actors);
        } else {
            self.run_multiple_game(actors);
        }
        println!(
            "total elapsed time: {:8.3}sec",
            start.elapsed().as_nanos() as f32 / 1000000000.0
        );
    }

    fn create_actor(&self, name: &str) -> Res<Box<dyn Actor>> {
        let actor = create_actor(name)?;
        if self.timeout > 0.0 {
            Ok(Box::new(Timeout::new(
                actor,
                Duration::from_secs_f64(self.timeout),
            )))
        } else {
            Ok(actor)
        }
    }

    fn create_engine(&self, seed: u64, actors: [Box<dyn Actor>; SEAT], listeners: Vec<Box<dyn Listener>>) -> MahjongEngine {
        let mut engine = MahjongEngine::new(seed, self.rule.clone(), actors, listeners);
        engine.set_fixed_dice(self.dice);
        engine
    }

    fn run_single_game(&self, actors: [Box<dyn Actor>; SEAT]) {
        let mut listeners: Vec<Box<dyn Listener>> = vec![];
        if !self.quiet {
            listeners.push(Box::new(EventPrinter::new()));
        }
        if self.write {
            listeners.push(Box::new(EventWriter::new()));
        }

        let mut engine = self.create_engine(self.seed, actors, listeners);
        match engine.run() {
            Ok(results) => {
                for (i, r) in results.iter().enumerate() {
                    println!("round {}: {}", i, format_result(r));
                }
            }
            Err(e) => error!("{}", e),
        }
    }

    // 座席をシャッフルして複数の対局を並列に実行し,Actorごとの和了数を集計
    fn run_multiple_game(&self, actors: [Box<dyn Actor>; SEAT]) {
        let mut n_game = 0;
        let mut n_thread = 0;
        let mut n_game_end = 0;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let (tx, rx) = mpsc::channel();
        let mut sum_wins = [0; SEAT];
        let mut sum_deal_ins = [0; SEAT];
        let mut n_draw = 0;
        let mut n_error = 0;
        loop {
            while n_game < self.n_game && n_thread < self.n_thread {
                n_game += 1;
                n_thread += 1;

                let seed = rng.next_u64();
                let mut shuffle_table = [0, 1, 2, 3];
                shuffle_table.shuffle(&mut rng);
                let shuffled_actors: [Box<dyn Actor>; SEAT] =
                    shuffle_table.map(|i| actors[i].clone_box());

                let mut engine = self.create_engine(seed, shuffled_actors, vec![]);
                let tx2 = tx.clone();
                std::thread::spawn(move || {
                    let start = std::time::Instant::now();
                    let res = engine.run();
                    tx2.send((shuffle_table, seed, res, start.elapsed())).ok();
                });
            }

            let (shuffle, seed, res, elapsed) = match rx.recv() {
                Ok(r) => r,
                Err(e) => {
                    error!("{}", e);
                    return;
                }
            };
            n_thread -= 1;
            n_game_end += 1;

            let ms = elapsed.as_millis();
            match res {
                Ok(results) => {
                    print!("{:5},{:4}ms,{:20}", n_game_end, ms, seed);
                    for r in &results {
                        match r {
                            RoundResult::Win { seat, win_type, from, .. } => {
                                sum_wins[shuffle[*seat]] += 1;
                                if *win_type == WinType::Ron {
                                    sum_deal_ins[shuffle[*from]] += 1;
                                }
                            }
                            RoundResult::Draw { .. } => n_draw += 1,
                        }
                        print!(", {}", format_result(r));
                    }
                    println!();
                }
                Err(e) => {
                    n_error += 1;
                    error!("seed {}: {}", seed, e);
                }
            }

            if n_game_end == self.n_game {
                break;
            }
        }

        let n_round = (self.n_game as usize * self.rule.hands).max(1);
        for i in 0..SEAT {
            println!(
                "ac{} win_rate: {:.3}, deal_in_rate: {:.3}",
                i,
                sum_wins[i] as f32 / n_round as f32,
                sum_deal_ins[i] as f32 / n_round as f32,
            );
        }
        println!("draw_rate: {:.3}, error: {}", n_draw as f32 / n_round as f32, n_error);
    }
}

fn format_result(r: &RoundResult) -> String {
    match r {
        RoundResult::Win {
            seat,
            win_type,
            tile,
            from,
        } => match win_type {
            WinType::Tsumo => format!("seat{} tsumo {}", seat, tile),
            WinType::Ron => format!("seat{} ron {} from seat{}", seat, tile, from),
        },
        RoundResult::Draw { draw_type, tenpais } => {
            format!("{} tenpai:{:?}", draw_type, tenpais)
        }
    }
}
