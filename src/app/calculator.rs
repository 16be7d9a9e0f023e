use std::fs::File;
use std::io::{self, BufRead};

use crate::control::common::*;
use crate::control::string::*;
use crate::hand::*;
use crate::model::*;
use crate::util::misc::*;

use crate::error;

// [App]
// 手牌の待ち牌,聴牌打牌,面子分解を表示
#[derive(Debug)]
pub struct CalculatorApp {
    args: Vec<String>,
    detail: bool,
    irregular: bool,
}

impl CalculatorApp {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            detail: false,
            irregular: false,
        }
    }

    pub fn run(&mut self) {
        let mut file_path = "".to_string();
        let mut exp = "".to_string();
        let mut it = self.args.iter();
        while let Some(s) = it.next() {
            match s.as_str() {
                "-d" => self.detail = true,
                "-i" => self.irregular = true,
                "-f" => file_path = next_value(&mut it, s),
                _ => {
                    if s.starts_with('-') {
                        error!("unknown option: {}", s);
                        return;
                    }
                    if !exp.is_empty() {
                        error!("multiple expression is not allowed");
                        return;
                    }
                    exp = s.clone();
                }
            }
        }

        if file_path.is_empty() == exp.is_empty() {
            print_usage();
            return;
        }

        if !exp.is_empty() {
            if let Err(e) = self.process_expression(&exp) {
                error!("{}", e);
            }
            return;
        }

        if let Err(e) = self.run_from_file(&file_path) {
            error!("{}", e);
        }
    }

    fn run_from_file(&self, file_path: &str) -> Res {
        let file = File::open(file_path)?;
        let lines = io::BufReader::new(file).lines();
        for exp in lines.map_while(Result::ok) {
            let e = exp.replace(' ', "");
            if e.is_empty() || e.starts_with('#') {
                // 空行とコメント行はスキップ
                println!("> {}", exp);
            } else if let Err(e) = self.process_expression(&exp) {
                error!("{}", e);
            }
            println!();
        }
        Ok(())
    }

    fn process_expression(&self, exp: &str) -> Res {
        let mut calculator = Calculator::new(self.detail, self.irregular);
        calculator.parse(exp)?;
        if calculator.run() == Verify::Error {
            Err(format!("verify failed: {}", exp))?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum Verify {
    Ok,
    Error,
    Skip,
}

#[derive(Debug)]
struct Calculator {
    detail: bool,
    irregular: bool,
    hand: TileTable,
    melds: Vec<Meld>,
    expected: Option<Vec<Tile>>, // 期待する待ち牌 (13枚形のみ)
}

impl Calculator {
    fn new(detail: bool, irregular: bool) -> Self {
        Self {
            detail,
            irregular,
            hand: TileTable::default(),
            melds: vec![],
            expected: None,
        }
    }

    // "手牌,副露,副露.../期待する待ち牌"
    // 例: "m123p456s78z11,z7+77/s69"
    fn parse(&mut self, input: &str) -> Res {
        println!("> {}", input);

        let input = input.replace(' ', "");
        let input = input.split('#').next().unwrap_or("");
        let exps: Vec<&str> = input.split('/').collect();
        if exps.len() > 2 {
            Err("too many '/'")?;
        }
        self.parse_hand_meld(exps[0])?;
        if let Some(exp) = exps.get(1) {
            self.expected = Some(tiles_from_string(exp)?);
        }

        if self.detail {
            println!("{:?}", self);
        }
        Ok(())
    }

    fn parse_hand_meld(&mut self, input: &str) -> Res {
        let mut exps = input.split(',');
        let exp_hand = exps.next().unwrap_or("");
        self.hand = tiles_to_tile_table(&tiles_from_string(exp_hand)?);
        for exp_meld in exps {
            self.melds.push(meld_from_string(exp_meld, 0)?);
        }

        let n = count_tiles(&self.hand) + self.melds.len() * 3;
        if n != 13 && n != 14 {
            Err(format!("invalid number of tiles: {}", n))?;
        }
        Ok(())
    }

    fn run(&self) -> Verify {
        let n = count_tiles(&self.hand) + self.melds.len() * 3;
        if n == 13 {
            let waits = winning_tiles(&self.hand, &self.melds, self.irregular);
            println!("waits: {}", tiles_to_string(&waits));
            return match &self.expected {
                Some(ex) => {
                    if *ex == waits {
                        Verify::Ok
                    } else {
                        println!("expected: {}", tiles_to_string(ex));
                        Verify::Error
                    }
                }
                None => Verify::Skip,
            };
        }

        if is_winning_hand(&self.hand, &self.melds, self.irregular) {
            let decomps = decompose(&self.hand);
            println!("complete: {} decomposition(s)", decomps.len());
            for d in &decomps {
                let blocks: Vec<String> = d
                    .blocks
                    .iter()
                    .map(|b| match b {
                        Block::Sequence(t) => format!("{}{}{}", t, t.1 + 1, t.1 + 2),
                        Block::Triplet(t) => format!("{}{}{}", t, t.1, t.1),
                    })
                    .collect();
                println!("  pair: {}, blocks: {}", d.pair, blocks.join(" "));
            }
        }
        for (t, waits) in winning_discards(&self.hand, &self.melds, self.irregular) {
            println!("discard {} => waits: {}", t, tiles_to_string(&waits));
        }
        Verify::Skip
    }
}

fn print_usage() {
    error!(
        r"invalid input
Usage
    $ cargo run C EXPRESSION [-d] [-i]
    $ cargo run C -f FILE [-d] [-i]
Expression
    HAND[,MELD...][/EXPECTED_WAITS]  (ex: m123p456s78z11,z7+77/s69)
Options
    -d: print debug info
    -i: treat seven pairs and thirteen orphans as winning hands
    -f: read expresisons from file instead of a commandline expression
"
    );
}

#[test]
fn test_calculator() {
    let file = File::open("tests/hands.txt").unwrap();
    let lines = io::BufReader::new(file).lines();
    for exp in lines.map_while(Result::ok) {
        let e = exp.replace(' ', "");
        if e.is_empty() || e.starts_with('#') {
            println!("> {}", exp);
        } else {
            let irregular = e.contains("#irregular");
            let mut calculator = Calculator::new(false, irregular);
            calculator.parse(&e).unwrap();
            assert_ne!(Verify::Error, calculator.run());
        }
    }
}
