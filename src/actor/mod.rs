mod nop;
mod random;
mod timeout;

use std::fmt;

use crate::listener::Listener;
use crate::model::*;
use crate::util::variant::*;

use crate::error;

pub use nop::Nop;
pub use random::RandomDiscard;
pub use timeout::Timeout;

#[derive(Debug, Clone)]
pub struct Config {
    pub name: String,
    pub args: Vec<Arg>,
}

impl Config {
    pub fn arg(&self, name: &str) -> Option<&Variant> {
        self.args.iter().find(|a| a.name == name).map(|a| &a.value)
    }
}

// Actor trait
// 各メソッドのデフォルト実装は"パス" (ツモ切り,先頭の候補,宣言しない)
pub trait Actor: Listener + ActorClone + Send {
    // 局開始時の初期化処理
    fn init(&mut self, _seat: Seat) {}

    // 打牌の選択. handはツモ牌を含む手牌
    fn choose_discard(
        &mut self,
        _stg: &Stage,
        _seat: Seat,
        hand: &[Tile],
        drawn: Option<Tile>,
    ) -> Tile {
        default_discard(hand, drawn)
    }

    // 他家の打牌に対する鳴き(槓,ポン,チー)の受諾
    fn respond_to_call_offer(&mut self, _stg: &Stage, _offer: &CallOffer) -> bool {
        false
    }

    // チーの組み合わせが複数ある場合の選択 (candidatesのindexを返す)
    fn choose_chii_candidate(
        &mut self,
        _stg: &Stage,
        _seat: Seat,
        _candidates: &[Vec<Tile>],
    ) -> usize {
        0
    }

    // リーチ宣言 (宣言した場合ツモ牌を捨てる)
    fn declare_riichi(&mut self, _stg: &Stage, _seat: Seat, _waits: &[Tile]) -> bool {
        false
    }

    fn declare_concealed_kan(&mut self, _stg: &Stage, _seat: Seat, _tile: Tile) -> bool {
        false
    }

    fn declare_tsumo(&mut self, _stg: &Stage, _seat: Seat, _tile: Tile) -> bool {
        false
    }

    fn respond_to_ron(&mut self, _stg: &Stage, _seat: Seat, _tile: Tile, _from: Seat) -> bool {
        false
    }

    // 九種九牌
    fn declare_nine_terminals(&mut self, _stg: &Stage, _seat: Seat) -> bool {
        false
    }

    // Actorの詳細表示用
    fn get_config(&self) -> &Config;
}

// ツモ切り. ツモ牌がない場合(鳴きの後)は手牌の右端
pub fn default_discard(hand: &[Tile], drawn: Option<Tile>) -> Tile {
    drawn.or_else(|| hand.last().copied()).unwrap_or(Z8)
}

impl fmt::Debug for dyn Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conf = self.get_config();
        let arg_str = conf
            .args
            .iter()
            .map(|a| format!("{}={}", a.name, a.value))
            .collect::<Vec<String>>()
            .join(",");
        write!(f, "{}({})", conf.name, arg_str)
    }
}

// https://stackoverflow.com/questions/30353462/how-to-clone-a-struct-storing-a-boxed-trait-object
pub trait ActorClone {
    fn clone_box(&self) -> Box<dyn Actor>;
}

impl<T> ActorClone for T
where
    T: 'static + Actor + Clone,
{
    fn clone_box(&self) -> Box<dyn Actor> {
        Box::new(self.clone())
    }
}

trait ActorBuilder {
    fn get_default_config(&self) -> Config;
    fn create(&self, config: Config) -> Box<dyn Actor>;
}

// "Name(arg0,arg1,...)" 形式の文字列からActorを生成
// 引数は省略可能で,空の場合はデフォルト値
pub fn create_actor(exp: &str) -> crate::util::misc::Res<Box<dyn Actor>> {
    let builders: Vec<Box<dyn ActorBuilder>> = vec![
        Box::new(nop::NopBuilder {}),
        Box::new(random::RandomDiscardBuilder {}),
    ];

    let name: &str;
    let args: Vec<&str>;
    let paren_left = exp.find('(');
    let paren_right = exp.rfind(')');
    match (paren_left, paren_right) {
        (Some(l), Some(r)) => {
            if r < l {
                Err(format!("invalid paren: {}", exp))?;
            }
            args = exp[l + 1..r].split(',').map(|a| a.trim()).collect();
            name = &exp[..l];
        }
        (None, None) => {
            args = vec![];
            name = exp;
        }
        _ => return Err(format!("invalid paren: {}", exp).into()),
    }

    for b in &builders {
        let mut conf = b.get_default_config();
        if name != conf.name {
            continue;
        }

        if conf.args.len() < args.len() && !(args.len() == 1 && args[0].is_empty()) {
            Err(format!(
                "expected {} arguments for {}. but {} arguments are provided.",
                conf.args.len(),
                name,
                args.len(),
            ))?;
        }
        for (i, &a) in args.iter().enumerate() {
            if !a.is_empty() {
                conf.args[i].value = conf.args[i]
                    .value
                    .parse_same(a)
                    .map_err(|e| format!("{}: {}", e, a))?;
            }
        }
        return Ok(b.create(conf));
    }

    error!("unknown actor name: {}", name);
    Err(format!("unknown actor name: {}", name))?
}

#[test]
fn test_create_actor() {
    let a = create_actor("RandomDiscard(3,0.5)").unwrap();
    let conf = a.get_config();
    assert_eq!(conf.arg("seed"), Some(&Variant::Int(3)));
    assert_eq!(conf.arg("call"), Some(&Variant::Float(0.5)));
    assert_eq!(format!("{:?}", create_actor("Nop").unwrap()), "Nop()");
    assert_eq!(format!("{:?}", create_actor("Nop()").unwrap()), "Nop()");
    assert!(create_actor("Unknown").is_err());
    assert!(create_actor("RandomDiscard(x)").is_err());
    assert!(create_actor("Nop(1)").is_err());
}
