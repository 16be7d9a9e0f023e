use super::*;

pub struct NopBuilder;

impl ActorBuilder for NopBuilder {
    fn get_default_config(&self) -> Config {
        Config {
            name: "Nop".to_string(),
            args: vec![],
        }
    }

    fn create(&self, config: Config) -> Box<dyn Actor> {
        Box::new(Nop::from_config(config))
    }
}

// 何も宣言せずツモ切りを続ける
#[derive(Clone)]
pub struct Nop {
    config: Config,
}

impl Nop {
    pub fn new() -> Self {
        Self::from_config(NopBuilder {}.get_default_config())
    }

    pub fn from_config(config: Config) -> Self {
        Self { config }
    }
}

impl Default for Nop {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for Nop {
    fn get_config(&self) -> &Config {
        &self.config
    }
}

impl Listener for Nop {}
