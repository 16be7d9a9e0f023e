// 麻雀のゲーム進行に必要な各種処理を行うモジュール
pub mod call;
pub mod common;
pub mod dead_wall;
pub mod engine;
pub mod stage_controller;
pub mod string;
pub mod wall;
