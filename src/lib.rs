pub mod input;
pub mod miner;
pub mod time;
pub mod widgets;
