pub mod constants;
pub mod field;
pub mod fuel;
pub mod intent;
pub mod match_clock;
pub mod match_result;
pub mod pieces;
pub mod robot;
pub mod spatial;
pub mod state;
pub mod systems;
