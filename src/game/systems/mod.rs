pub mod ai;
pub mod collection;
pub mod physics;
