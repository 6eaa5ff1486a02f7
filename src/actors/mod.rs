pub mod animation;
pub mod lifecycle;
pub mod physics;
pub mod player;
