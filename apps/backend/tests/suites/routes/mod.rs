mod error_shape;
mod game_actions;
mod health;
mod sync_poll;
