pub mod attendance;
pub mod tag;
