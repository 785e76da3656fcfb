//! ICE服务模块（TURN，内置 STUN）

mod turn;

pub use turn::TurnService;
