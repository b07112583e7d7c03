mod gateway;
mod persona;
mod role;
mod session;
mod slash_commands;
mod turn;

pub use gateway::*;
pub use persona::*;
pub use role::*;
pub use session::*;
pub use slash_commands::*;
pub use turn::*;
