pub mod api;
pub mod chain;
pub mod genesis;
pub mod validator;

pub use api::*;
pub use chain::*;
pub use genesis::*;
pub use validator::*;
