pub mod assistant;
pub mod billing;
pub mod product;
pub mod staff;

pub use assistant::*;
pub use billing::*;
pub use product::*;
pub use staff::*;
