mod order;
mod product;
mod return_order;
mod shipping;
mod ticket;

pub use order::*;
pub use product::*;
pub use return_order::*;
pub use shipping::*;
pub use ticket::*;
