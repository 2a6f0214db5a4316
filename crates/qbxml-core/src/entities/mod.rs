//! Query strategies for the supported entity kinds.

mod check;
mod generic;
mod item;
mod purchase_order;

pub use check::CheckQuery;
pub use generic::GenericQuery;
pub use item::ItemQuery;
pub use purchase_order::{PurchaseOrderQuery, consolidate_lines};
