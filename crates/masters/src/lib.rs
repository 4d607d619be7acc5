//! `gudang-masters` — master data: warehouses, products, and trading parties.
//!
//! Master records are referenced by the stock ledger but never owned by it.
//! They carry an `active | archived` lifecycle instead of hard deletion so
//! historical ledger rows stay resolvable.

pub mod directory;
pub mod party;
pub mod product;
pub mod warehouse;

pub use directory::{Directory, InMemoryDirectory};
pub use party::{ContactInfo, Customer, Party, Supplier};
pub use product::Product;
pub use warehouse::Warehouse;
