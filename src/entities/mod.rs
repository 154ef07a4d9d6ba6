//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod cloth;
pub mod detergent;
pub mod transaction;
pub mod user;

// Re-export specific types to avoid conflicts
pub use cloth::{Column as ClothColumn, Entity as Cloth, Model as ClothModel};
pub use detergent::{Column as DetergentColumn, Entity as Detergent, Model as DetergentModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel, OrderStatus,
    PaymentStatus,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, UserRole};
