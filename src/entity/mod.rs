pub mod collections;
pub mod products;
pub mod sales;
pub mod sales_receipts;

pub use collections::Entity as Collections;
pub use products::Entity as Products;
pub use sales::Entity as Sales;
pub use sales_receipts::Entity as SalesReceipts;
