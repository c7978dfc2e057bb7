pub mod collections;
pub mod dashboard;
pub mod products;
pub mod sales;
pub mod upload;
