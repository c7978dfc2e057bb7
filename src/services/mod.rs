pub mod collection_service;
pub mod dashboard_service;
pub mod product_service;
pub mod sales_service;
