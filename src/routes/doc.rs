use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        collections::{CollectionList, CollectionWithProducts},
        dashboard::{DashboardMetrics, SalesSummary},
        products::ProductList,
        sales::{CartLine, CheckoutRequest, ReceiptList, ReceiptWithSales, SaleList, SaleWithProduct},
        upload::UploadResponse,
    },
    models::{Collection, Product, Sale, SalesReceipt},
    response::{ApiResponse, Meta},
    routes::{collections, dashboard, health, params, products, sales, upload},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        collections::list_collections,
        collections::create_collection,
        collections::update_collection,
        collections::delete_collection,
        sales::list_sales,
        sales::checkout,
        sales::list_receipts,
        sales::get_receipt,
        sales::delete_receipt,
        dashboard::dashboard_metrics,
        upload::upload_image
    ),
    components(
        schemas(
            Product,
            Collection,
            Sale,
            SalesReceipt,
            ProductList,
            CollectionList,
            CollectionWithProducts,
            CartLine,
            CheckoutRequest,
            ReceiptWithSales,
            ReceiptList,
            SaleWithProduct,
            SaleList,
            DashboardMetrics,
            SalesSummary,
            UploadResponse,
            params::Pagination,
            params::ProductListQuery,
            params::CollectionListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Collection>,
            ApiResponse<CollectionList>,
            ApiResponse<ReceiptWithSales>,
            ApiResponse<ReceiptList>,
            ApiResponse<SaleList>,
            ApiResponse<DashboardMetrics>,
            ApiResponse<UploadResponse>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Collections", description = "Collection endpoints"),
        (name = "Sales", description = "Checkout, receipts and transaction history"),
        (name = "Dashboard", description = "Read-only aggregates"),
        (name = "Upload", description = "Image upload to object storage"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
