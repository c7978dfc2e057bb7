use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Collection, Product};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCollectionRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCollectionRequest {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CollectionWithProducts {
    #[serde(flatten)]
    pub collection: Collection,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CollectionList {
    pub items: Vec<CollectionWithProducts>,
}
