use axum::response::Json;
use claims_engine::{RowBounds, Variant};
use serde::Serialize;

use crate::error::{api_success, ApiResponse};

#[derive(Debug, Serialize)]
pub struct VariantInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub rows: RowBounds,
    pub dimensions: bool,
}

/// List the generator presets
pub async fn list_variants() -> Json<ApiResponse<Vec<VariantInfo>>> {
    let variants = Variant::ALL
        .into_iter()
        .map(|variant| {
            let config = variant.config();
            VariantInfo {
                name: variant.name(),
                description: variant.description(),
                rows: config.rows,
                dimensions: config.dimensions,
            }
        })
        .collect();
    api_success(variants)
}
