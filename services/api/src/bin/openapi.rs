//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI 3 document for the College Path API to a file, by
//! default `openapi.json`, or to the path given as the first argument.

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());
    let doc_json = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(&path, doc_json)?;
    println!("OpenAPI document written to {}", path);
    Ok(())
}
