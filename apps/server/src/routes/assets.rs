use actix_web::{HttpResponse, get, web};
use rust_embed::RustEmbed;

use crate::error::ApiError;

/// Templates and static files, compiled into the binary
#[derive(RustEmbed)]
#[folder = "web/"]
pub struct WebAssets;

/// Embedded file as UTF-8 text (templates)
pub fn text_asset(path: &str) -> Option<String> {
    WebAssets::get(path).map(|file| String::from_utf8_lossy(&file.data).into_owned())
}

/// Static asset passthrough
#[get("/static/{path:.*}")]
pub async fn static_route(path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let path = path.into_inner();
    let file = WebAssets::get(&format!("static/{path}"))
        .ok_or_else(|| ApiError::NotFound(format!("No such asset: {path}")))?;

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok(HttpResponse::Ok().content_type(mime.as_ref()).body(file.data.into_owned()))
}
