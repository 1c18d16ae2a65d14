use actix_web::http::header::ContentType;
use actix_web::{web, App, HttpResponse, HttpServer};
use std::path::PathBuf;
use std::sync::Arc;
use crate::error::AppError;
use crate::metadata::decode_legacy_blob;
use crate::render::Renderer;
use crate::store::{render_post, AttachmentSource};

fn html(fragment: String) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(fragment)
}

async fn post_exif(
    path: web::Path<u64>,
    source_data: web::Data<Arc<dyn AttachmentSource>>,
    renderer: web::Data<Renderer>,
) -> Result<HttpResponse, AppError> {
    let post_id = path.into_inner();
    log::debug!("Received request for exif of post {}", post_id);

    let source = source_data.get_ref().clone();
    let renderer = *renderer.get_ref();
    let fragment = web::block(move || render_post(source.as_ref(), &renderer, post_id)).await?;

    Ok(html(fragment))
}

async fn render_records(body: web::Bytes, renderer: web::Data<Renderer>) -> HttpResponse {
    log::debug!("Received request to render a {} byte legacy blob", body.len());

    let records = std::str::from_utf8(&body)
        .map_err(|e| AppError::MalformedBlob(e.to_string()))
        .and_then(decode_legacy_blob);
    match records {
        Ok(records) => html(renderer.render(&records)),
        Err(e) => {
            log::warn!("Could not decode posted attachment blob: {}", e);
            html(String::new())
        }
    }
}

/// Serves uploaded attachments so the links in rendered fragments resolve.
pub fn media_files(media_directory: impl Into<PathBuf>) -> actix_files::Files {
    actix_files::Files::new("/media", media_directory.into())
}

/// Fragment routes, without shared state or static files.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/posts/{post_id}/exif").route(web::get().to(post_exif)))
        .service(web::resource("/render").route(web::post().to(render_records)));
}

pub async fn start_web_server(
    port: u16,
    source: Arc<dyn AttachmentSource>,
    renderer: Renderer,
    media_directory: PathBuf,
) -> std::io::Result<()> {
    let source_data = web::Data::new(source);
    let renderer_data = web::Data::new(renderer);

    log::info!("Starting web server on port: {}", port);
    log::debug!("Serving media files from {:?}", media_directory);

    HttpServer::new(move || {
        App::new()
            .app_data(source_data.clone())
            .app_data(renderer_data.clone())
            .configure(routes)
            .service(media_files(media_directory.clone()))
    })
    .bind(format!("0.0.0.0:{}", port))?
    .run()
    .await
}
