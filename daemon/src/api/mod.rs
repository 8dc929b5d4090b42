use crate::web;
use actix_web::{HttpRequest, HttpResponse};
use debileweb_common::errors::{format_err, Context, Error};
use std::fs;
use std::path::Path;

pub mod v0;

pub fn header<'a>(req: &'a HttpRequest, key: &str) -> debileweb_common::errors::Result<&'a str> {
    let value = req
        .headers()
        .get(key)
        .ok_or_else(|| format_err!("Missing header"))?
        .to_str()
        .context("Failed to decode header value")?;

    Ok(value)
}

/// Serves a file from the farm's job output tree. Missing files are a 404,
/// not an error: the farm may not have shipped results yet.
pub fn forward_job_file(path: &Path, content_type: &str) -> web::Result<HttpResponse> {
    if !path.is_file() {
        return Ok(v0::not_found());
    }

    let data = fs::read(path).map_err(Error::from)?;

    let resp = HttpResponse::Ok()
        .content_type(content_type)
        .append_header(("X-Content-Type-Options", "nosniff"))
        .append_header(("Content-Security-Policy", "default-src 'none'"))
        .body(data);
    Ok(resp)
}
