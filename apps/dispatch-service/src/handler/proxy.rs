//! # PDF プロキシハンドラ
//!
//! 外部ストレージ上の PDF を同一オリジンから配信するための透過プロキシ。
//! ブラウザの CORS 制約を回避するために使用する。
//!
//! 本体はバッファせずストリームのまま中継する。

use std::sync::Arc;

use axum::{
   body::Body,
   extract::{Query, State},
   http::{HeaderValue, header},
   response::Response,
};
use eventdesk_shared::event_log::error as log_error;
use serde::Deserialize;
use url::Url;

use crate::error::ApiError;

/// PDF プロキシの State
pub struct ProxyState {
   pub http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
   pub url: Option<String>,
}

/// GET /proxy-pdf?url=<URL>
#[tracing::instrument(skip_all)]
pub async fn proxy_pdf(
   State(state): State<Arc<ProxyState>>,
   Query(query): Query<ProxyQuery>,
) -> Result<Response, ApiError> {
   let raw = query
      .url
      .filter(|u| !u.trim().is_empty())
      .ok_or(ApiError::MissingUrl)?;
   let url = parse_upstream_url(raw.trim())?;

   let upstream = state.http_client.get(url.clone()).send().await.map_err(|e| {
      tracing::error!(
         error.category = log_error::category::EXTERNAL_SERVICE,
         error.kind = log_error::kind::PDF_UPSTREAM,
         upstream.host = url.host_str().unwrap_or("-"),
         "PDF 取得先に接続できません: {e}"
      );
      ApiError::ProxyFetch(e.to_string())
   })?;

   let status = upstream.status();
   if !status.is_success() {
      tracing::warn!(
         error.category = log_error::category::EXTERNAL_SERVICE,
         error.kind = log_error::kind::PDF_UPSTREAM,
         upstream.host = url.host_str().unwrap_or("-"),
         upstream.status = status.as_u16(),
         "PDF 取得先がエラーを返しました"
      );
      return Err(ApiError::ProxyStatus(status));
   }

   let content_type = upstream
      .headers()
      .get(header::CONTENT_TYPE)
      .cloned()
      .unwrap_or_else(|| HeaderValue::from_static("application/pdf"));
   let accept_ranges = upstream.headers().get(header::ACCEPT_RANGES).cloned();

   let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
   let headers = response.headers_mut();
   headers.insert(header::CONTENT_TYPE, content_type);
   if let Some(value) = accept_ranges {
      headers.insert(header::ACCEPT_RANGES, value);
   }

   Ok(response)
}

/// http(s) の絶対 URL のみ受け付ける
fn parse_upstream_url(raw: &str) -> Result<Url, ApiError> {
   let url = Url::parse(raw).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
   match url.scheme() {
      "http" | "https" => Ok(url),
      other => Err(ApiError::InvalidUrl(format!(
         "対応していないスキームです: {other}"
      ))),
   }
}
