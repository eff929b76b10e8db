//! 統合テスト共通のルーター構築・リクエスト送信ヘルパー

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
   Router,
   body::{Body, to_bytes},
   http::{Request, StatusCode},
};
use chrono::{TimeZone, Utc};
use eventdesk_dispatch_service::{
   app_builder::{AppDependencies, build_app},
   config::DispatchConfig,
};
use eventdesk_domain::clock::FixedClock;
use eventdesk_infra::mock::{MockAuditSink, MockMailSender};
use tower::ServiceExt;

/// テスト対象のルーターとモック
pub struct TestApp {
   pub router: Router,
   pub sender: MockMailSender,
   pub sink:   MockAuditSink,
}

/// 既定設定（環境変数なし）でルーターを構築する
pub fn test_app(sender: MockMailSender) -> TestApp {
   test_app_with(sender, &[])
}

/// 指定した環境変数でルーターを構築する
pub fn test_app_with(sender: MockMailSender, vars: &[(&str, &str)]) -> TestApp {
   let vars: Vec<(String, String)> = vars
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
   let config = DispatchConfig::from_lookup(|name| {
      vars.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone())
   })
   .unwrap();

   let sink = MockAuditSink::new();
   let deps = AppDependencies {
      mail_sender: Arc::new(sender.clone()),
      audit_sink:  Arc::new(sink.clone()),
      clock:       Arc::new(FixedClock::new(
         Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap(),
      )),
      http_client: reqwest::Client::new(),
   };

   TestApp {
      router: build_app(&config, deps),
      sender,
      sink,
   }
}

/// JSON ボディ付きの POST を送信し、ステータスと JSON を返す
pub async fn post_json(
   router: &Router,
   uri: &str,
   body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
   let request = Request::builder()
      .method("POST")
      .uri(uri)
      .header("content-type", "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
   send(router, request).await
}

/// リクエストを送信し、ステータスと JSON を返す
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
   let response = router.clone().oneshot(request).await.unwrap();
   let status = response.status();
   let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
   let json = if bytes.is_empty() {
      serde_json::Value::Null
   } else {
      serde_json::from_slice(&bytes).unwrap_or_else(|_| {
         serde_json::Value::String(String::from_utf8_lossy(&bytes).to_string())
      })
   };
   (status, json)
}

/// 個別送信の正常なリクエストボディ
pub fn certificate_body() -> serde_json::Value {
   serde_json::json!({
      "Correo": "ana@example.com",
      "Nombres": "Ana Lopez",
      "Puesto": "Staff General",
      "pdf": "JVBERi0xLjQK",
      "mensajeCorreo": "Gracias por colaborar en el evento."
   })
}

/// チーム送信の正常なリクエストボディ
pub fn team_archive_body() -> serde_json::Value {
   serde_json::json!({
      "Correo": "lead@example.com",
      "Nombres": "Equipo Azul",
      "mensajeCorreo": "Adjuntamos las constancias del equipo.",
      "zipBase64": "UEsDBAo=",
      "filename": "equipo_azul.zip"
   })
}

/// デコード後の推定サイズが `limit_bytes` をちょうど 1 バイト超える base64 文字列
pub fn oversized_base64(limit_bytes: u64) -> String {
   // len * 3 / 4 > limit となる最小の長さ
   let len = (limit_bytes + 1) * 4 / 3 + 1;
   "A".repeat(len as usize)
}
