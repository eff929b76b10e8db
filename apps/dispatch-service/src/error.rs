//! # Dispatch Service エラー定義
//!
//! Dispatch Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! どのエラーも [`ErrorResponse`]（`{ "error": ..., "detail"?: ... }`）として返す。

use axum::{
   Json,
   extract::rejection::JsonRejection,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use eventdesk_domain::dispatch::{DeliveryField, DeliveryRejection};
use eventdesk_shared::ErrorResponse;
use thiserror::Error;

const MIB: u64 = 1024 * 1024;

/// Dispatch Service で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
   /// 必須フィールドの欠落（ボディ上のフィールド名を保持）
   #[error("必須フィールドが不足しています: {}", .0.join(", "))]
   Validation(Vec<&'static str>),

   /// 添付ファイルのサイズ超過
   #[error("添付ファイルが上限 {limit_mib} MB を超えています")]
   PayloadTooLarge { limit_mib: u64 },

   /// メールプロバイダへの送信失敗
   #[error("メール送信に失敗しました（HTTP {status}）: {detail}")]
   Delivery { status: u16, detail: String },

   /// `url` クエリパラメータがない
   #[error("url パラメータがありません")]
   MissingUrl,

   /// `url` が http(s) の絶対 URL として解釈できない
   #[error("url パラメータが不正です: {0}")]
   InvalidUrl(String),

   /// PDF 取得先がエラーステータスを返した
   #[error("PDF 取得先がエラーを返しました: {0}")]
   ProxyStatus(StatusCode),

   /// PDF 取得先へ到達できなかった
   #[error("PDF の取得に失敗しました: {0}")]
   ProxyFetch(String),

   /// JSON ボディの解釈に失敗した
   #[error("リクエストボディが不正です: {0}")]
   MalformedBody(#[from] JsonRejection),
}

impl ApiError {
   /// 送信前の検証エラーから変換する
   ///
   /// `wire_name` でドメインのフィールドをリクエストボディ上の名前に対応付ける。
   pub fn from_rejection(
      rejection: DeliveryRejection,
      wire_name: impl Fn(DeliveryField) -> &'static str,
   ) -> Self {
      match rejection {
         DeliveryRejection::MissingFields(fields) => {
            Self::Validation(fields.into_iter().map(wire_name).collect())
         }
         DeliveryRejection::PayloadTooLarge { limit_bytes, .. } => Self::PayloadTooLarge {
            limit_mib: limit_bytes / MIB,
         },
      }
   }
}

impl IntoResponse for ApiError {
   fn into_response(self) -> Response {
      let (status, body) = match &self {
         ApiError::Validation(fields) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::missing_fields(fields),
         ),
         ApiError::PayloadTooLarge { limit_mib } => (
            StatusCode::PAYLOAD_TOO_LARGE,
            ErrorResponse::payload_too_large(*limit_mib),
         ),
         ApiError::Delivery { detail, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::with_detail("Error al enviar el correo", detail.clone()),
         ),
         ApiError::MissingUrl => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Falta el parámetro url"),
         ),
         ApiError::InvalidUrl(detail) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::with_detail("URL inválida", detail.clone()),
         ),
         ApiError::ProxyStatus(upstream) => (
            *upstream,
            ErrorResponse::with_detail(
               "No se pudo obtener el PDF",
               format!("HTTP {}", upstream.as_u16()),
            ),
         ),
         ApiError::ProxyFetch(detail) => {
            tracing::error!("PDF 取得エラー: {}", detail);
            (
               StatusCode::INTERNAL_SERVER_ERROR,
               ErrorResponse::with_detail("Error al obtener el PDF", detail.clone()),
            )
         }
         ApiError::MalformedBody(rejection) => {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
               (
                  StatusCode::PAYLOAD_TOO_LARGE,
                  ErrorResponse::new("El cuerpo de la solicitud es demasiado grande"),
               )
            } else {
               (
                  StatusCode::BAD_REQUEST,
                  ErrorResponse::with_detail("JSON inválido", rejection.body_text()),
               )
            }
         }
      };

      (status, Json(body)).into_response()
   }
}
