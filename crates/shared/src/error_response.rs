//! # エラーレスポンス
//!
//! 全エンドポイントで共通のエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換は各サービスの責務（shared に axum 依存を入れない）
//! - フロントエンドは `error` フィールドのみを前提とする。`detail` はベストエフォート
//!
//! ```json
//! { "error": "Error al enviar el correo", "detail": "Unauthorized" }
//! ```

use serde::{Deserialize, Serialize};

/// エラーレスポンス
///
/// 失敗時は必ず `error` を含む JSON オブジェクトを返す。
/// `detail` は診断用の補足情報で、存在しない場合はシリアライズされない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
   pub error:  String,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub detail: Option<String>,
}

impl ErrorResponse {
   /// `detail` なしのエラーレスポンスを作成する
   pub fn new(error: impl Into<String>) -> Self {
      Self {
         error:  error.into(),
         detail: None,
      }
   }

   /// 補足情報付きのエラーレスポンスを作成する
   pub fn with_detail(error: impl Into<String>, detail: impl Into<String>) -> Self {
      Self {
         error:  error.into(),
         detail: Some(detail.into()),
      }
   }

   /// 必須フィールド欠落（400）
   pub fn missing_fields(fields: &[&str]) -> Self {
      Self::with_detail("Faltan campos requeridos", fields.join(", "))
   }

   /// 添付ファイルサイズ超過（413）
   pub fn payload_too_large(limit_mib: u64) -> Self {
      Self::new(format!(
         "El archivo excede el tamaño máximo permitido de {limit_mib} MB"
      ))
   }

   /// 内部エラー（500）
   ///
   /// detail は固定値なし（内部情報を漏らさないため）。
   pub fn internal_error() -> Self {
      Self::new("Error interno del servidor")
   }
}
