//! # ヘルスチェックハンドラ
//!
//! メールプロバイダの設定状況に関わらず、プロセスが応答できれば 200 を返す。

use axum::Json;
use eventdesk_shared::HealthResponse;

/// ヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
   Json(HealthResponse::healthy())
}
