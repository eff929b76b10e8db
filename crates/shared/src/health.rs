//! # ヘルスチェック共通型
//!
//! `/health` エンドポイントのレスポンス型を提供する。
//! メールプロバイダの設定状態に関わらず常に `{"ok": true}` を返す。

use serde::{Deserialize, Serialize};

/// ヘルスチェックレスポンス
///
/// ## 使用例
///
/// ```
/// use eventdesk_shared::HealthResponse;
///
/// let response = HealthResponse::healthy();
/// assert!(response.ok);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 稼働状態
    pub ok: bool,
}

impl HealthResponse {
    /// 稼働中を表すレスポンス
    pub fn healthy() -> Self {
        Self { ok: true }
    }
}
