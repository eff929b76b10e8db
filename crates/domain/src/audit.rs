//! # 監査記録
//!
//! 送信済みメールの監査証跡。後から送信履歴を突き合わせるために使用する。
//!
//! ## 設計方針
//!
//! - **不変性**: 監査記録は一度作成されたら変更・削除されない
//! - **成功時のみ**: プロバイダ呼び出しが成功した送信だけを記録する
//! - **JSON Lines**: 1 記録 = 1 行の JSON として追記される

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::dispatch::ZIP_CONTENT_TYPE;

/// 添付ファイルの種別
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttachmentKind {
    Pdf,
    Zip,
}

impl AttachmentKind {
    /// Content-Type から種別を判定する
    ///
    /// `application/zip` のみ ZIP とし、それ以外はすべて PDF として扱う。
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type == ZIP_CONTENT_TYPE {
            Self::Zip
        } else {
            Self::Pdf
        }
    }
}

/// 送信内容の要約
///
/// 添付本体を含まない、監査に必要な情報のみを保持する。
/// 送信メッセージの構築時に分離され、送信成功後に [`AuditRecord`] になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliverySummary {
    pub kind:            AttachmentKind,
    pub recipient_email: String,
    pub recipient_name:  String,
    pub role:            Option<String>,
    pub filename:        String,
}

/// 監査記録
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub kind:            AttachmentKind,
    pub recipient_email: String,
    pub recipient_name:  String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role:            Option<String>,
    pub filename:        String,
    /// プロバイダが採番したメッセージ ID（取得できない場合は null）
    pub message_id:      Option<String>,
    /// 記録時刻（Recorder が付与）
    pub timestamp:       DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(
        summary: DeliverySummary,
        message_id: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: summary.kind,
            recipient_email: summary.recipient_email,
            recipient_name: summary.recipient_name,
            role: summary.role,
            filename: summary.filename,
            message_id,
            timestamp,
        }
    }

    /// 改行を含まない 1 行の JSON に変換する
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
