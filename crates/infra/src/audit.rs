//! # 監査記録の永続化
//!
//! 送信成功ごとに 1 件の [`AuditRecord`] を追記する。
//!
//! ## 実装
//!
//! - [`FileAuditSink`]: JSON Lines 形式で追記専用ファイルへ書き込む（既定）
//! - [`LogAuditSink`]: 構造化ログとして出力する（ファイルを持てない環境向け）
//!
//! 記録の失敗はリクエスト結果に影響させない。呼び出し側で警告ログに留めること。

mod file;
mod log;

use async_trait::async_trait;
use eventdesk_domain::audit::AuditRecord;
pub use file::FileAuditSink;
pub use log::LogAuditSink;

use crate::error::InfraError;

/// 監査記録の書き込み先
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// 記録を 1 件追記する
    async fn append(&self, record: &AuditRecord) -> Result<(), InfraError>;
}
