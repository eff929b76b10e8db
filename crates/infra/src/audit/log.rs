//! ログストリームへの監査記録

use async_trait::async_trait;
use eventdesk_domain::audit::AuditRecord;

use super::AuditSink;
use crate::error::InfraError;

/// 監査記録を構造化ログとして出力する
///
/// 永続ボリュームを持たない環境で、ログ基盤側に保存を任せる場合に使用する。
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAuditSink;

impl LogAuditSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditSink for LogAuditSink {
    async fn append(&self, record: &AuditRecord) -> Result<(), InfraError> {
        tracing::info!(
            audit.kind = %record.kind,
            audit.recipient_email = %record.recipient_email,
            audit.recipient_name = %record.recipient_name,
            audit.role = record.role.as_deref(),
            audit.filename = %record.filename,
            audit.message_id = record.message_id.as_deref(),
            audit.timestamp = %record.timestamp.to_rfc3339(),
            "監査記録"
        );
        Ok(())
    }
}
