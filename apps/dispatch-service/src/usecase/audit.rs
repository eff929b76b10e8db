//! # 監査記録
//!
//! 送信成功後に [`AuditRecord`] を組み立てて監査シンクへ追記する。
//!
//! 書き込み失敗は警告ログのみで呼び出し元へは返さない。
//! メールは送信済みのため、監査 1 行の欠落は送信失敗より軽い扱いとする。

use std::sync::Arc;

use eventdesk_domain::{
   audit::{AuditRecord, DeliverySummary},
   clock::Clock,
};
use eventdesk_infra::audit::AuditSink;
use eventdesk_shared::{
   event_log::{error as log_error, event},
   log_business_event,
};

/// 監査記録の追記を担当する
///
/// シンクは起動時に 1 度だけ選択される（ファイル / ログストリーム）。
pub struct AuditRecorder {
   sink:  Arc<dyn AuditSink>,
   clock: Arc<dyn Clock>,
}

impl AuditRecorder {
   pub fn new(sink: Arc<dyn AuditSink>, clock: Arc<dyn Clock>) -> Self {
      Self { sink, clock }
   }

   /// 送信済みの内容を 1 件記録する（失敗しても戻り値なし）
   pub async fn record(&self, summary: DeliverySummary, message_id: Option<String>) {
      let record = AuditRecord::new(summary, message_id, self.clock.now());

      match self.sink.append(&record).await {
         Ok(()) => {
            log_business_event!(
               event.category = event::category::AUDIT,
               event.action = event::action::RECORD_APPENDED,
               event.entity_type = event::entity_type::AUDIT_RECORD,
               event.entity_id = record.message_id.as_deref().unwrap_or("-"),
               event.result = event::result::SUCCESS,
               audit.kind = %record.kind,
               "監査記録を追記"
            );
         }
         Err(e) => {
            tracing::warn!(
               error.category = log_error::category::INFRASTRUCTURE,
               error.kind = log_error::kind::AUDIT_WRITE,
               error = %e,
               span_trace = %e.span_trace(),
               audit.kind = %record.kind,
               audit.recipient_email = %record.recipient_email,
               "監査記録の書き込みに失敗（送信結果には影響しない）"
            );
         }
      }
   }
}
