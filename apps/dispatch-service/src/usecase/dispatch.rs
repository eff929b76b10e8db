//! # 送信ユースケース
//!
//! 証明書の個別送信とチーム ZIP 送信のフローを統合する。
//!
//! ## 設計方針
//!
//! - **検証済みの入力のみ受け取る**: 必須チェック・サイズ検証はドメイン層で完了している
//! - **リトライなし**: プロバイダの失敗はそのまま呼び出し元へ返す
//! - **成功時のみ監査記録**: 失敗した送信は記録しない
//! - **依存性注入**: `MailSender` と `AuditSink` は trait で抽象化

use std::sync::Arc;

use eventdesk_domain::{
   audit::DeliverySummary,
   dispatch::{CertificateDelivery, TeamArchiveDelivery},
   mail::OutboundEmail,
};
use eventdesk_infra::mail::MailSender;
use eventdesk_shared::{
   event_log::{error as log_error, event},
   log_business_event,
};

use super::AuditRecorder;
use crate::error::ApiError;

/// 送信ユースケース実装
pub struct DispatchUseCaseImpl {
   sender:   Arc<dyn MailSender>,
   recorder: AuditRecorder,
}

impl DispatchUseCaseImpl {
   pub fn new(sender: Arc<dyn MailSender>, recorder: AuditRecorder) -> Self {
      Self { sender, recorder }
   }

   /// 証明書を 1 名に送信する
   ///
   /// 戻り値はプロバイダが採番したメッセージ ID（返らない場合は `None`）。
   pub async fn send_certificate(
      &self,
      delivery: CertificateDelivery,
   ) -> Result<Option<String>, ApiError> {
      let (email, summary) = delivery.into_outbound();
      self
         .deliver(email, summary, event::action::CERTIFICATE_SENT)
         .await
   }

   /// チームの ZIP を代表者に送信する
   pub async fn send_team_archive(
      &self,
      delivery: TeamArchiveDelivery,
   ) -> Result<Option<String>, ApiError> {
      let (email, summary) = delivery.into_outbound();
      self
         .deliver(email, summary, event::action::TEAM_ARCHIVE_SENT)
         .await
   }

   async fn deliver(
      &self,
      email: OutboundEmail,
      summary: DeliverySummary,
      success_action: &'static str,
   ) -> Result<Option<String>, ApiError> {
      let result = self.sender.send(&email).await;
      // 添付本体は送信後不要
      drop(email);

      match result {
         Ok(receipt) => {
            let message_id = receipt.first_message_id().map(str::to_string);
            log_business_event!(
               event.category = event::category::DISPATCH,
               event.action = success_action,
               event.entity_type = event::entity_type::EMAIL_MESSAGE,
               event.entity_id = message_id.as_deref().unwrap_or("-"),
               event.result = event::result::SUCCESS,
               dispatch.kind = %summary.kind,
               dispatch.recipient = %summary.recipient_email,
               dispatch.filename = %summary.filename,
               "メール送信成功"
            );
            self.recorder.record(summary, message_id.clone()).await;
            Ok(message_id)
         }
         Err(e) => {
            let status = e.status_code();
            let detail = e.detail();
            log_business_event!(
               event.category = event::category::DISPATCH,
               event.action = event::action::DELIVERY_FAILED,
               event.entity_type = event::entity_type::EMAIL_MESSAGE,
               event.result = event::result::FAILURE,
               dispatch.kind = %summary.kind,
               dispatch.recipient = %summary.recipient_email,
               dispatch.filename = %summary.filename,
               "メール送信失敗"
            );
            tracing::error!(
               error.category = log_error::category::EXTERNAL_SERVICE,
               error.kind = log_error::kind::MAIL_PROVIDER,
               provider_status = status,
               error = %e,
               "メールプロバイダへの送信に失敗"
            );
            Err(ApiError::Delivery { status, detail })
         }
      }
   }
}

#[cfg(test)]
mod tests {
   use chrono::{TimeZone, Utc};
   use eventdesk_domain::{
      audit::AttachmentKind,
      clock::FixedClock,
      dispatch::{CertificateDraft, TeamArchiveDraft},
   };
   use eventdesk_infra::mock::{MockAuditSink, MockMailSender};
   use pretty_assertions::assert_eq;

   use super::*;

   struct Setup {
      sut:    DispatchUseCaseImpl,
      sender: MockMailSender,
      sink:   MockAuditSink,
   }

   fn setup(sender: MockMailSender) -> Setup {
      let sink = MockAuditSink::new();
      let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap());
      let sut = DispatchUseCaseImpl::new(
         Arc::new(sender.clone()),
         AuditRecorder::new(Arc::new(sink.clone()), Arc::new(clock)),
      );
      Setup { sut, sender, sink }
   }

   fn certificate(content_type: Option<&str>) -> CertificateDelivery {
      CertificateDelivery::try_from_draft(CertificateDraft {
         recipient_email: Some("ana@example.com".to_string()),
         recipient_name: Some("Ana Lopez".to_string()),
         role: Some("Staff General".to_string()),
         attachment_base64: Some("JVBERi0xLjQK".to_string()),
         message_body: Some("Gracias por colaborar.".to_string()),
         content_type: content_type.map(str::to_string),
         ..Default::default()
      })
      .unwrap()
   }

   fn team_archive() -> TeamArchiveDelivery {
      TeamArchiveDelivery::try_from_draft(TeamArchiveDraft {
         recipient_email: Some("lead@example.com".to_string()),
         recipient_name:  Some("Equipo Azul".to_string()),
         message_body:    Some("Adjuntamos las constancias.".to_string()),
         zip_base64:      Some("UEsDBAo=".to_string()),
         filename:        Some("equipo_azul.zip".to_string()),
         subject:         None,
      })
      .unwrap()
   }

   #[tokio::test]
   async fn test_送信成功でメッセージidを返し監査記録を1件残す() {
      let s = setup(MockMailSender::succeeding(&["abc123"]));

      let result = s.sut.send_certificate(certificate(None)).await;

      assert_eq!(result.unwrap(), Some("abc123".to_string()));
      assert_eq!(s.sender.call_count(), 1);
      let records = s.sink.records();
      assert_eq!(records.len(), 1);
      assert_eq!(records[0].kind, AttachmentKind::Pdf);
      assert_eq!(records[0].role.as_deref(), Some("Staff General"));
      assert_eq!(records[0].filename, "Constancia_Staff_General_Ana_Lopez.pdf");
   }

   #[tokio::test]
   async fn test_content_typeがzipなら監査記録の種別もzip() {
      let s = setup(MockMailSender::succeeding(&["abc123"]));

      s.sut
         .send_certificate(certificate(Some("application/zip")))
         .await
         .unwrap();

      assert_eq!(s.sink.records()[0].kind, AttachmentKind::Zip);
   }

   #[tokio::test]
   async fn test_送信失敗は監査記録を残さずdeliveryエラーを返す() {
      let s = setup(MockMailSender::failing(401, "Unauthorized"));

      let result = s.sut.send_certificate(certificate(None)).await;

      match result {
         Err(ApiError::Delivery { status, detail }) => {
            assert_eq!(status, 401);
            assert_eq!(detail, "Unauthorized");
         }
         other => panic!("Delivery エラーを期待したが {other:?} を受け取った"),
      }
      assert!(s.sink.records().is_empty());
   }

   #[tokio::test]
   async fn test_message_idが返らない場合はnoneで記録する() {
      let s = setup(MockMailSender::succeeding(&[]));

      let result = s.sut.send_team_archive(team_archive()).await;

      assert_eq!(result.unwrap(), None);
      let records = s.sink.records();
      assert_eq!(records.len(), 1);
      assert_eq!(records[0].kind, AttachmentKind::Zip);
      assert_eq!(records[0].message_id, None);
      assert_eq!(records[0].role, None);
   }

   #[tokio::test]
   async fn test_チーム送信のメッセージはzip添付と挨拶文を含む() {
      let s = setup(MockMailSender::succeeding(&["zip-1"]));

      s.sut.send_team_archive(team_archive()).await.unwrap();

      let sent = s.sender.sent_emails();
      assert_eq!(sent.len(), 1);
      assert_eq!(sent[0].attachments[0].content_type, "application/zip");
      assert_eq!(sent[0].subject, "Constancia de participación");
      assert_eq!(
         sent[0].text_body,
         "Hola Equipo Azul,\n\nAdjuntamos las constancias.\n\nSaludos."
      );
   }

   #[tokio::test]
   async fn test_監査記録の失敗は送信結果に影響しない() {
      let sender = MockMailSender::succeeding(&["abc123"]);
      let sut = DispatchUseCaseImpl::new(
         Arc::new(sender.clone()),
         AuditRecorder::new(
            Arc::new(MockAuditSink::failing()),
            Arc::new(FixedClock::new(Utc::now())),
         ),
      );

      let result = sut.send_certificate(certificate(None)).await;

      assert_eq!(result.unwrap(), Some("abc123".to_string()));
   }
}
