//! # テスト用モック
//!
//! ユースケーステスト・ハンドラテストで使用するインメモリモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! eventdesk-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use eventdesk_domain::{
   audit::AuditRecord,
   mail::{MailError, OutboundEmail, SendReceipt},
};

use crate::{audit::AuditSink, error::InfraError, mail::MailSender};

// ===== MockMailSender =====

#[derive(Clone)]
enum MockOutcome {
   Succeed(Vec<String>),
   Reject { status: u16, detail: String },
}

/// 送信内容を記録するメール送信モック
#[derive(Clone)]
pub struct MockMailSender {
   outcome: MockOutcome,
   sent:    Arc<Mutex<Vec<OutboundEmail>>>,
}

impl MockMailSender {
   /// 常に成功し、指定したメッセージ ID を返す
   pub fn succeeding(message_ids: &[&str]) -> Self {
      Self {
         outcome: MockOutcome::Succeed(message_ids.iter().map(|id| id.to_string()).collect()),
         sent:    Arc::new(Mutex::new(Vec::new())),
      }
   }

   /// 常にプロバイダ拒否（`MailError::Rejected`）で失敗する
   pub fn failing(status: u16, detail: &str) -> Self {
      Self {
         outcome: MockOutcome::Reject {
            status,
            detail: detail.to_string(),
         },
         sent:    Arc::new(Mutex::new(Vec::new())),
      }
   }

   /// 送信が試みられたメッセージ（失敗したものも含む）
   pub fn sent_emails(&self) -> Vec<OutboundEmail> {
      self.sent.lock().unwrap().clone()
   }

   pub fn call_count(&self) -> usize {
      self.sent.lock().unwrap().len()
   }
}

#[async_trait]
impl MailSender for MockMailSender {
   async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, MailError> {
      self.sent.lock().unwrap().push(email.clone());
      match &self.outcome {
         MockOutcome::Succeed(ids) => Ok(SendReceipt {
            message_ids: ids.clone(),
         }),
         MockOutcome::Reject { status, detail } => Err(MailError::Rejected {
            status: *status,
            detail: detail.clone(),
         }),
      }
   }
}

// ===== MockAuditSink =====

/// 追記された記録を保持する監査シンクモック
#[derive(Clone, Default)]
pub struct MockAuditSink {
   records: Arc<Mutex<Vec<AuditRecord>>>,
   fail:    bool,
}

impl MockAuditSink {
   pub fn new() -> Self {
      Self::default()
   }

   /// 常に書き込みに失敗する
   pub fn failing() -> Self {
      Self {
         records: Arc::new(Mutex::new(Vec::new())),
         fail:    true,
      }
   }

   pub fn records(&self) -> Vec<AuditRecord> {
      self.records.lock().unwrap().clone()
   }
}

#[async_trait]
impl AuditSink for MockAuditSink {
   async fn append(&self, record: &AuditRecord) -> Result<(), InfraError> {
      if self.fail {
         return Err(InfraError::unexpected("監査ログへの書き込みに失敗（モック）"));
      }
      self.records.lock().unwrap().push(record.clone());
      Ok(())
   }
}
