//! # EventDesk インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **メール送信**: Mailjet Send API / SMTP / Noop の 3 実装（[`mail`]）
//! - **監査記録の永続化**: 追記専用ファイル / ログストリームの 2 実装（[`audit`]）
//!
//! ## 依存関係
//!
//! ```text
//! app → infra → domain
//! ```
//!
//! インフラ層は `domain` に依存する。ドメイン層はインフラ層に依存しない。
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use eventdesk_infra::{
//!     audit::{AuditSink, FileAuditSink},
//!     mail::{MailSender, MailjetCredentials, MailjetMailSender},
//! };
//!
//! let sender: Arc<dyn MailSender> = Arc::new(MailjetMailSender::new(
//!     "https://api.mailjet.com/v3.1/send",
//!     Some(MailjetCredentials::new("key", "secret")),
//!     "no-reply@eventdesk.example.com",
//!     "EventDesk",
//! ));
//! let sink: Arc<dyn AuditSink> = Arc::new(FileAuditSink::new("logs/dispatch-audit.log"));
//! ```

pub mod audit;
pub mod error;
pub mod mail;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::{InfraError, InfraErrorKind};
