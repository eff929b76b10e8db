//! # メール送信
//!
//! メールプロバイダへの送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `MailSender` trait でプロバイダを抽象化し、
//!   送信ユースケースには `Arc<dyn MailSender>` として注入する
//! - **3 つの実装**: Mailjet（本番用）、SMTP（Mailpit 開発用）、Noop（送信無効化）
//! - **環境変数切替**: `MAIL_BACKEND` で起動時に選択する
//! - **リトライしない**: 送信失敗はそのまま呼び出し元に返す（重複送信を避けるため）

mod mailjet;
mod noop;
mod smtp;

use async_trait::async_trait;
use eventdesk_domain::mail::{MailError, OutboundEmail, SendReceipt};
pub use mailjet::{MAILJET_SEND_URL, MailjetCredentials, MailjetMailSender};
pub use noop::NoopMailSender;
pub use smtp::SmtpMailSender;

/// メール送信トレイト
///
/// 送信元アドレスは実装側が保持する。
/// 実装はプロセス全体で 1 インスタンスを共有するため `Send + Sync` であること。
#[async_trait]
pub trait MailSender: Send + Sync {
    /// メールを 1 通送信し、プロバイダが採番したメッセージ ID を返す
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, MailError>;
}
