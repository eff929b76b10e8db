//! Noop メール送信実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! ローカル開発やメール送信を止めたい環境で使用する。

use async_trait::async_trait;
use eventdesk_domain::mail::{MailError, OutboundEmail, SendReceipt};

use super::MailSender;

/// Noop メール送信（ログ出力のみ）
#[derive(Debug, Clone, Default)]
pub struct NoopMailSender;

#[async_trait]
impl MailSender for NoopMailSender {
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, MailError> {
        let attachments: Vec<&str> = email
            .attachments
            .iter()
            .map(|a| a.filename.as_str())
            .collect();
        tracing::info!(
            to = ?email.primary_recipient().map(|r| r.email.as_str()),
            subject = %email.subject,
            attachments = ?attachments,
            "Noop: メール送信をスキップ"
        );
        Ok(SendReceipt::empty())
    }
}
