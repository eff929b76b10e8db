//! SMTP メール送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! 開発環境では Mailpit（ローカル SMTP サーバー）に接続する。
//!
//! SMTP はメッセージ ID を返さないため、送信結果は常に空になる。

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use eventdesk_domain::mail::{MailError, OutboundEmail, SendReceipt};
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Attachment, Mailbox, Message, MultiPart, SinglePart, header::ContentType},
};

use super::MailSender;

/// SMTP メール送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
pub struct SmtpMailSender {
    transport:  AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
    from_name:  String,
}

impl SmtpMailSender {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `host`: SMTP サーバーのホスト名（例: "localhost"）
    /// - `port`: SMTP サーバーのポート番号（例: 1025 for Mailpit）
    /// - `from_email` / `from_name`: 送信元
    pub fn new(
        host: &str,
        port: u16,
        from_email: impl Into<String>,
        from_name: impl Into<String>,
    ) -> Self {
        // builder_dangerous: TLS なしで接続（Mailpit 等のローカル SMTP 向け）
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Self {
            transport,
            from_email: from_email.into(),
            from_name: from_name.into(),
        }
    }

    /// 送信メッセージを MIME メッセージに変換する
    ///
    /// 本文はテキストパート、添付は base64 をデコードして個別パートにする。
    pub fn build_message(&self, email: &OutboundEmail) -> Result<Message, MailError> {
        let from = mailbox(&self.from_name, &self.from_email)
            .map_err(|e| MailError::InvalidMessage(format!("送信元アドレス不正: {e}")))?;

        let mut builder = Message::builder().from(from).subject(&email.subject);
        for recipient in &email.recipients {
            let to = mailbox(&recipient.name, &recipient.email)
                .map_err(|e| MailError::InvalidMessage(format!("宛先アドレス不正: {e}")))?;
            builder = builder.to(to);
        }

        let mut body = MultiPart::mixed().singlepart(SinglePart::plain(email.text_body.clone()));
        for attachment in &email.attachments {
            let content = STANDARD.decode(&attachment.base64_content).map_err(|e| {
                MailError::InvalidMessage(format!(
                    "添付ファイル {} の base64 が不正: {e}",
                    attachment.filename
                ))
            })?;
            let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
                MailError::InvalidMessage(format!("Content-Type 不正: {e}"))
            })?;
            body = body.singlepart(Attachment::new(attachment.filename.clone()).body(content, content_type));
        }

        builder
            .multipart(body)
            .map_err(|e| MailError::InvalidMessage(format!("メッセージ構築失敗: {e}")))
    }
}

fn mailbox(name: &str, email: &str) -> Result<Mailbox, lettre::address::AddressError> {
    let name = (!name.trim().is_empty()).then(|| name.to_string());
    Ok(Mailbox::new(name, email.parse()?))
}

#[async_trait]
impl MailSender for SmtpMailSender {
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, MailError> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(format!("SMTP 送信失敗: {e}")))?;

        Ok(SendReceipt::empty())
    }
}
