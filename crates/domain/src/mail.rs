//! # メール
//!
//! プロバイダに渡す送信メッセージと、送信結果・送信エラーを定義する。
//!
//! ## 設計方針
//!
//! - **プロバイダ非依存**: 宛先・件名・本文・添付のみを持ち、送信元は送信実装側が保持する
//! - **N 宛先 × M 添付**: 現在の送信フローは 1 宛先 1 添付だが、型は複数を許容する
//! - **ベストエフォートの診断情報**: [`MailError::detail`] はプロバイダ応答本文を優先する

use std::fmt;

use thiserror::Error;

/// `detail` が得られない場合の汎用メッセージ
const UNKNOWN_PROVIDER_ERROR: &str = "Error desconocido del proveedor de correo";

/// 宛先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub email: String,
    pub name:  String,
}

/// 添付ファイル
///
/// 内容は base64 エンコード済みのまま保持する（Mailjet はそのまま受け付ける）。
#[derive(Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    pub filename:       String,
    pub content_type:   String,
    pub base64_content: String,
}

// 添付本体は数十 MB になり得るため、Debug 出力には長さのみ含める
impl fmt::Debug for EmailAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailAttachment")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("base64_len", &self.base64_content.len())
            .finish()
    }
}

/// 送信メッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub recipients:  Vec<Recipient>,
    pub subject:     String,
    pub text_body:   String,
    pub attachments: Vec<EmailAttachment>,
}

impl OutboundEmail {
    /// 1 宛先・1 添付のメッセージを作成する
    pub fn single(
        recipient: Recipient,
        subject: impl Into<String>,
        text_body: impl Into<String>,
        attachment: EmailAttachment,
    ) -> Self {
        Self {
            recipients:  vec![recipient],
            subject:     subject.into(),
            text_body:   text_body.into(),
            attachments: vec![attachment],
        }
    }

    /// 先頭の宛先を返す（ログ出力用）
    pub fn primary_recipient(&self) -> Option<&Recipient> {
        self.recipients.first()
    }
}

/// 送信結果
///
/// プロバイダが宛先ごとに採番したメッセージ ID を保持する。
/// ID を返さないプロバイダ（SMTP 等）では空になる。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendReceipt {
    pub message_ids: Vec<String>,
}

impl SendReceipt {
    /// メッセージ ID なしの送信結果
    pub fn empty() -> Self {
        Self::default()
    }

    /// 先頭宛先のメッセージ ID
    pub fn first_message_id(&self) -> Option<&str> {
        self.message_ids.first().map(String::as_str)
    }
}

/// メール送信エラー
#[derive(Debug, Error)]
pub enum MailError {
    /// プロバイダが HTTP エラーで送信を拒否した
    #[error("プロバイダが送信を拒否しました（HTTP {status}）: {detail}")]
    Rejected { status: u16, detail: String },

    /// プロバイダへ到達できなかった
    #[error("プロバイダへの接続に失敗: {0}")]
    Transport(String),

    /// 送信前のメッセージ構築に失敗した（アドレス不正、base64 不正など）
    #[error("メッセージ構築に失敗: {0}")]
    InvalidMessage(String),
}

impl MailError {
    /// プロバイダのステータスコード（不明な場合は 500）
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Rejected { status, .. } => *status,
            Self::Transport(_) | Self::InvalidMessage(_) => 500,
        }
    }

    /// クライアントに返す診断情報
    ///
    /// プロバイダ応答本文 → エラーメッセージ → 汎用メッセージの順で採用する。
    pub fn detail(&self) -> String {
        let raw = match self {
            Self::Rejected { detail, .. } => detail.as_str(),
            Self::Transport(msg) | Self::InvalidMessage(msg) => msg.as_str(),
        };
        if raw.trim().is_empty() {
            UNKNOWN_PROVIDER_ERROR.to_string()
        } else {
            raw.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn make_attachment() -> EmailAttachment {
        EmailAttachment {
            filename:       "Constancia.pdf".to_string(),
            content_type:   "application/pdf".to_string(),
            base64_content: "A".repeat(4096),
        }
    }

    #[test]
    fn test_rejectedはプロバイダのステータスを返す() {
        let err = MailError::Rejected {
            status: 401,
            detail: "API key authentication/authorization failure".to_string(),
        };

        assert_eq!(err.status_code(), 401);
        assert_eq!(
            err.detail(),
            "API key authentication/authorization failure"
        );
    }

    #[test]
    fn test_transportはステータス500を返す() {
        let err = MailError::Transport("connection refused".to_string());

        assert_eq!(err.status_code(), 500);
        assert_eq!(err.detail(), "connection refused");
    }

    #[test]
    fn test_detailが空のとき汎用メッセージにフォールバックする() {
        let err = MailError::Rejected {
            status: 502,
            detail: "  ".to_string(),
        };

        assert_eq!(err.detail(), UNKNOWN_PROVIDER_ERROR);
    }

    #[test]
    fn test_添付のdebug出力に本体が含まれない() {
        let debug = format!("{:?}", make_attachment());

        assert!(debug.contains("base64_len: 4096"), "{debug}");
        assert!(!debug.contains("AAAA"), "{debug}");
    }

    #[test]
    fn test_singleは1宛先1添付のメッセージを作る() {
        let email = OutboundEmail::single(
            Recipient {
                email: "ana@example.com".to_string(),
                name:  "Ana".to_string(),
            },
            "Asunto",
            "Hola",
            make_attachment(),
        );

        assert_eq!(email.recipients.len(), 1);
        assert_eq!(email.attachments.len(), 1);
        assert_eq!(
            email.primary_recipient().map(|r| r.email.as_str()),
            Some("ana@example.com")
        );
    }

    #[test]
    fn test_first_message_idは先頭を返す() {
        let receipt = SendReceipt {
            message_ids: vec!["abc123".to_string(), "def456".to_string()],
        };

        assert_eq!(receipt.first_message_id(), Some("abc123"));
        assert_eq!(SendReceipt::empty().first_message_id(), None);
    }
}
