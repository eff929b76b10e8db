//! # 送信リクエスト
//!
//! 証明書（コンスタンシア）の個別送信と、チーム単位の ZIP 送信を表すドメインモデル。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 添付 | サイズ上限 |
//! |---|------------|------|-----------|
//! | [`CertificateDelivery`] | 個別送信 | PDF（既定） | 15 MiB |
//! | [`TeamArchiveDelivery`] | チーム送信 | ZIP | 20 MiB |
//!
//! ## 設計方針
//!
//! - **Draft → Delivery**: HTTP 層は `Option` だらけの Draft を組み立てるだけで、
//!   必須チェック・サイズ検証・既定値の導出はここで一括して行う
//! - **外部呼び出し前に失敗**: [`DeliveryRejection`] はプロバイダを呼ぶ前に返る
//! - **概算サイズ**: base64 長 × 3/4 で判定する。上限ちょうどは許可する

use thiserror::Error;

use crate::{
    audit::{AttachmentKind, DeliverySummary},
    mail::{EmailAttachment, OutboundEmail, Recipient},
};

const MIB: u64 = 1024 * 1024;

/// 個別送信の添付サイズ上限（15 MiB）
pub const CERTIFICATE_SIZE_LIMIT_BYTES: u64 = 15 * MIB;

/// チーム送信の添付サイズ上限（20 MiB）
pub const TEAM_ARCHIVE_SIZE_LIMIT_BYTES: u64 = 20 * MIB;

/// 件名未指定時の既定件名
pub const DEFAULT_SUBJECT: &str = "Constancia de participación";

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// 検証対象のフィールド
///
/// HTTP 層はこれをリクエストボディ上のフィールド名に対応付けてクライアントに返す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryField {
    RecipientEmail,
    RecipientName,
    Role,
    Attachment,
    MessageBody,
    Filename,
}

/// 送信前の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryRejection {
    /// 必須フィールドが欠落している（空文字も欠落とみなす）
    #[error("必須フィールドが不足しています（{} 件）", .0.len())]
    MissingFields(Vec<DeliveryField>),

    /// 添付の推定デコードサイズが上限を超えている
    #[error("添付ファイルが上限を超えています（{estimated_bytes} / {limit_bytes} バイト）")]
    PayloadTooLarge {
        estimated_bytes: u64,
        limit_bytes:     u64,
    },
}

/// base64 文字列からデコード後のサイズを概算する
///
/// パディングや改行は考慮しない。上限判定用の近似値。
pub fn estimate_decoded_size(base64: &str) -> u64 {
    (base64.len() as u64).saturating_mul(3) / 4
}

/// 名前と役割から証明書の既定ファイル名を導出する
///
/// 空白の連続は `_` 1 文字に置き換え、前後の空白は除去する。
///
/// ```
/// use eventdesk_domain::dispatch::derive_certificate_filename;
///
/// assert_eq!(
///     derive_certificate_filename("Staff General", "Ana Lopez"),
///     "Constancia_Staff_General_Ana_Lopez.pdf"
/// );
/// ```
pub fn derive_certificate_filename(role: &str, name: &str) -> String {
    format!(
        "Constancia_{}_{}.pdf",
        underscore_whitespace(role),
        underscore_whitespace(name)
    )
}

fn underscore_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join("_")
}

/// 空文字を未指定として扱う
///
/// 空白のみの値は指定ありとみなし、そのまま使う。
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn check_size(base64: &str, limit_bytes: u64) -> Result<(), DeliveryRejection> {
    let estimated_bytes = estimate_decoded_size(base64);
    if estimated_bytes > limit_bytes {
        return Err(DeliveryRejection::PayloadTooLarge {
            estimated_bytes,
            limit_bytes,
        });
    }
    Ok(())
}

/// 必須フィールドを取り出す。欠落していれば `missing` に記録する
fn require(
    value: Option<String>,
    field: DeliveryField,
    missing: &mut Vec<DeliveryField>,
) -> String {
    match present(value) {
        Some(v) => v,
        None => {
            missing.push(field);
            String::new()
        }
    }
}

// ===== 個別送信 =====

/// 個別送信の入力（未検証）
#[derive(Debug, Clone, Default)]
pub struct CertificateDraft {
    pub recipient_email:   Option<String>,
    pub recipient_name:    Option<String>,
    pub role:              Option<String>,
    pub attachment_base64: Option<String>,
    pub message_body:      Option<String>,
    pub subject:           Option<String>,
    pub filename:          Option<String>,
    pub content_type:      Option<String>,
}

/// 検証済みの個別送信
///
/// 既定値（ファイル名・Content-Type・件名）は解決済み。
#[derive(Debug, Clone)]
pub struct CertificateDelivery {
    recipient_email:   String,
    recipient_name:    String,
    role:              String,
    attachment_base64: String,
    message_body:      String,
    subject:           String,
    filename:          String,
    content_type:      String,
}

impl CertificateDelivery {
    /// Draft を検証し、既定値を解決する
    ///
    /// 1. 必須 5 項目（宛先メール・氏名・役割・添付・本文）の存在確認
    /// 2. 添付サイズ（15 MiB）の確認
    /// 3. ファイル名・Content-Type・件名の既定値を導出
    pub fn try_from_draft(draft: CertificateDraft) -> Result<Self, DeliveryRejection> {
        let mut missing = Vec::new();
        let recipient_email = require(
            draft.recipient_email,
            DeliveryField::RecipientEmail,
            &mut missing,
        );
        let recipient_name = require(
            draft.recipient_name,
            DeliveryField::RecipientName,
            &mut missing,
        );
        let role = require(draft.role, DeliveryField::Role, &mut missing);
        let attachment_base64 = require(
            draft.attachment_base64,
            DeliveryField::Attachment,
            &mut missing,
        );
        let message_body = require(
            draft.message_body,
            DeliveryField::MessageBody,
            &mut missing,
        );
        if !missing.is_empty() {
            return Err(DeliveryRejection::MissingFields(missing));
        }

        check_size(&attachment_base64, CERTIFICATE_SIZE_LIMIT_BYTES)?;

        let filename = present(draft.filename)
            .unwrap_or_else(|| derive_certificate_filename(&role, &recipient_name));
        let content_type =
            present(draft.content_type).unwrap_or_else(|| PDF_CONTENT_TYPE.to_string());
        let subject = present(draft.subject).unwrap_or_else(|| DEFAULT_SUBJECT.to_string());

        Ok(Self {
            recipient_email,
            recipient_name,
            role,
            attachment_base64,
            message_body,
            subject,
            filename,
            content_type,
        })
    }

    pub fn recipient_email(&self) -> &str {
        &self.recipient_email
    }

    pub fn recipient_name(&self) -> &str {
        &self.recipient_name
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn attachment_kind(&self) -> AttachmentKind {
        AttachmentKind::from_content_type(&self.content_type)
    }

    /// プレーンテキスト本文
    pub fn text_body(&self) -> String {
        format!(
            "Hola {},\n\n{}\n\n¡Gracias por tu participación!",
            self.recipient_name, self.message_body
        )
    }

    /// 送信メッセージと監査用の要約に分解する
    ///
    /// 添付本体はメッセージ側に移動し、コピーしない。
    pub fn into_outbound(self) -> (OutboundEmail, DeliverySummary) {
        let text_body = self.text_body();
        let summary = DeliverySummary {
            kind:            self.attachment_kind(),
            recipient_email: self.recipient_email.clone(),
            recipient_name:  self.recipient_name.clone(),
            role:            Some(self.role),
            filename:        self.filename.clone(),
        };
        let email = OutboundEmail::single(
            Recipient {
                email: self.recipient_email,
                name:  self.recipient_name,
            },
            self.subject,
            text_body,
            EmailAttachment {
                filename:       self.filename,
                content_type:   self.content_type,
                base64_content: self.attachment_base64,
            },
        );
        (email, summary)
    }
}

// ===== チーム送信 =====

/// チーム送信の入力（未検証）
#[derive(Debug, Clone, Default)]
pub struct TeamArchiveDraft {
    pub recipient_email: Option<String>,
    pub recipient_name:  Option<String>,
    pub message_body:    Option<String>,
    pub zip_base64:      Option<String>,
    pub filename:        Option<String>,
    pub subject:         Option<String>,
}

/// 検証済みのチーム送信
///
/// ファイル名は必須（既定値の導出なし）、Content-Type は `application/zip` 固定。
#[derive(Debug, Clone)]
pub struct TeamArchiveDelivery {
    recipient_email: String,
    recipient_name:  String,
    message_body:    String,
    zip_base64:      String,
    filename:        String,
    subject:         String,
}

impl TeamArchiveDelivery {
    /// Draft を検証し、件名の既定値を解決する
    pub fn try_from_draft(draft: TeamArchiveDraft) -> Result<Self, DeliveryRejection> {
        let mut missing = Vec::new();
        let recipient_email = require(
            draft.recipient_email,
            DeliveryField::RecipientEmail,
            &mut missing,
        );
        let recipient_name = require(
            draft.recipient_name,
            DeliveryField::RecipientName,
            &mut missing,
        );
        let message_body = require(
            draft.message_body,
            DeliveryField::MessageBody,
            &mut missing,
        );
        let zip_base64 = require(draft.zip_base64, DeliveryField::Attachment, &mut missing);
        let filename = require(draft.filename, DeliveryField::Filename, &mut missing);
        if !missing.is_empty() {
            return Err(DeliveryRejection::MissingFields(missing));
        }

        check_size(&zip_base64, TEAM_ARCHIVE_SIZE_LIMIT_BYTES)?;

        let subject = present(draft.subject).unwrap_or_else(|| DEFAULT_SUBJECT.to_string());

        Ok(Self {
            recipient_email,
            recipient_name,
            message_body,
            zip_base64,
            filename,
            subject,
        })
    }

    pub fn recipient_email(&self) -> &str {
        &self.recipient_email
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// プレーンテキスト本文
    pub fn text_body(&self) -> String {
        format!(
            "Hola {},\n\n{}\n\nSaludos.",
            self.recipient_name, self.message_body
        )
    }

    /// 送信メッセージと監査用の要約に分解する
    pub fn into_outbound(self) -> (OutboundEmail, DeliverySummary) {
        let text_body = self.text_body();
        let summary = DeliverySummary {
            kind:            AttachmentKind::Zip,
            recipient_email: self.recipient_email.clone(),
            recipient_name:  self.recipient_name.clone(),
            role:            None,
            filename:        self.filename.clone(),
        };
        let email = OutboundEmail::single(
            Recipient {
                email: self.recipient_email,
                name:  self.recipient_name,
            },
            self.subject,
            text_body,
            EmailAttachment {
                filename:       self.filename,
                content_type:   ZIP_CONTENT_TYPE.to_string(),
                base64_content: self.zip_base64,
            },
        );
        (email, summary)
    }
}
