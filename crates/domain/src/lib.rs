//! # EventDesk ドメイン層
//!
//! 証明書（コンスタンシア）配信ワークフローの中核となるモデルを定義する。
//!
//! ## 設計方針
//!
//! - **検証の前倒し**: 必須フィールドとサイズ上限の検証は、外部呼び出しの前に
//!   ドメイン層で完結させる
//! - **プロバイダ非依存**: メールは [`mail::OutboundEmail`] として表現し、
//!   具体的な送信手段（Mailjet / SMTP）はインフラ層に任せる
//! - **不変の監査記録**: [`audit::AuditRecord`] は作成後に変更されない
//!
//! ## 依存関係の方向
//!
//! ```text
//! app → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（HTTP、ファイルシステム）には一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`dispatch`] - 送信リクエストの検証・既定値の導出・本文生成
//! - [`mail`] - 送信メッセージとプロバイダエラー
//! - [`audit`] - 監査記録
//! - [`clock`] - 時刻プロバイダ
//!
//! ## 使用例
//!
//! ```rust
//! use eventdesk_domain::dispatch::{CertificateDelivery, CertificateDraft};
//!
//! let draft = CertificateDraft {
//!     recipient_email: Some("ana@example.com".to_string()),
//!     recipient_name: Some("Ana Lopez".to_string()),
//!     role: Some("Staff General".to_string()),
//!     attachment_base64: Some("JVBERi0xLjQK".to_string()),
//!     message_body: Some("Adjuntamos tu constancia.".to_string()),
//!     ..Default::default()
//! };
//!
//! let delivery = CertificateDelivery::try_from_draft(draft).unwrap();
//! assert_eq!(delivery.filename(), "Constancia_Staff_General_Ana_Lopez.pdf");
//! ```

pub mod audit;
pub mod clock;
pub mod dispatch;
pub mod mail;
