//! # ビジネスイベントログとエラーコンテキストの構造化ヘルパー
//!
//! `jq` で送信履歴を調査できるよう、ログフィールドの命名規約と
//! ヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## エラーコンテキスト
//!
//! `tracing::error!` / `tracing::warn!` に `error.category` + `error.kind` フィールドを
//! 直接追加する。定数は [`error`] モジュールで提供。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.category`、`error.kind`）を使用。JSON 出力でフラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
///
/// ## 推奨フィールド
///
/// - `event.entity_type`: エンティティ種別（[`event::entity_type`] の定数を使用）
/// - `event.entity_id`: エンティティ ID（プロバイダのメッセージ ID 等）
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const DISPATCH: &str = "dispatch";
        pub const AUDIT: &str = "audit";
    }

    /// イベントアクション
    pub mod action {
        // 送信
        pub const CERTIFICATE_SENT: &str = "dispatch.certificate_sent";
        pub const TEAM_ARCHIVE_SENT: &str = "dispatch.team_archive_sent";
        pub const DELIVERY_FAILED: &str = "dispatch.delivery_failed";

        // 監査
        pub const RECORD_APPENDED: &str = "audit.record_appended";
    }

    /// エンティティ種別
    pub mod entity_type {
        pub const EMAIL_MESSAGE: &str = "email_message";
        pub const AUDIT_RECORD: &str = "audit_record";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// インフラストラクチャ（ファイルシステム、ログシンク）
        pub const INFRASTRUCTURE: &str = "infrastructure";
        /// 外部サービス呼び出し（メールプロバイダ、PDF 配信元）
        pub const EXTERNAL_SERVICE: &str = "external_service";
    }

    /// エラー種別
    pub mod kind {
        pub const AUDIT_WRITE: &str = "audit_write";
        pub const MAIL_PROVIDER: &str = "mail_provider";
        pub const PDF_UPSTREAM: &str = "pdf_upstream";
        pub const CONFIGURATION: &str = "configuration";
    }
}
