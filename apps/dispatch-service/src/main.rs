//! # Dispatch Service サーバー
//!
//! イベント管理コンソールのバックエンド。
//!
//! ## 役割
//!
//! - **メール送信**: 証明書 PDF / チーム ZIP を添付してメールプロバイダへ送信
//! - **監査記録**: 送信成功ごとに 1 行の JSON を追記
//! - **PDF プロキシ**: 外部ストレージの PDF を同一オリジンから中継
//! - **SPA 配信**: ビルド済み管理画面の静的ファイル（`SPA_DIR` 指定時）
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐     ┌──────────────┐
//! │  管理画面     │────▶│ Dispatch Service │────▶│   Mailjet    │
//! └──────────────┘     └──────────────────┘     └──────────────┘
//!                               │
//!                               ▼
//!                       logs/dispatch-audit.log
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `PORT` | No | ポート番号（デフォルト: `3001`） |
//! | `MAIL_BACKEND` | No | `mailjet` / `smtp` / `noop`（デフォルト: `mailjet`） |
//! | `MAILJET_API_KEY` / `MAILJET_API_SECRET` | No | 未設定でも起動する（送信はプロバイダに拒否される） |
//! | `AUDIT_SINK` | No | `file` / `log`（デフォルト: `file`） |
//! | `AUDIT_LOG_PATH` | No | 監査ログのパス（デフォルト: `logs/dispatch-audit.log`） |
//! | `SPA_DIR` | No | ビルド済み SPA のディレクトリ |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//!
//! 全項目は `eventdesk_dispatch_service::config` を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（Mailpit へ送信）
//! MAIL_BACKEND=smtp cargo run -p eventdesk-dispatch-service
//!
//! # 本番環境
//! MAILJET_API_KEY=... MAILJET_API_SECRET=... LOG_FORMAT=json \
//!   cargo run -p eventdesk-dispatch-service --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use eventdesk_dispatch_service::{
   app_builder::{AppDependencies, build_app},
   config::{AuditConfig, AuditSinkKind, DispatchConfig, MailBackend, MailConfig},
};
use eventdesk_domain::clock::SystemClock;
use eventdesk_infra::{
   audit::{AuditSink, FileAuditSink, LogAuditSink},
   mail::{MailSender, MailjetMailSender, NoopMailSender, SmtpMailSender},
};
use eventdesk_shared::{
   event_log::error as log_error,
   observability::{TracingConfig, init_tracing},
};
use tokio::net::TcpListener;

/// Dispatch Service サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. 送信実装・監査シンクの選択
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   // 本番環境では .env ファイルは使用せず、環境変数を直接設定する
   dotenvy::dotenv().ok();

   // トレーシング初期化
   init_tracing(TracingConfig::from_env("dispatch-service"));
   let _tracing_guard = tracing::info_span!("app", service = "dispatch-service").entered();

   // 設定読み込み
   let config = DispatchConfig::from_env().context("設定の読み込みに失敗しました")?;

   tracing::info!(
      "Dispatch Service サーバーを起動します: {}:{}",
      config.host,
      config.port
   );

   // 依存コンポーネントを初期化
   let deps = AppDependencies {
      mail_sender: build_mail_sender(&config.mail),
      audit_sink:  build_audit_sink(&config.audit),
      clock:       Arc::new(SystemClock),
      http_client: reqwest::Client::new(),
   };

   let app = build_app(&config, deps);

   // サーバー起動
   let addr: SocketAddr = format!("{}:{}", config.host, config.port)
      .parse()
      .context("バインドアドレスが不正です")?;
   let listener = TcpListener::bind(addr)
      .await
      .with_context(|| format!("{addr} へのバインドに失敗しました"))?;
   tracing::info!("Dispatch Service サーバーが起動しました: {}", addr);

   axum::serve(listener, app).await?;

   Ok(())
}

/// `MAIL_BACKEND` に応じた送信実装を生成する
fn build_mail_sender(config: &MailConfig) -> Arc<dyn MailSender> {
   match config.backend {
      MailBackend::Mailjet => {
         let credentials = config.mailjet_credentials();
         if credentials.is_none() {
            tracing::warn!(
               error.category = log_error::category::INFRASTRUCTURE,
               error.kind = log_error::kind::CONFIGURATION,
               "MAILJET_API_KEY / MAILJET_API_SECRET が未設定です。送信はプロバイダに拒否されます"
            );
         }
         tracing::info!(endpoint = %config.mailjet_api_url, "メール送信: Mailjet");
         Arc::new(MailjetMailSender::new(
            &config.mailjet_api_url,
            credentials,
            config.from_email.clone(),
            config.from_name.clone(),
         ))
      }
      MailBackend::Smtp => {
         tracing::info!(
            "メール送信: SMTP ({}:{})",
            config.smtp_host,
            config.smtp_port
         );
         Arc::new(SmtpMailSender::new(
            &config.smtp_host,
            config.smtp_port,
            config.from_email.clone(),
            config.from_name.clone(),
         ))
      }
      MailBackend::Noop => {
         tracing::info!("メール送信: Noop（送信しません）");
         Arc::new(NoopMailSender)
      }
   }
}

/// `AUDIT_SINK` に応じた監査シンクを生成する
fn build_audit_sink(config: &AuditConfig) -> Arc<dyn AuditSink> {
   match config.sink {
      AuditSinkKind::File => {
         tracing::info!(path = %config.log_path.display(), "監査記録: ファイル");
         Arc::new(FileAuditSink::new(config.log_path.clone()))
      }
      AuditSinkKind::Log => {
         tracing::info!("監査記録: ログストリーム");
         Arc::new(LogAuditSink::new())
      }
   }
}
