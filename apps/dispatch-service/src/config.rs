//! # Dispatch Service 設定
//!
//! 環境変数から Dispatch Service サーバーの設定を読み込む。
//!
//! 起動時に 1 度だけ組み立て、ルーター・ユースケースに明示的に渡す。
//! 環境変数の参照は [`DispatchConfig::from_lookup`] に集約しており、
//! テストではプロセスの環境変数を書き換えずに任意の値を与えられる。

use std::{env, path::PathBuf, str::FromStr};

use eventdesk_infra::mail::{MAILJET_SEND_URL, MailjetCredentials};
use eventdesk_shared::event_log::error as log_error;
use strum::{Display, EnumString};
use thiserror::Error;

/// 設定の読み込みエラー
///
/// 数値として解釈できない値は起動を中断する。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
   #[error("{name} は有効な数値である必要があります: {value:?}")]
   InvalidNumber { name: &'static str, value: String },
}

/// Dispatch Service サーバーの設定
#[derive(Debug, Clone)]
pub struct DispatchConfig {
   /// バインドアドレス
   pub host:           String,
   /// ポート番号
   pub port:           u16,
   /// リクエストボディの上限（バイト）
   pub max_body_bytes: usize,
   /// CORS で許可するオリジン（`None` は全オリジン許可）
   pub cors_origin:    Option<String>,
   /// ビルド済み SPA のディレクトリ
   pub spa_dir:        Option<PathBuf>,
   /// メール送信設定
   pub mail:           MailConfig,
   /// 監査記録設定
   pub audit:          AuditConfig,
}

/// メール送信バックエンド
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MailBackend {
   /// Mailjet Send API v3.1（本番）
   #[default]
   Mailjet,
   /// SMTP（Mailpit 等のローカル開発）
   Smtp,
   /// 送信しない（ログ出力のみ）
   Noop,
}

/// メール送信の設定
///
/// `MAIL_BACKEND` 環境変数で送信バックエンドを切り替える。
#[derive(Clone)]
pub struct MailConfig {
   pub backend:            MailBackend,
   pub mailjet_api_key:    Option<String>,
   pub mailjet_api_secret: Option<String>,
   pub mailjet_api_url:    String,
   pub from_email:         String,
   pub from_name:          String,
   pub smtp_host:          String,
   pub smtp_port:          u16,
}

// API シークレットをログに出さない
impl std::fmt::Debug for MailConfig {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.debug_struct("MailConfig")
         .field("backend", &self.backend)
         .field("mailjet_api_key", &self.mailjet_api_key)
         .field(
            "mailjet_api_secret",
            &self.mailjet_api_secret.as_ref().map(|_| "***"),
         )
         .field("mailjet_api_url", &self.mailjet_api_url)
         .field("from_email", &self.from_email)
         .field("from_name", &self.from_name)
         .field("smtp_host", &self.smtp_host)
         .field("smtp_port", &self.smtp_port)
         .finish()
   }
}

impl MailConfig {
   /// API キーとシークレットが両方揃っている場合のみ認証情報を返す
   pub fn mailjet_credentials(&self) -> Option<MailjetCredentials> {
      match (&self.mailjet_api_key, &self.mailjet_api_secret) {
         (Some(key), Some(secret)) => Some(MailjetCredentials::new(key, secret)),
         _ => None,
      }
   }
}

/// 監査記録の書き込み先
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AuditSinkKind {
   /// 追記専用ファイル
   #[default]
   File,
   /// ログストリーム
   Log,
}

/// 監査記録の設定
#[derive(Debug, Clone)]
pub struct AuditConfig {
   pub sink:     AuditSinkKind,
   pub log_path: PathBuf,
}

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;
const DEFAULT_FROM_EMAIL: &str = "no-reply@eventdesk.example.com";
const DEFAULT_FROM_NAME: &str = "EventDesk";
const DEFAULT_AUDIT_LOG_PATH: &str = "logs/dispatch-audit.log";

impl DispatchConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|name| env::var(name).ok())
   }

   /// 任意の参照関数から設定を読み込む
   ///
   /// 空文字・空白のみの値は未設定として扱う。
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
      let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

      let cors_origin = get("CORS_ORIGIN").filter(|origin| origin.trim() != "*");

      Ok(Self {
         host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
         port: parse_number("PORT", get("PORT"), DEFAULT_PORT)?,
         max_body_bytes: parse_number(
            "MAX_BODY_BYTES",
            get("MAX_BODY_BYTES"),
            DEFAULT_MAX_BODY_BYTES,
         )?,
         cors_origin,
         spa_dir: get("SPA_DIR").map(PathBuf::from),
         mail: MailConfig {
            backend:            parse_choice("MAIL_BACKEND", get("MAIL_BACKEND")),
            mailjet_api_key:    get("MAILJET_API_KEY"),
            mailjet_api_secret: get("MAILJET_API_SECRET"),
            mailjet_api_url:    get("MAILJET_API_URL")
               .unwrap_or_else(|| MAILJET_SEND_URL.to_string()),
            from_email:         get("MAIL_FROM_EMAIL")
               .unwrap_or_else(|| DEFAULT_FROM_EMAIL.to_string()),
            from_name:          get("MAIL_FROM_NAME")
               .unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
            smtp_host:          get("SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
            smtp_port:          parse_number("SMTP_PORT", get("SMTP_PORT"), 1025)?,
         },
         audit: AuditConfig {
            sink:     parse_choice("AUDIT_SINK", get("AUDIT_SINK")),
            log_path: get("AUDIT_LOG_PATH")
               .map(PathBuf::from)
               .unwrap_or_else(|| PathBuf::from(DEFAULT_AUDIT_LOG_PATH)),
         },
      })
   }
}

fn parse_number<T: FromStr>(
   name: &'static str,
   value: Option<String>,
   default: T,
) -> Result<T, ConfigError> {
   match value {
      None => Ok(default),
      Some(raw) => raw
         .trim()
         .parse()
         .map_err(|_| ConfigError::InvalidNumber { name, value: raw }),
   }
}

/// 列挙値を解釈する。未知の値は警告を出して既定値を使う
fn parse_choice<T>(name: &'static str, value: Option<String>) -> T
where
   T: FromStr + Default + std::fmt::Display,
{
   let Some(raw) = value else {
      return T::default();
   };
   match raw.trim().parse() {
      Ok(parsed) => parsed,
      Err(_) => {
         let fallback = T::default();
         tracing::warn!(
            error.category = log_error::category::INFRASTRUCTURE,
            error.kind = log_error::kind::CONFIGURATION,
            variable = name,
            value = %raw,
            fallback = %fallback,
            "未知の設定値のため既定値を使用します"
         );
         fallback
      }
   }
}
