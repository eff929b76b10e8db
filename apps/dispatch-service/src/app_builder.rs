//! # Dispatch Service アプリケーション構築
//!
//! DI（送信実装・監査シンク・State）の組み立てとルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。
//! 統合テストも同じ関数でルーターを組み立てる。

use std::{path::Path, sync::Arc};

use axum::{
   Router,
   extract::DefaultBodyLimit,
   http::HeaderValue,
   routing::{get, post},
};
use eventdesk_domain::clock::Clock;
use eventdesk_infra::{audit::AuditSink, mail::MailSender};
use eventdesk_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
   cors::{Any, CorsLayer},
   request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
   services::{ServeDir, ServeFile},
   trace::TraceLayer,
};

use crate::{
   config::DispatchConfig,
   handler::{
      DispatchState,
      ProxyState,
      health_check,
      proxy_pdf,
      send_certificate,
      send_team_archive,
   },
   usecase::{AuditRecorder, DispatchUseCaseImpl},
};

/// ルーターが依存する外部コンポーネント
///
/// いずれも起動時に 1 度だけ生成し、全リクエストで共有する。
pub struct AppDependencies {
   pub mail_sender: Arc<dyn MailSender>,
   pub audit_sink:  Arc<dyn AuditSink>,
   pub clock:       Arc<dyn Clock>,
   pub http_client: reqwest::Client,
}

/// DI コンテナの構築とルーター定義を行う
pub fn build_app(config: &DispatchConfig, deps: AppDependencies) -> Router {
   let recorder = AuditRecorder::new(deps.audit_sink, deps.clock);
   let dispatch_state = Arc::new(DispatchState {
      usecase: DispatchUseCaseImpl::new(deps.mail_sender, recorder),
   });
   let proxy_state = Arc::new(ProxyState {
      http_client: deps.http_client,
   });

   let router = Router::new()
      .route("/health", get(health_check))
      // PDF プロキシ
      .merge(
         Router::new()
            .route("/proxy-pdf", get(proxy_pdf))
            .with_state(proxy_state),
      )
      // メール送信 API
      .merge(
         Router::new()
            .route("/EnviarCorreo", post(send_certificate))
            .route("/EnviarZip", post(send_team_archive))
            .with_state(dispatch_state),
      );

   with_spa_fallback(router, config.spa_dir.as_deref())
      // base64 添付を含むため、既定の 2 MB から引き上げる
      .layer(DefaultBodyLimit::max(config.max_body_bytes))
      .layer(cors_layer(config.cors_origin.as_deref()))
      // Request ID レイヤー（レイヤー順序が重要: 下に書いたものが外側）
      // 1. SetRequestIdLayer（最外）: UUID v7 を生成（またはクライアント提供値を使用）
      // 2. TraceLayer: カスタムスパンに request_id を含め、全ログに自動注入
      // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
      .layer(PropagateRequestIdLayer::x_request_id())
      .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
      .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}

/// API に一致しないリクエストをビルド済み SPA で応答する
///
/// 存在しないパスは `index.html` を返し、クライアント側ルーティングに任せる。
fn with_spa_fallback(router: Router, spa_dir: Option<&Path>) -> Router {
   let Some(dir) = spa_dir else {
      return router;
   };
   if !dir.is_dir() {
      tracing::warn!(
         path = %dir.display(),
         "SPA ディレクトリが見つからないため静的ファイルを配信しません"
      );
      return router;
   }

   let index = dir.join("index.html");
   router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
}

/// CORS レイヤーを作成する
///
/// オリジン未指定（`*`）なら全許可、指定されていればそのオリジンのみ許可する。
fn cors_layer(origin: Option<&str>) -> CorsLayer {
   let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
   match origin.map(HeaderValue::from_str) {
      Some(Ok(value)) => base.allow_origin(value),
      Some(Err(_)) => {
         tracing::warn!(
            origin = origin.unwrap_or_default(),
            "CORS_ORIGIN が不正なため全オリジンを許可します"
         );
         base.allow_origin(Any)
      }
      None => base.allow_origin(Any),
   }
}
