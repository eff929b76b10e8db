//! # ハンドラ層
//!
//! HTTP リクエストを受け取り、ユースケースを呼び出してレスポンスを返す。

pub mod dispatch;
pub mod health;
pub mod proxy;

pub use dispatch::{DispatchState, send_certificate, send_team_archive};
pub use health::health_check;
pub use proxy::{ProxyState, proxy_pdf};
