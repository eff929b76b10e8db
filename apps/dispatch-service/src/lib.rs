//! # Dispatch Service ライブラリ
//!
//! 証明書・チーム ZIP のメール送信 API と PDF プロキシを公開する。
//! 統合テストからルーターを組み立てられるよう、内部モジュールへのアクセスを提供する。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
