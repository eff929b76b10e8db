//! # ユースケース層
//!
//! 検証済みの送信リクエストをメールプロバイダへ渡し、結果を監査記録に残す。

pub mod audit;
pub mod dispatch;

pub use audit::AuditRecorder;
pub use dispatch::DispatchUseCaseImpl;
