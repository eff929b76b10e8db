//! 追記専用ファイルへの監査記録

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use eventdesk_domain::audit::AuditRecord;
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};

use super::AuditSink;
use crate::error::InfraError;

/// JSON Lines 形式の監査ログファイル
///
/// 1 記録 = 1 行。親ディレクトリが存在しなければ初回書き込み時に作成する。
/// 同時リクエストの行が混ざらないよう、書き込みはプロセス内で直列化する。
pub struct FileAuditSink {
    path:       PathBuf,
    write_lock: Mutex<()>,
}

impl FileAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path:       path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditSink for FileAuditSink {
    async fn append(&self, record: &AuditRecord) -> Result<(), InfraError> {
        let mut line = record.to_json_line()?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}
