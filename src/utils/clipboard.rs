//! 剪贴板辅助：跨平台复制文本

use copypasta::{ClipboardContext, ClipboardProvider};

use crate::model::data_core::AppError;

/// 将文本复制到系统剪贴板
pub fn copy_text(text: &str) -> Result<(), AppError> {
    let mut ctx = ClipboardContext::new().map_err(|e| AppError::Clipboard(e.to_string()))?;
    ctx.set_contents(text.to_string())
        .map_err(|e| AppError::Clipboard(e.to_string()))
}
