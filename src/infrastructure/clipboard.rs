use arboard::Clipboard;
use log::warn;

pub struct ClipboardSink;

impl ClipboardSink {
    pub fn copy_text(text: &str) -> Result<(), String> {
        let mut clipboard = Clipboard::new().map_err(|e| {
            warn!("Clipboard unavailable: {}", e);
            e.to_string()
        })?;
        clipboard.set_text(text.to_string()).map_err(|e| e.to_string())
    }
}
