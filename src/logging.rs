use crate::error::Result;
use env_logger::{Builder, Env, Target};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

static LOG_SINK: Mutex<Option<File>> = Mutex::new(None);

// Rotate once the log grows past this size; one previous file is kept.
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

fn rotate_if_needed(log_file_path: &Path) -> Result<()> {
    if let Ok(metadata) = fs::metadata(log_file_path) {
        if metadata.len() > MAX_LOG_SIZE {
            let mut rotated = log_file_path.as_os_str().to_os_string();
            rotated.push(".old");
            fs::rename(log_file_path, rotated)?;
        }
    }
    Ok(())
}

/// Initialize logging to stderr and the agent's log file.
pub fn init_logging(log_file_path: &Path) -> Result<()> {
    rotate_if_needed(log_file_path)?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    *LOG_SINK.lock().unwrap() = Some(log_file);

    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.target(Target::Stderr);
    builder.format(|buf, record| {
        let line = format!(
            "[{}] {} {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.args()
        );

        writeln!(buf, "{line}")?;

        if let Ok(mut sink) = LOG_SINK.lock() {
            if let Some(file) = sink.as_mut() {
                writeln!(file, "{line}").ok();
                file.flush().ok();
            }
        }

        Ok(())
    });
    builder.init();

    Ok(())
}
