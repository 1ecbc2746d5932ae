use std::io::Write;

use flexi_logger::{DeferredNow, Logger};
use log::Record;

use crate::Error;

pub fn init() -> Result<(), Error> {
    Logger::try_with_env_or_str("info")?
        .format(cli_format)
        .log_to_stdout()
        .start()?;

    Ok(())
}

/// `HH:MM:SS LEVEL message`
fn cli_format(w: &mut dyn Write, now: &mut DeferredNow, record: &Record) -> std::io::Result<()> {
    write!(
        w,
        "{} {:<5} {}",
        now.format("%H:%M:%S"),
        record.level(),
        record.args()
    )
}
