use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

pub struct SimpleLogger;

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && !is_parser_noise(metadata)
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if record.target() == "progress" {
                eprintln!("{}...", record.args());
            } else {
                let color = match record.level() {
                    Level::Error => "\x1b[31;1m",
                    Level::Warn => "\x1b[33;1m",
                    Level::Info => "\x1b[1m",
                    Level::Debug => "",
                    Level::Trace => "",
                };
                let color_end = "\x1b[0m";
                eprintln!("[{color}{}{color_end}] {}", record.level(), record.args());
            }
        }
    }

    fn flush(&self) {}
}

/// debug and trace chatter from the HTML parser crates
pub(crate) fn is_parser_noise(metadata: &Metadata) -> bool {
    let target = metadata.target();
    metadata.level() > Level::Info
        && (target.starts_with("selectors") || target.starts_with("html5ever"))
}

static LOGGER: SimpleLogger = SimpleLogger;

/// `-q` wins over any number of `-v`
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Warn;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}
