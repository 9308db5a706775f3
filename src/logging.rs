use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Installs the terminal logger. Warnings and errors go to stderr, the rest to stdout.
///
/// Unless `verbose`, the HTTP stack's own chatter is filtered out.
pub fn init(verbose: bool) -> Result<(), log::SetLoggerError> {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    let mut builder = ConfigBuilder::new();
    builder.set_time_format_rfc3339();
    if !verbose {
        builder
            .add_filter_ignore_str("reqwest")
            .add_filter_ignore_str("hyper");
    }

    TermLogger::init(level, builder.build(), TerminalMode::Mixed, ColorChoice::Auto)
}

/// Logger for unit tests; a no-op when one is already installed.
pub fn init_for_tests() {
    let _ = TermLogger::init(
        LevelFilter::Debug,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
}
