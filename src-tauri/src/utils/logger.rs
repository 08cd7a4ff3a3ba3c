use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

const DEFAULT_FILTER: &str = "warn,deep_narrator_lib=info,deep_narrator=info";

pub fn init_logger() {
    // RUST_LOG overrides the default filter
    let env = Env::default().filter_or("RUST_LOG", DEFAULT_FILTER);

    let mut builder = Builder::from_env(env);

    builder
        .filter_module("wry", LevelFilter::Error)
        .filter_module("tao", LevelFilter::Error)
        .filter_module("mio", LevelFilter::Error)
        .filter_module("hyper", LevelFilter::Error)
        .filter_module("tauri", LevelFilter::Warn)
        .filter_module("symphonia", LevelFilter::Warn)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr);

    // a second init (tests, hot reload) keeps the first logger
    if let Err(e) = builder.try_init() {
        eprintln!("Logger already initialized: {}", e);
    }
}
