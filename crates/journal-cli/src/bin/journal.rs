use journal_core::config::ClientConfig;

fn main() {
    journal_cli::set_version(env!("CARGO_PKG_VERSION"));
    let args: Vec<String> = std::env::args().skip(1).collect();

    let (config_path, args) = match journal_cli::split_config_flag(&args) {
        Ok(split) => split,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(2);
        }
    };
    let config_path = config_path.or_else(|| std::env::var("JOURNAL_CONFIG").ok());

    let loaded = match ClientConfig::load(config_path.as_deref()) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };
    journal_cli::logging::init_tracing(&loaded.config.logging);
    tracing::debug!(path = ?loaded.path, "config loaded");

    let backend = match journal_cli::HttpJournalBackend::new(loaded) {
        Ok(backend) => backend,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    let out = journal_cli::run_cli(&args, &backend);
    if !out.stdout.is_empty() {
        print!("{}", out.stdout);
    }
    if !out.stderr.is_empty() {
        eprint!("{}", out.stderr);
    }
    std::process::exit(out.exit_code);
}
