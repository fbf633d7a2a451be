use clap::Parser;
use neuroshuttle::{run, Cli};

fn main() {
    #[cfg(unix)]
    reset_sigpipe();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(exit_code_for(&err));
    }
}

/// Exit-code convention: `0` success, `2` validation
/// failure, `3` config/auth error, `4` transfer backend error, `1`
/// otherwise.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(sdk_err) = err.downcast_ref::<nb_sdk::Error>() {
        return match sdk_err {
            nb_sdk::Error::Validation(_) | nb_sdk::Error::Name(_) => 2,
            nb_sdk::Error::Config(_) | nb_sdk::Error::Credentials(_) | nb_sdk::Error::Precondition(_) => 3,
            nb_sdk::Error::Transfer(_) | nb_sdk::Error::Backend(_) => 4,
            nb_sdk::Error::Core(_) | nb_sdk::Error::Io(_) => 1,
        };
    }
    1
}

#[cfg(unix)]
fn reset_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}
