use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

mod command;
mod util;

fn main() -> anyhow::Result<()> {
    // stdout carries series JSON and reports; logs go to stderr
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mkplot=info,mkplot_stat=info,mkplot_series=info".into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    command::run()
}
