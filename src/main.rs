use clap::{Parser, Subcommand};

mod log;
mod model;
mod render;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "netphys-plot")]
#[command(about = "Latency/size plotter for netphys benchmark logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate benchmark logs and render the latency/size chart.
    Plot {
        /// Directory scanned (non-recursively) for *.log files.
        #[arg(long, default_value = ".")]
        dir: String,

        /// Static PNG output path (overwritten).
        #[arg(short = 'o', long, default_value = "plot.png")]
        out: String,

        /// Interactive HTML output path (overwritten).
        #[arg(long, default_value = "plot.html")]
        html: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Plot { dir, out, html } => {
            // 1) Discover benchmark logs.
            let files = log::discover_log_files(&dir)?;

            // 2) Parse each log, keeping only records that carry a latency.
            let mut samples = Vec::new();
            for file in &files {
                let rows = log::parse_log_file(file)?;
                if rows.is_empty() {
                    eprintln!("WARN: {} contained no latency samples", file.display());
                }
                samples.extend(rows);
            }

            // 3) Aggregate per object count.
            let table = model::aggregate(&samples);

            // 4) Fit the latency trend.
            let fit = model::fit_latency(&table)?;

            // 5) Render interactive HTML + static PNG.
            let doc = render::render_html_chart(&table, &fit)?;
            std::fs::write(&html, doc)?;
            render::write_png_chart(&out, &table, &fit)?;

            println!("Wrote {} and {}", html, out);
        }
    }

    Ok(())
}
