use anyhow::{bail, Context, Result};
use colored::Colorize;
use trellis_gen::GenerateOptions;

pub fn execute(opts: &GenerateOptions) -> Result<()> {
    println!("{}", "Generating route registry...".green().bold());
    println!("App: {}", opts.app_root.display().to_string().cyan());

    let report = trellis_gen::generate(opts).context("route generation failed")?;

    println!();
    println!(
        "{} {} routes ({} live) into {}",
        "✓".green(),
        report.routes,
        report.live_routes,
        opts.gen_root.display().to_string().cyan()
    );
    for stub in &report.stubs {
        println!("  {} {}", "stub".yellow(), stub.display());
    }
    if !report.stubs.is_empty() {
        println!();
        println!("{}", "Resolver stubs fail at runtime until implemented.".yellow());
    }

    Ok(())
}

pub fn check(opts: &GenerateOptions) -> Result<()> {
    let report = trellis_gen::check(opts).context("route generation failed")?;

    if report.is_clean() {
        println!("{} route registry is up to date", "✓".green());
        return Ok(());
    }

    for path in &report.stale {
        println!("  {} {}", "stale".red(), path.display());
    }
    for path in &report.unexpected {
        println!("  {} {}", "unexpected".red(), path.display());
    }
    for path in &report.missing_stubs {
        println!("  {} {}", "missing stub".yellow(), path.display());
    }
    bail!("route registry is out of date; run `trellis generate`")
}
